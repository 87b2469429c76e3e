pub mod checkout;
pub mod identifiers;
pub mod manager;
pub mod notifications;
pub mod orchestrator;
pub mod rules;

#[cfg(test)]
pub(crate) mod testing;

pub use checkout::{CheckoutRequest, CheckoutService};
pub use manager::{BookingError, BookingManager, BookingStats};
pub use notifications::{NotificationCenter, NotificationError};
pub use orchestrator::{MockPaymentAdapter, PaymentError, PaymentOrchestrator};
