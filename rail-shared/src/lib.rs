pub mod models;
pub mod pii;

pub use models::booking::{
    Booking, BookingDraft, BookingPatch, BookingStatus, Passenger, PassengerUpdate, PaymentMethod,
    PaymentStatus,
};
pub use models::events::BookingEvent;
pub use models::notification::{Notification, NotificationDraft, NotificationType};
pub use models::profile::{
    Address, Gender, MealPreference, ProfileUpdate, SeatPreference, TravelPreferences, UserProfile,
};
pub use models::train::{BerthType, FareClass};
pub use pii::Masked;
