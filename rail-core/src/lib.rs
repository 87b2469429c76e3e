pub mod accounts;
pub mod identity;
pub mod payment;
pub mod profile;
pub mod repository;
pub mod search;
pub mod session;

pub use accounts::AccountService;
pub use identity::{FederatedAssertion, IdentityError, IdentityProvider, LocalIdentityProvider, SessionPrincipal};
pub use profile::{ProfileError, ProfileService};
pub use session::{SessionManager, SessionState};

/// Failures detected before any store or payment call is made.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    PolicyViolation(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
