pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod memory;
pub mod notification_repo;
pub mod preferences;
pub mod profile_repo;

pub use app_config::{Config, StorageBackend};
pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use memory::InMemoryStore;
pub use notification_repo::PgNotificationRepository;
pub use preferences::{LocalPreferences, PreferencesError};
pub use profile_repo::PgProfileRepository;
