use std::collections::HashMap;
use std::sync::Arc;

use rail_catalog::{SeatSelection, TrainCatalog, TrainTracker};
use rail_core::repository::{BookingRepository, NotificationRepository, ProfileRepository};
use rail_core::{AccountService, IdentityProvider, ProfileService};
use rail_order::{BookingManager, CheckoutService, MockPaymentAdapter, NotificationCenter, PaymentOrchestrator};
use rail_store::{InMemoryStore, LocalPreferences};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

/// Repositories the services are built on.
pub struct Repositories {
    pub profiles: Arc<dyn ProfileRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            profiles: store.clone(),
            bookings: store.clone(),
            notifications: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub profiles: ProfileService,
    pub bookings: Arc<BookingManager>,
    pub notifications: NotificationCenter,
    pub checkout: Arc<CheckoutService>,
    pub catalog: Arc<TrainCatalog>,
    pub tracker: Arc<TrainTracker>,
    /// Open seat selection per signed-in user.
    pub selections: Arc<RwLock<HashMap<String, SeatSelection>>>,
    pub preferences: Arc<LocalPreferences>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        identity: Arc<dyn IdentityProvider>,
        preferences: LocalPreferences,
        auth: AuthConfig,
    ) -> Self {
        let profiles = ProfileService::new(repos.profiles);
        let notifications = NotificationCenter::new(repos.notifications);
        let bookings = Arc::new(
            BookingManager::new(repos.bookings).with_notifications(notifications.clone()),
        );
        let payments = PaymentOrchestrator::new(Arc::new(MockPaymentAdapter));

        Self {
            accounts: Arc::new(AccountService::new(identity, profiles.clone())),
            profiles,
            checkout: Arc::new(CheckoutService::new(bookings.clone(), payments)),
            bookings,
            notifications,
            catalog: Arc::new(TrainCatalog::demo()),
            tracker: Arc::new(TrainTracker::demo()),
            selections: Arc::new(RwLock::new(HashMap::new())),
            preferences: Arc::new(preferences),
            auth,
        }
    }
}
