use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rail_shared::{Booking, BookingPatch, BookingStatus, Notification, UserProfile};

/// Error returned by a document store backend.
pub type RepoError = Box<dyn std::error::Error + Send + Sync>;
pub type RepoResult<T> = Result<T, RepoError>;

/// Repository trait for the `profiles` collection, keyed by uid
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self, uid: &str) -> RepoResult<Option<UserProfile>>;

    /// Upsert by uid. An existing document keeps its `createdAt`.
    async fn save_profile(&self, profile: &UserProfile) -> RepoResult<()>;
}

/// Sort order of a booking query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingOrder {
    #[default]
    BookingDateDesc,
    JourneyDateAsc,
    /// Bookings without a refund date sort last.
    RefundDateDesc,
}

/// Filter over the `bookings` collection. Every populated field must match.
#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    pub user_id: Option<String>,
    pub booking_id: Option<String>,
    pub pnr_number: Option<String>,
    pub statuses: Vec<BookingStatus>,
    pub journey_from: Option<DateTime<Utc>>,
    pub order: BookingOrder,
}

impl BookingQuery {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        }
    }

    pub fn by_booking_id(booking_id: &str) -> Self {
        Self {
            booking_id: Some(booking_id.to_string()),
            ..Default::default()
        }
    }

    pub fn by_pnr(pnr_number: &str) -> Self {
        Self {
            pnr_number: Some(pnr_number.to_string()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.statuses = vec![status];
        self
    }

    pub fn with_statuses(mut self, statuses: &[BookingStatus]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }

    pub fn journey_on_or_after(mut self, from: DateTime<Utc>) -> Self {
        self.journey_from = Some(from);
        self
    }

    pub fn ordered_by(mut self, order: BookingOrder) -> Self {
        self.order = order;
        self
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(user_id) = &self.user_id {
            if &booking.user_id != user_id {
                return false;
            }
        }
        if let Some(booking_id) = &self.booking_id {
            if &booking.booking_id != booking_id {
                return false;
            }
        }
        if let Some(pnr) = &self.pnr_number {
            if &booking.pnr_number != pnr {
                return false;
            }
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&booking.status) {
            return false;
        }
        if let Some(from) = self.journey_from {
            if booking.journey_date < from {
                return false;
            }
        }
        true
    }

    /// Apply this query's ordering to an already filtered result.
    pub fn sort(&self, bookings: &mut [Booking]) {
        match self.order {
            BookingOrder::BookingDateDesc => {
                bookings.sort_by(|a, b| b.booking_date.cmp(&a.booking_date))
            }
            BookingOrder::JourneyDateAsc => {
                bookings.sort_by(|a, b| a.journey_date.cmp(&b.journey_date))
            }
            BookingOrder::RefundDateDesc => bookings.sort_by(|a, b| {
                match (a.refund_date, b.refund_date) {
                    (Some(x), Some(y)) => y.cmp(&x),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            }),
        }
    }
}

/// Result of a conditional booking write
#[derive(Debug, Clone)]
pub enum PatchOutcome {
    Applied(Booking),
    /// The stored booking no longer permits the patch. Nothing was written.
    Rejected(Booking),
    Missing,
}

/// Repository trait for the `bookings` collection
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new document and return its store-generated key.
    async fn insert_booking(&self, booking: &Booking) -> RepoResult<String>;

    async fn find_bookings(&self, query: &BookingQuery) -> RepoResult<Vec<Booking>>;

    /// Apply the whole patch in one write, checking `BookingPatch::permits` against
    /// the stored document under the same lock.
    async fn update_booking(
        &self,
        booking_id: &str,
        patch: &BookingPatch,
    ) -> RepoResult<PatchOutcome>;

    /// Returns false when no booking has that bookingId.
    async fn delete_booking(&self, booking_id: &str) -> RepoResult<bool>;
}

/// Repository trait for the `notifications` collection
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert_notification(&self, notification: &Notification) -> RepoResult<String>;

    /// Newest first.
    async fn list_notifications(&self, user_id: &str) -> RepoResult<Vec<Notification>>;

    async fn mark_read(&self, notification_id: &str) -> RepoResult<()>;
}
