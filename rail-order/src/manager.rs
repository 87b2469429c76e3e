use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use rail_core::repository::{BookingOrder, BookingQuery, BookingRepository, PatchOutcome, RepoError};
use rail_core::CoreError;
use rail_shared::models::events::{BookingCancelledEvent, BookingConfirmedEvent, BookingExtendedEvent};
use rail_shared::{
    Booking, BookingDraft, BookingEvent, BookingPatch, BookingStatus, PassengerUpdate,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::identifiers::{generate_booking_id, generate_pnr_number};
use crate::notifications::NotificationCenter;
use crate::orchestrator::PaymentError;
use crate::rules;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{message}")]
    Store {
        message: String,
        #[source]
        source: RepoError,
    },

    #[error("Booking not found")]
    NotFound(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("This booking can no longer be cancelled")]
    NotCancellable(String),

    #[error("This booking cannot be extended")]
    NotExtendable(String),

    #[error("Cannot change booking status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

fn store_error(message: impl Into<String>, context: &str, source: RepoError) -> BookingError {
    error!("{}: {}", context, source);
    BookingError::Store {
        message: message.into(),
        source,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total_bookings: usize,
    pub confirmed_bookings: usize,
    pub cancelled_bookings: usize,
    pub total_spent: i64,
    pub total_refunds: i64,
}

impl BookingStats {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        bookings.iter().fold(Self::default(), |mut stats, b| {
            stats.total_bookings += 1;
            match b.status {
                BookingStatus::Confirmed => {
                    stats.confirmed_bookings += 1;
                    stats.total_spent += b.total_fare as i64;
                }
                BookingStatus::Cancelled => {
                    stats.cancelled_bookings += 1;
                    stats.total_refunds += b.refund_amount.unwrap_or(0) as i64;
                }
                _ => {}
            }
            stats
        })
    }
}

/// Booking store adapter: creation, lifecycle changes and per-user queries.
#[derive(Clone)]
pub struct BookingManager {
    repo: Arc<dyn BookingRepository>,
    notifications: Option<NotificationCenter>,
}

impl BookingManager {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self {
            repo,
            notifications: None,
        }
    }

    /// Record a notification for every confirmation, cancellation and extension.
    pub fn with_notifications(mut self, notifications: NotificationCenter) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Assign identifiers and persist a new confirmed, paid booking.
    pub async fn save_booking(&self, draft: BookingDraft) -> Result<Booking, BookingError> {
        let booking = self
            .insert(draft, "Failed to save booking. Please try again.")
            .await?;
        info!("Booking confirmed: {} (PNR {})", booking.booking_id, booking.pnr_number);

        self.publish(BookingEvent::Confirmed(BookingConfirmedEvent {
            booking_id: booking.booking_id.clone(),
            pnr_number: booking.pnr_number.clone(),
            user_id: booking.user_id.clone(),
            train_name: booking.train_name.clone(),
            total_fare: booking.total_fare,
            timestamp: booking.created_at.timestamp(),
        }))
        .await;
        Ok(booking)
    }

    async fn insert(&self, draft: BookingDraft, message: &str) -> Result<Booking, BookingError> {
        let mut booking = Booking::from_draft(
            draft,
            generate_booking_id(),
            generate_pnr_number(),
            Utc::now(),
        );
        let key = self
            .repo
            .insert_booking(&booking)
            .await
            .map_err(|e| store_error(message, "Error saving booking", e))?;
        booking.id = Some(key);
        Ok(booking)
    }

    async fn find(&self, query: &BookingQuery, message: &str, context: &str) -> Result<Vec<Booking>, BookingError> {
        debug!("Booking query: {:?}", query);
        self.repo
            .find_bookings(query)
            .await
            .map_err(|e| store_error(message, context, e))
    }

    /// Every booking of the user, newest booking date first.
    pub async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, BookingError> {
        self.find(
            &BookingQuery::for_user(user_id).ordered_by(BookingOrder::BookingDateDesc),
            "Failed to load bookings. Please try again.",
            "Error getting bookings",
        )
        .await
    }

    /// `None` when no booking carries that PNR.
    pub async fn booking_by_pnr(&self, pnr_number: &str) -> Result<Option<Booking>, BookingError> {
        let found = self
            .find(
                &BookingQuery::by_pnr(pnr_number),
                "Failed to find booking. Please check the PNR number.",
                "Error getting booking by PNR",
            )
            .await?;
        Ok(found.into_iter().next())
    }

    /// Lookup by the `BK` booking id, not the store key.
    pub async fn booking_by_booking_id(&self, booking_id: &str) -> Result<Option<Booking>, BookingError> {
        let found = self
            .find(
                &BookingQuery::by_booking_id(booking_id),
                "Failed to find booking.",
                "Error getting booking by ID",
            )
            .await?;
        Ok(found.into_iter().next())
    }

    async fn require(&self, booking_id: &str) -> Result<Booking, BookingError> {
        self.booking_by_booking_id(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))
    }

    /// Unordered.
    pub async fn bookings_by_status(
        &self,
        user_id: &str,
        status: BookingStatus,
    ) -> Result<Vec<Booking>, BookingError> {
        self.find(
            &BookingQuery::for_user(user_id).with_status(status),
            &format!("Failed to load {} bookings.", status),
            "Error getting bookings by status",
        )
        .await
    }

    /// Confirmed bookings travelling today (UTC) or later, soonest first.
    pub async fn upcoming_journeys(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingError> {
        let start_of_day = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::default()));
        self.find(
            &BookingQuery::for_user(user_id)
                .with_status(BookingStatus::Confirmed)
                .journey_on_or_after(start_of_day)
                .ordered_by(BookingOrder::JourneyDateAsc),
            "Failed to load upcoming journeys.",
            "Error getting upcoming journeys",
        )
        .await
    }

    /// Cancelled and refunded bookings, latest refund first.
    pub async fn refund_history(&self, user_id: &str) -> Result<Vec<Booking>, BookingError> {
        self.find(
            &BookingQuery::for_user(user_id)
                .with_statuses(&[BookingStatus::Cancelled, BookingStatus::Refunded])
                .ordered_by(BookingOrder::RefundDateDesc),
            "Failed to load refund history.",
            "Error getting refund history",
        )
        .await
    }

    /// Counts and rupee totals over all of the user's bookings.
    pub async fn booking_stats(&self, user_id: &str) -> Result<BookingStats, BookingError> {
        let bookings = self
            .find(
                &BookingQuery::for_user(user_id),
                "Failed to load booking statistics.",
                "Error getting booking stats",
            )
            .await?;
        Ok(BookingStats::from_bookings(&bookings))
    }

    /// Substring match over train name, booking id and stations (any case) or PNR.
    pub async fn search_bookings(&self, user_id: &str, term: &str) -> Result<Vec<Booking>, BookingError> {
        let bookings = self
            .find(
                &BookingQuery::for_user(user_id).ordered_by(BookingOrder::BookingDateDesc),
                "Failed to search bookings.",
                "Error searching bookings",
            )
            .await?;

        let needle = term.to_lowercase();
        Ok(bookings
            .into_iter()
            .filter(|b| {
                b.train_name.to_lowercase().contains(&needle)
                    || b.pnr_number.contains(term)
                    || b.booking_id.to_lowercase().contains(&needle)
                    || b.from.to_lowercase().contains(&needle)
                    || b.to.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Apply a patch in a single store write. A status change must follow
    /// [`BookingStatus::can_transition_to`].
    pub async fn update_booking(&self, booking_id: &str, patch: BookingPatch) -> Result<Booking, BookingError> {
        self.update_with_message(booking_id, patch, "Failed to update booking. Please try again.")
            .await
    }

    async fn update_with_message(
        &self,
        booking_id: &str,
        patch: BookingPatch,
        message: &str,
    ) -> Result<Booking, BookingError> {
        let current = self.require(booking_id).await?;
        if let Some(next) = patch.status {
            if next != current.status && !current.status.can_transition_to(next) {
                warn!("Rejected status change {} -> {} for {}", current.status, next, booking_id);
                return Err(BookingError::InvalidTransition {
                    from: current.status,
                    to: next,
                });
            }
        }

        let outcome = self
            .repo
            .update_booking(booking_id, &patch)
            .await
            .map_err(|e| store_error(message, "Error updating booking status", e))?;
        match outcome {
            PatchOutcome::Applied(booking) => Ok(booking),
            PatchOutcome::Rejected(stored) => {
                warn!("Booking {} changed to {} before the write", booking_id, stored.status);
                Err(BookingError::InvalidTransition {
                    from: stored.status,
                    to: patch.status.unwrap_or(stored.status),
                })
            }
            PatchOutcome::Missing => Err(BookingError::NotFound(booking_id.to_string())),
        }
    }

    /// Cancel as of the current time. See [`BookingManager::cancel_booking_at`].
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<Booking, BookingError> {
        self.cancel_booking_at(booking_id, Utc::now()).await
    }

    /// Cancel with the refund tier for `now`. Status, payment status and refund
    /// fields change in one write, and only while the stored booking is still
    /// confirmed. A concurrent cancellation that lands first makes this one fail
    /// with [`BookingError::NotCancellable`].
    pub async fn cancel_booking_at(&self, booking_id: &str, now: DateTime<Utc>) -> Result<Booking, BookingError> {
        let booking = self.require(booking_id).await?;
        if !rules::can_cancel_at(&booking, now) {
            warn!("Booking {} is not cancellable", booking_id);
            return Err(BookingError::NotCancellable(booking_id.to_string()));
        }

        let refund = rules::refund_amount_at(&booking, now);
        let cancelled = self
            .update_with_message(
                booking_id,
                BookingPatch::cancellation(refund, now),
                "Failed to cancel booking. Please try again.",
            )
            .await
            .map_err(|e| match e {
                BookingError::InvalidTransition { .. } => BookingError::NotCancellable(booking_id.to_string()),
                other => other,
            })?;
        info!("Booking cancelled: {} (refund {})", booking_id, refund);

        self.publish(BookingEvent::Cancelled(BookingCancelledEvent {
            booking_id: cancelled.booking_id.clone(),
            user_id: cancelled.user_id.clone(),
            refund_amount: refund,
            timestamp: now.timestamp(),
        }))
        .await;
        Ok(cancelled)
    }

    /// Extend as of the current time.
    pub async fn extend_booking(
        &self,
        booking_id: &str,
        new_journey_date: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        self.extend_booking_at(booking_id, new_journey_date, Utc::now()).await
    }

    /// New booking for `new_journey_date` linked to the original, which is left as is.
    pub async fn extend_booking_at(
        &self,
        booking_id: &str,
        new_journey_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let original = self.require(booking_id).await?;
        if !rules::can_extend_at(&original, now) {
            warn!("Booking {} is not extendable", booking_id);
            return Err(BookingError::NotExtendable(booking_id.to_string()));
        }
        if new_journey_date <= now {
            return Err(CoreError::ValidationError(
                "New journey date must be in the future".to_string(),
            )
            .into());
        }

        let extended = self
            .insert(
                original.extension_draft(new_journey_date),
                "Failed to extend ticket. Please try again.",
            )
            .await?;
        info!("Booking {} extended as {}", booking_id, extended.booking_id);

        self.publish(BookingEvent::Extended(BookingExtendedEvent {
            booking_id: extended.booking_id.clone(),
            original_booking_id: original.booking_id,
            user_id: extended.user_id.clone(),
            journey_date: new_journey_date,
            timestamp: now.timestamp(),
        }))
        .await;
        Ok(extended)
    }

    /// Overwrite the given fields of one passenger and write the whole list back.
    pub async fn update_passenger_details(
        &self,
        booking_id: &str,
        passenger_id: u32,
        update: &PassengerUpdate,
    ) -> Result<Booking, BookingError> {
        let booking = self.require(booking_id).await?;
        let mut passengers = booking.passengers;
        let passenger = passengers
            .iter_mut()
            .find(|p| p.id == passenger_id)
            .ok_or_else(|| BookingError::NotFound(format!("{}/{}", booking_id, passenger_id)))?;
        update.apply(passenger);

        self.update_with_message(
            booking_id,
            BookingPatch::passengers(passengers),
            "Failed to update passenger details.",
        )
        .await
    }

    /// Administrative removal.
    pub async fn delete_booking(&self, booking_id: &str) -> Result<(), BookingError> {
        let deleted = self
            .repo
            .delete_booking(booking_id)
            .await
            .map_err(|e| store_error("Failed to delete booking.", "Error deleting booking", e))?;
        if !deleted {
            return Err(BookingError::NotFound(booking_id.to_string()));
        }
        info!("Booking deleted: {}", booking_id);
        Ok(())
    }

    async fn publish(&self, event: BookingEvent) {
        if let Some(center) = &self.notifications {
            // The booking is already committed; a lost notice is only logged.
            if let Err(e) = center.notify(&event).await {
                warn!("Notification for {} not recorded: {}", event.booking_id(), e);
            }
        }
    }
}
