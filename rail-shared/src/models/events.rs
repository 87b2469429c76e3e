use chrono::{DateTime, Utc};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingConfirmedEvent {
    pub booking_id: String,
    pub pnr_number: String,
    pub user_id: String,
    pub train_name: String,
    pub total_fare: i32,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingCancelledEvent {
    pub booking_id: String,
    pub user_id: String,
    pub refund_amount: i32,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingExtendedEvent {
    pub booking_id: String,
    pub original_booking_id: String,
    pub user_id: String,
    pub journey_date: DateTime<Utc>,
    pub timestamp: i64,
}

/// Booking-affecting events, each of which produces a user notification.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BookingEvent {
    Confirmed(BookingConfirmedEvent),
    Cancelled(BookingCancelledEvent),
    Extended(BookingExtendedEvent),
}

impl BookingEvent {
    pub fn user_id(&self) -> &str {
        match self {
            BookingEvent::Confirmed(e) => &e.user_id,
            BookingEvent::Cancelled(e) => &e.user_id,
            BookingEvent::Extended(e) => &e.user_id,
        }
    }

    pub fn booking_id(&self) -> &str {
        match self {
            BookingEvent::Confirmed(e) => &e.booking_id,
            BookingEvent::Cancelled(e) => &e.booking_id,
            BookingEvent::Extended(e) => &e.booking_id,
        }
    }
}
