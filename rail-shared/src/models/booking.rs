use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::profile::Gender;
use super::train::{BerthType, FareClass};

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Pending,
    Refunded,
}

impl BookingStatus {
    /// Allowed moves. Nothing leads back to `Confirmed` once a booking left it.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Refunded)
                | (Cancelled, Refunded)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Pending => "pending",
            BookingStatus::Refunded => "refunded",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Card,
    Other,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::Other => "other",
        };
        f.write_str(label)
    }
}

/// A traveller occupying one selected seat. `id` is the seat id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: u32,
    pub name: String,
    pub age: Option<u8>,
    pub gender: Gender,
    pub berth_type: BerthType,
    pub compartment: String,
    pub seat_number: String,
}

impl Passenger {
    pub fn for_seat(id: u32, berth_type: BerthType, compartment: &str, seat_number: &str) -> Self {
        Self {
            id,
            name: String::new(),
            age: None,
            gender: Gender::Male,
            berth_type,
            compartment: compartment.to_string(),
            seat_number: seat_number.to_string(),
        }
    }
}

/// Editable passenger fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerUpdate {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
}

impl PassengerUpdate {
    pub fn apply(&self, passenger: &mut Passenger) {
        if let Some(name) = &self.name {
            passenger.name = name.clone();
        }
        if let Some(age) = self.age {
            passenger.age = Some(age);
        }
        if let Some(gender) = self.gender {
            passenger.gender = gender;
        }
    }
}

/// Everything the caller supplies for a new booking. Identifiers, status and
/// timestamps are assigned at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub user_id: String,
    pub train_id: u32,
    pub train_name: String,
    pub train_number: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub class: FareClass,
    pub fare: i32,
    pub passengers: Vec<Passenger>,
    pub selected_seats: Vec<u32>,
    pub total_fare: i32,
    pub journey_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub extended: bool,
    pub original_booking_id: Option<String>,
}

/// A persisted ticket booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Store-assigned document key, absent until the first write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub train_id: u32,
    pub train_name: String,
    pub train_number: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub class: FareClass,
    pub fare: i32,
    pub passengers: Vec<Passenger>,
    pub selected_seats: Vec<u32>,
    pub total_fare: i32,
    pub booking_id: String,
    pub pnr_number: String,
    pub booking_date: DateTime<Utc>,
    pub journey_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub refund_amount: Option<i32>,
    pub refund_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extended: bool,
    pub original_booking_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Stamp a draft as a fresh, confirmed and paid booking.
    pub fn from_draft(
        draft: BookingDraft,
        booking_id: String,
        pnr_number: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            user_id: draft.user_id,
            train_id: draft.train_id,
            train_name: draft.train_name,
            train_number: draft.train_number,
            from: draft.from,
            to: draft.to,
            departure: draft.departure,
            arrival: draft.arrival,
            duration: draft.duration,
            class: draft.class,
            fare: draft.fare,
            passengers: draft.passengers,
            selected_seats: draft.selected_seats,
            total_fare: draft.total_fare,
            booking_id,
            pnr_number,
            booking_date: now,
            journey_date: draft.journey_date,
            status: BookingStatus::Confirmed,
            payment_method: draft.payment_method,
            payment_status: PaymentStatus::Paid,
            refund_amount: None,
            refund_date: None,
            extended: draft.extended,
            original_booking_id: draft.original_booking_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of the route, class, fare, passengers and seats for a new journey date,
    /// linked back to this booking.
    pub fn extension_draft(&self, journey_date: DateTime<Utc>) -> BookingDraft {
        BookingDraft {
            user_id: self.user_id.clone(),
            train_id: self.train_id,
            train_name: self.train_name.clone(),
            train_number: self.train_number.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
            duration: self.duration.clone(),
            class: self.class.clone(),
            fare: self.fare,
            passengers: self.passengers.clone(),
            selected_seats: self.selected_seats.clone(),
            total_fare: self.total_fare,
            journey_date,
            payment_method: self.payment_method,
            extended: true,
            original_booking_id: Some(self.booking_id.clone()),
        }
    }
}

/// A partial update applied to one booking in a single store write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub refund_amount: Option<i32>,
    pub refund_date: Option<DateTime<Utc>>,
    pub passengers: Option<Vec<Passenger>>,
    /// Status the stored booking must still hold when the write lands.
    #[serde(skip)]
    pub expected_status: Option<BookingStatus>,
}

impl BookingPatch {
    /// Status, payment status and refund fields of a cancellation, together.
    pub fn cancellation(refund_amount: i32, refunded_at: DateTime<Utc>) -> Self {
        Self {
            status: Some(BookingStatus::Cancelled),
            payment_status: Some(PaymentStatus::Refunded),
            refund_amount: Some(refund_amount),
            refund_date: Some(refunded_at),
            passengers: None,
            expected_status: Some(BookingStatus::Confirmed),
        }
    }

    pub fn passengers(passengers: Vec<Passenger>) -> Self {
        Self {
            passengers: Some(passengers),
            ..Default::default()
        }
    }

    /// Whether this patch may still be written over `booking` as currently stored.
    pub fn permits(&self, booking: &Booking) -> bool {
        if self.expected_status.is_some_and(|expected| expected != booking.status) {
            return false;
        }
        match self.status {
            Some(status) => status == booking.status || booking.status.can_transition_to(status),
            None => true,
        }
    }

    pub fn apply(&self, booking: &mut Booking, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            booking.status = status;
        }
        if let Some(payment_status) = self.payment_status {
            booking.payment_status = payment_status;
        }
        if let Some(amount) = self.refund_amount {
            booking.refund_amount = Some(amount);
        }
        if let Some(date) = self.refund_date {
            booking.refund_date = Some(date);
        }
        if let Some(passengers) = &self.passengers {
            booking.passengers = passengers.clone();
        }
        booking.updated_at = now;
    }
}
