use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rail_catalog::{SeatSelection, Train};
use rail_core::CoreError;
use rail_shared::{Booking, BookingDraft, PaymentMethod};
use tracing::info;

use crate::manager::{BookingError, BookingManager};
use crate::orchestrator::PaymentOrchestrator;

/// Everything the payment step needs for one selection on one train.
pub struct CheckoutRequest<'a> {
    pub train: &'a Train,
    pub selection: &'a SeatSelection,
    pub journey_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    /// Gateway reference; derived from user and train when absent.
    pub payment_reference: Option<String>,
}

impl CheckoutRequest<'_> {
    /// Checks run in order and return the first failure. The journey date is
    /// interpreted as midnight UTC.
    pub fn validate(&self) -> Result<DateTime<Utc>, CoreError> {
        if self.selection.train_id() != self.train.id {
            return Err(CoreError::ValidationError(
                "Selected seats belong to a different train".to_string(),
            ));
        }
        if self.selection.is_empty() {
            return Err(CoreError::ValidationError(
                "Please select at least one seat".to_string(),
            ));
        }
        let date = self.journey_date.ok_or_else(|| {
            CoreError::ValidationError("Please select a journey date".to_string())
        })?;
        if self
            .selection
            .passengers()
            .iter()
            .any(|p| p.name.trim().is_empty())
        {
            return Err(CoreError::ValidationError(
                "Please enter passenger details".to_string(),
            ));
        }
        Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
    }

    pub fn total_fare(&self) -> i32 {
        self.selection.total_fare(self.train.fare)
    }

    fn draft(&self, user_id: &str, journey_date: DateTime<Utc>) -> BookingDraft {
        BookingDraft {
            user_id: user_id.to_string(),
            train_id: self.train.id,
            train_name: self.train.name.clone(),
            train_number: self.train.number.clone(),
            from: self.train.from.clone(),
            to: self.train.to.clone(),
            departure: self.train.departure.clone(),
            arrival: self.train.arrival.clone(),
            duration: self.train.duration.clone(),
            class: self.train.class.clone(),
            fare: self.train.fare,
            passengers: self.selection.passengers().to_vec(),
            selected_seats: self.selection.selected_seats().to_vec(),
            total_fare: self.total_fare(),
            journey_date,
            payment_method: self.payment_method,
            extended: false,
            original_booking_id: None,
        }
    }
}

/// Validate, charge, then persist. Nothing is written when validation or payment fails.
pub struct CheckoutService {
    bookings: Arc<BookingManager>,
    payments: PaymentOrchestrator,
}

impl CheckoutService {
    pub fn new(bookings: Arc<BookingManager>, payments: PaymentOrchestrator) -> Self {
        Self { bookings, payments }
    }

    pub async fn checkout(&self, user_id: &str, request: CheckoutRequest<'_>) -> Result<Booking, BookingError> {
        let journey_date = request.validate()?;
        let amount = request.total_fare();
        let reference = request
            .payment_reference
            .clone()
            .unwrap_or_else(|| format!("{}-{}", user_id, request.train.number));

        let intent = self
            .payments
            .charge(&reference, amount, request.payment_method)
            .await?;
        info!("Checkout paid with intent {} for {}", intent.id, user_id);

        self.bookings.save_booking(request.draft(user_id, journey_date)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationCenter;
    use crate::orchestrator::{MockPaymentAdapter, FAILING_REFERENCE};
    use crate::testing::{MemoryBookings, MemoryNotifications};
    use rail_catalog::{Seat, SeatCategory, SeatPosition, SeatStatus, TrainCatalog};
    use rail_shared::{BerthType, BookingStatus, FareClass, PassengerUpdate, PaymentStatus};

    fn chair_car(fare: i32) -> Train {
        let mut train = TrainCatalog::demo().get(2).unwrap().clone();
        train.fare = fare;
        train
    }

    fn open_selection(train: &Train) -> SeatSelection {
        let layout = (1..=6)
            .map(|id| Seat {
                id,
                number: format!("1{}", (b'A' + id as u8 - 1) as char),
                status: SeatStatus::Available,
                category: SeatCategory::General,
                berth_type: BerthType::Seat,
                compartment: "C1".to_string(),
                position: SeatPosition::Main,
            })
            .collect();
        SeatSelection::new(train.id, FareClass::ChairCar, layout)
    }

    fn named(selection: &mut SeatSelection, seat_id: u32, name: &str) {
        selection
            .update_passenger(
                seat_id,
                &PassengerUpdate {
                    name: Some(name.to_string()),
                    age: Some(30),
                    gender: None,
                },
            )
            .unwrap();
    }

    fn card_request<'a>(
        train: &'a Train,
        selection: &'a SeatSelection,
        journey_date: Option<NaiveDate>,
    ) -> CheckoutRequest<'a> {
        CheckoutRequest {
            train,
            selection,
            journey_date,
            payment_method: PaymentMethod::Card,
            payment_reference: None,
        }
    }

    fn service() -> (CheckoutService, Arc<BookingManager>, NotificationCenter) {
        let center = NotificationCenter::new(Arc::new(MemoryNotifications::default()));
        let bookings = Arc::new(
            BookingManager::new(Arc::new(MemoryBookings::default())).with_notifications(center.clone()),
        );
        let payments = PaymentOrchestrator::new(Arc::new(MockPaymentAdapter));
        (CheckoutService::new(bookings.clone(), payments), bookings, center)
    }

    #[tokio::test]
    async fn test_two_chair_car_seats_at_five_hundred() {
        let (checkout, bookings, center) = service();
        let train = chair_car(500);
        let mut selection = open_selection(&train);
        selection.toggle(1).unwrap();
        selection.toggle(2).unwrap();
        named(&mut selection, 1, "Asha Rao");
        named(&mut selection, 2, "Ravi Rao");

        let journey = (Utc::now() + chrono::Duration::days(5)).date_naive();
        let booking = checkout
            .checkout(
                "user-1",
                CheckoutRequest {
                    train: &train,
                    selection: &selection,
                    journey_date: Some(journey),
                    payment_method: PaymentMethod::Upi,
                    payment_reference: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(booking.total_fare, 1000);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
        assert_eq!(booking.selected_seats, vec![1, 2]);
        assert_eq!(booking.journey_date.date_naive(), journey);

        assert_eq!(bookings.user_bookings("user-1").await.unwrap().len(), 1);
        let feed = center.list("user-1").await.unwrap();
        assert_eq!(feed[0].title, "Booking Confirmed!");
    }

    #[tokio::test]
    async fn test_validation_order() {
        let (checkout, bookings, _) = service();
        let train = chair_car(500);
        let mut selection = open_selection(&train);

        let err = checkout
            .checkout("user-1", card_request(&train, &selection, None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one seat");

        selection.toggle(3).unwrap();
        let err = checkout
            .checkout("user-1", card_request(&train, &selection, None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select a journey date");

        let date = Some(Utc::now().date_naive());
        let err = checkout
            .checkout("user-1", card_request(&train, &selection, date))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter passenger details");

        assert!(bookings.user_bookings("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_payment_writes_nothing() {
        let (checkout, bookings, center) = service();
        let train = chair_car(500);
        let mut selection = open_selection(&train);
        selection.toggle(1).unwrap();
        named(&mut selection, 1, "Asha Rao");

        let result = checkout
            .checkout(
                "user-1",
                CheckoutRequest {
                    train: &train,
                    selection: &selection,
                    journey_date: Some(Utc::now().date_naive()),
                    payment_method: PaymentMethod::Upi,
                    payment_reference: Some(FAILING_REFERENCE.to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(BookingError::Payment(_))));
        assert!(bookings.user_bookings("user-1").await.unwrap().is_empty());
        assert!(center.list("user-1").await.unwrap().is_empty());
    }
}
