//! Cancellation, refund and extension rules. Each rule has an `_at` form taking
//! an explicit clock reading.

use chrono::{DateTime, Duration, Utc};
use rail_shared::{Booking, BookingStatus};

/// Bookings this close to departure can no longer be cancelled.
pub const CANCELLATION_CUTOFF_HOURS: f64 = 4.0;

/// How far ahead a journey may be for its booking to be extended.
pub const EXTENSION_WINDOW_DAYS: i64 = 30;

/// (hours strictly greater than, refund percent), checked in order.
const REFUND_TIERS: [(f64, i64); 4] = [(48.0, 90), (24.0, 75), (12.0, 50), (CANCELLATION_CUTOFF_HOURS, 25)];

pub fn hours_until_journey(booking: &Booking, now: DateTime<Utc>) -> f64 {
    (booking.journey_date - now).num_milliseconds() as f64 / 3_600_000.0
}

pub fn refund_percentage(hours_until_journey: f64) -> i64 {
    REFUND_TIERS
        .iter()
        .find(|(threshold, _)| hours_until_journey > *threshold)
        .map_or(0, |(_, percent)| *percent)
}

pub fn refund_amount(booking: &Booking) -> i32 {
    refund_amount_at(booking, Utc::now())
}

/// `floor(totalFare * tier)` for the tier matching the time left before departure.
pub fn refund_amount_at(booking: &Booking, now: DateTime<Utc>) -> i32 {
    let percent = refund_percentage(hours_until_journey(booking, now));
    let amount = (booking.total_fare as i64 * percent).div_euclid(100);
    amount as i32
}

pub fn can_cancel(booking: &Booking) -> bool {
    can_cancel_at(booking, Utc::now())
}

pub fn can_cancel_at(booking: &Booking, now: DateTime<Utc>) -> bool {
    booking.status == BookingStatus::Confirmed
        && hours_until_journey(booking, now) > CANCELLATION_CUTOFF_HOURS
}

pub fn can_extend(booking: &Booking) -> bool {
    can_extend_at(booking, Utc::now())
}

pub fn can_extend_at(booking: &Booking, now: DateTime<Utc>) -> bool {
    booking.status == BookingStatus::Confirmed
        && booking.journey_date > now
        && booking.journey_date <= now + Duration::days(EXTENSION_WINDOW_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::booking_at;

    #[test]
    fn test_refund_tiers_and_breakpoints() {
        let now = Utc::now();
        let cases = [
            (Duration::hours(50), 900),
            (Duration::hours(48), 750),
            (Duration::hours(30), 750),
            (Duration::hours(24), 500),
            (Duration::hours(13), 500),
            (Duration::hours(12), 250),
            (Duration::hours(5), 250),
            (Duration::hours(4), 0),
            (Duration::hours(-2), 0),
        ];
        for (until, expected) in cases {
            let booking = booking_at(now + until, 1000);
            assert_eq!(refund_amount_at(&booking, now), expected, "{} hours out", until.num_hours());
        }
    }

    #[test]
    fn test_refund_is_floored() {
        let now = Utc::now();
        let booking = booking_at(now + Duration::hours(30), 1999);
        // 1999 * 0.75 = 1499.25
        assert_eq!(refund_amount_at(&booking, now), 1499);
    }

    #[test]
    fn test_cancel_window() {
        let now = Utc::now();
        let soon = booking_at(now + Duration::hours(3), 1000);
        assert!(!can_cancel_at(&soon, now));
        assert_eq!(refund_amount_at(&soon, now), 0);

        let later = booking_at(now + Duration::hours(50), 1000);
        assert!(can_cancel_at(&later, now));

        let mut cancelled = later.clone();
        cancelled.status = BookingStatus::Cancelled;
        assert!(!can_cancel_at(&cancelled, now));
    }

    #[test]
    fn test_extension_window() {
        let now = Utc::now();
        assert!(can_extend_at(&booking_at(now + Duration::days(2), 1000), now));
        assert!(can_extend_at(&booking_at(now + Duration::days(30), 1000), now));
        assert!(!can_extend_at(&booking_at(now + Duration::days(31), 1000), now));
        assert!(!can_extend_at(&booking_at(now - Duration::hours(1), 1000), now));
    }
}
