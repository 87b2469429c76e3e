use async_trait::async_trait;
use rail_core::repository::{BookingOrder, BookingQuery, BookingRepository, PatchOutcome, RepoResult};
use rail_shared::{Booking, BookingPatch};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    data: Json<Booking>,
}

impl BookingRow {
    fn into_booking(self) -> Booking {
        let mut booking = self.data.0;
        booking.id = Some(self.id.to_string());
        booking
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BookingQuery) {
    if let Some(user_id) = &query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id.clone());
    }
    if let Some(booking_id) = &query.booking_id {
        builder.push(" AND booking_id = ").push_bind(booking_id.clone());
    }
    if let Some(pnr) = &query.pnr_number {
        builder.push(" AND pnr_number = ").push_bind(pnr.clone());
    }
    if !query.statuses.is_empty() {
        let statuses: Vec<String> = query.statuses.iter().map(|s| s.to_string()).collect();
        builder.push(" AND status = ANY(").push_bind(statuses).push(")");
    }
    if let Some(from) = query.journey_from {
        builder.push(" AND journey_date >= ").push_bind(from);
    }
    builder.push(match query.order {
        BookingOrder::BookingDateDesc => " ORDER BY booking_date DESC",
        BookingOrder::JourneyDateAsc => " ORDER BY journey_date ASC",
        BookingOrder::RefundDateDesc => " ORDER BY refund_date DESC NULLS LAST",
    });
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert_booking(&self, booking: &Booking) -> RepoResult<String> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, booking_id, pnr_number, status, booking_date, journey_date, refund_date, data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(&booking.user_id)
        .bind(&booking.booking_id)
        .bind(&booking.pnr_number)
        .bind(booking.status.to_string())
        .bind(booking.booking_date)
        .bind(booking.journey_date)
        .bind(booking.refund_date)
        .bind(Json(booking))
        .execute(&self.pool)
        .await?;
        Ok(id.to_string())
    }

    async fn find_bookings(&self, query: &BookingQuery) -> RepoResult<Vec<Booking>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, data FROM bookings WHERE TRUE");
        push_filters(&mut builder, query);
        debug!("Booking query: {}", builder.sql());

        let rows: Vec<BookingRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(BookingRow::into_booking).collect())
    }

    async fn update_booking(&self, booking_id: &str, patch: &BookingPatch) -> RepoResult<PatchOutcome> {
        let mut tx = self.pool.begin().await?;

        let row: Option<BookingRow> = sqlx::query_as(
            "SELECT id, data FROM bookings WHERE booking_id = $1 LIMIT 1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(PatchOutcome::Missing);
        };
        let id = row.id;
        let mut booking = row.into_booking();
        if !patch.permits(&booking) {
            debug!("Booking {} is {}, patch not applied", booking_id, booking.status);
            tx.rollback().await?;
            return Ok(PatchOutcome::Rejected(booking));
        }
        patch.apply(&mut booking, chrono::Utc::now());

        let mut document = booking.clone();
        document.id = None;
        sqlx::query("UPDATE bookings SET status = $2, refund_date = $3, data = $4 WHERE id = $1")
            .bind(id)
            .bind(booking.status.to_string())
            .bind(booking.refund_date)
            .bind(Json(&document))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(PatchOutcome::Applied(booking))
    }

    async fn delete_booking(&self, booking_id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rail_shared::BookingStatus;

    #[test]
    fn test_filters_render_in_order() {
        let query = BookingQuery::for_user("u1")
            .with_statuses(&[BookingStatus::Cancelled, BookingStatus::Refunded])
            .ordered_by(BookingOrder::RefundDateDesc);
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, data FROM bookings WHERE TRUE");
        push_filters(&mut builder, &query);
        assert_eq!(
            builder.sql(),
            "SELECT id, data FROM bookings WHERE TRUE AND user_id = $1 AND status = ANY($2) ORDER BY refund_date DESC NULLS LAST"
        );
    }

    #[test]
    fn test_upcoming_query_sql() {
        let query = BookingQuery::for_user("u1")
            .with_status(BookingStatus::Confirmed)
            .journey_on_or_after(Utc::now())
            .ordered_by(BookingOrder::JourneyDateAsc);
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, data FROM bookings WHERE TRUE");
        push_filters(&mut builder, &query);
        assert!(builder.sql().ends_with("AND journey_date >= $3 ORDER BY journey_date ASC"));
    }
}
