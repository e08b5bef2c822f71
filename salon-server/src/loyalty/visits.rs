//! Visit ledger
//!
//! Every visit, whether recorded directly or materialized from a completed
//! booking, accrues loyalty for its customer in the same transaction.

use crate::db::{begin_write, db_error};
use crate::db::repository::{customer, service, staff, visit};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Booking, PaymentStatus, Visit, VisitCreate};
use sqlx::SqlitePool;

/// Points earned for a visit: the whole-unit part of the amount
pub fn points_for(total_amount: f64) -> AppResult<i64> {
    if !total_amount.is_finite() || total_amount < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidVisitAmount,
            format!("Visit amount must be a non-negative number, got {total_amount}"),
        )
        .with_detail("field", "total_amount"));
    }
    Decimal::from_f64(total_amount)
        .and_then(|d| d.floor().to_i64())
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidVisitAmount,
                format!("Visit amount {total_amount} is out of range"),
            )
        })
}

#[derive(Clone)]
pub struct VisitLedger {
    pool: SqlitePool,
}

impl VisitLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a visit and accrue it to the customer
    pub async fn record_visit(&self, data: VisitCreate) -> AppResult<Visit> {
        let points = points_for(data.total_amount)?;

        let mut tx = begin_write(&self.pool).await?;

        let owner = customer::find_by_id(&mut *tx, data.customer_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;

        if let Some(staff_id) = data.staff_member_id {
            let member = staff::find_by_id(&mut *tx, staff_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))?;
            if member.tenant_id != owner.tenant_id {
                return Err(AppError::new(ErrorCode::TenantMismatch).with_detail("field", "staff_member_id"));
            }
        }
        let mut service_ids = data.service_ids.clone();
        service_ids.sort_unstable();
        service_ids.dedup();
        for service_id in &service_ids {
            let svc = service::find_by_id(&mut *tx, *service_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))?;
            if svc.tenant_id != owner.tenant_id {
                return Err(AppError::new(ErrorCode::TenantMismatch).with_detail("field", "service_ids"));
            }
        }

        let now = shared::util::now_millis();
        let record = Visit {
            id: shared::util::snowflake_id(),
            tenant_id: owner.tenant_id,
            customer_id: owner.id,
            staff_member_id: data.staff_member_id,
            booking_id: None,
            visit_date: data.visit_date.unwrap_or(now),
            total_amount: data.total_amount,
            payment_status: data.payment_status,
            notes: data.notes.unwrap_or_default(),
            created_at: now,
            service_ids,
        };

        visit::insert(&mut *tx, &record).await?;
        visit::add_services(&mut *tx, record.id, &record.service_ids).await?;
        customer::accrue_visit(
            &mut *tx,
            owner.id,
            points,
            shared::util::date_of_millis(record.visit_date),
        )
        .await?;

        tx.commit().await.map_err(db_error)?;

        tracing::info!(
            visit_id = record.id,
            customer_id = owner.id,
            points,
            "Visit recorded"
        );
        Ok(record)
    }

    /// Materialize the visit of a completed booking. Returns `None` when the
    /// booking already has one; nothing is accrued in that case.
    pub async fn record_from_booking(&self, booking: &Booking) -> AppResult<Option<Visit>> {
        let mut tx = begin_write(&self.pool).await?;

        let svc = service::find_by_id(&mut *tx, booking.service_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))?;
        let points = points_for(svc.price)?;

        let now = shared::util::now_millis();
        let notes = if booking.notes.is_empty() {
            format!("Created from Booking ID {}.", booking.id)
        } else {
            format!("Created from Booking ID {}. {}", booking.id, booking.notes)
        };
        let record = Visit {
            id: shared::util::snowflake_id(),
            tenant_id: booking.tenant_id,
            customer_id: booking.customer_id,
            staff_member_id: booking.staff_member_id,
            booking_id: Some(booking.id),
            visit_date: now,
            total_amount: svc.price,
            payment_status: PaymentStatus::Paid,
            notes,
            created_at: now,
            service_ids: vec![svc.id],
        };

        if !visit::insert(&mut *tx, &record).await? {
            tracing::debug!(booking_id = booking.id, "Booking already has a visit");
            return Ok(None);
        }
        visit::add_services(&mut *tx, record.id, &record.service_ids).await?;
        customer::accrue_visit(
            &mut *tx,
            booking.customer_id,
            points,
            shared::util::date_of_millis(record.visit_date),
        )
        .await?;

        tx.commit().await.map_err(db_error)?;

        tracing::info!(
            visit_id = record.id,
            booking_id = booking.id,
            customer_id = booking.customer_id,
            points,
            "Visit materialized from booking"
        );
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_floor_the_amount() {
        assert_eq!(points_for(500.0).unwrap(), 500);
        assert_eq!(points_for(99.99).unwrap(), 99);
        assert_eq!(points_for(0.0).unwrap(), 0);
    }

    #[test]
    fn invalid_amounts_are_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = points_for(bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidVisitAmount);
        }
    }
}
