//! Booking lifecycle
//!
//! Writes go through [`BookingLifecycle`], which commits the booking change
//! and then executes the effects planned by [`plan_effects`]. Effects are
//! best-effort: a failing effect is logged and the others still run.

use super::messages::{self, MessageContext};
use super::transition::{Audience, BookingEffect, plan_effects};
use crate::db::repository::{RepoError, booking, customer, service, staff, user, visit};
use crate::db::{begin_write, db_error};
use crate::loyalty::VisitLedger;
use crate::notify::{NotificationDispatcher, NotificationRequest, Recipient};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Booking, BookingCommand, BookingCreate, BookingUpdate, NotificationEvent};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct BookingLifecycle {
    pool: SqlitePool,
    dispatcher: NotificationDispatcher,
    ledger: VisitLedger,
    review_base_url: String,
}

impl BookingLifecycle {
    pub fn new(
        pool: SqlitePool,
        dispatcher: NotificationDispatcher,
        ledger: VisitLedger,
        review_base_url: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            dispatcher,
            ledger,
            review_base_url: review_base_url.into(),
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Booking> {
        booking::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))
    }

    /// Create a booking. The tenant is the customer's tenant.
    pub async fn create(&self, data: BookingCreate) -> AppResult<Booking> {
        let mut tx = begin_write(&self.pool).await?;

        let owner = customer::find_by_id(&mut *tx, data.customer_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
        check_service(&mut *tx, owner.tenant_id, data.service_id).await?;
        if let Some(staff_id) = data.staff_member_id {
            check_staff(&mut *tx, owner.tenant_id, staff_id).await?;
        }

        let now = shared::util::now_millis();
        let created = Booking {
            id: shared::util::snowflake_id(),
            tenant_id: owner.tenant_id,
            customer_id: owner.id,
            service_id: data.service_id,
            staff_member_id: data.staff_member_id,
            booking_date: data.booking_date,
            status: data.status,
            notes: data.notes.unwrap_or_default(),
            reminder_sent: false,
            reminder_24h_sent: false,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        booking::insert(&mut *tx, &created).await?;
        tx.commit().await.map_err(db_error)?;

        tracing::info!(
            booking_id = created.id,
            tenant_id = created.tenant_id,
            status = %created.status,
            "Booking created"
        );

        self.run_effects(None, &created).await;
        Ok(created)
    }

    /// Generic update. Any field and any status may change; the write only
    /// lands if the row is still at the version that was read.
    pub async fn update(&self, id: i64, patch: BookingUpdate) -> AppResult<Booking> {
        let mut tx = begin_write(&self.pool)
            .await
            .map_err(|e| lost_race(id, e))?;

        let before = booking::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        if let Some(expected) = patch.expected_version
            && expected != before.version
        {
            return Err(version_conflict(id, expected).with_detail("current_version", before.version));
        }

        let mut next = before.with_update(&patch);
        if next.service_id != before.service_id {
            check_service(&mut *tx, before.tenant_id, next.service_id).await?;
        }
        if next.staff_member_id != before.staff_member_id
            && let Some(staff_id) = next.staff_member_id
        {
            check_staff(&mut *tx, before.tenant_id, staff_id).await?;
        }
        // 改期后重新发送提醒
        if next.booking_date != before.booking_date {
            next.reminder_sent = false;
            next.reminder_24h_sent = false;
        }
        next.updated_at = shared::util::now_millis();

        if !booking::update_if_version(&mut *tx, &next, before.version).await? {
            return Err(version_conflict(id, before.version));
        }
        let after = booking::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        tx.commit().await.map_err(|e| lost_race(id, e.into()))?;

        tracing::info!(
            booking_id = id,
            from = %before.status,
            to = %after.status,
            version = after.version,
            "Booking updated"
        );

        self.run_effects(Some(&before), &after).await;
        Ok(after)
    }

    /// Apply an explicit status command. Only edges of the status graph are
    /// accepted.
    pub async fn transition(&self, id: i64, command: BookingCommand) -> AppResult<Booking> {
        let mut tx = begin_write(&self.pool)
            .await
            .map_err(|e| lost_race(id, e))?;

        let before = booking::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        let target = command.target();
        if !before.status.can_transition_to(target) {
            return Err(AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot move booking from {} to {}", before.status, target),
            )
            .with_detail("from", before.status.as_str())
            .with_detail("to", target.as_str()));
        }

        if !booking::transition_status(&mut *tx, id, before.status, target, before.version).await? {
            return Err(version_conflict(id, before.version));
        }
        let after = booking::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;
        tx.commit().await.map_err(|e| lost_race(id, e.into()))?;

        tracing::info!(booking_id = id, from = %before.status, to = %target, "Booking status changed");

        self.run_effects(Some(&before), &after).await;
        Ok(after)
    }

    async fn run_effects(&self, before: Option<&Booking>, after: &Booking) {
        let effects = plan_effects(before, after);
        if effects.is_empty() {
            return;
        }

        let customer_name = match customer::find_by_id(&self.pool, after.customer_id).await {
            Ok(Some(c)) => c.name,
            _ => "Customer".to_string(),
        };
        let service_name = match service::find_by_id(&self.pool, after.service_id).await {
            Ok(Some(s)) => s.name,
            _ => "your service".to_string(),
        };
        let mut ctx = MessageContext {
            customer_name: &customer_name,
            service_name: &service_name,
            booking_date: after.booking_date,
            review_link: None,
        };

        for effect in effects {
            match effect {
                BookingEffect::MaterializeVisit => {
                    let visit_id = match self.ledger.record_from_booking(after).await {
                        Ok(Some(v)) => Some(v.id),
                        Ok(None) => visit::find_by_booking(&self.pool, after.id)
                            .await
                            .ok()
                            .flatten()
                            .map(|v| v.id),
                        Err(e) => {
                            tracing::error!(booking_id = after.id, error = %e, "Failed to materialize visit");
                            None
                        }
                    };
                    ctx.review_link = visit_id
                        .map(|id| format!("{}/{id}", self.review_base_url.trim_end_matches('/')));
                }
                BookingEffect::Notify { event, audience } => {
                    self.notify(event, audience, before, after, &ctx).await;
                }
            }
        }
    }

    async fn notify(
        &self,
        event: NotificationEvent,
        audience: Audience,
        before: Option<&Booking>,
        after: &Booking,
        ctx: &MessageContext<'_>,
    ) {
        let recipient = match audience {
            Audience::Customer => Some(Recipient::Customer(after.customer_id)),
            Audience::AssignedStaff => after.staff_member_id.map(Recipient::Staff),
            Audience::PreviousStaff => before
                .and_then(|b| b.staff_member_id)
                .map(Recipient::Staff),
            Audience::TenantAdmin => match user::find_tenant_admin(&self.pool, after.tenant_id).await {
                Ok(admin) => admin.map(|u| Recipient::Admin(u.id)),
                Err(e) => {
                    tracing::warn!(tenant_id = after.tenant_id, error = %e, "Failed to load tenant admin");
                    None
                }
            },
        };
        let Some(recipient) = recipient else {
            tracing::debug!(booking_id = after.id, ?event, ?audience, "No recipient for booking notification");
            return;
        };
        let Some((title, message)) = messages::render(event, ctx) else {
            return;
        };

        self.dispatcher
            .notify(NotificationRequest::new(event, recipient, title, message).tenant(after.tenant_id))
            .await;
    }
}

fn version_conflict(id: i64, expected: i64) -> AppError {
    AppError::with_message(
        ErrorCode::BookingVersionConflict,
        format!("Booking {id} was modified concurrently"),
    )
    .with_detail("expected_version", expected)
}

/// 写锁等待超时视为并发冲突，其余错误照常上报
fn lost_race(id: i64, err: RepoError) -> AppError {
    match err {
        RepoError::Busy(msg) => {
            tracing::warn!(booking_id = id, error = %msg, "Booking write lost the lock race");
            AppError::with_message(
                ErrorCode::BookingVersionConflict,
                format!("Booking {id} is being modified by another request"),
            )
        }
        other => other.into(),
    }
}

async fn check_service(conn: &mut SqliteConnection, tenant_id: i64, service_id: i64) -> AppResult<()> {
    let svc = service::find_by_id(&mut *conn, service_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))?;
    if svc.tenant_id != tenant_id {
        return Err(AppError::new(ErrorCode::TenantMismatch).with_detail("field", "service_id"));
    }
    Ok(())
}

async fn check_staff(conn: &mut SqliteConnection, tenant_id: i64, staff_id: i64) -> AppResult<()> {
    let member = staff::find_by_id(&mut *conn, staff_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))?;
    if member.tenant_id != tenant_id {
        return Err(AppError::new(ErrorCode::TenantMismatch).with_detail("field", "staff_member_id"));
    }
    Ok(())
}
