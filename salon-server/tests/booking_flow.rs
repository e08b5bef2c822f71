//! End-to-end booking flow against an in-memory database
//!
//! Covers the path create → complete → redeem and the side effects each step
//! leaves behind: notifications, queued email, visits and loyalty balances.

use salon_server::db::repository::{booking as booking_repo, notification, outbox, reward, user, visit};
use salon_server::{AppState, Config, DbService};
use shared::error::ErrorCode;
use shared::models::{
    Booking, BookingCommand, BookingCreate, BookingStatus, BookingUpdate, BusinessType, Customer,
    CustomerCreate, EmailPreferencesUpdate, NotificationEvent, RecipientType, RewardCreate,
    RewardType, Service, ServiceCreate, StaffCreate, Tenant, TenantCreate, TenantStatus,
    UserCreate, UserRole, VisitCreate,
};

const HOUR_MS: i64 = 3_600_000;

struct Fixture {
    _db: DbService,
    state: AppState,
    tenant: Tenant,
    admin_id: i64,
    customer: Customer,
    service: Service,
}

async fn fixture() -> Fixture {
    let db = DbService::in_memory().await.unwrap();
    let state = AppState::new(db.pool.clone(), Config::default());

    let tenant = state
        .tenants
        .register(TenantCreate {
            name: "Glow Studio".into(),
            business_type: BusinessType::Salon,
            email: Some("hello@glow.test".into()),
            phone: None,
            email_from_name: None,
        })
        .await
        .unwrap();
    let tenant = state
        .tenants
        .set_status(tenant.id, TenantStatus::Active)
        .await
        .unwrap();

    let admin = user::create(
        &state.pool,
        &UserCreate {
            tenant_id: Some(tenant.id),
            name: "Owner".into(),
            email: Some("owner@glow.test".into()),
            role: UserRole::TenantAdmin,
        },
    )
    .await
    .unwrap();

    let customer = state
        .directory
        .register_customer(CustomerCreate {
            tenant_id: tenant.id,
            name: "Ann".into(),
            email: Some("ann@example.com".into()),
            phone: None,
        })
        .await
        .unwrap();

    let service = state
        .directory
        .add_service(ServiceCreate {
            tenant_id: tenant.id,
            name: "Colour".into(),
            category: "hair".into(),
            description: None,
            price: 500.0,
            duration_minutes: 90,
        })
        .await
        .unwrap();

    Fixture {
        _db: db,
        state,
        tenant,
        admin_id: admin.id,
        customer,
        service,
    }
}

async fn book(f: &Fixture) -> Booking {
    f.state
        .bookings
        .create(BookingCreate {
            customer_id: f.customer.id,
            service_id: f.service.id,
            staff_member_id: None,
            booking_date: shared::util::now_millis() + 3 * 24 * HOUR_MS,
            status: BookingStatus::Pending,
            notes: None,
        })
        .await
        .unwrap()
}

async fn complete(f: &Fixture, id: i64) {
    f.state
        .bookings
        .transition(id, BookingCommand::Confirm)
        .await
        .unwrap();
    f.state
        .bookings
        .transition(id, BookingCommand::Complete)
        .await
        .unwrap();
}

async fn events_for(f: &Fixture, recipient_type: RecipientType, id: i64) -> Vec<NotificationEvent> {
    notification::find_for_recipient(&f.state.pool, recipient_type, id, false)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.event)
        .collect()
}

#[tokio::test]
async fn creating_a_booking_notifies_customer_and_admin_once() {
    let f = fixture().await;
    let booking = book(&f).await;
    assert_eq!(booking.tenant_id, f.tenant.id);
    assert_eq!(booking.version, 0);

    let customer_events = events_for(&f, RecipientType::Customer, f.customer.id).await;
    assert_eq!(
        customer_events
            .iter()
            .filter(|e| **e == NotificationEvent::BookingReceived)
            .count(),
        1
    );

    let admin_events = events_for(&f, RecipientType::Admin, f.admin_id).await;
    assert_eq!(
        admin_events
            .iter()
            .filter(|e| **e == NotificationEvent::TenantNewBooking)
            .count(),
        1
    );
}

#[tokio::test]
async fn completing_a_booking_records_one_visit_and_accrues_points() {
    let f = fixture().await;
    let booking = book(&f).await;

    f.state
        .bookings
        .transition(booking.id, BookingCommand::Confirm)
        .await
        .unwrap();
    let completed = f
        .state
        .bookings
        .transition(booking.id, BookingCommand::Complete)
        .await
        .unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);

    let recorded = visit::find_by_booking(&f.state.pool, booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recorded.total_amount, 500.0);
    assert_eq!(recorded.service_ids, vec![f.service.id]);

    let after = f.state.directory.customer(f.customer.id).await.unwrap();
    assert_eq!(after.points, f.customer.points + 500);
    assert_eq!(after.visit_count, f.customer.visit_count + 1);
    assert!(after.last_purchase.is_some());

    let inbox = notification::find_for_recipient(
        &f.state.pool,
        RecipientType::Customer,
        f.customer.id,
        false,
    )
    .await
    .unwrap();
    let thanks = inbox
        .iter()
        .find(|n| n.event == NotificationEvent::VisitThankYou)
        .unwrap();
    assert!(thanks.message.contains(&format!("/{}", recorded.id)));

    // 重复提交 completed 不产生第二条到店记录
    f.state
        .bookings
        .update(
            booking.id,
            BookingUpdate {
                status: Some(BookingStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(visit::count_by_booking(&f.state.pool, booking.id).await.unwrap(), 1);
    let again = f.state.directory.customer(f.customer.id).await.unwrap();
    assert_eq!(again.points, after.points);
    assert_eq!(again.visit_count, after.visit_count);
}

#[tokio::test]
async fn disabled_toggle_keeps_notification_but_skips_email() {
    let f = fixture().await;
    f.state
        .tenants
        .update_preferences(
            f.tenant.id,
            &EmailPreferencesUpdate {
                email_cust_booking_cancelled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let booking = book(&f).await;
    f.state
        .bookings
        .transition(booking.id, BookingCommand::Cancel)
        .await
        .unwrap();

    let customer_events = events_for(&f, RecipientType::Customer, f.customer.id).await;
    assert!(customer_events.contains(&NotificationEvent::BookingCancelled));

    let queued = outbox::find_by_recipient(&f.state.pool, "ann@example.com")
        .await
        .unwrap();
    assert!(queued.iter().any(|e| e.subject == "Booking Confirmed"));
    assert!(!queued.iter().any(|e| e.subject == "Booking Cancelled"));

    // 管理员的取消邮件由另一个开关控制
    let admin_mail = outbox::find_by_recipient(&f.state.pool, "owner@glow.test")
        .await
        .unwrap();
    assert!(admin_mail.iter().any(|e| e.subject == "Booking Cancelled"));
}

#[tokio::test]
async fn customer_mail_is_sent_under_the_tenant_brand() {
    let f = fixture().await;
    book(&f).await;

    let queued = outbox::find_by_recipient(&f.state.pool, "ann@example.com")
        .await
        .unwrap();
    let confirmation = queued
        .iter()
        .find(|e| e.subject == "Booking Confirmed")
        .unwrap();
    assert!(confirmation.from_address.starts_with("Glow Studio <"));
    assert_eq!(confirmation.reply_to.as_deref(), Some("hello@glow.test"));
}

#[tokio::test]
async fn invalid_transition_is_rejected_and_leaves_booking_untouched() {
    let f = fixture().await;
    let booking = book(&f).await;
    f.state
        .bookings
        .transition(booking.id, BookingCommand::Cancel)
        .await
        .unwrap();

    let err = f
        .state
        .bookings
        .transition(booking.id, BookingCommand::Complete)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

    let current = f.state.bookings.get(booking.id).await.unwrap();
    assert_eq!(current.status, BookingStatus::Cancelled);
    assert!(visit::find_by_booking(&f.state.pool, booking.id).await.unwrap().is_none());
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let f = fixture().await;
    let booking = book(&f).await;

    f.state
        .bookings
        .update(
            booking.id,
            BookingUpdate {
                notes: Some("window seat".into()),
                expected_version: Some(booking.version),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = f
        .state
        .bookings
        .update(
            booking.id,
            BookingUpdate {
                notes: Some("aisle".into()),
                expected_version: Some(booking.version),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::BookingVersionConflict);

    let current = f.state.bookings.get(booking.id).await.unwrap();
    assert_eq!(current.notes, "window seat");
    assert_eq!(current.version, booking.version + 1);
}

#[tokio::test]
async fn redemption_spends_exactly_what_the_reward_costs() {
    let f = fixture().await;
    for _ in 0..2 {
        let b = book(&f).await;
        complete(&f, b.id).await;
    }
    let earned = f.state.directory.customer(f.customer.id).await.unwrap();
    assert_eq!(earned.points, 1000);
    assert_eq!(earned.visit_count, 2);

    let points_reward = reward::create(
        &f.state.pool,
        &RewardCreate {
            tenant_id: f.tenant.id,
            name: "10% off".into(),
            description: None,
            reward_type: RewardType::Discount,
            value: "10%".into(),
            points_required: 300,
            visits_required: None,
        },
    )
    .await
    .unwrap();
    salon_server::loyalty::redeem(&f.state.pool, f.customer.id, points_reward.id)
        .await
        .unwrap();
    let after_points = f.state.directory.customer(f.customer.id).await.unwrap();
    assert_eq!(after_points.points, 700);
    assert_eq!(after_points.visit_count, 2);

    let visit_reward = reward::create(
        &f.state.pool,
        &RewardCreate {
            tenant_id: f.tenant.id,
            name: "Free blow-dry".into(),
            description: None,
            reward_type: RewardType::FreeService,
            value: "Free Blow-dry".into(),
            points_required: 0,
            visits_required: Some(3),
        },
    )
    .await
    .unwrap();
    let err = salon_server::loyalty::redeem(&f.state.pool, f.customer.id, visit_reward.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientVisits);
    let unchanged = f.state.directory.customer(f.customer.id).await.unwrap();
    assert_eq!(unchanged.visit_count, 2);

    let b = book(&f).await;
    complete(&f, b.id).await;
    salon_server::loyalty::redeem(&f.state.pool, f.customer.id, visit_reward.id)
        .await
        .unwrap();
    let after_visits = f.state.directory.customer(f.customer.id).await.unwrap();
    assert_eq!(after_visits.visit_count, 0);
    assert_eq!(after_visits.points, 1200);

    let claimed = reward::find_customer_rewards(&f.state.pool, f.customer.id)
        .await
        .unwrap();
    assert_eq!(claimed.len(), 2);
}

#[tokio::test]
async fn outbox_delivers_queued_mail() {
    let f = fixture().await;
    book(&f).await;

    let mailer = std::sync::Arc::new(salon_server::notify::MemoryMailer::new());
    let delivered = f.state.email_worker(mailer.clone()).process_due().await;
    assert!(delivered > 0);
    assert!(
        mailer
            .sent()
            .iter()
            .any(|m| m.to == "ann@example.com" && m.subject == "Booking Confirmed")
    );
}

async fn add_staff(f: &Fixture, name: &str) -> i64 {
    f.state
        .directory
        .add_staff(StaffCreate {
            tenant_id: f.tenant.id,
            name: name.into(),
            email: None,
            phone: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn directly_recorded_visit_accrues_whole_points() {
    let f = fixture().await;
    let recorded = f
        .state
        .visits
        .record_visit(VisitCreate {
            customer_id: f.customer.id,
            staff_member_id: None,
            service_ids: vec![f.service.id, f.service.id],
            total_amount: 99.99,
            payment_status: Default::default(),
            visit_date: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(recorded.booking_id, None);
    assert_eq!(recorded.service_ids, vec![f.service.id]);

    let after = f.state.directory.customer(f.customer.id).await.unwrap();
    assert_eq!(after.points, f.customer.points + 99);
    assert_eq!(after.visit_count, f.customer.visit_count + 1);

    let err = f
        .state
        .visits
        .record_visit(VisitCreate {
            customer_id: f.customer.id,
            staff_member_id: None,
            service_ids: vec![],
            total_amount: -1.0,
            payment_status: Default::default(),
            visit_date: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidVisitAmount);
    let unchanged = f.state.directory.customer(f.customer.id).await.unwrap();
    assert_eq!(unchanged.visit_count, after.visit_count);
}

#[tokio::test]
async fn reminders_go_out_once_per_window() {
    let f = fixture().await;
    let now = shared::util::now_millis();
    let soon = f
        .state
        .bookings
        .create(BookingCreate {
            customer_id: f.customer.id,
            service_id: f.service.id,
            staff_member_id: None,
            booking_date: now + 30 * 60_000,
            status: BookingStatus::Confirmed,
            notes: None,
        })
        .await
        .unwrap();
    // 未确认的预约不提醒
    f.state
        .bookings
        .create(BookingCreate {
            customer_id: f.customer.id,
            service_id: f.service.id,
            staff_member_id: None,
            booking_date: now + 30 * 60_000,
            status: BookingStatus::Pending,
            notes: None,
        })
        .await
        .unwrap();

    let scheduler = f.state.reminder_scheduler();
    assert_eq!(scheduler.tick(now).await, 1);
    assert_eq!(scheduler.tick(now).await, 0);

    let reminders = events_for(&f, RecipientType::Customer, f.customer.id)
        .await
        .into_iter()
        .filter(|e| *e == NotificationEvent::BookingReminder)
        .count();
    assert_eq!(reminders, 1);

    let claimed = f.state.bookings.get(soon.id).await.unwrap();
    assert!(claimed.reminder_sent);
    assert!(!claimed.reminder_24h_sent);
    assert!(
        !booking_repo::claim_reminder(&f.state.pool, soon.id, booking_repo::ReminderKind::Soon)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn reschedule_and_reassignment_notify_every_party() {
    let f = fixture().await;
    let first = add_staff(&f, "Mia").await;
    let second = add_staff(&f, "Leo").await;

    let now = shared::util::now_millis();
    let created = f
        .state
        .bookings
        .create(BookingCreate {
            customer_id: f.customer.id,
            service_id: f.service.id,
            staff_member_id: Some(first),
            booking_date: now + 24 * HOUR_MS,
            status: BookingStatus::Confirmed,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(f.state.reminder_scheduler().tick(now).await, 1);

    let moved = f
        .state
        .bookings
        .update(
            created.id,
            BookingUpdate {
                booking_date: Some(now + 48 * HOUR_MS),
                staff_member_id: Some(Some(second)),
                expected_version: Some(created.version + 1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.staff_member_id, Some(second));
    // 改期后提醒标记重置
    assert!(!moved.reminder_24h_sent);

    let customer_events = events_for(&f, RecipientType::Customer, f.customer.id).await;
    assert!(customer_events.contains(&NotificationEvent::BookingRescheduled));
    let admin_events = events_for(&f, RecipientType::Admin, f.admin_id).await;
    assert!(admin_events.contains(&NotificationEvent::TenantBookingRescheduled));

    let new_staff = events_for(&f, RecipientType::Staff, second).await;
    assert!(new_staff.contains(&NotificationEvent::StaffAssigned));
    assert!(new_staff.contains(&NotificationEvent::StaffAppointmentRescheduled));
    let old_staff = events_for(&f, RecipientType::Staff, first).await;
    assert!(old_staff.contains(&NotificationEvent::StaffNewAppointment));
    assert!(old_staff.contains(&NotificationEvent::StaffUnassigned));

    // 显式 null 取消分配
    let unassigned = f
        .state
        .bookings
        .update(
            created.id,
            BookingUpdate {
                staff_member_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(unassigned.staff_member_id, None);
    let unassigned_events = events_for(&f, RecipientType::Staff, second)
        .await
        .into_iter()
        .filter(|e| *e == NotificationEvent::StaffUnassigned)
        .count();
    assert_eq!(unassigned_events, 1);
}

#[tokio::test]
async fn rejected_and_no_show_bookings_tell_the_customer() {
    let f = fixture().await;

    let rejected = book(&f).await;
    f.state
        .bookings
        .transition(rejected.id, BookingCommand::Reject)
        .await
        .unwrap();

    let missed = book(&f).await;
    f.state
        .bookings
        .transition(missed.id, BookingCommand::Confirm)
        .await
        .unwrap();
    f.state
        .bookings
        .transition(missed.id, BookingCommand::NoShow)
        .await
        .unwrap();

    let customer_events = events_for(&f, RecipientType::Customer, f.customer.id).await;
    assert!(customer_events.contains(&NotificationEvent::BookingRejected));
    assert!(customer_events.contains(&NotificationEvent::BookingNoShow));

    let queued = outbox::find_by_recipient(&f.state.pool, "ann@example.com")
        .await
        .unwrap();
    assert!(queued.iter().any(|e| e.subject == "Booking Rejected"));

    // 爽约不产生到店记录
    assert!(visit::find_by_booking(&f.state.pool, missed.id).await.unwrap().is_none());
}
