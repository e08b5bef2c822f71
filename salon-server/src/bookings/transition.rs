//! Booking change → side-effect planning
//!
//! Pure function of the booking before and after a write. The lifecycle
//! executes the plan after the write commits.

use shared::models::{Booking, BookingStatus, NotificationEvent};

/// Who a planned notification goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Customer,
    /// The tenant's primary admin
    TenantAdmin,
    /// Staff assigned after the change
    AssignedStaff,
    /// Staff assigned before the change
    PreviousStaff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEffect {
    /// Create the booking's visit (and accrue loyalty) if it has none yet
    MaterializeVisit,
    Notify {
        event: NotificationEvent,
        audience: Audience,
    },
}

fn notify(event: NotificationEvent, audience: Audience) -> BookingEffect {
    BookingEffect::Notify { event, audience }
}

/// Plan the effects of moving a booking from `before` (`None` on create) to
/// `after`. Order is significant: the visit is materialized before the
/// thank-you notification that links to it.
pub fn plan_effects(before: Option<&Booking>, after: &Booking) -> Vec<BookingEffect> {
    use Audience::*;
    use NotificationEvent as E;

    let mut effects = Vec::new();

    let Some(before) = before else {
        effects.push(notify(E::BookingReceived, Customer));
        effects.push(notify(E::TenantNewBooking, TenantAdmin));
        if after.staff_member_id.is_some() {
            effects.push(notify(E::StaffNewAppointment, AssignedStaff));
        }
        if after.status == BookingStatus::Completed {
            effects.push(BookingEffect::MaterializeVisit);
        }
        return effects;
    };

    if before.status != after.status {
        match after.status {
            BookingStatus::Confirmed => effects.push(notify(E::BookingApproved, Customer)),
            BookingStatus::Cancelled => {
                effects.push(notify(E::BookingCancelled, Customer));
                effects.push(notify(E::TenantBookingCancelled, TenantAdmin));
                if after.staff_member_id.is_some() {
                    effects.push(notify(E::StaffAppointmentCancelled, AssignedStaff));
                }
            }
            BookingStatus::Rejected => effects.push(notify(E::BookingRejected, Customer)),
            BookingStatus::NoShow => effects.push(notify(E::BookingNoShow, Customer)),
            BookingStatus::Completed => {
                effects.push(BookingEffect::MaterializeVisit);
                effects.push(notify(E::VisitThankYou, Customer));
            }
            BookingStatus::Pending => {}
        }
    }

    if before.booking_date != after.booking_date {
        effects.push(notify(E::BookingRescheduled, Customer));
        effects.push(notify(E::TenantBookingRescheduled, TenantAdmin));
        if after.staff_member_id.is_some() {
            effects.push(notify(E::StaffAppointmentRescheduled, AssignedStaff));
        }
    }

    if before.staff_member_id != after.staff_member_id {
        if after.staff_member_id.is_some() {
            effects.push(notify(E::StaffAssigned, AssignedStaff));
        }
        if before.staff_member_id.is_some() {
            effects.push(notify(E::StaffUnassigned, PreviousStaff));
        }
    }

    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use Audience::*;
    use NotificationEvent as E;

    fn booking(status: BookingStatus, staff: Option<i64>) -> Booking {
        Booking {
            id: 1,
            tenant_id: 1,
            customer_id: 2,
            service_id: 3,
            staff_member_id: staff,
            booking_date: 1_772_634_600_000,
            status,
            notes: String::new(),
            reminder_sent: false,
            reminder_24h_sent: false,
            version: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn create_without_staff_notifies_customer_and_admin() {
        let b = booking(BookingStatus::Pending, None);
        assert_eq!(
            plan_effects(None, &b),
            vec![
                notify(E::BookingReceived, Customer),
                notify(E::TenantNewBooking, TenantAdmin),
            ]
        );
    }

    #[test]
    fn create_completed_materializes_visit() {
        let b = booking(BookingStatus::Completed, Some(9));
        let effects = plan_effects(None, &b);
        assert!(effects.contains(&notify(E::StaffNewAppointment, AssignedStaff)));
        assert_eq!(effects.last(), Some(&BookingEffect::MaterializeVisit));
    }

    #[test]
    fn completion_materializes_before_thanking() {
        let before = booking(BookingStatus::Confirmed, None);
        let after = booking(BookingStatus::Completed, None);
        assert_eq!(
            plan_effects(Some(&before), &after),
            vec![
                BookingEffect::MaterializeVisit,
                notify(E::VisitThankYou, Customer)
            ]
        );
    }

    #[test]
    fn completion_from_any_status_materializes() {
        for from in [
            BookingStatus::Pending,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            let effects = plan_effects(
                Some(&booking(from, None)),
                &booking(BookingStatus::Completed, None),
            );
            assert_eq!(effects[0], BookingEffect::MaterializeVisit, "from {from}");
        }
    }

    #[test]
    fn cancellation_fans_out_to_all_parties() {
        let before = booking(BookingStatus::Confirmed, Some(9));
        let after = booking(BookingStatus::Cancelled, Some(9));
        assert_eq!(
            plan_effects(Some(&before), &after),
            vec![
                notify(E::BookingCancelled, Customer),
                notify(E::TenantBookingCancelled, TenantAdmin),
                notify(E::StaffAppointmentCancelled, AssignedStaff),
            ]
        );
    }

    #[test]
    fn unchanged_booking_has_no_effects() {
        let b = booking(BookingStatus::Confirmed, Some(9));
        assert!(plan_effects(Some(&b), &b).is_empty());
    }

    #[test]
    fn reschedule_and_reassign_are_independent_of_status() {
        let before = booking(BookingStatus::Pending, Some(9));
        let mut after = booking(BookingStatus::Confirmed, Some(10));
        after.booking_date += 3_600_000;

        let effects = plan_effects(Some(&before), &after);
        assert_eq!(
            effects,
            vec![
                notify(E::BookingApproved, Customer),
                notify(E::BookingRescheduled, Customer),
                notify(E::TenantBookingRescheduled, TenantAdmin),
                notify(E::StaffAppointmentRescheduled, AssignedStaff),
                notify(E::StaffAssigned, AssignedStaff),
                notify(E::StaffUnassigned, PreviousStaff),
            ]
        );
    }

    #[test]
    fn unassigning_only_notifies_previous_staff() {
        let before = booking(BookingStatus::Pending, Some(9));
        let after = booking(BookingStatus::Pending, None);
        assert_eq!(
            plan_effects(Some(&before), &after),
            vec![notify(E::StaffUnassigned, PreviousStaff)]
        );
    }
}
