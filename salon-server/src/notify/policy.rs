//! Email policy: which tenant toggle governs which notification kind

use shared::models::{EmailPreference, NotificationEvent, Tenant};

/// The tenant toggle that gates email for `event`, if any.
/// Kinds without a toggle are always emailed.
pub fn email_preference(event: NotificationEvent) -> Option<EmailPreference> {
    use EmailPreference as P;
    use NotificationEvent as E;
    match event {
        E::BookingReceived => Some(P::CustBookingReceived),
        E::BookingApproved => Some(P::CustBookingApproved),
        E::BookingCancelled => Some(P::CustBookingCancelled),
        E::BookingRejected => Some(P::CustBookingRejected),
        E::BookingNoShow => Some(P::CustBookingNoShow),
        E::BookingRescheduled => Some(P::CustBookingRescheduled),
        E::VisitThankYou => Some(P::CustVisitThankYou),
        E::BookingReminder => Some(P::CustBookingReminder),
        E::TenantNewBooking => Some(P::TenantNewBooking),
        E::TenantBookingCancelled => Some(P::TenantBookingCancelled),
        E::TenantNewCustomer => Some(P::TenantNewCustomer),

        E::CustomerWelcome
        | E::TenantBookingRescheduled
        | E::StaffAdded
        | E::StaffNewAppointment
        | E::StaffAppointmentCancelled
        | E::StaffAppointmentRescheduled
        | E::StaffAssigned
        | E::StaffUnassigned
        | E::BusinessApplication
        | E::BusinessApproved
        | E::BusinessRejected
        | E::BusinessSuspended => None,
    }
}

/// Whether an email of kind `event` may be sent on behalf of `tenant`.
/// Without a tenant there is nothing to consult.
pub fn email_allowed(event: NotificationEvent, tenant: Option<&Tenant>) -> bool {
    match (email_preference(event), tenant) {
        (Some(pref), Some(tenant)) => tenant.email_preferences.allows(pref),
        _ => true,
    }
}
