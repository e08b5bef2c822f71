//! Booking notification texts

use chrono::{DateTime, Utc};
use shared::models::NotificationEvent;
use shared::util::format_appointment;

/// What a booking notification text can mention
#[derive(Debug, Clone)]
pub struct MessageContext<'a> {
    pub customer_name: &'a str,
    pub service_name: &'a str,
    pub booking_date: i64,
    /// Review page of the visit, for the thank-you message
    pub review_link: Option<String>,
}

fn short_time(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Title and message for a booking-driven notification.
/// `None` for kinds that are not about a booking.
pub fn render(event: NotificationEvent, ctx: &MessageContext<'_>) -> Option<(String, String)> {
    use NotificationEvent as E;
    let customer = ctx.customer_name;
    let service = ctx.service_name;

    let (title, message) = match event {
        E::BookingReceived => (
            "Booking Confirmed",
            format!(
                "Your booking for {service} on {} has been confirmed. We look forward to seeing you!",
                format_appointment(ctx.booking_date)
            ),
        ),
        E::TenantNewBooking => (
            "New Booking",
            format!("New booking from {customer} for {service}."),
        ),
        E::StaffNewAppointment => (
            "New Appointment",
            format!(
                "You have a new appointment with {customer} on {}.",
                short_time(ctx.booking_date)
            ),
        ),
        E::BookingApproved => (
            "Booking Approved",
            format!(
                "Great news! Your booking for {service} on {} has been approved by our team.",
                format_appointment(ctx.booking_date)
            ),
        ),
        E::BookingCancelled => (
            "Booking Cancelled",
            format!("Your booking for {service} has been cancelled."),
        ),
        E::TenantBookingCancelled => (
            "Booking Cancelled",
            format!("Booking for {customer} has been cancelled."),
        ),
        E::StaffAppointmentCancelled => (
            "Appointment Cancelled",
            format!("Appointment with {customer} has been cancelled."),
        ),
        E::BookingRejected => (
            "Booking Rejected",
            format!("Unfortunately, your booking for {service} has been rejected."),
        ),
        E::BookingNoShow => (
            "Booking No-Show",
            format!("We missed you! Your booking for {service} was marked as a no-show."),
        ),
        E::VisitThankYou => {
            let mut message = format!(
                "Thank you for choosing us, {customer}! We hope you enjoyed your {service} service."
            );
            if let Some(link) = &ctx.review_link {
                message.push_str(&format!(
                    "\n\nWe'd love to hear about your experience! Please take a moment to leave us a review: {link}"
                ));
            }
            ("Thank You for Your Visit!", message)
        }
        E::BookingRescheduled => (
            "Booking Rescheduled",
            format!(
                "Your booking has been rescheduled to {}.",
                short_time(ctx.booking_date)
            ),
        ),
        E::TenantBookingRescheduled => (
            "Booking Rescheduled",
            format!(
                "Booking for {customer} has been rescheduled to {}.",
                short_time(ctx.booking_date)
            ),
        ),
        E::StaffAppointmentRescheduled => (
            "Appointment Rescheduled",
            format!(
                "Appointment with {customer} rescheduled to {}.",
                short_time(ctx.booking_date)
            ),
        ),
        E::StaffAssigned => (
            "New Appointment Assigned",
            format!("You have been assigned to a booking with {customer}."),
        ),
        E::StaffUnassigned => (
            "Appointment Unassigned",
            format!("You have been unassigned from the booking with {customer}."),
        ),
        E::BookingReminder => (
            "Appointment Reminder",
            format!(
                "Hello {customer},\n\nThis is a reminder of your {service} appointment on {}.\n\nWe look forward to seeing you!",
                format_appointment(ctx.booking_date)
            ),
        ),
        _ => return None,
    };
    Some((title.to_string(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> MessageContext<'static> {
        MessageContext {
            customer_name: "Ann",
            service_name: "Haircut",
            booking_date: 1_772_634_600_000,
            review_link: None,
        }
    }

    #[test]
    fn received_uses_long_date() {
        let (title, message) = render(NotificationEvent::BookingReceived, &ctx()).unwrap();
        assert_eq!(title, "Booking Confirmed");
        assert_eq!(
            message,
            "Your booking for Haircut on March 04, 2026 at 02:30 PM has been confirmed. We look forward to seeing you!"
        );
    }

    #[test]
    fn staff_messages_use_short_date() {
        let (_, message) = render(NotificationEvent::StaffNewAppointment, &ctx()).unwrap();
        assert_eq!(message, "You have a new appointment with Ann on 2026-03-04 14:30.");
    }

    #[test]
    fn thank_you_includes_review_link_when_known() {
        let (_, plain) = render(NotificationEvent::VisitThankYou, &ctx()).unwrap();
        assert!(!plain.contains("review"));

        let mut with_link = ctx();
        with_link.review_link = Some("https://salon.test/review/42".into());
        let (title, message) = render(NotificationEvent::VisitThankYou, &with_link).unwrap();
        assert_eq!(title, "Thank You for Your Visit!");
        assert!(message.ends_with("leave us a review: https://salon.test/review/42"));
    }

    #[test]
    fn non_booking_events_have_no_text() {
        assert!(render(NotificationEvent::BusinessApproved, &ctx()).is_none());
        assert!(render(NotificationEvent::CustomerWelcome, &ctx()).is_none());
    }
}
