//! Tenant Model

use serde::{Deserialize, Serialize};

/// Tenant lifecycle status. The single source of truth for whether a
/// business may operate; `is_active` is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum TenantStatus {
    #[default]
    Pending,
    Active,
    Suspended,
    Rejected,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Rejected => "rejected",
        }
    }
}

/// Kind of business, used to seed the default service menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum BusinessType {
    /// Barbershop
    Kinyozi,
    #[default]
    Salon,
    Spa,
    MultiService,
}

/// One per-tenant email toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailPreference {
    CustBookingReceived,
    CustBookingApproved,
    CustBookingCancelled,
    CustBookingRejected,
    CustBookingNoShow,
    CustBookingRescheduled,
    CustVisitThankYou,
    CustBookingReminder,
    TenantNewBooking,
    TenantBookingCancelled,
    TenantNewCustomer,
}

/// Per-tenant email toggles (all enabled by default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmailPreferences {
    pub email_cust_booking_received: bool,
    pub email_cust_booking_approved: bool,
    pub email_cust_booking_cancelled: bool,
    pub email_cust_booking_rejected: bool,
    pub email_cust_booking_no_show: bool,
    pub email_cust_booking_rescheduled: bool,
    pub email_cust_visit_thank_you: bool,
    pub email_cust_booking_reminder: bool,
    pub email_tenant_new_booking: bool,
    pub email_tenant_booking_cancelled: bool,
    pub email_tenant_new_customer: bool,
}

impl Default for EmailPreferences {
    fn default() -> Self {
        Self {
            email_cust_booking_received: true,
            email_cust_booking_approved: true,
            email_cust_booking_cancelled: true,
            email_cust_booking_rejected: true,
            email_cust_booking_no_show: true,
            email_cust_booking_rescheduled: true,
            email_cust_visit_thank_you: true,
            email_cust_booking_reminder: true,
            email_tenant_new_booking: true,
            email_tenant_booking_cancelled: true,
            email_tenant_new_customer: true,
        }
    }
}

impl EmailPreferences {
    /// Whether emails of the given kind are enabled
    pub fn allows(&self, pref: EmailPreference) -> bool {
        match pref {
            EmailPreference::CustBookingReceived => self.email_cust_booking_received,
            EmailPreference::CustBookingApproved => self.email_cust_booking_approved,
            EmailPreference::CustBookingCancelled => self.email_cust_booking_cancelled,
            EmailPreference::CustBookingRejected => self.email_cust_booking_rejected,
            EmailPreference::CustBookingNoShow => self.email_cust_booking_no_show,
            EmailPreference::CustBookingRescheduled => self.email_cust_booking_rescheduled,
            EmailPreference::CustVisitThankYou => self.email_cust_visit_thank_you,
            EmailPreference::CustBookingReminder => self.email_cust_booking_reminder,
            EmailPreference::TenantNewBooking => self.email_tenant_new_booking,
            EmailPreference::TenantBookingCancelled => self.email_tenant_booking_cancelled,
            EmailPreference::TenantNewCustomer => self.email_tenant_new_customer,
        }
    }

    /// Apply a partial update
    pub fn apply(&mut self, patch: &EmailPreferencesUpdate) {
        let fields = [
            (&mut self.email_cust_booking_received, patch.email_cust_booking_received),
            (&mut self.email_cust_booking_approved, patch.email_cust_booking_approved),
            (&mut self.email_cust_booking_cancelled, patch.email_cust_booking_cancelled),
            (&mut self.email_cust_booking_rejected, patch.email_cust_booking_rejected),
            (&mut self.email_cust_booking_no_show, patch.email_cust_booking_no_show),
            (&mut self.email_cust_booking_rescheduled, patch.email_cust_booking_rescheduled),
            (&mut self.email_cust_visit_thank_you, patch.email_cust_visit_thank_you),
            (&mut self.email_cust_booking_reminder, patch.email_cust_booking_reminder),
            (&mut self.email_tenant_new_booking, patch.email_tenant_new_booking),
            (&mut self.email_tenant_booking_cancelled, patch.email_tenant_booking_cancelled),
            (&mut self.email_tenant_new_customer, patch.email_tenant_new_customer),
        ];
        for (slot, value) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
}

/// Partial update of email toggles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailPreferencesUpdate {
    pub email_cust_booking_received: Option<bool>,
    pub email_cust_booking_approved: Option<bool>,
    pub email_cust_booking_cancelled: Option<bool>,
    pub email_cust_booking_rejected: Option<bool>,
    pub email_cust_booking_no_show: Option<bool>,
    pub email_cust_booking_rescheduled: Option<bool>,
    pub email_cust_visit_thank_you: Option<bool>,
    pub email_cust_booking_reminder: Option<bool>,
    pub email_tenant_new_booking: Option<bool>,
    pub email_tenant_booking_cancelled: Option<bool>,
    pub email_tenant_new_customer: Option<bool>,
}

/// Tenant entity (business)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub business_type: BusinessType,
    /// Contact address, used as Reply-To on outgoing mail
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Brand shown in the From header of customer-facing mail
    pub email_from_name: Option<String>,
    pub status: TenantStatus,
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub email_preferences: EmailPreferences,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Tenant {
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }

    /// Display name for customer-facing mail
    pub fn brand_name(&self) -> &str {
        self.email_from_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// Register tenant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantCreate {
    pub name: String,
    #[serde(default)]
    pub business_type: BusinessType,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_from_name: Option<String>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantStatusUpdate {
    pub status: TenantStatus,
}
