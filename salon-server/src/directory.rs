//! Customers, staff and services of a tenant, with onboarding notices

use crate::db::repository::{customer, service, staff, tenant, user};
use crate::notify::{NotificationDispatcher, NotificationRequest, Recipient};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Customer, CustomerCreate, NotificationEvent, Service, ServiceCreate, StaffCreate, StaffMember,
    Tenant,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct Directory {
    pool: SqlitePool,
    dispatcher: NotificationDispatcher,
}

fn require_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name is required").with_detail("field", "name"));
    }
    Ok(())
}

impl Directory {
    pub fn new(pool: SqlitePool, dispatcher: NotificationDispatcher) -> Self {
        Self { pool, dispatcher }
    }

    async fn tenant(&self, id: i64) -> AppResult<Tenant> {
        tenant::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::TenantNotFound))
    }

    pub async fn customer(&self, id: i64) -> AppResult<Customer> {
        customer::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))
    }

    /// Register a customer, tell the tenant admins and welcome the customer
    pub async fn register_customer(&self, data: CustomerCreate) -> AppResult<Customer> {
        require_name(&data.name)?;
        let owner = self.tenant(data.tenant_id).await?;
        let created = customer::create(&self.pool, &data).await?;
        tracing::info!(customer_id = created.id, tenant_id = owner.id, "Customer registered");

        match user::find_tenant_admins(&self.pool, owner.id).await {
            Ok(admins) => {
                for admin in admins {
                    self.dispatcher
                        .notify(
                            NotificationRequest::new(
                                NotificationEvent::TenantNewCustomer,
                                Recipient::Admin(admin.id),
                                "New Customer Signup",
                                format!(
                                    "Great news! A new customer, {}, has just registered with {}.",
                                    created.name, owner.name
                                ),
                            )
                            .tenant(owner.id),
                        )
                        .await;
                }
            }
            Err(e) => tracing::warn!(tenant_id = owner.id, error = %e, "Failed to load tenant admins"),
        }

        if created.email.is_some() {
            self.dispatcher
                .notify(
                    NotificationRequest::new(
                        NotificationEvent::CustomerWelcome,
                        Recipient::Customer(created.id),
                        format!("Welcome to {}!", owner.name),
                        format!(
                            "Hi {},\n\nThank you for joining {}! Your account has been successfully created. You can now log in to our portal to view your rewards and book services.\n\nWe look forward to seeing you soon!",
                            created.name, owner.name
                        ),
                    )
                    .tenant(owner.id),
                )
                .await;
        }

        Ok(created)
    }

    /// Add a staff member and tell the tenant admin (in-app only)
    pub async fn add_staff(&self, data: StaffCreate) -> AppResult<StaffMember> {
        require_name(&data.name)?;
        let owner = self.tenant(data.tenant_id).await?;
        let created = staff::create(&self.pool, &data).await?;
        tracing::info!(staff_member_id = created.id, tenant_id = owner.id, "Staff member added");

        match user::find_tenant_admin(&self.pool, owner.id).await {
            Ok(Some(admin)) => {
                self.dispatcher
                    .notify(
                        NotificationRequest::new(
                            NotificationEvent::StaffAdded,
                            Recipient::Admin(admin.id),
                            "Staff Added",
                            format!("{} has been added to your staff list.", created.name),
                        )
                        .tenant(owner.id)
                        .in_app_only(),
                    )
                    .await;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(tenant_id = owner.id, error = %e, "Failed to load tenant admin"),
        }

        Ok(created)
    }

    pub async fn add_service(&self, data: ServiceCreate) -> AppResult<Service> {
        require_name(&data.name)?;
        if !data.price.is_finite() || data.price < 0.0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Price must be a non-negative number",
            )
            .with_detail("field", "price"));
        }
        if data.duration_minutes <= 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Duration must be positive",
            )
            .with_detail("field", "duration_minutes"));
        }
        self.tenant(data.tenant_id).await?;
        let created = service::create(&self.pool, &data).await?;
        Ok(created)
    }
}
