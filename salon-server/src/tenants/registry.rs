//! Tenant registry: registration, status lifecycle, email preferences

use super::catalog::default_services;
use crate::db::{begin_write, db_error};
use crate::db::repository::{service, tenant, user};
use crate::notify::{NotificationDispatcher, NotificationRequest, Recipient};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    EmailPreferencesUpdate, NotificationEvent, Tenant, TenantCreate, TenantStatus,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct TenantRegistry {
    pool: SqlitePool,
    dispatcher: NotificationDispatcher,
}

impl TenantRegistry {
    pub fn new(pool: SqlitePool, dispatcher: NotificationDispatcher) -> Self {
        Self { pool, dispatcher }
    }

    pub async fn get(&self, id: i64) -> AppResult<Tenant> {
        tenant::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::TenantNotFound))
    }

    /// Register a pending tenant with its default service menu and tell the
    /// platform admins.
    pub async fn register(&self, data: TenantCreate) -> AppResult<Tenant> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Business name is required").with_detail("field", "name"));
        }

        let mut tx = begin_write(&self.pool).await?;
        let created = tenant::create(&mut *tx, &data).await?;
        let menu = default_services(created.id, created.business_type);
        for item in &menu {
            service::create(&mut *tx, item).await?;
        }
        tx.commit().await.map_err(db_error)?;

        tracing::info!(
            tenant_id = created.id,
            business_type = ?created.business_type,
            services = menu.len(),
            "Tenant registered"
        );

        match user::find_platform_admins(&self.pool).await {
            Ok(admins) => {
                for admin in admins {
                    self.dispatcher
                        .notify(NotificationRequest::new(
                            NotificationEvent::BusinessApplication,
                            Recipient::Admin(admin.id),
                            "New Business Application",
                            format!(
                                "New business '{}' has registered and is pending approval.",
                                created.name
                            ),
                        ))
                        .await;
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to load platform admins"),
        }

        Ok(created)
    }

    /// Change the tenant's status and notify its admin when it changed
    pub async fn set_status(&self, id: i64, status: TenantStatus) -> AppResult<Tenant> {
        let before = self.get(id).await?;
        let updated = tenant::update_status(&self.pool, id, status).await?;
        if before.status == status {
            return Ok(updated);
        }

        tracing::info!(tenant_id = id, from = before.status.as_str(), to = status.as_str(), "Tenant status changed");

        let name = &updated.name;
        let notice = match status {
            TenantStatus::Active => Some((
                NotificationEvent::BusinessApproved,
                "Business Approved",
                format!(
                    "Congratulations! Your business '{name}' has been approved. You can now log in to your dashboard."
                ),
            )),
            TenantStatus::Rejected => Some((
                NotificationEvent::BusinessRejected,
                "Business Application Rejected",
                format!("Your application for '{name}' has been rejected. Please contact support."),
            )),
            TenantStatus::Suspended => Some((
                NotificationEvent::BusinessSuspended,
                "Business Suspended",
                format!("Your business '{name}' has been suspended. Access is restricted."),
            )),
            TenantStatus::Pending => None,
        };

        if let Some((event, title, message)) = notice {
            match user::find_tenant_admin(&self.pool, id).await {
                Ok(Some(admin)) => {
                    self.dispatcher
                        .notify(
                            NotificationRequest::new(event, Recipient::Admin(admin.id), title, message)
                                .tenant(id),
                        )
                        .await;
                }
                Ok(None) => tracing::debug!(tenant_id = id, "Tenant has no admin to notify"),
                Err(e) => tracing::warn!(tenant_id = id, error = %e, "Failed to load tenant admin"),
            }
        }

        Ok(updated)
    }

    /// Partial update of the email toggles
    pub async fn update_preferences(&self, id: i64, patch: &EmailPreferencesUpdate) -> AppResult<Tenant> {
        let current = self.get(id).await?;
        let mut prefs = current.email_preferences;
        prefs.apply(patch);
        let updated = tenant::update_preferences(&self.pool, id, &prefs).await?;
        tracing::info!(tenant_id = id, "Email preferences updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::notification;
    use crate::notify::{EmailOutbox, NotificationHub, SenderIdentity};
    use shared::models::{BusinessType, RecipientType, UserCreate, UserRole};
    use std::sync::Arc;

    async fn registry() -> (DbService, TenantRegistry) {
        let db = DbService::in_memory().await.unwrap();
        let dispatcher = NotificationDispatcher::new(
            db.pool.clone(),
            Arc::new(NotificationHub::new()),
            EmailOutbox::new(db.pool.clone()),
            SenderIdentity {
                platform_name: "Salon Platform".into(),
                address: "noreply@salon.test".into(),
            },
        );
        let registry = TenantRegistry::new(db.pool.clone(), dispatcher);
        (db, registry)
    }

    fn new_tenant(business_type: BusinessType) -> TenantCreate {
        TenantCreate {
            name: "Sharp Cuts".into(),
            business_type,
            email: None,
            phone: None,
            email_from_name: None,
        }
    }

    #[tokio::test]
    async fn register_seeds_catalog_and_notifies_platform_admins() {
        let (db, registry) = registry().await;
        let admin = user::create(
            &db.pool,
            &UserCreate {
                tenant_id: None,
                name: "Ops".into(),
                email: None,
                role: UserRole::PlatformAdmin,
            },
        )
        .await
        .unwrap();

        let created = registry.register(new_tenant(BusinessType::Kinyozi)).await.unwrap();
        assert_eq!(created.status, TenantStatus::Pending);
        assert!(!created.is_active());

        let menu = service::find_by_tenant(&db.pool, created.id).await.unwrap();
        assert_eq!(menu.len(), 10);

        let inbox = notification::find_for_recipient(&db.pool, RecipientType::Admin, admin.id, false)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].event, NotificationEvent::BusinessApplication);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (_db, registry) = registry().await;
        let mut data = new_tenant(BusinessType::Salon);
        data.name = "  ".into();
        let err = registry.register(data).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn approval_notifies_tenant_admin_once() {
        let (db, registry) = registry().await;
        let created = registry.register(new_tenant(BusinessType::Spa)).await.unwrap();
        let owner = user::create(
            &db.pool,
            &UserCreate {
                tenant_id: Some(created.id),
                name: "Owner".into(),
                email: None,
                role: UserRole::TenantAdmin,
            },
        )
        .await
        .unwrap();

        let approved = registry.set_status(created.id, TenantStatus::Active).await.unwrap();
        assert!(approved.is_active());
        // Same status again: no second notice
        registry.set_status(created.id, TenantStatus::Active).await.unwrap();

        let inbox = notification::find_for_recipient(&db.pool, RecipientType::Admin, owner.id, false)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].title, "Business Approved");
    }

    #[tokio::test]
    async fn preferences_patch_is_partial() {
        let (_db, registry) = registry().await;
        let created = registry.register(new_tenant(BusinessType::Salon)).await.unwrap();

        let patch = EmailPreferencesUpdate {
            email_cust_booking_cancelled: Some(false),
            ..Default::default()
        };
        let updated = registry.update_preferences(created.id, &patch).await.unwrap();
        assert!(!updated.email_preferences.email_cust_booking_cancelled);
        assert!(updated.email_preferences.email_cust_booking_received);
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let (_db, registry) = registry().await;
        let err = registry.set_status(1, TenantStatus::Active).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantNotFound);
    }
}
