//! NotificationHub - 实时通知分发
//!
//! 按 tenant 隔离的 broadcast channel，WebSocket 订阅者从这里接收推送。
//!
//! ```text
//! NotificationDispatcher
//!       │ relay(tenant_id, notification)
//!       ▼
//! NotificationHub
//!   └── tenants: tenant_id → broadcast::Sender<HubEvent>
//!         │
//!         ▼
//!   WS handler (subscribe → 推送)
//! ```

use dashmap::DashMap;
use serde::Serialize;
use shared::models::Notification;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Broadcast channel 容量
const BROADCAST_CAPACITY: usize = 256;

/// Hub 推送事件
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubEvent {
    NotificationCreated { notification: Box<Notification> },
    NotificationRead { notification_id: i64 },
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("realtime channel unavailable: {0}")]
    Unavailable(String),
}

/// Real-time transport for freshly persisted notifications
pub trait RealtimeRelay: Send + Sync {
    fn relay(&self, tenant_id: i64, event: HubEvent) -> Result<(), RelayError>;
}

/// 全局通知 hub - 按 tenant 严格隔离
#[derive(Clone, Default)]
pub struct NotificationHub {
    /// tenant_id → broadcast sender
    tenants: Arc<DashMap<i64, broadcast::Sender<HubEvent>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅 tenant 的 broadcast channel
    pub fn subscribe(&self, tenant_id: i64) -> broadcast::Receiver<HubEvent> {
        self.tenants
            .entry(tenant_id)
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self, tenant_id: i64) -> usize {
        self.tenants
            .get(&tenant_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// 无订阅者时移除 tenant 条目（WS 断开时调用）
    pub fn release(&self, tenant_id: i64) {
        self.tenants
            .remove_if(&tenant_id, |_, tx| tx.receiver_count() == 0);
    }
}

impl RealtimeRelay for NotificationHub {
    fn relay(&self, tenant_id: i64, event: HubEvent) -> Result<(), RelayError> {
        // 无订阅者时 send 返回 Err，安全忽略
        if let Some(tx) = self.tenants.get(&tenant_id)
            && tx.send(event).is_err()
        {
            tracing::debug!(tenant_id, "No realtime subscribers");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{NotificationEvent, RecipientType};

    fn notification(tenant_id: i64) -> Notification {
        Notification {
            id: 1,
            tenant_id: Some(tenant_id),
            recipient_type: RecipientType::Customer,
            customer_id: Some(7),
            user_id: None,
            staff_member_id: None,
            event: NotificationEvent::BookingReceived,
            title: "Booking Confirmed".into(),
            message: "See you soon".into(),
            is_read: false,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn subscribers_receive_only_their_tenant() {
        let hub = NotificationHub::new();
        let mut rx1 = hub.subscribe(1);
        let mut rx2 = hub.subscribe(2);

        hub.relay(
            1,
            HubEvent::NotificationCreated {
                notification: Box::new(notification(1)),
            },
        )
        .unwrap();

        match rx1.recv().await.unwrap() {
            HubEvent::NotificationCreated { notification } => {
                assert_eq!(notification.tenant_id, Some(1))
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn relay_without_subscribers_is_ok() {
        let hub = NotificationHub::new();
        assert!(
            hub.relay(9, HubEvent::NotificationRead { notification_id: 1 })
                .is_ok()
        );
    }

    #[test]
    fn release_drops_idle_tenants_only() {
        let hub = NotificationHub::new();
        let rx = hub.subscribe(1);
        hub.release(1);
        assert_eq!(hub.subscriber_count(1), 1);

        drop(rx);
        hub.release(1);
        assert_eq!(hub.subscriber_count(1), 0);
        assert!(hub.tenants.is_empty());
    }

    #[test]
    fn hub_event_wire_format() {
        let json = serde_json::to_value(HubEvent::NotificationRead { notification_id: 5 }).unwrap();
        assert_eq!(json["type"], "notification_read");
        assert_eq!(json["notification_id"], 5);
    }
}
