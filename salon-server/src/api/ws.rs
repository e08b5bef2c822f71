//! Notification WebSocket endpoint - 实时通知推送
//!
//! GET /api/tenants/{id}/notifications/ws[?recipient_type=admin&recipient_id=<id>]
//!
//! 协议:
//! - Server → Client: `{"type":"ready"}` 然后逐条推送 HubEvent
//! - 提供 recipient 过滤参数时只推送该收件人的新通知（已读事件始终推送）

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::RecipientType;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::notify::{HubEvent, Recipient};
use crate::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
pub struct WsFilter {
    recipient_type: Option<RecipientType>,
    recipient_id: Option<i64>,
}

impl WsFilter {
    fn recipient(&self) -> Option<Recipient> {
        let id = self.recipient_id?;
        Some(match self.recipient_type? {
            RecipientType::Customer => Recipient::Customer(id),
            RecipientType::Admin => Recipient::Admin(id),
            RecipientType::Staff => Recipient::Staff(id),
        })
    }
}

/// GET /api/tenants/{id}/notifications/ws
pub async fn handle_notifications_ws(
    State(state): State<AppState>,
    Path(tenant_id): Path<i64>,
    Query(filter): Query<WsFilter>,
    ws: WebSocketUpgrade,
) -> AppResult<impl IntoResponse> {
    state.tenants.get(tenant_id).await?;
    let recipient = filter.recipient();
    Ok(ws.on_upgrade(move |socket| notifications_session(socket, state, tenant_id, recipient)))
}

async fn notifications_session(
    socket: WebSocket,
    state: AppState,
    tenant_id: i64,
    recipient: Option<Recipient>,
) {
    let (mut sink, mut stream) = socket.split();
    tracing::info!(tenant_id, ?recipient, "Notification WS connected");

    let mut hub_rx = state.hub.subscribe(tenant_id);

    if send_text(&mut sink, &serde_json::json!({ "type": "ready" })).await.is_err() {
        drop(hub_rx);
        state.hub.release(tenant_id);
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(hub_event) => {
                        if passes_filter(&hub_event, recipient)
                            && send_text(&mut sink, &hub_event).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // 通知已持久化，客户端可通过列表接口补齐
                        tracing::warn!(tenant_id, lagged = n, "Notification subscriber lagged");
                        hub_rx = state.hub.subscribe(tenant_id);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    drop(hub_rx);
    state.hub.release(tenant_id);
    tracing::info!(tenant_id, "Notification WS disconnected");
}

fn passes_filter(event: &HubEvent, recipient: Option<Recipient>) -> bool {
    let Some(recipient) = recipient else {
        return true;
    };
    match event {
        HubEvent::NotificationCreated { notification } => {
            let id = match recipient {
                Recipient::Customer(_) => notification.customer_id,
                Recipient::Admin(_) => notification.user_id,
                Recipient::Staff(_) => notification.staff_member_id,
            };
            notification.recipient_type == recipient.recipient_type()
                && id == Some(recipient.id())
        }
        HubEvent::NotificationRead { .. } => true,
    }
}

async fn send_text<S, T>(sink: &mut S, msg: &T) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
    T: serde::Serialize,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Notification, NotificationEvent};

    fn created(recipient_type: RecipientType, customer_id: Option<i64>) -> HubEvent {
        HubEvent::NotificationCreated {
            notification: Box::new(Notification {
                id: 1,
                tenant_id: Some(1),
                recipient_type,
                customer_id,
                user_id: None,
                staff_member_id: None,
                event: NotificationEvent::BookingReceived,
                title: "t".into(),
                message: "m".into(),
                is_read: false,
                created_at: 0,
            }),
        }
    }

    #[test]
    fn filter_matches_only_the_named_recipient() {
        let event = created(RecipientType::Customer, Some(7));
        assert!(passes_filter(&event, None));
        assert!(passes_filter(&event, Some(Recipient::Customer(7))));
        assert!(!passes_filter(&event, Some(Recipient::Customer(8))));
        assert!(!passes_filter(&event, Some(Recipient::Admin(7))));
        assert!(passes_filter(
            &HubEvent::NotificationRead { notification_id: 1 },
            Some(Recipient::Staff(3))
        ));
    }
}
