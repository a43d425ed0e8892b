use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{devices::DeviceView, devices::Registry, events::EventBus, speech::SpeechService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusColumn {
    pub heading: String,
    pub devices: Vec<DeviceView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ControlView {
    pub id: String,
    pub label: String,
}

/// Everything the dashboard page renders after one interaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardView {
    pub title: String,
    pub description: String,
    pub columns: Vec<StatusColumn>,
    pub controls: Vec<ControlView>,
    pub status_lines: Vec<String>,
    pub rendered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    TurnOn { device_id: String },
    TurnOff { device_id: String },
    /// Press the button whose [`ControlView::id`] is `control`.
    Press { control: String },
    Listen,
    Refresh,
    Dashboard(DashboardView),
    Error { message: String, code: u16 },
}

pub struct AppState {
    pub registry: Mutex<Registry>,
    pub clients: DashMap<Uuid, broadcast::Sender<WsMessage>>,
    pub speech: Box<dyn SpeechService>,
    pub events: EventBus,
    pub max_connections: usize,
}

impl AppState {
    pub fn new(speech: Box<dyn SpeechService>, max_connections: usize) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            clients: DashMap::new(),
            speech,
            events: EventBus::new(),
            max_connections,
        }
    }

    /// Push a message to every connected dashboard client.
    pub fn broadcast(&self, msg: &WsMessage) {
        for client in self.clients.iter() {
            let _ = client.value().send(msg.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_use_type_tag() {
        let msg: WsMessage =
            serde_json::from_str(r#"{"type":"turn_on","device_id":"fan"}"#).unwrap();
        assert!(matches!(msg, WsMessage::TurnOn { ref device_id } if device_id == "fan"));

        let msg: WsMessage =
            serde_json::from_str(r#"{"type":"press","control":"turn_off_led"}"#).unwrap();
        assert!(matches!(msg, WsMessage::Press { ref control } if control == "turn_off_led"));

        let msg: WsMessage = serde_json::from_str(r#"{"type":"listen"}"#).unwrap();
        assert!(matches!(msg, WsMessage::Listen));
    }

    #[test]
    fn error_message_serializes_flat() {
        let json = serde_json::to_value(WsMessage::Error {
            message: "nope".into(),
            code: 400,
        })
        .unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], 400);
    }
}
