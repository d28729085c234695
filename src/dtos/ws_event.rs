//! WebSocket Event DTOs - Data Transfer Objects per eventi del canale realtime

use crate::dtos::OutgoingMessageDTO;
use crate::entities::{Message, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Eventi emessi dal client.
/// Serde serializza questo come:
/// { "event": "sendMessage", "data": { ... } }
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    Authenticate { user_id: String, role: Role },
    SendMessage(OutgoingMessageDTO),
    MarkAsRead { message_id: String, user_id: String },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Authenticate { .. } => "authenticate",
            ClientEvent::SendMessage(_) => "sendMessage",
            ClientEvent::MarkAsRead { .. } => "markAsRead",
        }
    }
}

/// Conferma di invio: il server può mandare l'id o il messaggio intero
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(from = "SendAckWire")]
pub struct SendAckDTO {
    pub id: Option<String>,
}

/// Le tre chiavi possono arrivare insieme: vince `_id`, poi `id`, poi `messageId`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendAckWire {
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message_id: Option<String>,
}

impl From<SendAckWire> for SendAckDTO {
    fn from(wire: SendAckWire) -> Self {
        Self {
            id: wire.mongo_id.or(wire.id).or(wire.message_id),
        }
    }
}

/// Eventi ricevuti dal server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    NewMessage(Message),
    MessageSent(SendAckDTO),
    MessageError {
        #[serde(alias = "error")]
        message: String,
    },
    MessageRead {
        message_id: String,
        #[serde(default)]
        read_at: Option<DateTime<Utc>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authenticate_wire_format() {
        let event = ClientEvent::Authenticate {
            user_id: "7".into(),
            role: Role::Professeur,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "authenticate", "data": {"userId": "7", "role": "professeur"}})
        );
    }

    #[test]
    fn test_message_read_parses_without_timestamp() {
        let raw = r#"{"event":"messageRead","data":{"messageId":"m1"}}"#;
        let event: ServerEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            event,
            ServerEvent::MessageRead {
                message_id: "m1".into(),
                read_at: None
            }
        );
    }

    #[test]
    fn test_message_sent_accepts_full_message_payload() {
        let raw = r#"{"event":"messageSent","data":{"_id":"m9","subject":"Devoir","read":false}}"#;
        let event: ServerEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event, ServerEvent::MessageSent(SendAckDTO { id: Some("m9".into()) }));
    }

    #[test]
    fn test_message_sent_with_every_id_key() {
        let raw = r#"{"event":"messageSent","data":{"_id":"m9","id":"m9","messageId":"m9"}}"#;
        let event: ServerEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event, ServerEvent::MessageSent(SendAckDTO { id: Some("m9".into()) }));
    }

    #[test]
    fn test_new_message_with_virtual_id() {
        let raw = json!({"event": "newMessage", "data": {
            "_id": "m10", "id": "m10", "senderId": "a1", "senderRole": "admin",
            "receiverId": "p1", "receiverRole": "professeur", "subject": "Réunion",
            "content": "Salle 12", "date": "2024-03-05T08:00:00Z"
        }});
        let event: ServerEvent = serde_json::from_value(raw).unwrap();
        assert!(matches!(event, ServerEvent::NewMessage(m) if m.id == "m10"));
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let raw = r#"{"event":"typing","data":{}}"#;
        assert!(serde_json::from_str::<ServerEvent>(raw).is_err());
    }
}
