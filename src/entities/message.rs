//! Message entity - Entità messaggio così come la restituisce il backend

use super::enums::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

record_serde!(Message);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub sender_role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// Assente per i messaggi inviati a una classe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classe_id: Option<String>,
    pub subject: String,
    pub content: String,
    // stringa iso8601, serde la converte in DateTime<Utc>
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn is_received_by(&self, user_id: &str) -> bool {
        self.receiver_id.as_deref() == Some(user_id)
    }

    pub fn is_sent_by(&self, user_id: &str) -> bool {
        self.sender_id == user_id
    }

    /// Ricerca case-insensitive su oggetto, testo e nomi
    pub fn matches_text(&self, needle_lowercase: &str) -> bool {
        let fields = [
            Some(self.subject.as_str()),
            Some(self.content.as_str()),
            self.sender_name.as_deref(),
            self.receiver_name.as_deref(),
        ];
        fields
            .into_iter()
            .flatten()
            .any(|f| f.to_lowercase().contains(needle_lowercase))
    }
}
