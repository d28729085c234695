//! Message DTOs - Data Transfer Objects per messaggi

use crate::entities::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Messaggio in uscita, inviato sul canale realtime (`sendMessage`) o con `POST /messages`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessageDTO {
    pub sender_id: String,
    pub sender_role: Role,
    pub receiver_id: String,
    pub receiver_role: Role,
    pub subject: String,
    pub content: String,
    pub date: DateTime<Utc>,
}

/// Messaggio inviato a tutti gli élèves di una classe (`POST /api/messages/class`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassMessageDTO {
    pub sender_id: String,
    pub sender_role: Role,
    pub classe_id: String,
    pub subject: String,
    pub content: String,
}

/// Risposta del broadcast: numero di destinatari raggiunti
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassBroadcastDTO {
    pub count: usize,
}

/// Destinatario scelto nel form di composizione
#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    User { id: String, role: Role },
    Class { classe_id: String },
}

/// Contenuto del form di composizione
#[derive(Debug, Clone, Validate)]
pub struct ComposeDraft {
    pub recipient: Recipient,
    #[validate(length(min = 1, max = 200, message = "Le sujet est obligatoire (200 caractères max)"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "Le message doit contenir entre 1 et 5000 caractères"))]
    pub content: String,
}

impl ComposeDraft {
    pub fn to_user(id: impl Into<String>, role: Role, subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::User { id: id.into(), role },
            subject: subject.into(),
            content: content.into(),
        }
    }

    pub fn to_class(classe_id: impl Into<String>, subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Class { classe_id: classe_id.into() },
            subject: subject.into(),
            content: content.into(),
        }
    }
}
