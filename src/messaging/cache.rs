//! MessageCache - copia locale dell'ultima lista scaricata
//!
//! Scritta ad ogni fetch riuscito, letta solo quando il fetch fallisce. Il valore
//! salvato è una busta con l'istante di sincronizzazione; un array nudo scritto
//! dal vecchio front end viene ancora accettato.

use crate::core::ClientError;
use crate::entities::Message;
use crate::storage::{self, KeyValueStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
    /// `None` per i dati scritti senza busta
    pub synced_at: Option<DateTime<Utc>>,
    pub messages: Vec<Message>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Envelope(CachedSnapshot),
    Legacy(Vec<Message>),
}

pub struct MessageCache {
    store: Arc<dyn KeyValueStore>,
}

impl MessageCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, messages), fields(count = messages.len()))]
    pub fn save(&self, messages: &[Message], synced_at: DateTime<Utc>) -> Result<(), ClientError> {
        let snapshot = CachedSnapshot {
            synced_at: Some(synced_at),
            messages: messages.to_vec(),
        };
        self.store
            .set(storage::CACHED_MESSAGES, &serde_json::to_string(&snapshot)?)?;
        debug!("Message snapshot written");
        Ok(())
    }

    /// Ultima copia salvata; vuota se assente o illeggibile
    #[instrument(skip(self))]
    pub fn load(&self) -> CachedSnapshot {
        let raw = match self.store.get(storage::CACHED_MESSAGES) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CachedSnapshot::default(),
            Err(e) => {
                warn!("Unable to read message cache: {}", e);
                return CachedSnapshot::default();
            }
        };

        match serde_json::from_str::<StoredSnapshot>(&raw) {
            Ok(StoredSnapshot::Envelope(snapshot)) => snapshot,
            Ok(StoredSnapshot::Legacy(messages)) => CachedSnapshot {
                synced_at: None,
                messages,
            },
            Err(e) => {
                warn!("Message cache is corrupt, ignoring it: {}", e);
                CachedSnapshot::default()
            }
        }
    }
}
