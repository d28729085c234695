//! MessageList - lista dei messaggi in memoria e insieme dei preferiti

use crate::entities::Message;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct MessageList {
    messages: Vec<Message>,
    /// Non persistito: si perde al riavvio
    starred: HashSet<String>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sostituisce il contenuto dopo un fetch completo. I preferiti restano.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Messaggio arrivato dal canale realtime: scartato se l'id è già presente,
    /// altrimenti messo in testa
    pub fn insert_incoming(&mut self, message: Message) -> bool {
        if self.messages.iter().any(|m| m.id == message.id) {
            return false;
        }
        self.messages.insert(0, message);
        true
    }

    /// Segna come letto. Restituisce `false` se era già letto o non esiste.
    pub fn mark_read(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(m) if !m.read => {
                m.read = true;
                m.read_at = Some(at);
                true
            }
            _ => false,
        }
    }

    /// Conferma di lettura ricevuta dal server; mantiene un `read_at` già noto
    pub fn apply_read_receipt(&mut self, id: &str, read_at: Option<DateTime<Utc>>) -> bool {
        let Some(m) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        let changed = !m.read;
        m.read = true;
        if m.read_at.is_none() {
            m.read_at = read_at;
        }
        changed
    }

    pub fn remove(&mut self, id: &str) -> Option<Message> {
        self.starred.remove(id);
        let idx = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(idx))
    }

    /// Restituisce il nuovo stato (true = preferito)
    pub fn toggle_star(&mut self, id: &str) -> bool {
        if self.starred.remove(id) {
            false
        } else {
            self.starred.insert(id.to_string());
            true
        }
    }

    pub fn is_starred(&self, id: &str) -> bool {
        self.starred.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| m.is_received_by(user_id) && !m.read)
            .count()
    }
}
