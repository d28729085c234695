//! SessionStore - sessione tipizzata sopra lo storage chiave/valore
//!
//! I campi restano chiavi piatte (`userId`, `userRole`, ...) come nel front end web,
//! ma vengono letti e scritti sempre insieme attraverso [`Session`]. Ogni cambio di
//! stato viene pubblicato su un canale broadcast, così le viste possono reagire al
//! logout o alla scadenza senza ricaricare tutto.

use crate::core::ClientError;
use crate::entities::{Role, Session};
use crate::storage::{self, KeyValueStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, instrument, warn};

const EVENTS_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
    Expired,
}

pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENTS_CAPACITY);
        Self { store, events }
    }

    /// Sessione corrente, se presente e non scaduta.
    ///
    /// Servono almeno `userId` e `userRole`; un ruolo illeggibile equivale ad
    /// assenza di sessione. Una sessione scaduta viene cancellata e segnalata
    /// con [`SessionEvent::Expired`].
    #[instrument(skip(self))]
    pub fn current(&self) -> Result<Option<Session>, ClientError> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&self, now: DateTime<Utc>) -> Result<Option<Session>, ClientError> {
        let (Some(user_id), Some(raw_role)) = (
            self.store.get(storage::USER_ID)?,
            self.store.get(storage::USER_ROLE)?,
        ) else {
            debug!("No stored session");
            return Ok(None);
        };

        let role = match raw_role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                warn!("Stored role is not valid: {}", e);
                return Ok(None);
            }
        };

        let expires_at = self
            .store
            .get(storage::SESSION_EXPIRES_AT)?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let session = Session {
            user_id,
            role,
            name: self.store.get(storage::USER_NAME)?.unwrap_or_default(),
            classe_id: self.store.get(storage::CLASSE_ID)?.filter(|c| !c.is_empty()),
            token: self.store.get(storage::TOKEN)?.filter(|t| !t.is_empty()),
            expires_at,
        };

        if session.is_expired(now) {
            info!(user_id = %session.user_id, "Session expired, clearing storage");
            self.store.clear()?;
            let _ = self.events.send(SessionEvent::Expired);
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Scrive tutti i campi della sessione e notifica `SignedIn`
    #[instrument(skip(self, session), fields(user_id = %session.user_id, role = %session.role))]
    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        self.store.set(storage::USER_ID, &session.user_id)?;
        self.store.set(storage::USER_ROLE, session.role.as_str())?;
        self.store.set(storage::USER_NAME, &session.name)?;

        match &session.classe_id {
            Some(classe_id) => self.store.set(storage::CLASSE_ID, classe_id)?,
            None => self.store.remove(storage::CLASSE_ID)?,
        }
        match &session.token {
            Some(token) => self.store.set(storage::TOKEN, token)?,
            None => self.store.remove(storage::TOKEN)?,
        }
        match &session.expires_at {
            Some(exp) => self.store.set(storage::SESSION_EXPIRES_AT, &exp.to_rfc3339())?,
            None => self.store.remove(storage::SESSION_EXPIRES_AT)?,
        }

        info!("Session saved");
        let _ = self.events.send(SessionEvent::SignedIn(session.clone()));
        Ok(())
    }

    /// Logout: svuota tutto lo storage (cache messaggi compresa) e notifica `SignedOut`
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        info!("Session cleared");
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    /// Stream degli eventi di sessione a partire da questo momento
    pub fn subscribe(&self) -> BroadcastStream<SessionEvent> {
        BroadcastStream::new(self.events.subscribe())
    }
}
