//! Client State - Stato condiviso del client
//!
//! Contiene lo storage, la sessione e i servizi costruiti a partire dalla
//! configurazione; le schermate li ricevono da qui.

use crate::api::ApiClient;
use crate::core::{ClientError, Config};
use crate::dtos::ServerEvent;
use crate::entities::Session;
use crate::messaging::MessagingService;
use crate::realtime::RealtimeChannel;
use crate::session::{AuthService, RouteGuard, SessionStore};
use crate::storage::{FileStore, KeyValueStore};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

pub struct ClientState {
    pub config: Config,

    /// Storage chiave/valore condiviso da sessione, token e cache messaggi
    pub store: Arc<dyn KeyValueStore>,

    pub sessions: Arc<SessionStore>,

    pub api: Arc<ApiClient>,

    pub auth: AuthService,
}

impl ClientState {
    /// Apre lo storage su file indicato da `STORAGE_PATH`
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let store = Arc::new(FileStore::open(&config.storage_path)?);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self, ClientError> {
        let sessions = Arc::new(SessionStore::new(store.clone()));
        let api = Arc::new(ApiClient::new(&config, store.clone())?);
        let auth = AuthService::new(api.clone(), sessions.clone(), config.session_ttl());
        info!(env = %config.app_env, "Client state ready");

        Ok(Self {
            config,
            store,
            sessions,
            api,
            auth,
        })
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.sessions.clone())
    }

    pub fn messaging(&self, session: Session) -> MessagingService {
        MessagingService::new(session, self.api.clone(), self.store.clone())
    }

    /// Apre il canale realtime per la sessione, sull'URL configurato
    pub async fn connect_realtime(
        &self,
        session: &Session,
    ) -> Result<(RealtimeChannel, UnboundedReceiver<ServerEvent>), ClientError> {
        RealtimeChannel::connect(&self.config.ws_url, session).await
    }
}
