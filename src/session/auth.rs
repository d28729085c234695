//! Auth service - login con credenziali e logout

use super::{SessionStore, token::token_expiry};
use crate::api::ApiClient;
use crate::core::ClientError;
use crate::dtos::{LoginDTO, LoginResponseDTO};
use crate::entities::Session;
use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

pub struct AuthService {
    api: Arc<ApiClient>,
    sessions: Arc<SessionStore>,
    session_ttl: TimeDelta,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, sessions: Arc<SessionStore>, session_ttl: TimeDelta) -> Self {
        Self {
            api,
            sessions,
            session_ttl,
        }
    }

    /// `POST /login`, poi salva la sessione.
    ///
    /// La scadenza è il claim `exp` del token quando leggibile, altrimenti
    /// adesso + TTL configurato.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = LoginDTO {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        body.validate()?;

        let response: LoginResponseDTO = self.api.post("/login", &body).await.map_err(|e| {
            warn!("Login rejected: {}", e);
            e
        })?;

        let expires_at = match response.token.as_deref().and_then(token_expiry) {
            Some(exp) => exp,
            None => Utc::now()
                .checked_add_signed(self.session_ttl)
                .ok_or_else(|| ClientError::config("Session TTL overflows the expiry date"))?,
        };

        let session = Session {
            user_id: response.user.id,
            role: response.user.role,
            name: response.user.name,
            classe_id: response.user.classe_id,
            token: response.token,
            expires_at: Some(expires_at),
        };

        self.sessions.save(&session)?;
        info!(user_id = %session.user_id, role = %session.role, "User logged in");
        Ok(session)
    }

    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ClientError> {
        self.sessions.clear()
    }
}
