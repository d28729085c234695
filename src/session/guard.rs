//! Route guard - decide se mostrare una pagina o reindirizzare

use super::SessionStore;
use crate::core::ClientError;
use crate::entities::{Role, Session};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(&'static str),
}

/// Regola pura: nessuna sessione -> login, ruolo diverso -> home del ruolo salvato
pub fn check_access(required: Option<Role>, session: Option<&Session>) -> GuardDecision {
    let Some(session) = session else {
        return GuardDecision::Redirect(LOGIN_ROUTE);
    };

    match required {
        Some(role) if role != session.role => GuardDecision::Redirect(session.role.home_route()),
        _ => GuardDecision::Render,
    }
}

/// Ruolo richiesto da una rotta, dedotto dal primo segmento del path
pub fn required_role_for(path: &str) -> Option<Role> {
    let first = path.trim_start_matches('/').split('/').next().unwrap_or_default();
    Role::ALL.into_iter().find(|r| r.as_str() == first)
}

pub struct RouteGuard {
    sessions: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// Legge la sessione corrente e decide per la rotta `path`.
    /// Le rotte senza prefisso di ruolo richiedono solo di essere loggati,
    /// tranne `/login` che è sempre accessibile.
    #[instrument(skip(self))]
    pub fn visit(&self, path: &str) -> Result<GuardDecision, ClientError> {
        if path == LOGIN_ROUTE {
            return Ok(GuardDecision::Render);
        }
        let session = self.sessions.current()?;
        let decision = check_access(required_role_for(path), session.as_ref());
        debug!(?decision, "Route guard decision");
        Ok(decision)
    }
}
