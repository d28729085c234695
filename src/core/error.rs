use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;

/// Famiglie di errore che un componente può incontrare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Richiesta non partita o senza risposta (connessione, timeout)
    Network,
    /// Risposta con status non 2xx
    Http,
    /// Corpo JSON non decodificabile
    Decode,
    /// Campi obbligatori mancanti o non validi
    Validation,
    /// Lettura/scrittura dello storage persistente
    Storage,
    /// Canale realtime chiuso o non raggiungibile
    Channel,
    Config,
}

/// Corpo di errore restituito dal backend, quando è JSON
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClientError {
    kind: ErrorKind,
    status: Option<StatusCode>,
    message: String,
    details: Option<String>,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn channel(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Channel, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Errore HTTP costruito dallo status e dal corpo della risposta.
    /// Se il corpo è JSON con `message` o `error` si usa quello,
    /// altrimenti il messaggio generico "Erreur {status}".
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty());

        let message = parsed.unwrap_or_else(|| format!("Erreur {}", status.as_u16()));
        Self {
            kind: ErrorKind::Http,
            status: Some(status),
            message,
            details: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Network errors e 5xx meritano un nuovo tentativo, i 4xx no
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            ErrorKind::Network => true,
            ErrorKind::Http => self.status.is_some_and(|s| s.is_server_error()),
            _ => false,
        }
    }

    /// Testo mostrato all'utente in banner e notifiche
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => "Impossible de contacter le serveur".to_string(),
            _ => self.message.clone(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.details) {
            (Some(status), _) => write!(f, "{:?} error ({}): {}", self.kind, status, self.message),
            (None, Some(details)) => write!(f, "{:?} error: {} ({})", self.kind, self.message, details),
            (None, None) => write!(f, "{:?} error: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::decode("Invalid JSON in response").with_details(err.to_string());
        }
        match err.status() {
            Some(status) => Self::from_response(status, ""),
            None => Self::network("Request failed").with_details(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode("Invalid JSON").with_details(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::storage("Storage unavailable").with_details(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        // Primo messaggio esplicito trovato tra i campi, altrimenti quello generico
        let first = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()));

        Self::validation(first.unwrap_or_else(|| "Champs obligatoires manquants".to_string()))
            .with_details(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        Self::config("Invalid URL").with_details(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::channel("Realtime channel error").with_details(err.to_string())
    }
}
