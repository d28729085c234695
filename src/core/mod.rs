//! Core Module - Componenti infrastrutturali del client
//!
//! Questo modulo contiene tutti i componenti "core" del client:
//! - Configurazione
//! - Gestione errori
//! - Logging
//! - Stato applicazione

pub mod config;
pub mod error;
pub mod logging;
pub mod state;

// Re-exports per facilitare l'import
pub use config::Config;
pub use error::{ClientError, ErrorKind};
pub use logging::init_tracing;
pub use state::ClientState;
