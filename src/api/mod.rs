//! API module - accesso al backend REST
//!
//! - Client HTTP con token bearer e normalizzazione degli errori
//! - Nuovi tentativi con backoff esponenziale
//! - Endpoint CRUD tipizzati per le collezioni della scuola

pub mod client;
pub mod resources;
pub mod retry;

pub use client::ApiClient;
pub use resources::Resource;
pub use retry::with_backoff;
