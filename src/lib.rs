//! Client library - espone i moduli principali per il binario e per i test

pub mod api;
pub mod core;
pub mod dtos;
pub mod entities;
pub mod messaging;
pub mod realtime;
pub mod session;
pub mod storage;
pub mod views;

// Re-export dei tipi principali per facilitare l'import
pub use core::{ClientError, ClientState, Config, ErrorKind};
pub use entities::{Message, Role, Session};
pub use messaging::MessagingService;
pub use session::{GuardDecision, RouteGuard, SessionStore};
