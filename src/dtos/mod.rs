//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione sul filo dalle entità tenute in memoria.

pub mod auth;
pub mod message;
pub mod ws_event;

// Re-exports per facilitare l'import
pub use auth::{LoggedUserDTO, LoginDTO, LoginResponseDTO};
pub use message::{ClassBroadcastDTO, ClassMessageDTO, ComposeDraft, OutgoingMessageDTO, Recipient};
pub use ws_event::{ClientEvent, SendAckDTO, ServerEvent};
