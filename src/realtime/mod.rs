//! Realtime Module - canale WebSocket verso il backend
//!
//! Questo modulo gestisce la connessione realtime del client. Include:
//! - Apertura della connessione e autenticazione del canale
//! - Task separati per lettura e scrittura (split sender/receiver)
//! - Ping periodico
//! - Il trait [`LiveChannel`] con cui i servizi emettono eventi

pub mod channel;
pub mod connection;

pub use channel::LiveChannel;
pub use connection::{PING_INTERVAL_SECS, RealtimeChannel};
