//! Messaging module - flusso dati della messaggistica
//!
//! Lista in memoria, filtri, cache locale, rubrica dei nomi e il dispatcher
//! dei comandi in uscita, riuniti in [`MessagingService`].

pub mod cache;
pub mod directory;
pub mod dispatcher;
pub mod filter;
pub mod list;
pub mod notice;
pub mod service;

pub use cache::{CachedSnapshot, MessageCache};
pub use directory::{Directory, DirectoryEntry, UNKNOWN_USER};
pub use dispatcher::{DeliveryPolicy, DeliveryReport, Dispatcher, Transport};
pub use filter::MessageFilter;
pub use list::MessageList;
pub use notice::{Notice, NoticeLevel};
pub use service::{MessagingService, SENDING_NOTICE, SENT_NOTICE};
