//! Storage module - storage chiave/valore persistente del client
//!
//! Le chiavi sono le stesse usate dal front end web, così un file di storage
//! resta leggibile da entrambi.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

pub const USER_ID: &str = "userId";
pub const USER_ROLE: &str = "userRole";
pub const USER_NAME: &str = "userName";
pub const CLASSE_ID: &str = "classeId";
pub const TOKEN: &str = "token";
pub const SESSION_EXPIRES_AT: &str = "sessionExpiresAt";
pub const CACHED_MESSAGES: &str = "cachedMessages";
