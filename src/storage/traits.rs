//! Common storage traits
//!
//! This module defines the generic interface of the persistent key-value storage
//! shared by the session store and the message cache.

use crate::core::ClientError;

/// Flat string key-value storage, one value per key
///
/// Implementations must be usable from several services at once, hence `Send + Sync`
/// and `&self` receivers.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(String))` - Value found
    /// * `Ok(None)` - Nothing stored under that key
    /// * `Err(ClientError)` - Storage unavailable
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    /// Stores `value` under `key`, overwriting any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Removes `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), ClientError>;

    /// Removes every key
    fn clear(&self) -> Result<(), ClientError>;
}
