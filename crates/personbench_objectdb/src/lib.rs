use std::fmt;

use personbench_serialization::{NumBytes, Read, Write};

extern crate self as personbench_objectdb;

mod database;
mod session;

pub use database::{Database, State};
pub use personbench_error::StoreError;
pub use session::{CommitMode, Session};

/// Credentials written into every newly created store.
pub const DEFAULT_USER: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";

/// A record type that can be registered with a [`Database`] and stored in
/// its own class. Usually derived with `personbench_proc_macros::Entity`.
pub trait Entity: Read + Write + NumBytes {
    fn class_name() -> &'static str;
}

/// Persistent identity assigned by the store on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    pub cluster: u32,
    pub position: u64,
}

impl RecordId {
    pub fn new(cluster: u32, position: u64) -> Self {
        Self { cluster, position }
    }

    /// Big endian so that keys sort by position.
    pub(crate) fn key(&self) -> Vec<u8> {
        self.position.to_be_bytes().to_vec()
    }

    pub(crate) fn from_key(cluster: u32, key: &[u8]) -> Result<Self, StoreError> {
        let raw: [u8; 8] = key
            .try_into()
            .map_err(|_| StoreError::InternalError(format!("malformed record key in cluster {}", cluster)))?;
        Ok(Self::new(cluster, u64::from_be_bytes(raw)))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.cluster, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_display() {
        assert_eq!(RecordId::new(3, 17).to_string(), "#3:17");
    }

    #[test]
    fn record_id_key_order() {
        let a = RecordId::new(1, 255);
        let b = RecordId::new(1, 256);
        assert!(a.key() < b.key());
        assert_eq!(RecordId::from_key(1, &b.key()).unwrap(), b);
        assert!(RecordId::from_key(1, &[0, 1]).is_err());
    }
}
