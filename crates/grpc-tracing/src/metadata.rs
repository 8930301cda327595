use std::collections::HashMap;

use bytes::Bytes;

/// A multimap of call metadata entries.
///
/// Keys are normalized to lowercase, following gRPC metadata semantics.
/// Values are binary-safe; encoding binary-valued entries for the wire
/// (base64 for `-bin` keys) is the transport's responsibility.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    entries: HashMap<String, Vec<Bytes>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the entry under `key`, preserving existing values.
    pub fn append(&mut self, key: &str, value: impl Into<Bytes>) {
        self.entries
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Returns the first value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Bytes> {
        self.entries.get(&key.to_ascii_lowercase())?.first()
    }

    /// Returns all values under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[Bytes] {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
