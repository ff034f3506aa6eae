//! Peer alias resolution.

use std::collections::HashMap;

/// Immutable mapping from peer public keys to human-readable names.
///
/// Built once from configuration before the poller starts and never
/// mutated afterward, so lookups are safe from any task without
/// synchronization.
#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }

    /// Returns the configured alias for `public_key`, or `""` if the key
    /// has no alias entry.
    pub fn resolve(&self, public_key: &str) -> &str {
        self.aliases
            .get(public_key)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
