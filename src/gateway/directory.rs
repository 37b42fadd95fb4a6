//! Identity cross-referencing against the gateway subscriber directory.

use std::collections::{HashMap, HashSet};

/// A fetched view of the gateway's subscriber directory, keyed for
/// resolution.
///
/// The gateway addresses subscribers by chain-namespaced identifiers
/// (`namespace:chainId:address`) while the internal subscriber registry
/// stores bare addresses. This type indexes a fetched directory by the
/// address portion after the last `:` so internal recipients resolve to
/// the full external form.
///
/// A directory reflects the gateway state at dispatch time; it is
/// rebuilt from a live fetch for every dispatch and never cached across
/// events.
///
/// # Example
///
/// ```
/// use notify_relay::gateway::Directory;
///
/// let directory = Directory::from_entries([
///     "eip155:1:0xABC".to_string(),
///     "eip155:1:0xDEF".to_string(),
/// ]);
///
/// let resolved = directory.resolve(&["0xABC".to_string(), "0xZZZ".to_string()]);
/// assert_eq!(resolved, vec!["eip155:1:0xABC".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Directory {
    by_suffix: HashMap<String, String>,
}

impl Directory {
    /// Builds a directory from fetched external-form identifiers.
    ///
    /// Each entry is keyed by its unprefixed suffix; entries without a
    /// namespace separator key on the whole string. When two entries
    /// share a suffix the later one wins. Entries with an empty suffix
    /// (trailing `:`) are skipped.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut by_suffix = HashMap::new();

        for entry in entries {
            let Some(suffix) = entry.rsplit(':').next() else {
                continue;
            };
            if suffix.is_empty() {
                continue;
            }
            let suffix = suffix.to_string();
            by_suffix.insert(suffix, entry);
        }

        Self { by_suffix }
    }

    /// Returns the number of resolvable directory entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_suffix.len()
    }

    /// Returns true if the directory holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_suffix.is_empty()
    }

    /// Resolves one internal recipient to its external form.
    #[must_use]
    pub fn resolve_one(&self, internal: &str) -> Option<&str> {
        self.by_suffix.get(internal).map(String::as_str)
    }

    /// Resolves internal recipients to their external forms.
    ///
    /// Recipients absent from the directory are silently dropped; this
    /// is indistinguishable from an opt-out and is never an error.
    /// Output preserves first-occurrence input order and repeated
    /// internal recipients resolve once.
    #[must_use]
    pub fn resolve(&self, internal: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for recipient in internal {
            if !seen.insert(recipient.as_str()) {
                continue;
            }
            if let Some(external) = self.by_suffix.get(recipient.as_str()) {
                resolved.push(external.clone());
            }
        }

        resolved
    }
}
