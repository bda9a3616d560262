use crate::classifier::IdentifierKind;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Composite in-flight key, displayed as `payload:<id>` / `flight:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey {
    pub kind: IdentifierKind,
    pub id: String,
}

impl LookupKey {
    pub fn new(kind: IdentifierKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn payload(id: impl Into<String>) -> Self {
        Self::new(IdentifierKind::Payload, id)
    }

    pub fn flight(id: impl Into<String>) -> Self {
        Self::new(IdentifierKind::Flight, id)
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Outcome of committing a finished lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    Inserted,
    Updated,
    /// Same label was already cached; nothing observable changed.
    Unchanged,
    /// Lookup failed; only the in-flight marker was cleared.
    Cleared,
}

impl CacheWrite {
    #[must_use]
    pub const fn changed_label(self) -> bool {
        matches!(self, Self::Inserted | Self::Updated)
    }
}

/// Session-scoped labels for both identifier kinds plus the set of lookups
/// currently outstanding. Entries are never evicted.
#[derive(Debug, Default, Clone)]
pub struct ResolutionCache {
    payloads: HashMap<String, String>,
    flights: HashMap<String, String>,
    in_flight: HashSet<LookupKey>,
}

impl ResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn labels(&self, kind: IdentifierKind) -> &HashMap<String, String> {
        match kind {
            IdentifierKind::Payload => &self.payloads,
            IdentifierKind::Flight => &self.flights,
        }
    }

    fn labels_mut(&mut self, kind: IdentifierKind) -> &mut HashMap<String, String> {
        match kind {
            IdentifierKind::Payload => &mut self.payloads,
            IdentifierKind::Flight => &mut self.flights,
        }
    }

    #[must_use]
    pub fn label(&self, kind: IdentifierKind, id: &str) -> Option<&str> {
        self.labels(kind).get(id).map(String::as_str)
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &LookupKey) -> bool {
        self.in_flight.contains(key)
    }

    #[must_use]
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len() + self.flights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty() && self.flights.is_empty()
    }

    /// Marks `key` in flight unless it is already cached or outstanding.
    /// Returns `true` when the caller now owns the single lookup for it.
    pub fn try_begin(&mut self, key: &LookupKey) -> bool {
        if self.labels(key.kind).contains_key(&key.id) || self.in_flight.contains(key) {
            return false;
        }
        self.in_flight.insert(key.clone())
    }

    /// Records the result of the lookup for `key` and clears its marker.
    /// `None` means the lookup failed and the cache stays untouched.
    pub fn complete(&mut self, key: &LookupKey, label: Option<String>) -> CacheWrite {
        self.in_flight.remove(key);
        let Some(label) = label else {
            return CacheWrite::Cleared;
        };
        let labels = self.labels_mut(key.kind);
        let write = match labels.get(&key.id) {
            Some(existing) if *existing == label => return CacheWrite::Unchanged,
            Some(_) => CacheWrite::Updated,
            None => CacheWrite::Inserted,
        };
        labels.insert(key.id.clone(), label);
        write
    }
}
