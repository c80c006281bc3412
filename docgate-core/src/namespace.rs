//! Separation of client collections from names the storage engine keeps for itself.

/// Marker that identifies engine-owned collections unless configured otherwise.
pub const DEFAULT_RESERVED_MARKER: &str = "system";

/// Decides which collection names belong to the storage engine.
///
/// A name is reserved when it contains the marker anywhere, so `system.indexes` and
/// `system.views` are protected. The rule is a substring match: a client collection such
/// as `filesystems` is reserved too, which hides it from listings and keeps it across
/// startup resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNamespaces {
    marker: String,
}

impl ReservedNamespaces {
    pub fn new(marker: impl Into<String>) -> Self {
        Self { marker: marker.into() }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Returns `true` if the named collection is engine-owned.
    pub fn is_reserved(&self, collection: &str) -> bool {
        !self.marker.is_empty() && collection.contains(&self.marker)
    }
}

impl Default for ReservedNamespaces {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_marker_matches_engine_collections() {
        let namespaces = ReservedNamespaces::default();

        assert!(namespaces.is_reserved("system.indexes"));
        assert!(namespaces.is_reserved("system.profile"));
        assert!(!namespaces.is_reserved("widgets"));
        assert!(!namespaces.is_reserved("System"));
    }

    #[test]
    fn substring_anywhere_is_reserved() {
        let namespaces = ReservedNamespaces::default();

        assert!(namespaces.is_reserved("filesystems"));
        assert!(namespaces.is_reserved("my_system"));
    }

    #[test]
    fn custom_and_empty_markers() {
        let namespaces = ReservedNamespaces::new("_internal");
        assert!(namespaces.is_reserved("_internal.locks"));
        assert!(!namespaces.is_reserved("system.indexes"));

        let none = ReservedNamespaces::new("");
        assert!(!none.is_reserved("system.indexes"));
    }
}
