use crate::{prelude::HashMap, surface::MarkerHandle};

/// Maps surface-assigned marker handles to caller-supplied public ids and
/// back.
///
/// Every marker apply pass starts a new generation with `clear`. Handles
/// from an earlier generation are simply absent, so callbacks that still
/// carry them resolve to `None`.
#[derive(Debug, Default, Clone)]
pub struct MarkerRegistry {
    ids: HashMap<MarkerHandle, String>,
    by_public_id: HashMap<String, MarkerHandle>,
    generation: u64,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placed marker. Re-registering a handle overwrites it; when
    /// two markers share a public id, `handle_for` returns the later one.
    pub fn register(&mut self, handle: MarkerHandle, public_id: impl Into<String>) {
        let public_id = public_id.into();
        if let Some(previous) = self.ids.insert(handle.clone(), public_id.clone()) {
            if self.by_public_id.get(&previous) == Some(&handle) {
                self.by_public_id.remove(&previous);
            }
        }
        self.by_public_id.insert(public_id, handle);
    }

    pub fn resolve(&self, handle: &MarkerHandle) -> Option<&str> {
        self.ids.get(handle).map(String::as_str)
    }

    /// Handle of the marker currently placed for `public_id`
    pub fn handle_for(&self, public_id: &str) -> Option<&MarkerHandle> {
        self.by_public_id.get(public_id)
    }

    /// Drop every entry and start the next generation
    pub fn clear(&mut self) {
        self.ids.clear();
        self.by_public_id.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn handles(&self) -> impl Iterator<Item = &MarkerHandle> {
        self.ids.keys()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = MarkerRegistry::new();
        registry.register(MarkerHandle::new("m0"), "charger-1");
        registry.register(MarkerHandle::new("m1"), "charger-2");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve(&MarkerHandle::new("m0")), Some("charger-1"));
        assert_eq!(registry.resolve(&MarkerHandle::new("m1")), Some("charger-2"));
        assert_eq!(registry.resolve(&MarkerHandle::new("m2")), None);
    }

    #[test]
    fn test_clear_starts_new_generation() {
        let mut registry = MarkerRegistry::new();
        registry.register(MarkerHandle::new("m0"), "a");
        assert_eq!(registry.generation(), 0);

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.generation(), 1);

        // Stale handle from generation 0
        assert_eq!(registry.resolve(&MarkerHandle::new("m0")), None);
    }

    #[test]
    fn test_reregister_overwrites() {
        let mut registry = MarkerRegistry::new();
        registry.register(MarkerHandle::new("m0"), "a");
        registry.register(MarkerHandle::new("m0"), "b");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve(&MarkerHandle::new("m0")), Some("b"));
        assert_eq!(registry.handle_for("a"), None);
        assert_eq!(registry.handle_for("b"), Some(&MarkerHandle::new("m0")));
    }

    #[test]
    fn test_handle_for_public_id() {
        let mut registry = MarkerRegistry::new();
        registry.register(MarkerHandle::new("m0"), "charger-1");
        registry.register(MarkerHandle::new("m1"), "charger-2");

        assert_eq!(registry.handle_for("charger-2"), Some(&MarkerHandle::new("m1")));
        assert_eq!(registry.handle_for("charger-3"), None);

        registry.clear();
        assert_eq!(registry.handle_for("charger-1"), None);
    }
}
