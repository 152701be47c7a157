//! Keyed observer registries owned by a single volume or energy instance.

use std::{collections::HashMap, fmt};

/// Observers registered under string keys.
pub(crate) struct Registry<M: ?Sized> {
    entries: HashMap<String, Box<M>>,
}

impl<M: ?Sized> Default for Registry<M> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<M: ?Sized> Registry<M> {
    /// Stores the observer, replacing any previous one under the same key.
    pub(crate) fn register(&mut self, id: impl Into<String>, monitor: Box<M>) -> bool {
        self.entries.insert(id.into(), monitor).is_some()
    }

    /// Drops the observer stored under the key, if any.
    pub(crate) fn unregister(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub(crate) fn for_each(&mut self, mut notify: impl FnMut(&mut M)) {
        for monitor in self.entries.values_mut() {
            notify(monitor.as_mut());
        }
    }
}

impl<M: ?Sized> fmt::Debug for Registry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Registry").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bampf_core::{HealthMonitor, HealthReading};

    #[derive(Default)]
    struct Count(u32);

    impl HealthMonitor for Count {
        fn health_updated(&mut self, _reading: HealthReading) {
            self.0 += 1;
        }
    }

    #[test]
    fn reregistering_replaces_the_previous_observer() {
        let mut registry: Registry<dyn HealthMonitor> = Registry::default();

        assert!(!registry.register("hud", Box::new(Count::default())));
        assert!(registry.register("hud", Box::new(Count::default())));

        let mut calls = 0;
        registry.for_each(|monitor| {
            monitor.health_updated(HealthReading::new(1, 8, 64));
            calls += 1;
        });
        assert_eq!(calls, 1);
        assert_eq!(format!("{registry:?}"), "Registry { keys: [\"hud\"] }");
    }

    #[test]
    fn unregistering_unknown_keys_is_harmless() {
        let mut registry: Registry<dyn HealthMonitor> = Registry::default();
        let _ = registry.register("minimap", Box::new(Count::default()));

        assert!(!registry.unregister("hud"));
        assert!(registry.unregister("minimap"));
        assert_eq!(format!("{registry:?}"), "Registry { keys: [] }");
    }
}
