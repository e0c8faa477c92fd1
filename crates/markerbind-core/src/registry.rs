//! Instance registry — one live object per marker identity.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::tracking::Pose;

/// A live visual object anchored to a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveInstance<H> {
    /// Scene handle of the object.
    pub handle: H,
    /// Whether the object is currently shown.
    pub active: bool,
    /// Last pose pushed to the scene.
    pub anchor: Pose,
}

/// Marker identity → live instance. Keys are unique; every access is an
/// explicit presence check.
#[derive(Debug, Clone)]
pub struct InstanceRegistry<H> {
    entries: HashMap<String, ActiveInstance<H>>,
}

impl<H> Default for InstanceRegistry<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> InstanceRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ActiveInstance<H>> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ActiveInstance<H>> {
        self.entries.get_mut(name)
    }

    /// Insert only when `name` is vacant. On collision the rejected instance
    /// is handed back untouched.
    pub fn try_insert(
        &mut self,
        name: &str,
        instance: ActiveInstance<H>,
    ) -> Result<&mut ActiveInstance<H>, ActiveInstance<H>> {
        match self.entries.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(instance),
            Entry::Vacant(slot) => Ok(slot.insert(instance)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ActiveInstance<H>> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActiveInstance<H>)> {
        self.entries.iter().map(|(name, instance)| (name.as_str(), instance))
    }

    /// Remove and yield every entry.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, ActiveInstance<H>)> + '_ {
        self.entries.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(handle: u32) -> ActiveInstance<u32> {
        ActiveInstance {
            handle,
            active: true,
            anchor: Pose::IDENTITY,
        }
    }

    #[test]
    fn insert_rejects_occupied_key() {
        let mut registry = InstanceRegistry::new();
        assert!(registry.try_insert("cat", instance(1)).is_ok());

        let rejected = registry.try_insert("cat", instance(2)).unwrap_err();
        assert_eq!(rejected.handle, 2);
        assert_eq!(registry.get("cat").map(|i| i.handle), Some(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_frees_the_key() {
        let mut registry = InstanceRegistry::new();
        registry.try_insert("cat", instance(1)).unwrap();
        assert_eq!(registry.remove("cat").map(|i| i.handle), Some(1));
        assert!(registry.remove("cat").is_none());
        assert!(registry.is_empty());
        assert!(registry.try_insert("cat", instance(2)).is_ok());
    }

    #[test]
    fn drain_empties_registry() {
        let mut registry = InstanceRegistry::new();
        registry.try_insert("cat", instance(1)).unwrap();
        registry.try_insert("dog", instance(2)).unwrap();

        let mut handles: Vec<u32> = registry.drain().map(|(_, i)| i.handle).collect();
        handles.sort_unstable();
        assert_eq!(handles, vec![1, 2]);
        assert!(registry.is_empty());
    }
}
