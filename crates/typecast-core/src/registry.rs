//! Append-only registries with snapshot reads
//!
//! Readers load an `Arc` snapshot without locking. Writers are serialized by
//! a mutex, copy the current snapshot, append, and publish the new snapshot
//! in one store, so a reader sees either the old or the new entry list and
//! never a partial append. Entries are never removed or replaced.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

/// Immutable view of a registry at one point in time
pub type Snapshot<K, V> = Arc<HashMap<K, Vec<Arc<V>>>>;

pub struct AppendOnlyRegistry<K, V> {
    entries: ArcSwap<HashMap<K, Vec<Arc<V>>>>,
    write_lock: Mutex<()>,
}

impl<K, V> AppendOnlyRegistry<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Append an entry under `key`, after every entry already there
    pub fn append(&self, key: K, entry: V) {
        // poisoning cannot leave a half-published snapshot
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let current = self.entries.load_full();
        let mut next: HashMap<K, Vec<Arc<V>>> = (*current).clone();
        next.entry(key).or_default().push(Arc::new(entry));
        self.entries.store(Arc::new(next));
    }

    /// Entries registered under `key`, in registration order
    pub fn get(&self, key: &K) -> Vec<Arc<V>> {
        self.entries.load().get(key).cloned().unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot<K, V> {
        self.entries.load_full()
    }

    /// Total number of entries across all keys
    pub fn len(&self) -> usize {
        self.entries.load().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for AppendOnlyRegistry<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for AppendOnlyRegistry<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppendOnlyRegistry")
            .field("keys", &self.entries.load().len())
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_append_preserves_order() {
        let registry: AppendOnlyRegistry<&str, u32> = AppendOnlyRegistry::new();
        registry.append("a", 1);
        registry.append("a", 2);
        registry.append("b", 3);

        let values: Vec<u32> = registry.get(&"a").iter().map(|v| **v).collect();
        assert_eq!(values, vec![1, 2]);
        assert_eq!(registry.len(), 3);
        assert!(registry.get(&"missing").is_empty());
    }

    #[test]
    fn test_snapshot_is_stable_across_appends() {
        let registry: AppendOnlyRegistry<&str, u32> = AppendOnlyRegistry::new();
        registry.append("a", 1);
        let before = registry.snapshot();
        registry.append("a", 2);

        assert_eq!(before.get("a").map(Vec::len), Some(1));
        assert_eq!(registry.get(&"a").len(), 2);
    }

    #[test]
    fn test_concurrent_appends_are_all_kept() {
        let registry: Arc<AppendOnlyRegistry<u8, usize>> = Arc::new(AppendOnlyRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..50 {
                        registry.append((t % 2) as u8, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 400);
    }
}
