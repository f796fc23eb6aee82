use lostfound_core::{CandidateSource, Error, Item, ItemDraft, ItemId, Polarity, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory report store.
///
/// Ids start at 1 and are never reused, even after removal. Readers get
/// cloned snapshots, so a search never observes a half-applied insert.
#[derive(Debug)]
pub struct ItemStore {
    items: RwLock<BTreeMap<ItemId, Item>>,
    next_id: AtomicU64,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Rebuild a store from persisted items. `next_id` is raised past the
    /// largest id present.
    pub fn from_items(items: Vec<Item>, next_id: u64) -> Self {
        let max_id = items.iter().map(|item| item.id.0).max().unwrap_or(0);
        let map = items.into_iter().map(|item| (item.id, item)).collect();
        Self {
            items: RwLock::new(map),
            next_id: AtomicU64::new(next_id.max(max_id + 1)),
        }
    }

    /// Store a new report and return its id
    pub fn insert(&self, draft: ItemDraft) -> ItemId {
        let id = ItemId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.items.write().insert(id, draft.into_item(id));
        tracing::debug!("stored item {}", id);
        id
    }

    pub fn get(&self, id: ItemId) -> Option<Item> {
        self.items.read().get(&id).cloned()
    }

    pub fn remove(&self, id: ItemId) -> Result<Item> {
        self.items
            .write()
            .remove(&id)
            .ok_or(Error::ItemNotFound(id.0))
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// All items, ordered by id
    pub fn items(&self) -> Vec<Item> {
        self.items.read().values().cloned().collect()
    }

    /// Id the next insert will receive
    pub fn next_id(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }
}

impl CandidateSource for ItemStore {
    fn candidates(&self, polarity: Polarity) -> Vec<Item> {
        self.items
            .read()
            .values()
            .filter(|item| item.polarity == polarity)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lostfound_core::{Category, OwnerId, TextVector};
    use std::sync::Arc;

    fn draft(polarity: Polarity, description: &str) -> ItemDraft {
        ItemDraft {
            owner: OwnerId(1),
            polarity,
            category: Category::Other,
            description: description.to_string(),
            image_ref: None,
            visual: None,
            text: TextVector::from_counts(vec![(description.to_string(), 1)]),
            contact: "front desk".to_string(),
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = ItemStore::new();
        let a = store.insert(draft(Polarity::Lost, "umbrella"));
        let b = store.insert(draft(Polarity::Found, "wallet"));
        assert_eq!(a, ItemId(1));
        assert_eq!(b, ItemId(2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b).unwrap().description, "wallet");
    }

    #[test]
    fn test_remove_does_not_reuse_ids() {
        let store = ItemStore::new();
        let a = store.insert(draft(Polarity::Lost, "umbrella"));
        store.remove(a).unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.remove(a), Err(Error::ItemNotFound(1))));

        let b = store.insert(draft(Polarity::Lost, "umbrella"));
        assert_eq!(b, ItemId(2));
    }

    #[test]
    fn test_candidates_filtered_by_polarity() {
        let store = ItemStore::new();
        store.insert(draft(Polarity::Found, "keys"));
        store.insert(draft(Polarity::Lost, "laptop"));
        store.insert(draft(Polarity::Found, "mouse"));

        let found = store.candidates(Polarity::Found);
        let ids: Vec<u64> = found.iter().map(|item| item.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.candidates(Polarity::Lost).len(), 1);
    }

    #[test]
    fn test_from_items_keeps_id_sequence() {
        let store = ItemStore::new();
        store.insert(draft(Polarity::Found, "keys"));
        store.insert(draft(Polarity::Found, "wallet"));
        let restored = ItemStore::from_items(store.items(), 1);
        assert_eq!(restored.next_id(), 3);
        assert_eq!(restored.insert(draft(Polarity::Lost, "phone")), ItemId(3));
    }

    #[test]
    fn test_concurrent_inserts() {
        let store = Arc::new(ItemStore::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.insert(draft(Polarity::Found, "bottle"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 100);
        assert_eq!(store.next_id(), 101);
    }
}
