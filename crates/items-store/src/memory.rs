use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use items_types::{Item, ItemId, ItemPatch, NewItem};

use crate::error::{StoreError, StoreResult};
use crate::seed::seed_items;
use crate::traits::ItemStore;

/// In-memory, `Vec`-backed item store.
///
/// Items are kept in insertion order behind a single `RwLock`. Reads share
/// the lock; every mutation, including id assignment in [`create`], holds
/// the write lock for its whole duration. Items are cloned on the way out.
///
/// [`create`]: ItemStore::create
pub struct InMemoryItemStore {
    items: RwLock<Vec<Item>>,
}

impl InMemoryItemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a store holding the default seed items.
    pub fn seeded() -> Self {
        Self::with_items(seed_items())
    }

    /// Create a store holding `items` in the given order.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Number of items currently stored.
    pub fn len(&self) -> usize {
        self.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all items.
    pub fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Item>>> {
        self.items.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Item>>> {
        self.items.write().map_err(|_| StoreError::Poisoned)
    }
}

fn max_id_plus_one(items: &[Item]) -> ItemId {
    items
        .iter()
        .map(|item| item.id)
        .max()
        .map_or(ItemId::FIRST, ItemId::next)
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore for InMemoryItemStore {
    fn list(&self) -> StoreResult<Vec<Item>> {
        Ok(self.read()?.clone())
    }

    fn get(&self, id: ItemId) -> StoreResult<Item> {
        self.read()?
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn append(&self, item: Item) -> StoreResult<()> {
        tracing::debug!(id = %item.id, "appending item");
        self.write()?.push(item);
        Ok(())
    }

    fn update(&self, id: ItemId, patch: &ItemPatch) -> StoreResult<Item> {
        if patch.is_noop() {
            return self.get(id);
        }
        let mut items = self.write()?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;
        item.apply(patch);
        tracing::debug!(%id, "updated item");
        Ok(item.clone())
    }

    fn remove(&self, id: ItemId) -> StoreResult<Item> {
        let mut items = self.write()?;
        let pos = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;
        tracing::debug!(%id, "removing item");
        // `Vec::remove` shifts the tail left, keeping relative order.
        Ok(items.remove(pos))
    }

    fn next_id(&self) -> StoreResult<ItemId> {
        Ok(max_id_plus_one(&self.read()?))
    }

    fn create(&self, new_item: NewItem) -> StoreResult<Item> {
        let mut items = self.write()?;
        let item = new_item.into_item(max_id_plus_one(&items));
        tracing::debug!(id = %item.id, "creating item");
        items.push(item.clone());
        Ok(item)
    }
}

impl std::fmt::Debug for InMemoryItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryItemStore")
            .field("item_count", &self.len())
            .finish()
    }
}
