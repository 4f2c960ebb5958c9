use items_types::{Item, ItemId, ItemPatch, NewItem};

use crate::error::StoreResult;

/// Ordered, id-addressed item collection.
///
/// All implementations must satisfy these invariants:
/// - Ids are unique at any point in time.
/// - `list` returns items in insertion order.
/// - Lookups are by id value, never by position.
/// - Removing an item keeps the relative order of the others.
pub trait ItemStore: Send + Sync {
    /// All items in insertion order.
    fn list(&self) -> StoreResult<Vec<Item>>;

    /// The item with `id`, or `StoreError::NotFound`.
    fn get(&self, id: ItemId) -> StoreResult<Item>;

    /// Add `item` at the end. The caller must have assigned a fresh id.
    fn append(&self, item: Item) -> StoreResult<()>;

    /// Overwrite the non-empty fields of `patch` on the item with `id` and
    /// return the updated item.
    fn update(&self, id: ItemId, patch: &ItemPatch) -> StoreResult<Item>;

    /// Remove the item with `id` and return it.
    fn remove(&self, id: ItemId) -> StoreResult<Item>;

    /// `max(existing ids) + 1`, or `1` when the store is empty.
    fn next_id(&self) -> StoreResult<ItemId>;

    /// Assign the next id to `new_item`, append it, and return the record.
    ///
    /// The default implementation calls `next_id()` then `append()`, which
    /// can hand out the same id twice under concurrent callers. Backends
    /// that serve concurrent requests should override it to do both steps
    /// under one lock.
    fn create(&self, new_item: NewItem) -> StoreResult<Item> {
        let item = new_item.into_item(self.next_id()?);
        self.append(item.clone())?;
        Ok(item)
    }
}
