use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::view::ItemView;

/// Identifier of an item in the store.
///
/// Store-assigned ids start at 1. Path parameters may carry any integer;
/// only routes that declare a lower bound reject values below 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// The id given to the first item of an empty store.
    pub const FIRST: ItemId = ItemId(1);

    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Accept `raw` only if it is a positive integer.
    pub fn positive(raw: i64) -> TypeResult<Self> {
        if raw < 1 {
            return Err(TypeError::OutOfRange { min: 1, actual: raw });
        }
        Ok(Self(raw))
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// The id following this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Store-owned item record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description,
        }
    }

    /// Convert to the external response shape. Total and lossless.
    pub fn to_view(&self) -> ItemView {
        ItemView {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Overwrite fields from `patch`.
    ///
    /// Only fields carrying a non-empty string replace the current value;
    /// `None` and `Some("")` leave the field untouched.
    pub fn apply(&mut self, patch: &ItemPatch) -> &mut Self {
        if let Some(name) = patch.name.as_deref().filter(|s| !s.is_empty()) {
            self.name = name.to_owned();
        }
        if let Some(description) = patch.description.as_deref().filter(|s| !s.is_empty()) {
            self.description = Some(description.to_owned());
        }
        self
    }
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        item.to_view()
    }
}

/// Fields of an item that does not have an id yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

/// Partial update. See [`Item::apply`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ItemPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            name: None,
            description: Some(description.into()),
        }
    }

    /// Returns `true` if applying this patch cannot change any item.
    pub fn is_noop(&self) -> bool {
        self.name.as_deref().map_or(true, str::is_empty)
            && self.description.as_deref().map_or(true, str::is_empty)
    }
}
