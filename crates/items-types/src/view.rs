use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::item::{ItemId, ItemPatch, NewItem};

/// External representation of an item, returned by every item route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of a create request.
///
/// An `id` may be present (for example when a client posts back an
/// [`ItemView`]) but is never used: the store assigns ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateItem {
    /// Check constraints serde cannot express.
    pub fn validate(&self) -> TypeResult<()> {
        if self.name.is_empty() {
            return Err(TypeError::EmptyField("name"));
        }
        Ok(())
    }

    pub fn into_new_item(self) -> NewItem {
        NewItem::new(self.name, self.description)
    }
}

/// Body of an update request. The path id is authoritative; a body `id`
/// is accepted and ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateItem {
    pub fn into_patch(self) -> ItemPatch {
        ItemPatch {
            name: self.name,
            description: self.description,
        }
    }
}
