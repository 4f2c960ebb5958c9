use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::item::ItemId;

/// Literal prefix every action query value must carry.
pub const ACTION_PREFIX: &str = "do_";

/// Action that can be requested on an item through the action route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAction {
    View,
    Edit,
}

impl ItemAction {
    /// Parse a raw query value such as `do_view`.
    ///
    /// The value must start with [`ACTION_PREFIX`]; a missing prefix is
    /// treated like any other unrecognised value. The error carries the
    /// raw input unchanged.
    pub fn parse(raw: &str) -> TypeResult<Self> {
        match raw.strip_prefix(ACTION_PREFIX) {
            Some("view") => Ok(Self::View),
            Some("edit") => Ok(Self::Edit),
            _ => Err(TypeError::UnknownAction(raw.to_owned())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response payload of the action route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub action: ItemAction,
    pub item_id: ItemId,
}

impl ActionResult {
    pub fn new(action: ItemAction, item_id: ItemId) -> Self {
        Self { action, item_id }
    }
}
