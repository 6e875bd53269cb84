//! A pickable inventory item supplied by the catalog.
//!
//! Items are immutable once the catalog hands them out; the engine only ever clones and compares
//! them. Pick matching is done on [`ItemId`], never on the display name.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an item is drawn on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visual {
    /// A single glyph, e.g. an emoji.
    Icon(String),
    /// A reference to an uploaded picture.
    Image(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub visual: Visual,
}

impl Item {
    /// Creates a new Item drawn with an icon glyph.
    ///
    /// # Arguments
    /// * `id` - Stable identifier
    /// * `name` - Display name
    /// * `category` - Shelf category
    /// * `icon` - Glyph shown on the shelf
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId(id.into()),
            name: name.into(),
            category: category.into(),
            visual: Visual::Icon(icon.into()),
        }
    }
}
