//! # Catalog Provider
//!
//! The engine reads the pickable items through [`CatalogProvider`] and never owns them. Editing
//! the catalog belongs to the admin side; [`StaticCatalog`] is the in-process implementation it
//! writes to.
use crate::model::{Item, ItemId, Visual};
use serde::Deserialize;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Hot Food",
    "Coffee",
    "Fresh Food",
    "Bread",
    "Drinks",
    "Snacks",
    "Supplies",
    "Other",
];

/// Source of pickable items.
pub trait CatalogProvider: Send + Sync {
    fn list_items(&self) -> Vec<Item>;

    fn list_categories(&self) -> Vec<String>;

    fn is_empty(&self) -> bool {
        self.list_items().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Duplicate item id: {0}")]
    DuplicateId(ItemId),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    items: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
struct ItemEntry {
    id: String,
    name: String,
    #[serde(default = "default_category")]
    category: String,
    icon: Option<String>,
    image: Option<String>,
}

fn default_category() -> String {
    "Other".to_string()
}

impl From<ItemEntry> for Item {
    fn from(entry: ItemEntry) -> Self {
        let visual = match (entry.image, entry.icon) {
            (Some(image), _) => Visual::Image(image),
            (None, Some(icon)) => Visual::Icon(icon),
            (None, None) => Visual::Icon("📦".to_string()),
        };
        Item {
            id: ItemId(entry.id),
            name: entry.name,
            category: entry.category,
            visual,
        }
    }
}

#[derive(Debug, Default)]
struct CatalogData {
    items: Vec<Item>,
    categories: Vec<String>,
}

/// In-memory catalog. Interior mutability lets the admin side replace items between matches
/// while the engine holds a shared handle.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    data: RwLock<CatalogData>,
}

impl StaticCatalog {
    pub fn new(items: Vec<Item>, categories: Vec<String>) -> Self {
        Self {
            data: RwLock::new(CatalogData { items, categories }),
        }
    }

    /// An empty catalog; a match cannot start against it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock convenience-store catalog.
    pub fn convenience_store() -> Self {
        let items = vec![
            Item::new("p1", "Tea Egg", "Hot Food", "🥚"),
            Item::new("p2", "Americano", "Coffee", "☕"),
            Item::new("p3", "Latte", "Coffee", "🥛"),
            Item::new("p4", "Bento", "Fresh Food", "🍱"),
            Item::new("p5", "Tuna Onigiri", "Fresh Food", "🍙"),
            Item::new("p6", "Pork Floss Bun", "Bread", "🥐"),
            Item::new("p7", "Green Tea", "Drinks", "🍵"),
            Item::new("p8", "Mineral Water", "Drinks", "💧"),
        ];
        let categories = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        Self::new(items, categories)
    }

    /// Parses a catalog from TOML.
    ///
    /// ```toml
    /// categories = ["Coffee"]
    ///
    /// [[items]]
    /// id = "p2"
    /// name = "Americano"
    /// category = "Coffee"
    /// icon = "☕"
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        let mut items: Vec<Item> = Vec::with_capacity(file.items.len());
        for entry in file.items {
            let item = Item::from(entry);
            if items.iter().any(|existing| existing.id == item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            items.push(item);
        }
        info!(items = items.len(), "Catalog loaded");
        Ok(Self::new(items, file.categories))
    }

    /// Replaces the item list. Takes effect on the next spawn.
    pub fn replace_items(&self, items: Vec<Item>) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.items = items;
    }

    /// Distinct categories of the current items, in first-seen order. This is what the picking
    /// shelf offers as tabs, as opposed to the configured category list.
    pub fn shelf_categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in self.list_items() {
            if !seen.contains(&item.category) {
                seen.push(item.category);
            }
        }
        seen
    }
}

impl CatalogProvider for StaticCatalog {
    fn list_items(&self) -> Vec<Item> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .clone()
    }

    fn list_categories(&self) -> Vec<String> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .categories
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convenience_store_catalog() {
        let catalog = StaticCatalog::convenience_store();
        assert_eq!(catalog.list_items().len(), 8);
        assert_eq!(catalog.list_categories().len(), 8);
        assert_eq!(
            catalog.shelf_categories(),
            vec!["Hot Food", "Coffee", "Fresh Food", "Bread", "Drinks"]
        );
    }

    #[test]
    fn test_from_toml_str() {
        let raw = r#"
            categories = ["Coffee", "Snacks"]

            [[items]]
            id = "c1"
            name = "Flat White"
            category = "Coffee"
            icon = "☕"

            [[items]]
            id = "s1"
            name = "Crisps"
            image = "crisps.webp"
        "#;
        let catalog = StaticCatalog::from_toml_str(raw).unwrap();
        let items = catalog.list_items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].visual, Visual::Icon("☕".into()));
        assert_eq!(items[1].category, "Other");
        assert_eq!(items[1].visual, Visual::Image("crisps.webp".into()));
        assert_eq!(catalog.list_categories(), vec!["Coffee", "Snacks"]);
    }

    #[test]
    fn test_from_toml_str_rejects_duplicate_ids() {
        let raw = r#"
            [[items]]
            id = "c1"
            name = "Flat White"

            [[items]]
            id = "c1"
            name = "Cortado"
        "#;
        let result = StaticCatalog::from_toml_str(raw);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.0 == "c1"));
    }

    #[test]
    fn test_replace_items() {
        let catalog = StaticCatalog::convenience_store();
        assert!(!catalog.is_empty());
        catalog.replace_items(Vec::new());
        assert!(catalog.is_empty());
        assert!(catalog.shelf_categories().is_empty());
    }

    #[test]
    fn test_poisoned_lock_keeps_catalog() {
        let catalog = std::sync::Arc::new(StaticCatalog::convenience_store());
        let writer = catalog.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.data.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(catalog.data.is_poisoned());

        assert_eq!(catalog.list_items().len(), 8);
        assert_eq!(catalog.list_categories().len(), 8);

        catalog.replace_items(vec![Item::new("x1", "Oolong", "Drinks", "🍵")]);
        assert_eq!(catalog.list_items().len(), 1);
        assert_eq!(catalog.shelf_categories(), vec!["Drinks"]);
    }
}
