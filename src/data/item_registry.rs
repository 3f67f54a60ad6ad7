use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::item_def::{ItemTemplate, RawItemDefinition};
use crate::error::{ContentKind, LoadError};

/// Registry for all item templates
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: HashMap<String, ItemTemplate>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Load all item templates from `<data_dir>/items/*.toml`.
    ///
    /// Each file is a table keyed by item id. An id defined twice, in the
    /// same file or across files, is rejected.
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), LoadError> {
        let items_dir = data_dir.join("items");

        if !items_dir.exists() {
            warn!("Items directory does not exist: {:?}", items_dir);
            return Ok(());
        }

        for path in super::collect_files(&items_dir, "toml", false)? {
            let content = super::read_file(&path)?;

            // Parse as table of items
            let table: toml::Table = super::parse_toml(&path, &content)?;

            for (id, value) in table {
                let raw: RawItemDefinition = value.try_into().map_err(|source| LoadError::Toml {
                    path: path.clone(),
                    source,
                })?;
                self.insert(ItemTemplate::from_raw(&id, &raw))?;
                debug!("Loaded item: {} from {:?}", id, path);
            }
        }

        info!("Loaded {} item templates", self.items.len());

        Ok(())
    }

    /// Register a single template; ids must be unique.
    pub fn insert(&mut self, item: ItemTemplate) -> Result<(), LoadError> {
        if self.items.contains_key(&item.id) {
            return Err(LoadError::DuplicateId {
                kind: ContentKind::Item,
                id: item.id,
            });
        }
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Get an item template by ID
    pub fn get(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.get(id)
    }

    /// Get all item IDs
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.items.keys()
    }

    /// Get all items
    pub fn all(&self) -> impl Iterator<Item = &ItemTemplate> {
        self.items.values()
    }

    /// Check if an item exists
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Get the number of loaded items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_items(dir: &Path, name: &str, content: &str) {
        let items_dir = dir.join("items");
        std::fs::create_dir_all(&items_dir).unwrap();
        std::fs::write(items_dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_items() {
        let temp = TempDir::new().unwrap();
        write_items(
            temp.path(),
            "consumables.toml",
            r#"
[berries]
display_name = "Wild Berries"
category = "consumable"
stackable = true
max_stack = 10

[water_skin]
display_name = "Water Skin"
category = "consumable"
stackable = true
"#,
        );
        write_items(
            temp.path(),
            "quest.toml",
            r#"
[hymn_of_dawn]
display_name = "Hymn of Dawn"
category = "quest"
"#,
        );

        let mut registry = ItemRegistry::new();
        registry.load_from_directory(temp.path()).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("berries").unwrap().max_stack, 10);
        assert_eq!(registry.get("water_skin").unwrap().max_stack, 99);
        assert!(registry.get("hymn_of_dawn").unwrap().is_quest_item());
        assert!(!registry.contains("ancient_crown"));
    }

    #[test]
    fn test_duplicate_across_files_rejected() {
        let temp = TempDir::new().unwrap();
        write_items(temp.path(), "a.toml", "[berries]\n");
        write_items(temp.path(), "b.toml", "[berries]\n");

        let mut registry = ItemRegistry::new();
        let err = registry.load_from_directory(temp.path()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId { kind: ContentKind::Item, ref id } if id == "berries"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let mut registry = ItemRegistry::new();
        registry.load_from_directory(temp.path()).unwrap();
        assert!(registry.is_empty());
    }
}
