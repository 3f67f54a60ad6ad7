use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::definition::{DialogueTree, RawDialogueTree};
use crate::data;
use crate::error::{ContentKind, LoadError};

/// Registry for all dialogue trees
#[derive(Debug, Clone, Default)]
pub struct DialogueRegistry {
    trees: HashMap<String, Arc<DialogueTree>>,
}

impl DialogueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<data_dir>/dialogues/*.json` tree
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), LoadError> {
        let dialogues_dir = data_dir.join("dialogues");

        if !dialogues_dir.exists() {
            warn!("Dialogues directory does not exist: {:?}", dialogues_dir);
            return Ok(());
        }

        for path in data::collect_files(&dialogues_dir, "json", true)? {
            let content = data::read_file(&path)?;
            let raw: RawDialogueTree = data::parse_json(&path, &content)?;
            let tree = DialogueTree::from_raw(&raw)?;
            info!("Loaded dialogue: {} ({} nodes)", tree.id, tree.nodes().len());
            self.insert(tree)?;
        }

        info!("Loaded {} dialogue trees", self.trees.len());
        Ok(())
    }

    pub fn insert(&mut self, tree: DialogueTree) -> Result<(), LoadError> {
        if self.trees.contains_key(&tree.id) {
            return Err(LoadError::DuplicateId {
                kind: ContentKind::DialogueTree,
                id: tree.id,
            });
        }
        self.trees.insert(tree.id.clone(), Arc::new(tree));
        Ok(())
    }

    /// Conversations hold their own handle, so a tree outlives any reload.
    pub fn get(&self, id: &str) -> Option<Arc<DialogueTree>> {
        self.trees.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.trees.contains_key(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<DialogueTree>> {
        self.trees.values()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
