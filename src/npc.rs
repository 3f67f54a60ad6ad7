use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::data;
use crate::error::{ContentKind, LoadError};

// ============================================================================
// Raw TOML Structures (direct deserialization)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawNpcDefinition {
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Conversation used when nothing quest-specific applies
    pub dialogue: String,
    /// Later trees, in order; the last one unlocked by a quest reward wins
    #[serde(default)]
    pub dialogue_upgrades: Vec<String>,
    /// Quests this NPC hands out
    #[serde(default)]
    pub quests: Vec<String>,
    pub shop: Option<String>,
}

// ============================================================================
// NPC Definition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcDefinition {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub dialogue: String,
    pub dialogue_upgrades: Vec<String>,
    pub quests: Vec<String>,
    pub shop: Option<String>,
}

impl NpcDefinition {
    pub fn from_raw(id: &str, raw: &RawNpcDefinition) -> Self {
        Self {
            id: id.to_string(),
            display_name: raw.display_name.clone(),
            description: raw.description.clone(),
            dialogue: raw.dialogue.clone(),
            dialogue_upgrades: raw.dialogue_upgrades.clone(),
            quests: raw.quests.clone(),
            shop: raw.shop.clone(),
        }
    }

    pub fn is_quest_giver(&self) -> bool {
        !self.quests.is_empty()
    }

    pub fn is_merchant(&self) -> bool {
        self.shop.is_some()
    }

    /// The conversation to open given which trees have been unlocked so far
    pub fn current_dialogue(&self, is_unlocked: impl Fn(&str) -> bool) -> &str {
        self.dialogue_upgrades
            .iter()
            .rev()
            .find(|id| is_unlocked(id))
            .unwrap_or(&self.dialogue)
    }

    /// Every dialogue tree this NPC can open
    pub fn dialogue_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.dialogue.as_str()).chain(self.dialogue_upgrades.iter().map(String::as_str))
    }
}

// ============================================================================
// NPC Registry
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct NpcRegistry {
    npcs: HashMap<String, NpcDefinition>,
}

impl NpcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `<data_dir>/npcs/*.toml`, each a table keyed by NPC id
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), LoadError> {
        let npcs_dir = data_dir.join("npcs");

        if !npcs_dir.exists() {
            warn!("NPCs directory does not exist: {:?}", npcs_dir);
            return Ok(());
        }

        for path in data::collect_files(&npcs_dir, "toml", false)? {
            let content = data::read_file(&path)?;
            let table: toml::Table = data::parse_toml(&path, &content)?;

            for (id, value) in table {
                let raw: RawNpcDefinition = value.try_into().map_err(|source| LoadError::Toml {
                    path: path.clone(),
                    source,
                })?;
                self.insert(NpcDefinition::from_raw(&id, &raw))?;
                debug!("Loaded NPC: {} from {:?}", id, path);
            }
        }

        info!("Loaded {} NPCs", self.npcs.len());
        Ok(())
    }

    pub fn insert(&mut self, npc: NpcDefinition) -> Result<(), LoadError> {
        if self.npcs.contains_key(&npc.id) {
            return Err(LoadError::DuplicateId {
                kind: ContentKind::Npc,
                id: npc.id,
            });
        }
        self.npcs.insert(npc.id.clone(), npc);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&NpcDefinition> {
        self.npcs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.npcs.contains_key(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &NpcDefinition> {
        self.npcs.values()
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}
