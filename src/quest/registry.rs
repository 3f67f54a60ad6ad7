//! Quest Registry
//!
//! Loads and indexes quest templates from TOML files, one `[quest]` per file.
//! Subdirectories are walked so content can be grouped (`main/`, `side/`).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::definition::{QuestTemplate, RawQuestFile};
use crate::condition::Prerequisite;
use crate::data;
use crate::error::{ContentKind, LoadError};

/// Registry for all quest templates
#[derive(Debug, Clone, Default)]
pub struct QuestRegistry {
    quests: HashMap<String, Arc<QuestTemplate>>,
}

impl QuestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all quest templates from `<data_dir>/quests`
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), LoadError> {
        let quests_dir = data_dir.join("quests");
        info!("Loading quests from {:?}", quests_dir);

        if !quests_dir.exists() {
            warn!("Quest directory does not exist: {:?}", quests_dir);
            return Ok(());
        }

        for path in data::collect_files(&quests_dir, "toml", true)? {
            let content = data::read_file(&path)?;
            let raw: RawQuestFile = data::parse_toml(&path, &content)?;
            let quest = QuestTemplate::from_raw(&raw.quest)?;

            info!("Loaded quest: {} ({})", quest.name, quest.id);
            self.insert(quest)?;
        }

        info!("Loaded {} quest templates", self.quests.len());

        self.validate_quest_chains();

        Ok(())
    }

    pub fn insert(&mut self, quest: QuestTemplate) -> Result<(), LoadError> {
        if self.quests.contains_key(&quest.id) {
            return Err(LoadError::DuplicateId {
                kind: ContentKind::Quest,
                id: quest.id,
            });
        }
        self.quests.insert(quest.id.clone(), Arc::new(quest));
        Ok(())
    }

    /// Warn about prerequisites naming quests that do not exist. These only
    /// make the dependent quest unobtainable, so loading carries on.
    pub fn validate_quest_chains(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for quest in self.quests.values() {
            for prerequisite in &quest.prerequisites {
                match prerequisite {
                    Prerequisite::QuestCompleted { quest_id } if !self.quests.contains_key(quest_id) => {
                        problems.push(format!(
                            "Quest '{}' requires non-existent quest '{}'",
                            quest.id, quest_id
                        ));
                    }
                    Prerequisite::Unknown { kind } => {
                        problems.push(format!(
                            "Quest '{}' has a prerequisite of unknown type '{}'",
                            quest.id, kind
                        ));
                    }
                    _ => {}
                }
            }
        }

        for problem in &problems {
            warn!("{}", problem);
        }
        problems
    }

    /// Get a quest by ID
    pub fn get(&self, quest_id: &str) -> Option<&Arc<QuestTemplate>> {
        self.quests.get(quest_id)
    }

    pub fn contains(&self, quest_id: &str) -> bool {
        self.quests.contains_key(quest_id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<QuestTemplate>> {
        self.quests.values()
    }

    /// Get quests handed out by a specific NPC
    pub fn quests_for_npc(&self, npc_id: &str) -> Vec<Arc<QuestTemplate>> {
        let mut quests: Vec<Arc<QuestTemplate>> = self
            .quests
            .values()
            .filter(|q| q.giver_npc.as_deref() == Some(npc_id))
            .cloned()
            .collect();
        quests.sort_by(|a, b| a.id.cmp(&b.id));
        quests
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}
