//! Content store.
//!
//! Everything authored on disk, loaded once and shared read-only between
//! the quest and dialogue engines:
//!
//! ```text
//! <data_dir>/
//!   items/*.toml        item templates keyed by id
//!   quests/**/*.toml    one [quest] per file
//!   dialogues/**/*.json one tree per file
//!   npcs/*.toml         NPC definitions keyed by id
//! ```
//!
//! Malformed files and duplicate ids fail the load. References between
//! content (a dialogue naming a quest, a reward naming an item) are checked
//! afterwards and only warned about; the engines report a dangling
//! reference when it is actually followed.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::condition::{Condition, Prerequisite};
use crate::data::{ItemRegistry, ItemTemplate};
use crate::dialogue::{DialogueRegistry, DialogueTree, Response};
use crate::error::LoadError;
use crate::npc::{NpcDefinition, NpcRegistry};
use crate::quest::definition::ANY_TARGET;
use crate::quest::{QuestRegistry, QuestTemplate};

#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pub items: ItemRegistry,
    pub quests: QuestRegistry,
    pub dialogues: DialogueRegistry,
    pub npcs: NpcRegistry,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_directory(data_dir: &Path) -> Result<Self, LoadError> {
        info!("Loading content from {:?}", data_dir);

        let mut store = Self::new();
        store.items.load_from_directory(data_dir)?;
        store.quests.load_from_directory(data_dir)?;
        store.dialogues.load_from_directory(data_dir)?;
        store.npcs.load_from_directory(data_dir)?;

        let problems = store.validate_references();
        info!(
            "Content ready: {} items, {} quests, {} dialogues, {} NPCs ({} warnings)",
            store.items.len(),
            store.quests.len(),
            store.dialogues.len(),
            store.npcs.len(),
            problems.len()
        );
        Ok(store)
    }

    pub fn item(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.get(id)
    }

    pub fn quest(&self, id: &str) -> Option<&Arc<QuestTemplate>> {
        self.quests.get(id)
    }

    pub fn dialogue(&self, id: &str) -> Option<Arc<DialogueTree>> {
        self.dialogues.get(id)
    }

    pub fn npc(&self, id: &str) -> Option<&NpcDefinition> {
        self.npcs.get(id)
    }

    // ========================================================================
    // Cross-reference validation
    // ========================================================================

    /// Check references between content kinds. Each problem is logged and
    /// returned; none of them stop the content from being used.
    pub fn validate_references(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for quest in self.quests.all() {
            self.check_quest(quest, &mut problems);
        }
        for tree in self.dialogues.all() {
            self.check_dialogue(tree, &mut problems);
        }
        for npc in self.npcs.all() {
            self.check_npc(npc, &mut problems);
        }

        problems.sort();
        for problem in &problems {
            warn!("{}", problem);
        }
        problems
    }

    fn check_quest(&self, quest: &QuestTemplate, problems: &mut Vec<String>) {
        let item_refs = quest
            .prerequisites
            .iter()
            .filter_map(|p| match p {
                Prerequisite::Item { item_id } => Some(item_id.as_str()),
                _ => None,
            })
            .chain(quest.objectives.iter().filter_map(|o| o.kind.item_id()))
            .chain(quest.rewards.items.iter().map(|g| g.item_id.as_str()));

        for item_id in item_refs {
            if item_id != ANY_TARGET && !self.items.contains(item_id) {
                problems.push(format!("Quest '{}' references unknown item '{}'", quest.id, item_id));
            }
        }

        let dialogue_refs = quest
            .objectives
            .iter()
            .filter_map(|o| o.dialogue_id.as_deref())
            .chain(quest.rewards.unlock_dialogue.iter().map(String::as_str));
        for dialogue_id in dialogue_refs {
            if !self.dialogues.contains(dialogue_id) {
                problems.push(format!(
                    "Quest '{}' references unknown dialogue '{}'",
                    quest.id, dialogue_id
                ));
            }
        }

        if let Some(npc) = &quest.giver_npc {
            if !self.npcs.contains(npc) {
                problems.push(format!("Quest '{}' is given by unknown NPC '{}'", quest.id, npc));
            }
        }
    }

    fn check_dialogue(&self, tree: &DialogueTree, problems: &mut Vec<String>) {
        for (node, target) in tree.dangling_targets() {
            problems.push(format!(
                "Dialogue '{}' node '{}' leads to missing node '{}'",
                tree.id, node, target
            ));
        }

        for response in tree.responses() {
            if let Response::Unknown { kind } = response {
                problems.push(format!("Dialogue '{}' has a response of unknown type '{}'", tree.id, kind));
            }
            if let Some(quest_id) = response.quest_id() {
                if !self.quests.contains(quest_id) {
                    problems.push(format!("Dialogue '{}' references unknown quest '{}'", tree.id, quest_id));
                }
            }
            for item_id in response.item_ids() {
                if !self.items.contains(item_id) {
                    problems.push(format!("Dialogue '{}' references unknown item '{}'", tree.id, item_id));
                }
            }
        }

        for condition in tree.conditions() {
            match condition {
                Condition::HasItem { item_id } if !self.items.contains(item_id) => {
                    problems.push(format!("Dialogue '{}' checks unknown item '{}'", tree.id, item_id));
                }
                Condition::Unknown { kind } => {
                    problems.push(format!("Dialogue '{}' has a condition of unknown type '{}'", tree.id, kind));
                }
                _ => {
                    if let Some(quest_id) = condition.quest_id() {
                        if !self.quests.contains(quest_id) {
                            problems.push(format!("Dialogue '{}' checks unknown quest '{}'", tree.id, quest_id));
                        }
                    }
                }
            }
        }
    }

    fn check_npc(&self, npc: &NpcDefinition, problems: &mut Vec<String>) {
        for dialogue_id in npc.dialogue_ids() {
            if !self.dialogues.contains(dialogue_id) {
                problems.push(format!("NPC '{}' uses unknown dialogue '{}'", npc.id, dialogue_id));
            }
        }
        for quest_id in &npc.quests {
            if !self.quests.contains(quest_id) {
                problems.push(format!("NPC '{}' offers unknown quest '{}'", npc.id, quest_id));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dialogue::DialogueTree;
    use std::path::PathBuf;

    pub(crate) fn shipped_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    /// The content bundled under `data/`
    pub(crate) fn shipped_content() -> Arc<ContentStore> {
        Arc::new(ContentStore::load_from_directory(&shipped_data_dir()).unwrap())
    }

    #[test]
    fn test_shipped_content_loads_clean() {
        let content = shipped_content();
        assert!(content.items.len() >= 10);
        assert!(content.quests.contains("echoes_of_past"));
        assert!(content.dialogue("villager").is_some());
        assert!(content.npc("rootweaver").is_some());
        assert_eq!(content.validate_references(), Vec::<String>::new());
    }

    #[test]
    fn test_dangling_references_are_reported() {
        let mut store = ContentStore::new();
        let tree = DialogueTree::from_json(
            r#"{
                "id": "stranger",
                "name": "Stranger",
                "start_node": "hello",
                "nodes": [{
                    "id": "hello",
                    "text": "Psst.",
                    "options": [
                        {"text": "Deal", "response": {"type": "quest_accept", "quest_id": "smuggling"}},
                        {"text": "Gift?", "condition": {"type": "has_item", "item_id": "contraband"}, "next_node": "gift"}
                    ]
                }]
            }"#,
        )
        .unwrap();
        store.dialogues.insert(tree).unwrap();

        let problems = store.validate_references();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.contains("unknown quest 'smuggling'")));
        assert!(problems.iter().any(|p| p.contains("unknown item 'contraband'")));
        assert!(problems.iter().any(|p| p.contains("missing node 'gift'")));
    }

    #[test]
    fn test_missing_data_dir_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = ContentStore::load_from_directory(temp.path()).unwrap();
        assert!(store.items.is_empty());
        assert!(store.quests.is_empty());
    }
}
