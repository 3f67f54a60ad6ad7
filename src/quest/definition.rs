//! Quest Definition Structures
//!
//! These structures are deserialized from TOML quest files.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::condition::Prerequisite;
use crate::error::{ContentKind, LoadError};

/// A quest definition loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestFile {
    pub quest: RawQuest,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: QuestCategory,
    #[serde(default)]
    pub min_level: u32,
    /// NPC that hands the quest out
    pub giver_npc: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
    /// Quest objectives
    #[serde(default)]
    pub objectives: Vec<RawObjective>,
    /// Quest rewards
    #[serde(default)]
    pub rewards: RewardBundle,
    /// Named hooks run on acceptance
    #[serde(default)]
    pub on_accept: Vec<String>,
    /// Named hooks run after rewards are issued
    #[serde(default)]
    pub on_complete: Vec<String>,
}

/// Raw objective as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawObjective {
    pub id: String,
    #[serde(rename = "type")]
    pub objective_type: String,
    /// Enemy, item, NPC or zone id depending on the type
    pub target: Option<String>,
    /// Recipient NPC for deliver objectives
    pub npc: Option<String>,
    /// Items handed over per delivery
    pub quantity: Option<u32>,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub description: String,
    pub dialogue_id: Option<String>,
    pub lore_id: Option<String>,
    #[serde(default)]
    pub on_complete: Vec<String>,
}

fn default_count() -> u32 {
    1
}

// ============================================================================
// Resolved Quest Structures (after parsing)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    Main,
    #[default]
    Side,
    /// Can be reset and taken again once completed
    Repeatable,
    /// Never listed until the player stumbles into it
    Hidden,
}

impl QuestCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestCategory::Main => "main",
            QuestCategory::Side => "side",
            QuestCategory::Repeatable => "repeatable",
            QuestCategory::Hidden => "hidden",
        }
    }
}

/// Enemy id that matches every kill
pub const ANY_TARGET: &str = "any";

/// What an objective counts, with the ids it matches against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveKind {
    Kill { enemy_id: String },
    Collect { item_id: String },
    Talk { npc_id: String },
    Explore { zone_id: String },
    Deliver { item_id: String, npc_id: String, quantity: u32 },
    Survive,
    Craft { item_id: String },
}

impl ObjectiveKind {
    pub fn from_raw(raw: &RawObjective) -> Result<Self, String> {
        let target = || {
            raw.target
                .clone()
                .ok_or_else(|| format!("objective '{}' ({}) needs a target", raw.id, raw.objective_type))
        };

        match raw.objective_type.to_lowercase().as_str() {
            "kill" => Ok(ObjectiveKind::Kill { enemy_id: target()? }),
            "collect" => Ok(ObjectiveKind::Collect { item_id: target()? }),
            "talk" => Ok(ObjectiveKind::Talk { npc_id: target()? }),
            "explore" => Ok(ObjectiveKind::Explore { zone_id: target()? }),
            "deliver" => {
                let npc_id = raw
                    .npc
                    .clone()
                    .ok_or_else(|| format!("deliver objective '{}' needs an npc", raw.id))?;
                let quantity = raw.quantity.unwrap_or(1);
                if quantity == 0 {
                    return Err(format!("deliver objective '{}' hands over zero items", raw.id));
                }
                Ok(ObjectiveKind::Deliver {
                    item_id: target()?,
                    npc_id,
                    quantity,
                })
            }
            "survive" => Ok(ObjectiveKind::Survive),
            "craft" => Ok(ObjectiveKind::Craft { item_id: target()? }),
            other => Err(format!("invalid objective type '{}' on '{}'", other, raw.id)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveKind::Kill { .. } => "kill",
            ObjectiveKind::Collect { .. } => "collect",
            ObjectiveKind::Talk { .. } => "talk",
            ObjectiveKind::Explore { .. } => "explore",
            ObjectiveKind::Deliver { .. } => "deliver",
            ObjectiveKind::Survive => "survive",
            ObjectiveKind::Craft { .. } => "craft",
        }
    }

    /// Item the objective consumes or counts, if any
    pub fn item_id(&self) -> Option<&str> {
        match self {
            ObjectiveKind::Collect { item_id }
            | ObjectiveKind::Deliver { item_id, .. }
            | ObjectiveKind::Craft { item_id } => Some(item_id),
            _ => None,
        }
    }
}

/// A resolved quest objective
#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveTemplate {
    pub id: String,
    pub kind: ObjectiveKind,
    /// Count (or seconds, for survive) required
    pub target: u32,
    pub description: String,
    /// Dialogue opened when talking to the objective's NPC, and unlocked on completion
    pub dialogue_id: Option<String>,
    /// Lore discovered on completion
    pub lore_id: Option<String>,
    pub on_complete: Vec<String>,
}

impl ObjectiveTemplate {
    pub fn from_raw(raw: &RawObjective) -> Result<Self, String> {
        let kind = ObjectiveKind::from_raw(raw)?;
        if raw.count == 0 {
            return Err(format!("objective '{}' has a zero target", raw.id));
        }
        let description = if raw.description.is_empty() {
            format!("{} {}", kind.as_str(), raw.target.as_deref().unwrap_or(&raw.id))
        } else {
            raw.description.clone()
        };

        Ok(Self {
            id: raw.id.clone(),
            kind,
            target: raw.count,
            description,
            dialogue_id: raw.dialogue_id.clone(),
            lore_id: raw.lore_id.clone(),
            on_complete: raw.on_complete.clone(),
        })
    }

    /// An incomplete talk objective aimed at this NPC
    pub fn talks_to(&self, npc_id: &str) -> bool {
        matches!(&self.kind, ObjectiveKind::Talk { npc_id: target } if target == npc_id)
    }
}

/// Item reward entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGrant {
    pub item_id: String,
    #[serde(default = "default_count")]
    pub quantity: u32,
}

/// Everything a quest (or a dialogue response) can hand out.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardBundle {
    #[serde(default)]
    pub gold: i64,
    #[serde(default, alias = "exp")]
    pub experience: u32,
    #[serde(default)]
    pub items: Vec<ItemGrant>,
    /// Faction -> delta
    #[serde(default)]
    pub reputation: BTreeMap<String, i32>,
    #[serde(default)]
    pub unlock_dialogue: Vec<String>,
    #[serde(default)]
    pub lore: Vec<String>,
}

impl RewardBundle {
    pub fn is_empty(&self) -> bool {
        self.gold == 0
            && self.experience == 0
            && self.items.is_empty()
            && self.reputation.is_empty()
            && self.unlock_dialogue.is_empty()
            && self.lore.is_empty()
    }
}

/// A fully resolved quest definition
#[derive(Debug, Clone)]
pub struct QuestTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: QuestCategory,
    /// Minimum player level required
    pub min_level: u32,
    pub giver_npc: Option<String>,
    pub prerequisites: Vec<Prerequisite>,
    pub objectives: Vec<ObjectiveTemplate>,
    pub rewards: RewardBundle,
    pub on_accept: Vec<String>,
    pub on_complete: Vec<String>,
}

impl QuestTemplate {
    /// Create a quest template from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Result<Self, LoadError> {
        let invalid = |reason: String| LoadError::invalid(ContentKind::Quest, &raw.id, reason);

        let objectives: Vec<ObjectiveTemplate> = raw
            .objectives
            .iter()
            .map(ObjectiveTemplate::from_raw)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        if objectives.is_empty() {
            return Err(invalid("quest has no objectives".to_string()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = objectives.iter().find(|o| !seen.insert(o.id.as_str())) {
            return Err(invalid(format!("objective id '{}' appears twice", dup.id)));
        }

        Ok(Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            description: raw.description.clone(),
            category: raw.category,
            min_level: raw.min_level,
            giver_npc: raw.giver_npc.clone(),
            prerequisites: raw.prerequisites.clone(),
            objectives,
            rewards: raw.rewards.clone(),
            on_accept: raw.on_accept.clone(),
            on_complete: raw.on_complete.clone(),
        })
    }

    /// Get objective by ID
    pub fn get_objective(&self, id: &str) -> Option<&ObjectiveTemplate> {
        self.objectives.iter().find(|o| o.id == id)
    }

    pub fn is_repeatable(&self) -> bool {
        self.category == QuestCategory::Repeatable
    }

    pub fn is_hidden(&self) -> bool {
        self.category == QuestCategory::Hidden
    }

    /// Every hook name the quest or its objectives refer to
    pub fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.on_accept
            .iter()
            .chain(self.on_complete.iter())
            .chain(self.objectives.iter().flat_map(|o| o.on_complete.iter()))
            .map(String::as_str)
    }
}
