//! Quest Event Types
//!
//! Gameplay happenings the embedding game reports to the quest engine.

use serde::{Deserialize, Serialize};

use super::definition::{ANY_TARGET, ObjectiveKind};

/// Events that can trigger quest progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestEvent {
    /// Player killed an enemy
    Kill { enemy_id: String },

    /// Player picked something up. Progress follows the count held, not
    /// the quantity in the event.
    Collect {
        item_id: String,
        #[serde(default = "default_quantity")]
        quantity: u32,
    },

    /// Player talked to an NPC
    Talk { npc_id: String },

    /// Player entered a zone
    Explore { zone_id: String },

    /// Player handed an item to an NPC
    Deliver { item_id: String, npc_id: String },

    /// Time passed while the player stayed alive
    Survive { delta_seconds: f64 },

    /// Player crafted an item
    Craft {
        item_id: String,
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
}

fn default_quantity() -> u32 {
    1
}

impl QuestEvent {
    pub fn kill(enemy_id: &str) -> Self {
        QuestEvent::Kill { enemy_id: enemy_id.to_string() }
    }

    pub fn collect(item_id: &str, quantity: u32) -> Self {
        QuestEvent::Collect { item_id: item_id.to_string(), quantity }
    }

    pub fn talk(npc_id: &str) -> Self {
        QuestEvent::Talk { npc_id: npc_id.to_string() }
    }

    pub fn explore(zone_id: &str) -> Self {
        QuestEvent::Explore { zone_id: zone_id.to_string() }
    }

    pub fn deliver(item_id: &str, npc_id: &str) -> Self {
        QuestEvent::Deliver {
            item_id: item_id.to_string(),
            npc_id: npc_id.to_string(),
        }
    }

    pub fn survive(delta_seconds: f64) -> Self {
        QuestEvent::Survive { delta_seconds }
    }

    pub fn craft(item_id: &str, quantity: u32) -> Self {
        QuestEvent::Craft { item_id: item_id.to_string(), quantity }
    }

    /// Get event type as string (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        match self {
            QuestEvent::Kill { .. } => "kill",
            QuestEvent::Collect { .. } => "collect",
            QuestEvent::Talk { .. } => "talk",
            QuestEvent::Explore { .. } => "explore",
            QuestEvent::Deliver { .. } => "deliver",
            QuestEvent::Survive { .. } => "survive",
            QuestEvent::Craft { .. } => "craft",
        }
    }

    /// Whether this event advances objectives of the given kind
    pub fn matches(&self, kind: &ObjectiveKind) -> bool {
        match (self, kind) {
            (QuestEvent::Kill { enemy_id }, ObjectiveKind::Kill { enemy_id: wanted }) => {
                wanted == ANY_TARGET || wanted == enemy_id
            }
            (QuestEvent::Collect { item_id, .. }, ObjectiveKind::Collect { item_id: wanted }) => wanted == item_id,
            (QuestEvent::Talk { npc_id }, ObjectiveKind::Talk { npc_id: wanted }) => wanted == npc_id,
            (QuestEvent::Explore { zone_id }, ObjectiveKind::Explore { zone_id: wanted }) => wanted == zone_id,
            (
                QuestEvent::Deliver { item_id, npc_id },
                ObjectiveKind::Deliver {
                    item_id: wanted_item,
                    npc_id: wanted_npc,
                    ..
                },
            ) => wanted_item == item_id && wanted_npc == npc_id,
            (QuestEvent::Survive { .. }, ObjectiveKind::Survive) => true,
            (QuestEvent::Craft { item_id, .. }, ObjectiveKind::Craft { item_id: wanted }) => wanted == item_id,
            _ => false,
        }
    }
}

/// One objective touched by an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectiveUpdate {
    pub quest_id: String,
    pub objective_id: String,
    /// Progress after the event
    pub progress: u32,
    pub target: u32,
    /// The objective crossed its target on this event
    pub objective_completed: bool,
    /// The owning quest auto-completed as a result of this event
    pub quest_completed: bool,
}
