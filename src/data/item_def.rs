use serde::{Deserialize, Serialize};

// ============================================================================
// Item Categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Consumable,
    #[default]
    Material,
    Equipment,
    Quest,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Consumable => "consumable",
            ItemCategory::Material => "material",
            ItemCategory::Equipment => "equipment",
            ItemCategory::Quest => "quest",
        }
    }
}

// ============================================================================
// Equipment Slots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    #[default]
    None,
    Weapon,
    Armor,
    Accessory,
}

impl EquipmentSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentSlot::None => "none",
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
            EquipmentSlot::Accessory => "accessory",
        }
    }
}

// ============================================================================
// Equipment Stats
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquipmentStats {
    #[serde(default)]
    pub slot: EquipmentSlot,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub mana: i32,
    #[serde(default)]
    pub speed: f32,
}

// ============================================================================
// Consumable Effects
// ============================================================================

/// What eating or drinking the item does. Applied by the embedding game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemEffects {
    #[serde(default)]
    pub heal: i32,
    #[serde(default)]
    pub hunger: i32,
    #[serde(default)]
    pub thirst: i32,
    pub buff: Option<String>,
    #[serde(default)]
    pub reveal_secrets: bool,
}

// ============================================================================
// Raw Item Definition (direct from TOML)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawItemDefinition {
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default)]
    pub stackable: bool,
    pub max_stack: Option<u32>,
    /// Flavour text shown on inspection
    pub lore: Option<String>,
    pub effects: Option<ItemEffects>,
    /// Equipment-specific stats (only for equipment items)
    pub equipment: Option<EquipmentStats>,
}

// ============================================================================
// Resolved Item Template
// ============================================================================

pub const DEFAULT_MAX_STACK: u32 = 99;

#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub category: ItemCategory,
    /// 1 for items that never stack
    pub max_stack: u32,
    pub lore: Option<String>,
    pub effects: Option<ItemEffects>,
    pub equipment: Option<EquipmentStats>,
}

impl ItemTemplate {
    pub fn from_raw(id: &str, raw: &RawItemDefinition) -> Self {
        let max_stack = if raw.stackable {
            raw.max_stack.unwrap_or(DEFAULT_MAX_STACK).max(1)
        } else {
            1
        };

        Self {
            id: id.to_string(),
            display_name: raw.display_name.clone().unwrap_or_else(|| id.to_string()),
            description: raw.description.clone().unwrap_or_default(),
            category: raw.category,
            max_stack,
            lore: raw.lore.clone().filter(|l| !l.is_empty()),
            effects: raw.effects.clone(),
            equipment: raw.equipment.clone(),
        }
    }

    /// Minimal template for callers that only know an id.
    pub fn simple(id: &str, display_name: &str, max_stack: u32) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: String::new(),
            category: ItemCategory::Material,
            max_stack: max_stack.max(1),
            lore: None,
            effects: None,
            equipment: None,
        }
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    pub fn is_consumable(&self) -> bool {
        self.category == ItemCategory::Consumable
    }

    pub fn is_quest_item(&self) -> bool {
        self.category == ItemCategory::Quest
    }

    /// Check if this is equippable (has equipment stats with a valid slot)
    pub fn is_equippable(&self) -> bool {
        self.equipment
            .as_ref()
            .map(|e| e.slot != EquipmentSlot::None)
            .unwrap_or(false)
    }

    pub fn equipment_slot(&self) -> Option<EquipmentSlot> {
        self.equipment.as_ref().map(|e| e.slot)
    }
}
