//! Condition evaluation.
//!
//! Dialogue options carry a [`Condition`] that decides visibility; quests
//! carry [`Prerequisite`]s that gate acceptance. Both are pure predicates over
//! a [`FactSource`]. The one exception is `random`, which draws from the
//! source's generator on every check and so can flip between evaluations.

use serde::{Deserialize, Serialize};

use crate::quest::QuestState;

// ============================================================================
// Raw Structures (as they appear in content files)
// ============================================================================

/// Flat form of a condition. Every field is optional so an unrecognised
/// `type` still parses and keeps its name.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub item_id: Option<String>,
    pub quest_id: Option<String>,
    pub amount: Option<i64>,
    pub stat: Option<String>,
    pub value: Option<f64>,
    pub lore_id: Option<String>,
    pub chance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPrerequisite {
    #[serde(rename = "type")]
    pub kind: String,
    pub quest_id: Option<String>,
    pub level: Option<u32>,
    pub item_id: Option<String>,
    pub faction: Option<String>,
    pub value: Option<i32>,
    pub lore_id: Option<String>,
}

fn required<T>(field: Option<T>, kind: &str, name: &str) -> Result<T, String> {
    field.ok_or_else(|| format!("{} needs {}", kind, name))
}

// ============================================================================
// Resolved Structures
// ============================================================================

/// Gate on a dialogue option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawCondition")]
pub enum Condition {
    HasItem { item_id: String },
    QuestCompleted { quest_id: String },
    QuestActive { quest_id: String },
    HasGold { amount: i64 },
    StatCheck { stat: String, value: f64 },
    LoreDiscovered { lore_id: String },
    Random { chance: f64 },
    /// Any kind this build does not know, under its authored name.
    /// Evaluates to true.
    Unknown { kind: String },
}

impl TryFrom<RawCondition> for Condition {
    type Error = String;

    fn try_from(raw: RawCondition) -> Result<Self, String> {
        let kind = raw.kind.as_str();
        let condition = match kind {
            "has_item" => Condition::HasItem { item_id: required(raw.item_id, kind, "item_id")? },
            "quest_completed" => Condition::QuestCompleted { quest_id: required(raw.quest_id, kind, "quest_id")? },
            "quest_active" => Condition::QuestActive { quest_id: required(raw.quest_id, kind, "quest_id")? },
            "has_gold" => Condition::HasGold { amount: required(raw.amount, kind, "amount")? },
            "stat_check" => Condition::StatCheck {
                stat: required(raw.stat, kind, "stat")?,
                value: required(raw.value, kind, "value")?,
            },
            "lore_discovered" => Condition::LoreDiscovered { lore_id: required(raw.lore_id, kind, "lore_id")? },
            "random" => Condition::Random { chance: required(raw.chance, kind, "chance")? },
            _ => Condition::Unknown { kind: kind.to_string() },
        };
        Ok(condition)
    }
}

impl Condition {
    pub fn kind(&self) -> &str {
        match self {
            Condition::HasItem { .. } => "has_item",
            Condition::QuestCompleted { .. } => "quest_completed",
            Condition::QuestActive { .. } => "quest_active",
            Condition::HasGold { .. } => "has_gold",
            Condition::StatCheck { .. } => "stat_check",
            Condition::LoreDiscovered { .. } => "lore_discovered",
            Condition::Random { .. } => "random",
            Condition::Unknown { kind } => kind,
        }
    }

    pub fn quest_id(&self) -> Option<&str> {
        match self {
            Condition::QuestCompleted { quest_id } | Condition::QuestActive { quest_id } => Some(quest_id),
            _ => None,
        }
    }
}

/// Gate on quest acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawPrerequisite")]
pub enum Prerequisite {
    QuestCompleted { quest_id: String },
    Level { level: u32 },
    Item { item_id: String },
    Reputation { faction: String, value: i32 },
    Lore { lore_id: String },
    Unknown { kind: String },
}

impl TryFrom<RawPrerequisite> for Prerequisite {
    type Error = String;

    fn try_from(raw: RawPrerequisite) -> Result<Self, String> {
        let kind = raw.kind.as_str();
        let prerequisite = match kind {
            "quest_completed" => Prerequisite::QuestCompleted { quest_id: required(raw.quest_id, kind, "quest_id")? },
            "level" => Prerequisite::Level { level: required(raw.level, kind, "level")? },
            "item" => Prerequisite::Item { item_id: required(raw.item_id, kind, "item_id")? },
            "reputation" => Prerequisite::Reputation {
                faction: required(raw.faction, kind, "faction")?,
                value: required(raw.value, kind, "value")?,
            },
            "lore" => Prerequisite::Lore { lore_id: required(raw.lore_id, kind, "lore_id")? },
            _ => Prerequisite::Unknown { kind: kind.to_string() },
        };
        Ok(prerequisite)
    }
}

impl Prerequisite {
    /// Human-readable requirement, used in `PrerequisiteNotMet`.
    pub fn describe(&self) -> String {
        match self {
            Prerequisite::QuestCompleted { quest_id } => format!("quest '{}' completed", quest_id),
            Prerequisite::Level { level } => format!("level {}", level),
            Prerequisite::Item { item_id } => format!("item '{}'", item_id),
            Prerequisite::Reputation { faction, value } => format!("{} reputation of {}", faction, value),
            Prerequisite::Lore { lore_id } => format!("lore '{}' discovered", lore_id),
            Prerequisite::Unknown { kind } => format!("an unknown requirement '{}'", kind),
        }
    }
}

/// Read access to everything a condition can ask about.
pub trait FactSource {
    fn item_count(&self, item_id: &str) -> u32;
    fn gold(&self) -> i64;
    fn quest_state(&self, quest_id: &str) -> QuestState;
    fn reputation(&self, faction: &str) -> i32;
    fn level(&self) -> u32;
    /// `None` when the player has no such stat
    fn stat(&self, name: &str) -> Option<f64>;
    fn lore_discovered(&self, lore_id: &str) -> bool;
    /// Uniform sample in `[0, 1)`.
    fn roll(&mut self) -> f64;
}

pub fn evaluate(condition: &Condition, facts: &mut dyn FactSource) -> bool {
    match condition {
        Condition::HasItem { item_id } => facts.item_count(item_id) > 0,
        Condition::QuestCompleted { quest_id } => facts.quest_state(quest_id) == QuestState::Completed,
        Condition::QuestActive { quest_id } => facts.quest_state(quest_id) == QuestState::Active,
        Condition::HasGold { amount } => facts.gold() >= *amount,
        Condition::StatCheck { stat, value } => facts.stat(stat).is_some_and(|v| v >= *value),
        Condition::LoreDiscovered { lore_id } => facts.lore_discovered(lore_id),
        Condition::Random { chance } => facts.roll() < *chance,
        Condition::Unknown { .. } => true,
    }
}

pub fn prerequisite_met(prerequisite: &Prerequisite, facts: &dyn FactSource) -> bool {
    match prerequisite {
        Prerequisite::QuestCompleted { quest_id } => facts.quest_state(quest_id) == QuestState::Completed,
        Prerequisite::Level { level } => facts.level() >= *level,
        Prerequisite::Item { item_id } => facts.item_count(item_id) > 0,
        Prerequisite::Reputation { faction, value } => facts.reputation(faction) >= *value,
        Prerequisite::Lore { lore_id } => facts.lore_discovered(lore_id),
        Prerequisite::Unknown { .. } => true,
    }
}

/// First prerequisite in declaration order that does not hold.
pub fn first_unmet<'p>(prerequisites: &'p [Prerequisite], facts: &dyn FactSource) -> Option<&'p Prerequisite> {
    prerequisites.iter().find(|p| !prerequisite_met(p, facts))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::Rng;
    use std::collections::HashMap;

    /// Plain in-memory facts for exercising conditions without the engines.
    pub(crate) struct StubFacts {
        pub items: HashMap<String, u32>,
        pub gold: i64,
        pub quests: HashMap<String, QuestState>,
        pub reputation: HashMap<String, i32>,
        pub level: u32,
        pub stats: HashMap<String, f64>,
        pub lore: Vec<String>,
        pub rng: StdRng,
    }

    impl StubFacts {
        pub fn new() -> Self {
            Self {
                items: HashMap::new(),
                gold: 0,
                quests: HashMap::new(),
                reputation: HashMap::new(),
                level: 1,
                stats: HashMap::new(),
                lore: Vec::new(),
                rng: StdRng::seed_from_u64(7),
            }
        }
    }

    impl FactSource for StubFacts {
        fn item_count(&self, item_id: &str) -> u32 {
            self.items.get(item_id).copied().unwrap_or(0)
        }
        fn gold(&self) -> i64 {
            self.gold
        }
        fn quest_state(&self, quest_id: &str) -> QuestState {
            self.quests.get(quest_id).copied().unwrap_or(QuestState::NotStarted)
        }
        fn reputation(&self, faction: &str) -> i32 {
            self.reputation.get(faction).copied().unwrap_or(0)
        }
        fn level(&self) -> u32 {
            self.level
        }
        fn stat(&self, name: &str) -> Option<f64> {
            self.stats.get(name).copied()
        }
        fn lore_discovered(&self, lore_id: &str) -> bool {
            self.lore.iter().any(|l| l == lore_id)
        }
        fn roll(&mut self) -> f64 {
            self.rng.gen_range(0.0..1.0)
        }
    }

    fn parse(json: &str) -> Condition {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_conditions() {
        assert_eq!(
            parse(r#"{"type": "has_item", "item_id": "ancient_symbol"}"#),
            Condition::HasItem { item_id: "ancient_symbol".to_string() }
        );
        assert_eq!(parse(r#"{"type": "random", "chance": 0.3}"#), Condition::Random { chance: 0.3 });
        assert_eq!(
            parse(r#"{"type": "phase_of_moon", "phase": "full"}"#),
            Condition::Unknown { kind: "phase_of_moon".to_string() }
        );
    }

    #[test]
    fn test_known_kind_missing_field_is_rejected() {
        let err = serde_json::from_str::<Condition>(r#"{"type": "has_item"}"#).unwrap_err();
        assert!(err.to_string().contains("has_item needs item_id"));

        let err = serde_json::from_str::<Prerequisite>(r#"{"type": "reputation", "faction": "lumina_order"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("reputation needs value"));
    }

    #[test]
    fn test_unknown_prerequisite_keeps_its_name() {
        let odd: Prerequisite = serde_json::from_str(r#"{"type": "moon_phase", "phase": "full"}"#).unwrap();
        assert_eq!(odd, Prerequisite::Unknown { kind: "moon_phase".to_string() });
        assert_eq!(odd.describe(), "an unknown requirement 'moon_phase'");
        assert!(prerequisite_met(&odd, &StubFacts::new()));
    }

    #[test]
    fn test_item_gold_and_quest_conditions() {
        let mut facts = StubFacts::new();
        let has_symbol = Condition::HasItem { item_id: "ancient_symbol".to_string() };
        assert!(!evaluate(&has_symbol, &mut facts));
        facts.items.insert("ancient_symbol".to_string(), 1);
        assert!(evaluate(&has_symbol, &mut facts));

        facts.gold = 49;
        assert!(!evaluate(&Condition::HasGold { amount: 50 }, &mut facts));
        facts.gold = 50;
        assert!(evaluate(&Condition::HasGold { amount: 50 }, &mut facts));

        let active = Condition::QuestActive { quest_id: "echoes_of_past".to_string() };
        let completed = Condition::QuestCompleted { quest_id: "echoes_of_past".to_string() };
        assert!(!evaluate(&active, &mut facts));
        facts.quests.insert("echoes_of_past".to_string(), QuestState::Active);
        assert!(evaluate(&active, &mut facts));
        assert!(!evaluate(&completed, &mut facts));
    }

    #[test]
    fn test_stat_check_missing_stat_fails() {
        let mut facts = StubFacts::new();
        let check = Condition::StatCheck { stat: "wisdom".to_string(), value: 3.0 };
        assert!(!evaluate(&check, &mut facts));
        facts.stats.insert("wisdom".to_string(), 3.0);
        assert!(evaluate(&check, &mut facts));
    }

    #[test]
    fn test_unknown_condition_passes() {
        let mut facts = StubFacts::new();
        let odd = Condition::Unknown { kind: "phase_of_moon".to_string() };
        assert_eq!(odd.kind(), "phase_of_moon");
        assert!(evaluate(&odd, &mut facts));
    }

    #[test]
    fn test_random_bounds_and_reroll() {
        let mut facts = StubFacts::new();
        for _ in 0..50 {
            assert!(!evaluate(&Condition::Random { chance: 0.0 }, &mut facts));
            assert!(evaluate(&Condition::Random { chance: 1.0 }, &mut facts));
        }

        let coin = Condition::Random { chance: 0.5 };
        let outcomes: Vec<bool> = (0..200).map(|_| evaluate(&coin, &mut facts)).collect();
        assert!(outcomes.iter().any(|v| *v));
        assert!(outcomes.iter().any(|v| !*v));
    }

    #[test]
    fn test_prerequisites() {
        let mut facts = StubFacts::new();
        let prereqs: Vec<Prerequisite> = toml::from_str::<HashMap<String, Vec<Prerequisite>>>(
            r#"
list = [
    { type = "quest_completed", quest_id = "echoes_of_past" },
    { type = "level", level = 2 },
]
"#,
        )
        .unwrap()
        .remove("list")
        .unwrap();

        let unmet = first_unmet(&prereqs, &facts).unwrap();
        assert_eq!(unmet.describe(), "quest 'echoes_of_past' completed");

        facts.quests.insert("echoes_of_past".to_string(), QuestState::Completed);
        assert_eq!(first_unmet(&prereqs, &facts), Some(&Prerequisite::Level { level: 2 }));

        facts.level = 2;
        assert!(first_unmet(&prereqs, &facts).is_none());
    }
}
