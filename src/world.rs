//! Seams to the embedding game.
//!
//! The engines never own inventory, player stats, lore or the notification
//! feed. They borrow them for the duration of a call through [`GameContext`].

use rand::{Rng, RngCore};

use crate::condition::FactSource;
use crate::data::ItemTemplate;
use crate::quest::{QuestEngine, QuestState};

pub trait Inventory {
    /// Add `quantity` of an item. Returns false, adding nothing, when it
    /// does not fit.
    fn add_item(&mut self, item: &ItemTemplate, quantity: u32) -> bool;
    /// Remove `quantity` of an item. Returns false, removing nothing, when
    /// fewer are held.
    fn remove_item(&mut self, item_id: &str, quantity: u32) -> bool;
    fn item_count(&self, item_id: &str) -> u32;
    fn gold(&self) -> i64;
    fn set_gold(&mut self, gold: i64);

    fn add_gold(&mut self, amount: i64) {
        let gold = self.gold();
        self.set_gold(gold.saturating_add(amount));
    }
}

pub trait PlayerStats {
    fn health(&self) -> i32;
    fn set_health(&mut self, health: i32);
    fn max_health(&self) -> i32;
    fn set_max_health(&mut self, max_health: i32);
    fn level(&self) -> u32;
    /// Named numeric stat; `None` when the player has no such stat
    fn stat(&self, name: &str) -> Option<f64>;
    fn set_stat(&mut self, name: &str, value: f64);
    fn gain_experience(&mut self, amount: u32);
}

pub trait LoreKeeper {
    /// Idempotent
    fn discover_lore(&mut self, lore_id: &str);
    fn is_lore_discovered(&self, lore_id: &str) -> bool;
}

pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Borrowed view of the game the engines act on during one call.
pub struct GameContext<'a> {
    pub inventory: &'a mut dyn Inventory,
    pub player: &'a mut dyn PlayerStats,
    pub lore: &'a mut dyn LoreKeeper,
    pub notifier: &'a mut dyn Notifier,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> GameContext<'a> {
    pub fn new(
        inventory: &'a mut dyn Inventory,
        player: &'a mut dyn PlayerStats,
        lore: &'a mut dyn LoreKeeper,
        notifier: &'a mut dyn Notifier,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            inventory,
            player,
            lore,
            notifier,
            rng,
        }
    }

    /// Facts for condition evaluation, combining this context with quest state.
    pub fn facts<'s>(&'s mut self, quests: &'s QuestEngine) -> WorldFacts<'s> {
        WorldFacts {
            quests,
            inventory: &*self.inventory,
            player: &*self.player,
            lore: &*self.lore,
            rng: &mut *self.rng,
        }
    }
}

pub struct WorldFacts<'s> {
    quests: &'s QuestEngine,
    inventory: &'s dyn Inventory,
    player: &'s dyn PlayerStats,
    lore: &'s dyn LoreKeeper,
    rng: &'s mut dyn RngCore,
}

impl FactSource for WorldFacts<'_> {
    fn item_count(&self, item_id: &str) -> u32 {
        self.inventory.item_count(item_id)
    }

    fn gold(&self) -> i64 {
        self.inventory.gold()
    }

    fn quest_state(&self, quest_id: &str) -> QuestState {
        self.quests.quest_state(quest_id)
    }

    fn reputation(&self, faction: &str) -> i32 {
        self.quests.reputation(faction)
    }

    fn level(&self) -> u32 {
        self.player.level()
    }

    fn stat(&self, name: &str) -> Option<f64> {
        self.player.stat(name)
    }

    fn lore_discovered(&self, lore_id: &str) -> bool {
        self.lore.is_lore_discovered(lore_id)
    }

    fn roll(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}
