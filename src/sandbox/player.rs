use std::collections::HashMap;
use tracing::info;

use crate::world::PlayerStats;

pub const STARTING_HP: i32 = 100;

/// Calculate EXP required to advance from `level`
fn exp_for_level(level: u32) -> u32 {
    // Simple formula: 100 * level^1.5
    (100.0 * f64::from(level).powf(1.5)) as u32
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub name: String,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next_level: u32,
    pub total_exp: u64,
    pub hp: i32,
    pub max_hp: i32,
    stats: HashMap<String, f64>,
}

impl PlayerState {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: 1,
            exp: 0,
            exp_to_next_level: exp_for_level(1),
            total_exp: 0,
            hp: STARTING_HP,
            max_hp: STARTING_HP,
            stats: HashMap::new(),
        }
    }

    /// Award EXP and handle level ups. Returns the number of levels gained.
    pub fn award_exp(&mut self, amount: u32) -> u32 {
        self.exp = self.exp.saturating_add(amount);
        self.total_exp += u64::from(amount);

        let mut gained = 0;
        while self.exp >= self.exp_to_next_level {
            self.exp -= self.exp_to_next_level;
            self.level += 1;
            self.exp_to_next_level = exp_for_level(self.level);

            // Level up bonuses: +10 max HP, full heal
            self.max_hp += 10;
            self.hp = self.max_hp;
            gained += 1;

            info!("{} leveled up to {}! (Max HP: {})", self.name, self.level, self.max_hp);
        }
        gained
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new("Wanderer")
    }
}

impl PlayerStats for PlayerState {
    fn health(&self) -> i32 {
        self.hp
    }

    fn set_health(&mut self, health: i32) {
        self.hp = health.clamp(0, self.max_hp);
    }

    fn max_health(&self) -> i32 {
        self.max_hp
    }

    fn set_max_health(&mut self, max_health: i32) {
        self.max_hp = max_health.max(1);
        self.hp = self.hp.min(self.max_hp);
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn stat(&self, name: &str) -> Option<f64> {
        match name {
            "health" | "hp" => Some(f64::from(self.hp)),
            "max_health" => Some(f64::from(self.max_hp)),
            "level" => Some(f64::from(self.level)),
            _ => self.stats.get(name).copied(),
        }
    }

    fn set_stat(&mut self, name: &str, value: f64) {
        match name {
            "health" | "hp" => self.set_health(value as i32),
            "max_health" => self.set_max_health(value as i32),
            _ => {
                self.stats.insert(name.to_string(), value);
            }
        }
    }

    fn gain_experience(&mut self, amount: u32) {
        self.award_exp(amount);
    }
}
