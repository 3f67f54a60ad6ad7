//! In-memory game state.
//!
//! A self-contained implementation of the [`world`](crate::world) traits,
//! used by the command-line driver and by tests.

pub mod backpack;
pub mod journal;
pub mod player;

pub use backpack::{Backpack, BackpackSlot};
pub use journal::{LoreBook, NotificationLog};
pub use player::PlayerState;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::world::GameContext;

#[derive(Debug)]
pub struct Sandbox {
    pub backpack: Backpack,
    pub player: PlayerState,
    pub lore: LoreBook,
    pub notifications: NotificationLog,
    pub rng: StdRng,
}

impl Sandbox {
    /// Fresh player with `slots` empty inventory slots
    pub fn new(slots: usize) -> Self {
        Self {
            backpack: Backpack::new(slots),
            player: PlayerState::default(),
            lore: LoreBook::new(),
            notifications: NotificationLog::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible `random` conditions
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn context(&mut self) -> GameContext<'_> {
        GameContext::new(
            &mut self.backpack,
            &mut self.player,
            &mut self.lore,
            &mut self.notifications,
            &mut self.rng,
        )
    }
}
