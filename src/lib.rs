//! Narrative engine: dialogue trees, quests and the conditions that gate them.
//!
//! Content (items, quests, dialogue trees, NPCs) is loaded once into a
//! [`ContentStore`]. The [`QuestEngine`] tracks quest progress from gameplay
//! events; the [`DialogueEngine`] runs one conversation at a time and calls
//! into the quest engine through dialogue responses. [`Narrative`] bundles
//! both for a game loop.

pub mod condition;
pub mod config;
pub mod content;
pub mod data;
pub mod dialogue;
pub mod error;
pub mod narrative;
pub mod npc;
pub mod quest;
pub mod sandbox;
pub mod world;

pub use condition::{Condition, FactSource, Prerequisite};
pub use config::EngineConfig;
pub use content::ContentStore;
pub use dialogue::{Actor, DialogueEngine, DialogueOutcome, FrameInput};
pub use error::{ContentKind, LoadError, NarrativeError, Result};
pub use narrative::Narrative;
pub use quest::{HookRegistry, QuestEngine, QuestEvent, QuestState};
pub use world::GameContext;
