//! Quest System Module
//!
//! Quests are authored in TOML and tracked per player by the [`QuestEngine`].
//! Gameplay reports what happened through [`QuestEvent`]s; rewards and named
//! hooks fire as objectives and quests complete.

pub mod definition;
pub mod engine;
pub mod events;
pub mod hooks;
pub mod registry;
pub mod state;

pub use definition::{
    ItemGrant, ObjectiveKind, ObjectiveTemplate, QuestCategory, QuestTemplate, RewardBundle,
};
pub use engine::{GrantFailure, QuestEngine, RewardReceipt};
pub use events::{ObjectiveUpdate, QuestEvent};
pub use hooks::{HookContext, HookFn, HookRegistry};
pub use registry::QuestRegistry;
pub use state::{ObjectiveProgress, QuestInstance, QuestLog, QuestLogEntry, QuestState, QuestStatus};
