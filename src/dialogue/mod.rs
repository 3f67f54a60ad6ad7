//! Dialogue System Module
//!
//! Branching conversations loaded from JSON. Options can be gated on
//! [`Condition`](crate::condition::Condition)s and carry [`Response`]s that
//! reach into the quest engine and the player's inventory.

pub mod definition;
pub mod engine;
pub mod registry;
pub mod response;
pub mod typing;

pub use definition::{DialogueNode, DialogueOption, DialogueTree, OptionAction};
pub use engine::{
    Actor, ConversationView, DialogueEngine, DialogueOutcome, FrameInput, HistoryEntry, VisibleOption,
    GOODBYE_TEXT,
};
pub use registry::DialogueRegistry;
pub use response::{Response, ResponseContext, ResponseHandler, ResponseKind, ResponseTable};
pub use typing::TypingReveal;
