//! Error types for content loading and runtime narrative operations.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::quest::QuestState;

/// The table a content lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    DialogueTree,
    DialogueNode,
    Quest,
    Item,
    Npc,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::DialogueTree => "dialogue tree",
            ContentKind::DialogueNode => "dialogue node",
            ContentKind::Quest => "quest",
            ContentKind::Item => "item",
            ContentKind::Npc => "npc",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the quest and dialogue engines at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    #[error("{kind} '{id}' not found")]
    ContentNotFound { kind: ContentKind, id: String },

    #[error("option {index} is not selectable ({visible} visible)")]
    InvalidOption { index: usize, visible: usize },

    #[error("a conversation is already active ({tree_id})")]
    AlreadyActive { tree_id: String },

    #[error("quest '{quest_id}' requires {requirement}")]
    PrerequisiteNotMet { quest_id: String, requirement: String },

    #[error("quest '{quest_id}' is already {state}")]
    AlreadyInState { quest_id: String, state: QuestState },

    #[error("quest '{quest_id}' is not active ({state})")]
    QuestNotActive { quest_id: String, state: QuestState },

    #[error("quest '{quest_id}' cannot be reset ({reason})")]
    NotRepeatable { quest_id: String, reason: String },

    #[error("no handler registered for response kind '{0}'")]
    UnhandledResponseKind(String),
}

impl NarrativeError {
    pub fn not_found(kind: ContentKind, id: impl Into<String>) -> Self {
        NarrativeError::ContentNotFound { kind, id: id.into() }
    }
}

/// Runtime result type.
pub type Result<T> = std::result::Result<T, NarrativeError>;

/// Errors raised while reading content or configuration from disk.
///
/// Structural problems inside a single definition (duplicate ids, a missing
/// start node, objectives with a zero target) are rejected here. References
/// between tables are only warned about at load time and fail lazily.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: ContentKind, id: String },

    #[error("invalid {kind} '{id}': {reason}")]
    InvalidContent {
        kind: ContentKind,
        id: String,
        reason: String,
    },
}

impl LoadError {
    pub fn invalid(kind: ContentKind, id: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadError::InvalidContent {
            kind,
            id: id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NarrativeError::not_found(ContentKind::DialogueNode, "symbol_reaction");
        assert_eq!(err.to_string(), "dialogue node 'symbol_reaction' not found");

        let err = NarrativeError::AlreadyInState {
            quest_id: "echoes_of_past".to_string(),
            state: QuestState::Completed,
        };
        assert_eq!(err.to_string(), "quest 'echoes_of_past' is already completed");

        let err = LoadError::DuplicateId {
            kind: ContentKind::Quest,
            id: "root_rot".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate quest id 'root_rot'");
    }
}
