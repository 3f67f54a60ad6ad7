//! Dialogue Definition Structures
//!
//! Dialogue trees are authored as JSON, one tree per file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::response::Response;
use crate::condition::Condition;
use crate::error::{ContentKind, LoadError};

/// Raw tree as it appears in JSON
#[derive(Debug, Clone, Deserialize)]
pub struct RawDialogueTree {
    pub id: String,
    pub name: String,
    pub start_node: String,
    #[serde(default)]
    pub nodes: Vec<RawDialogueNode>,
    /// Named hooks run when a conversation opens
    #[serde(default)]
    pub on_start: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDialogueNode {
    pub id: String,
    pub speaker: Option<String>,
    pub text: String,
    #[serde(default)]
    pub options: Vec<RawDialogueOption>,
    /// Fired every time the node is entered
    pub response: Option<Response>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDialogueOption {
    pub text: String,
    pub next_node: Option<String>,
    pub action: Option<RawOptionAction>,
    pub condition: Option<Condition>,
    pub response: Option<Response>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawOptionAction {
    End,
    #[serde(other)]
    Unknown,
}

// ============================================================================
// Resolved Dialogue Structures
// ============================================================================

/// Where an option leads once its response (if any) has run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "node", rename_all = "snake_case")]
pub enum OptionAction {
    Next(String),
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogueOption {
    pub text: String,
    pub condition: Option<Condition>,
    pub response: Option<Response>,
    pub action: OptionAction,
}

impl DialogueOption {
    fn from_raw(tree_id: &str, node_id: &str, raw: &RawDialogueOption) -> Self {
        let action = match (&raw.next_node, raw.action) {
            (Some(next), Some(_)) => {
                warn!(
                    "Option '{}' in {}/{} has both next_node and action, following next_node",
                    raw.text, tree_id, node_id
                );
                OptionAction::Next(next.clone())
            }
            (Some(next), None) => OptionAction::Next(next.clone()),
            (None, Some(RawOptionAction::End)) => OptionAction::End,
            (None, Some(RawOptionAction::Unknown)) | (None, None) => {
                if raw.response.is_none() {
                    warn!(
                        "Option '{}' in {}/{} leads nowhere, treating as end",
                        raw.text, tree_id, node_id
                    );
                }
                OptionAction::End
            }
        };

        Self {
            text: raw.text.clone(),
            condition: raw.condition.clone(),
            response: raw.response.clone(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogueNode {
    pub id: String,
    pub speaker: Option<String>,
    pub text: String,
    pub options: Vec<DialogueOption>,
    pub response: Option<Response>,
}

impl DialogueNode {
    /// A node with no options; the engine offers a synthetic goodbye
    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DialogueTree {
    pub id: String,
    pub name: String,
    pub start_node: String,
    pub on_start: Vec<String>,
    nodes: Vec<DialogueNode>,
    index: HashMap<String, usize>,
}

impl DialogueTree {
    pub fn from_raw(raw: &RawDialogueTree) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(raw.nodes.len());
        let mut nodes = Vec::with_capacity(raw.nodes.len());

        for (position, node) in raw.nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(LoadError::invalid(
                    ContentKind::DialogueTree,
                    &raw.id,
                    format!("node id '{}' appears twice", node.id),
                ));
            }
            nodes.push(DialogueNode {
                id: node.id.clone(),
                speaker: node.speaker.clone(),
                text: node.text.clone(),
                options: node
                    .options
                    .iter()
                    .map(|o| DialogueOption::from_raw(&raw.id, &node.id, o))
                    .collect(),
                response: node.response.clone(),
            });
        }

        if !index.contains_key(&raw.start_node) {
            return Err(LoadError::invalid(
                ContentKind::DialogueTree,
                &raw.id,
                format!("start node '{}' does not exist", raw.start_node),
            ));
        }

        Ok(Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            start_node: raw.start_node.clone(),
            on_start: raw.on_start.clone(),
            nodes,
            index,
        })
    }

    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        let raw: RawDialogueTree = serde_json::from_str(source).map_err(|source| LoadError::Json {
            path: "<inline>".into(),
            source,
        })?;
        Self::from_raw(&raw)
    }

    pub fn node(&self, node_id: &str) -> Option<&DialogueNode> {
        self.index.get(node_id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    pub fn nodes(&self) -> &[DialogueNode] {
        &self.nodes
    }

    /// Every response attached to a node or an option
    pub fn responses(&self) -> impl Iterator<Item = &Response> {
        self.nodes.iter().flat_map(|node| {
            node.response
                .iter()
                .chain(node.options.iter().filter_map(|o| o.response.as_ref()))
        })
    }

    /// Every option condition in the tree
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.nodes
            .iter()
            .flat_map(|node| node.options.iter().filter_map(|o| o.condition.as_ref()))
    }

    /// `(node, target)` pairs where an option or response names a node the
    /// tree does not have.
    pub fn dangling_targets(&self) -> Vec<(String, String)> {
        let mut dangling = Vec::new();
        for node in &self.nodes {
            let option_targets = node.options.iter().filter_map(|o| match &o.action {
                OptionAction::Next(target) => Some(target.as_str()),
                OptionAction::End => None,
            });
            let response_targets = node
                .response
                .iter()
                .chain(node.options.iter().filter_map(|o| o.response.as_ref()))
                .flat_map(|r| r.node_targets());

            for target in option_targets.chain(response_targets) {
                if !self.contains(target) {
                    dangling.push((node.id.clone(), target.to_string()));
                }
            }
        }
        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"{
        "id": "villager",
        "name": "Villager",
        "start_node": "greeting",
        "nodes": [
            {
                "id": "greeting",
                "speaker": "Villager",
                "text": "Strange times, traveler.",
                "options": [
                    { "text": "What's happened?", "next_node": "strange_events" },
                    { "text": "Never mind.", "action": "end" },
                    { "text": "Hmm.", "next_node": "strange_events", "action": "end" },
                    { "text": "...", "action": "wander_off" }
                ]
            },
            {
                "id": "strange_events",
                "text": "Lights in the cathedral at night.",
                "options": [
                    { "text": "Show me.", "next_node": "cellar" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_tree() {
        let tree = DialogueTree::from_json(TREE).unwrap();
        assert_eq!(tree.nodes().len(), 2);

        let greeting = tree.node("greeting").unwrap();
        assert_eq!(greeting.speaker.as_deref(), Some("Villager"));
        assert_eq!(greeting.options[0].action, OptionAction::Next("strange_events".to_string()));
        assert_eq!(greeting.options[1].action, OptionAction::End);
        assert_eq!(greeting.options[2].action, OptionAction::Next("strange_events".to_string()));
        assert_eq!(greeting.options[3].action, OptionAction::End);
        assert!(!greeting.is_terminal());
    }

    #[test]
    fn test_dangling_targets() {
        let tree = DialogueTree::from_json(TREE).unwrap();
        assert_eq!(
            tree.dangling_targets(),
            vec![("strange_events".to_string(), "cellar".to_string())]
        );
    }

    #[test]
    fn test_missing_start_node_rejected() {
        let err = DialogueTree::from_json(r#"{"id": "x", "name": "X", "start_node": "nowhere", "nodes": []}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidContent { kind: ContentKind::DialogueTree, .. }));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let err = DialogueTree::from_json(
            r#"{"id": "x", "name": "X", "start_node": "a", "nodes": [
                {"id": "a", "text": "one"},
                {"id": "a", "text": "two"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidContent { .. }));
    }
}
