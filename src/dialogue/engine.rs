//! Dialogue engine.
//!
//! Runs at most one conversation at a time. Entering a node records it in
//! the history, restarts the typewriter reveal and fires the node's
//! response; a response may redirect to another node, which is entered the
//! same way up to `max_auto_jumps` times. Option visibility is recomputed
//! whenever a node is shown.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::definition::{DialogueNode, DialogueTree, OptionAction};
use super::response::{Response, ResponseContext, ResponseTable};
use super::typing::TypingReveal;
use crate::condition::{self, FactSource};
use crate::config::EngineConfig;
use crate::content::ContentStore;
use crate::error::{ContentKind, NarrativeError, Result};
use crate::quest::{HookContext, QuestEngine};
use crate::world::GameContext;

/// Label of the option offered on nodes that have nothing else to pick
pub const GOODBYE_TEXT: &str = "Goodbye";

/// Who the player is talking to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    /// A node's text as it was shown
    Line { speaker: String, text: String },
    /// An option the player picked
    Choice { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleOption {
    /// Index into the node's authored options; `None` for the synthetic goodbye
    pub source: Option<usize>,
    pub text: String,
}

impl VisibleOption {
    pub fn goodbye() -> Self {
        Self {
            source: None,
            text: GOODBYE_TEXT.to_string(),
        }
    }
}

/// What happened as a result of starting a conversation or picking an option
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogueOutcome {
    /// Node now on screen; `None` once the conversation has ended
    pub node_id: Option<String>,
    pub ended: bool,
    /// Shop a response asked the game to open
    pub shop: Option<String>,
    /// Responses that failed; the conversation carried on regardless
    pub errors: Vec<NarrativeError>,
}

/// Input sampled for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Number key 1-9 pressed this frame
    pub digit: Option<u8>,
    /// Reveal the rest of the node text
    pub skip: bool,
}

#[derive(Debug)]
struct Conversation {
    id: Uuid,
    tree: Arc<DialogueTree>,
    node_id: String,
    actor: Actor,
    visible: Vec<VisibleOption>,
    history: VecDeque<HistoryEntry>,
    typing: TypingReveal,
    started_at: DateTime<Utc>,
}

/// Borrowed snapshot of the active conversation for rendering
#[derive(Debug, Clone)]
pub struct ConversationView<'a> {
    pub id: Uuid,
    pub tree_id: &'a str,
    pub actor: &'a Actor,
    pub node_id: &'a str,
    pub speaker: &'a str,
    /// Portion of the node text revealed so far
    pub text: &'a str,
    pub typing_complete: bool,
    pub options: &'a [VisibleOption],
}

pub struct DialogueEngine {
    content: Arc<ContentStore>,
    responses: ResponseTable,
    conversation: Option<Conversation>,
    history_limit: usize,
    typing_ms_per_char: u64,
    max_auto_jumps: usize,
}

impl DialogueEngine {
    pub fn new(content: Arc<ContentStore>, config: &EngineConfig) -> Self {
        Self {
            content,
            responses: ResponseTable::standard(),
            conversation: None,
            history_limit: config.history_limit.max(1),
            typing_ms_per_char: config.typing_ms_per_char,
            max_auto_jumps: config.max_auto_jumps,
        }
    }

    pub fn responses_mut(&mut self) -> &mut ResponseTable {
        &mut self.responses
    }

    pub fn is_active(&self) -> bool {
        self.conversation.is_some()
    }

    // ========================================================================
    // Conversation lifecycle
    // ========================================================================

    pub fn start_conversation(
        &mut self,
        tree_id: &str,
        actor: Actor,
        quests: &mut QuestEngine,
        world: &mut GameContext<'_>,
    ) -> Result<DialogueOutcome> {
        if let Some(active) = &self.conversation {
            return Err(NarrativeError::AlreadyActive {
                tree_id: active.tree.id.clone(),
            });
        }

        let tree = self
            .content
            .dialogues
            .get(tree_id)
            .ok_or_else(|| NarrativeError::not_found(ContentKind::DialogueTree, tree_id))?;

        let id = Uuid::new_v4();
        info!("Conversation {} started: {} with {}", id, tree.id, actor.name);

        self.conversation = Some(Conversation {
            id,
            tree: Arc::clone(&tree),
            node_id: tree.start_node.clone(),
            actor,
            visible: Vec::new(),
            history: VecDeque::new(),
            typing: TypingReveal::new("", 0),
            started_at: Utc::now(),
        });

        for name in &tree.on_start {
            let mut ctx = HookContext {
                source: &tree.id,
                objective_id: None,
                world: &mut *world,
            };
            quests.hooks().run(name, &mut ctx);
        }

        let mut outcome = DialogueOutcome::default();
        self.enter_node(&tree.start_node, quests, world, &mut outcome);
        Ok(outcome)
    }

    /// Pick one of the currently visible options by position.
    ///
    /// The option's response runs first; a jump it requests wins over the
    /// option's own target. If the resulting node does not exist the
    /// conversation stays where it was and `ContentNotFound` is returned.
    pub fn select_option(
        &mut self,
        index: usize,
        quests: &mut QuestEngine,
        world: &mut GameContext<'_>,
    ) -> Result<DialogueOutcome> {
        let Some(conv) = self.conversation.as_mut() else {
            return Err(NarrativeError::InvalidOption { index, visible: 0 });
        };
        let Some(choice) = conv.visible.get(index).cloned() else {
            return Err(NarrativeError::InvalidOption {
                index,
                visible: conv.visible.len(),
            });
        };

        push_bounded(
            &mut conv.history,
            self.history_limit,
            HistoryEntry::Choice {
                text: choice.text.clone(),
            },
        );
        let tree = Arc::clone(&conv.tree);
        let current = conv.node_id.clone();
        debug!("Option {} picked at {}/{}: {}", index, tree.id, current, choice.text);

        let mut outcome = DialogueOutcome::default();
        let option = choice
            .source
            .and_then(|i| tree.node(&current).and_then(|node| node.options.get(i)));

        let Some(option) = option else {
            self.end_conversation();
            outcome.ended = true;
            return Ok(outcome);
        };

        let jump = match &option.response {
            Some(response) => self.dispatch(response, quests, world, &mut outcome),
            None => None,
        };
        let next = jump.or_else(|| match &option.action {
            OptionAction::Next(node_id) => Some(node_id.clone()),
            OptionAction::End => None,
        });

        match next {
            Some(target) if tree.contains(&target) => {
                self.enter_node(&target, quests, world, &mut outcome);
            }
            Some(target) => {
                warn!("Option in {}/{} leads to missing node '{}'", tree.id, current, target);
                self.refresh_options(quests, world);
                return Err(NarrativeError::not_found(ContentKind::DialogueNode, target));
            }
            None => {
                self.end_conversation();
                outcome.ended = true;
            }
        }

        Ok(outcome)
    }

    pub fn end_conversation(&mut self) {
        if let Some(conv) = self.conversation.take() {
            let seconds = (Utc::now() - conv.started_at).num_seconds();
            info!(
                "Conversation {} ended: {} at {} after {}s",
                conv.id, conv.tree.id, conv.node_id, seconds
            );
        }
    }

    /// Per-frame driver: advances the text reveal, honours skip, and maps
    /// number keys 1-9 onto visible options. Keys past the last option are
    /// ignored.
    pub fn per_frame_input_tick(
        &mut self,
        input: FrameInput,
        dt: Duration,
        quests: &mut QuestEngine,
        world: &mut GameContext<'_>,
    ) -> Result<Option<DialogueOutcome>> {
        let Some(conv) = self.conversation.as_mut() else {
            return Ok(None);
        };

        conv.typing.tick(dt);
        if input.skip {
            conv.typing.skip();
        }

        let Some(digit) = input.digit.filter(|d| (1..=9).contains(d)) else {
            return Ok(None);
        };
        let index = usize::from(digit - 1);
        if index >= conv.visible.len() {
            return Ok(None);
        }

        self.select_option(index, quests, world).map(Some)
    }

    /// Re-evaluate option conditions for the current node.
    pub fn refresh_options(&mut self, quests: &QuestEngine, world: &mut GameContext<'_>) {
        let Some(conv) = self.conversation.as_mut() else {
            return;
        };
        let tree = Arc::clone(&conv.tree);
        let Some(node) = tree.node(&conv.node_id) else {
            return;
        };
        let mut facts = world.facts(quests);
        conv.visible = visible_options(node, &mut facts);
    }

    // ========================================================================
    // Node entry
    // ========================================================================

    fn enter_node(
        &mut self,
        node_id: &str,
        quests: &mut QuestEngine,
        world: &mut GameContext<'_>,
        outcome: &mut DialogueOutcome,
    ) {
        let mut target = node_id.to_string();
        let mut jumps = 0;

        loop {
            let Some(conv) = self.conversation.as_mut() else {
                return;
            };
            let tree = Arc::clone(&conv.tree);
            let Some(node) = tree.node(&target) else {
                warn!("Jump to missing node '{}' in {}, staying at {}", target, tree.id, conv.node_id);
                outcome
                    .errors
                    .push(NarrativeError::not_found(ContentKind::DialogueNode, target));
                break;
            };

            conv.node_id = node.id.clone();
            conv.typing = TypingReveal::new(&node.text, self.typing_ms_per_char);
            let speaker = node.speaker.clone().unwrap_or_else(|| conv.actor.name.clone());
            push_bounded(
                &mut conv.history,
                self.history_limit,
                HistoryEntry::Line {
                    speaker,
                    text: node.text.clone(),
                },
            );
            debug!("Entered node {}/{}", tree.id, node.id);

            let Some(response) = &node.response else {
                break;
            };
            let Some(next) = self.dispatch(response, quests, world, outcome) else {
                break;
            };
            if jumps >= self.max_auto_jumps {
                warn!(
                    "Jump chain in {} stopped at {} after {} hops",
                    tree.id, node.id, jumps
                );
                break;
            }
            jumps += 1;
            target = next;
        }

        self.refresh_options(quests, world);
        outcome.node_id = self.current_node_id().map(str::to_string);
    }

    fn dispatch(
        &self,
        response: &Response,
        quests: &mut QuestEngine,
        world: &mut GameContext<'_>,
        outcome: &mut DialogueOutcome,
    ) -> Option<String> {
        let mut ctx = ResponseContext::new(quests, world);
        if let Err(e) = self.responses.dispatch(response, &mut ctx) {
            warn!("{} response failed: {}", response.type_name(), e);
            outcome.errors.push(e);
        }
        if let Some(shop) = ctx.take_shop() {
            outcome.shop = Some(shop);
        }
        ctx.take_jump()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn view(&self) -> Option<ConversationView<'_>> {
        let conv = self.conversation.as_ref()?;
        let node = conv.tree.node(&conv.node_id)?;
        Some(ConversationView {
            id: conv.id,
            tree_id: &conv.tree.id,
            actor: &conv.actor,
            node_id: &node.id,
            speaker: node.speaker.as_deref().unwrap_or(&conv.actor.name),
            text: conv.typing.visible(&node.text),
            typing_complete: conv.typing.is_complete(),
            options: &conv.visible,
        })
    }

    pub fn current_node(&self) -> Option<&DialogueNode> {
        let conv = self.conversation.as_ref()?;
        conv.tree.node(&conv.node_id)
    }

    pub fn current_node_id(&self) -> Option<&str> {
        self.conversation.as_ref().map(|c| c.node_id.as_str())
    }

    pub fn current_tree_id(&self) -> Option<&str> {
        self.conversation.as_ref().map(|c| c.tree.id.as_str())
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.conversation.as_ref().map(|c| &c.actor)
    }

    pub fn visible_options(&self) -> &[VisibleOption] {
        self.conversation.as_ref().map(|c| c.visible.as_slice()).unwrap_or(&[])
    }

    /// Oldest first
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.conversation.iter().flat_map(|c| c.history.iter())
    }
}

/// Options of `node` whose conditions hold right now, in authored order.
/// A node with nothing to pick offers a single goodbye.
pub fn visible_options(node: &DialogueNode, facts: &mut dyn FactSource) -> Vec<VisibleOption> {
    let mut visible = Vec::new();
    for (i, option) in node.options.iter().enumerate() {
        let shown = match &option.condition {
            Some(condition) => condition::evaluate(condition, &mut *facts),
            None => true,
        };
        if shown {
            visible.push(VisibleOption {
                source: Some(i),
                text: option.text.clone(),
            });
        }
    }
    if visible.is_empty() {
        visible.push(VisibleOption::goodbye());
    }
    visible
}

fn push_bounded(history: &mut VecDeque<HistoryEntry>, limit: usize, entry: HistoryEntry) {
    while history.len() >= limit {
        history.pop_front();
    }
    history.push_back(entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::shipped_content;
    use crate::dialogue::response::ResponseKind;
    use crate::quest::{HookRegistry, QuestState};
    use crate::sandbox::Sandbox;
    use crate::world::Inventory;

    struct Rig {
        dialogue: DialogueEngine,
        quests: QuestEngine,
        sandbox: Sandbox,
    }

    impl Rig {
        fn new(config: EngineConfig) -> Self {
            Self::with_content(shipped_content(), config)
        }

        fn with_content(content: Arc<ContentStore>, config: EngineConfig) -> Self {
            Self {
                dialogue: DialogueEngine::new(Arc::clone(&content), &config),
                quests: QuestEngine::new(content, HookRegistry::with_builtins(), &config),
                sandbox: Sandbox::new(20),
            }
        }

        fn start(&mut self, tree_id: &str) -> Result<DialogueOutcome> {
            let mut world = self.sandbox.context();
            self.dialogue
                .start_conversation(tree_id, Actor::new(tree_id, "Stranger"), &mut self.quests, &mut world)
        }

        fn pick(&mut self, index: usize) -> Result<DialogueOutcome> {
            let mut world = self.sandbox.context();
            self.dialogue.select_option(index, &mut self.quests, &mut world)
        }

        fn option_texts(&self) -> Vec<String> {
            self.dialogue.visible_options().iter().map(|o| o.text.clone()).collect()
        }
    }

    #[test]
    fn test_villager_gives_berries_on_entry() {
        let mut rig = Rig::new(EngineConfig::default());
        rig.start("villager").unwrap();
        assert_eq!(rig.dialogue.current_node_id(), Some("greeting"));

        rig.pick(0).unwrap();
        rig.pick(0).unwrap();
        assert_eq!(rig.sandbox.backpack.item_count("berries"), 0);
        let outcome = rig.pick(0).unwrap();
        assert_eq!(outcome.node_id.as_deref(), Some("advice"));
        assert_eq!(rig.sandbox.backpack.item_count("berries"), 3);
    }

    #[test]
    fn test_end_option_and_goodbye() {
        let mut rig = Rig::new(EngineConfig::default());
        rig.start("villager").unwrap();
        let last = rig.dialogue.visible_options().len() - 1;
        let outcome = rig.pick(last).unwrap();
        assert!(outcome.ended);
        assert!(!rig.dialogue.is_active());

        // Terminal node: synthetic goodbye closes the conversation
        rig.start("hymn_of_dawn_ghost").unwrap();
        rig.pick(0).unwrap();
        rig.pick(1).unwrap();
        assert_eq!(rig.sandbox.backpack.item_count("hymn_of_dawn"), 1);
        let outcome = rig.pick(0).unwrap();
        assert_eq!(outcome.node_id.as_deref(), Some("guardian_farewell"));
        assert!(rig.dialogue.current_node().unwrap().is_terminal());
        assert_eq!(rig.option_texts(), vec![GOODBYE_TEXT.to_string()]);
        assert!(rig.pick(0).unwrap().ended);
    }

    #[test]
    fn test_give_item_continuation_needs_room() {
        let mut rig = Rig::new(EngineConfig::default());
        rig.sandbox = Sandbox::new(0);
        rig.start("rootweaver").unwrap();
        rig.pick(1).unwrap();

        // No room: the option falls back to its own action and ends
        let outcome = rig.pick(0).unwrap();
        assert!(outcome.ended);
        assert!(outcome.node_id.is_none());
        assert!(!rig.dialogue.is_active());
        assert_eq!(rig.sandbox.notifications.latest(), Some("Inventory is full!"));

        rig.sandbox = Sandbox::new(20);
        rig.start("rootweaver").unwrap();
        rig.pick(1).unwrap();
        let outcome = rig.pick(0).unwrap();
        assert_eq!(outcome.node_id.as_deref(), Some("ancient_memories"));
        assert_eq!(rig.sandbox.backpack.item_count("root_memory"), 1);
    }

    #[test]
    fn test_auto_jump_chain_is_capped() {
        let tree = DialogueTree::from_json(
            r#"{
                "id": "echo_chamber",
                "name": "Echo Chamber",
                "start_node": "call",
                "nodes": [
                    {
                        "id": "call",
                        "text": "Hello?",
                        "response": {"type": "check_item", "item_id": "berries", "success_node": "answer", "failure_node": "answer"}
                    },
                    {
                        "id": "answer",
                        "text": "...hello?",
                        "response": {"type": "check_quest", "quest_id": "echoes_of_past", "default_node": "call"}
                    }
                ]
            }"#,
        )
        .unwrap();
        let mut content = ContentStore::new();
        content.dialogues.insert(tree).unwrap();
        let mut rig = Rig::with_content(Arc::new(content), EngineConfig::default().with_max_auto_jumps(3));

        let outcome = rig.start("echo_chamber").unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.node_id.as_deref(), Some("answer"));
        assert_eq!(rig.dialogue.current_node_id(), Some("answer"));

        let lines: Vec<&str> = rig
            .dialogue
            .history()
            .map(|entry| match entry {
                HistoryEntry::Line { text, .. } => text.as_str(),
                HistoryEntry::Choice { text } => text.as_str(),
            })
            .collect();
        assert_eq!(lines, vec!["Hello?", "...hello?", "Hello?", "...hello?"]);
        assert_eq!(rig.option_texts(), vec![GOODBYE_TEXT.to_string()]);
    }

    #[test]
    fn test_invalid_option_and_already_active() {
        let mut rig = Rig::new(EngineConfig::default());
        assert_eq!(rig.pick(0), Err(NarrativeError::InvalidOption { index: 0, visible: 0 }));

        rig.start("villager").unwrap();
        let visible = rig.dialogue.visible_options().len();
        assert_eq!(rig.pick(visible), Err(NarrativeError::InvalidOption { index: visible, visible }));
        assert_eq!(rig.dialogue.current_node_id(), Some("greeting"));

        assert!(matches!(rig.start("rootweaver"), Err(NarrativeError::AlreadyActive { .. })));
        assert_eq!(rig.dialogue.current_tree_id(), Some("villager"));

        rig.dialogue.end_conversation();
        assert!(matches!(
            rig.start("nobody"),
            Err(NarrativeError::ContentNotFound { kind: ContentKind::DialogueTree, .. })
        ));
    }

    #[test]
    fn test_quest_accept_through_dialogue() {
        let mut rig = Rig::new(EngineConfig::default());
        rig.start("elder_guardian").unwrap();

        // history -> fate -> remnants -> worthiness, which accepts on entry
        for _ in 0..3 {
            rig.pick(0).unwrap();
        }
        assert_eq!(rig.quests.quest_state("echoes_of_past"), QuestState::NotStarted);
        let outcome = rig.pick(0).unwrap();
        assert_eq!(outcome.node_id.as_deref(), Some("worthiness_test"));
        assert!(outcome.errors.is_empty());
        assert_eq!(rig.quests.quest_state("echoes_of_past"), QuestState::Active);
        assert_eq!(rig.sandbox.notifications.latest(), Some("Quest accepted: Echoes of the Past"));

        let farewell = rig
            .option_texts()
            .iter()
            .position(|t| t.starts_with("I will find"))
            .unwrap();
        assert!(rig.pick(farewell).unwrap().ended);
    }

    #[test]
    fn test_conditions_refresh_on_entry() {
        let mut rig = Rig::new(EngineConfig::default());
        rig.start("elder_guardian").unwrap();
        let before = rig.option_texts();
        rig.dialogue.end_conversation();

        {
            let mut world = rig.sandbox.context();
            rig.quests.accept_quest("echoes_of_past", &mut world).unwrap();
        }
        rig.start("elder_guardian").unwrap();
        let after = rig.option_texts();
        assert!(after.len() > before.len());
        assert!(after.iter().any(|t| t.contains("Hymn of Dawn")));
    }

    #[test]
    fn test_missing_response_handler_is_reported() {
        let mut rig = Rig::new(EngineConfig::default());
        rig.dialogue.responses_mut().remove(ResponseKind::GiveItem);
        rig.start("villager").unwrap();
        rig.pick(0).unwrap();
        rig.pick(0).unwrap();
        let outcome = rig.pick(0).unwrap();
        assert_eq!(
            outcome.errors,
            vec![NarrativeError::UnhandledResponseKind("give_item".to_string())]
        );
        assert_eq!(outcome.node_id.as_deref(), Some("advice"));
        assert_eq!(rig.sandbox.backpack.item_count("berries"), 0);
    }

    #[test]
    fn test_misspelled_response_is_named() {
        let tree = DialogueTree::from_json(
            r#"{
                "id": "shrine",
                "name": "Shrine",
                "start_node": "altar",
                "nodes": [{
                    "id": "altar",
                    "text": "The altar hums.",
                    "options": [
                        {"text": "Pray", "response": {"type": "give_itme", "item_id": "berries"}, "next_node": "altar"},
                        {"text": "Pray harder", "condition": {"type": "has_iten", "item_id": "berries"}, "next_node": "altar"}
                    ]
                }]
            }"#,
        )
        .unwrap();
        let mut content = ContentStore::new();
        content.dialogues.insert(tree).unwrap();

        let problems = content.validate_references();
        assert!(problems.contains(&"Dialogue 'shrine' has a response of unknown type 'give_itme'".to_string()));
        assert!(problems.contains(&"Dialogue 'shrine' has a condition of unknown type 'has_iten'".to_string()));

        let mut rig = Rig::with_content(Arc::new(content), EngineConfig::default());
        rig.start("shrine").unwrap();
        assert_eq!(rig.option_texts(), vec!["Pray".to_string(), "Pray harder".to_string()]);
        let outcome = rig.pick(0).unwrap();
        assert_eq!(
            outcome.errors,
            vec![NarrativeError::UnhandledResponseKind("give_itme".to_string())]
        );
        assert_eq!(outcome.node_id.as_deref(), Some("altar"));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut rig = Rig::new(EngineConfig::default().with_history_limit(3));
        rig.start("villager").unwrap();
        rig.pick(0).unwrap();
        rig.pick(0).unwrap();
        let history: Vec<&HistoryEntry> = rig.dialogue.history().collect();
        assert_eq!(history.len(), 3);
        assert!(matches!(history[2], HistoryEntry::Line { .. }));
    }

    #[test]
    fn test_frame_input() {
        let mut rig = Rig::new(EngineConfig::default());
        rig.start("villager").unwrap();
        let mut world = rig.sandbox.context();

        let view = rig.dialogue.view().unwrap();
        assert_eq!(view.text, "");
        assert!(!view.typing_complete);

        let idle = FrameInput::default();
        rig.dialogue
            .per_frame_input_tick(idle, Duration::from_millis(90), &mut rig.quests, &mut world)
            .unwrap();
        assert_eq!(rig.dialogue.view().unwrap().text.chars().count(), 3);

        let skip = FrameInput { digit: None, skip: true };
        rig.dialogue
            .per_frame_input_tick(skip, Duration::ZERO, &mut rig.quests, &mut world)
            .unwrap();
        assert!(rig.dialogue.view().unwrap().typing_complete);

        // Key 9 with fewer options is ignored, key 1 picks the first
        let nine = FrameInput { digit: Some(9), skip: false };
        let outcome = rig
            .dialogue
            .per_frame_input_tick(nine, Duration::ZERO, &mut rig.quests, &mut world)
            .unwrap();
        assert!(outcome.is_none());

        let one = FrameInput { digit: Some(1), skip: false };
        let outcome = rig
            .dialogue
            .per_frame_input_tick(one, Duration::ZERO, &mut rig.quests, &mut world)
            .unwrap();
        assert_eq!(outcome.unwrap().node_id.as_deref(), Some("strange_events"));
    }
}
