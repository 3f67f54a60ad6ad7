//! Facade over both engines for the surrounding game loop.
//!
//! Owns the shared [`ContentStore`], the [`QuestEngine`] and the
//! [`DialogueEngine`], and routes NPC interaction between them. Game state
//! is never owned here; every call borrows it through a [`GameContext`].

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::EngineConfig;
use crate::content::ContentStore;
use crate::dialogue::{Actor, DialogueEngine, DialogueOutcome, FrameInput};
use crate::error::{ContentKind, LoadError, NarrativeError, Result};
use crate::npc::NpcDefinition;
use crate::quest::{HookRegistry, ObjectiveUpdate, QuestEngine, QuestEvent, QuestState};
use crate::world::GameContext;

pub struct Narrative {
    content: Arc<ContentStore>,
    quests: QuestEngine,
    dialogue: DialogueEngine,
}

impl Narrative {
    pub fn new(content: Arc<ContentStore>, hooks: HookRegistry, config: &EngineConfig) -> Self {
        Self {
            quests: QuestEngine::new(Arc::clone(&content), hooks, config),
            dialogue: DialogueEngine::new(Arc::clone(&content), config),
            content,
        }
    }

    /// Load content from `config.data_dir` and wire up the built-in hooks
    pub fn load(config: &EngineConfig) -> std::result::Result<Self, LoadError> {
        let content = ContentStore::load_from_directory(&config.data_dir)?;
        Ok(Self::new(Arc::new(content), HookRegistry::with_builtins(), config))
    }

    pub fn content(&self) -> &Arc<ContentStore> {
        &self.content
    }

    pub fn quests(&self) -> &QuestEngine {
        &self.quests
    }

    pub fn quests_mut(&mut self) -> &mut QuestEngine {
        &mut self.quests
    }

    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    pub fn dialogue_mut(&mut self) -> &mut DialogueEngine {
        &mut self.dialogue
    }

    pub fn is_in_conversation(&self) -> bool {
        self.dialogue.is_active()
    }

    // ========================================================================
    // NPC interaction
    // ========================================================================

    /// Talk to an NPC.
    ///
    /// Picks the conversation first (a quest asking to talk to this NPC wins
    /// over the NPC's own dialogue), then records the talk event, then opens
    /// the conversation.
    pub fn interact(&mut self, npc_id: &str, world: &mut GameContext<'_>) -> Result<DialogueOutcome> {
        if let Some(tree_id) = self.dialogue.current_tree_id() {
            return Err(NarrativeError::AlreadyActive {
                tree_id: tree_id.to_string(),
            });
        }

        let content = Arc::clone(&self.content);
        let npc = content
            .npc(npc_id)
            .ok_or_else(|| NarrativeError::not_found(ContentKind::Npc, npc_id))?;

        let tree_id = self.dialogue_for(npc).to_string();
        let updates = self.quests.record_event(&QuestEvent::talk(npc_id), world);
        debug!("Talking to {} opens {} ({} objective updates)", npc.id, tree_id, updates.len());

        let actor = Actor::new(&npc.id, &npc.display_name);
        self.dialogue.start_conversation(&tree_id, actor, &mut self.quests, world)
    }

    /// Which tree talking to `npc` would open right now
    pub fn dialogue_for<'n>(&'n self, npc: &'n NpcDefinition) -> &'n str {
        if npc.is_quest_giver() {
            if let Some(tree_id) = self.quests.dialogue_for_npc(&npc.id) {
                return tree_id;
            }
        }
        npc.current_dialogue(|id| self.quests.is_dialogue_unlocked(id))
    }

    // ========================================================================
    // Pass-throughs for the game loop
    // ========================================================================

    pub fn start_conversation(
        &mut self,
        tree_id: &str,
        actor: Actor,
        world: &mut GameContext<'_>,
    ) -> Result<DialogueOutcome> {
        self.dialogue.start_conversation(tree_id, actor, &mut self.quests, world)
    }

    pub fn select_option(&mut self, index: usize, world: &mut GameContext<'_>) -> Result<DialogueOutcome> {
        self.dialogue.select_option(index, &mut self.quests, world)
    }

    pub fn end_conversation(&mut self) {
        self.dialogue.end_conversation();
    }

    pub fn per_frame_input_tick(
        &mut self,
        input: FrameInput,
        dt: Duration,
        world: &mut GameContext<'_>,
    ) -> Result<Option<DialogueOutcome>> {
        self.dialogue.per_frame_input_tick(input, dt, &mut self.quests, world)
    }

    /// Route a gameplay event to quest objectives. An open conversation has
    /// its options re-evaluated, since the facts behind them may have moved.
    pub fn record_event(&mut self, event: &QuestEvent, world: &mut GameContext<'_>) -> Vec<ObjectiveUpdate> {
        let updates = self.quests.record_event(event, world);
        if !updates.is_empty() && self.dialogue.is_active() {
            self.dialogue.refresh_options(&self.quests, world);
        }
        updates
    }

    pub fn accept_quest(&mut self, quest_id: &str, world: &mut GameContext<'_>) -> Result<()> {
        self.quests.accept_quest(quest_id, world)
    }

    pub fn quest_state(&self, quest_id: &str) -> QuestState {
        self.quests.quest_state(quest_id)
    }
}
