//! Quest engine.
//!
//! Owns the player's quest instances and moves them through
//! NotStarted -> Active -> Completed | Failed. Gameplay reports
//! [`QuestEvent`]s; matching objectives advance, and a quest whose
//! objectives are all done completes on the spot and pays out its rewards.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::definition::{ItemGrant, ObjectiveKind, ObjectiveTemplate, QuestTemplate, RewardBundle};
use super::events::{ObjectiveUpdate, QuestEvent};
use super::hooks::{HookContext, HookRegistry};
use super::state::{QuestInstance, QuestLog, QuestState};
use crate::condition;
use crate::config::EngineConfig;
use crate::content::ContentStore;
use crate::error::{ContentKind, NarrativeError, Result};
use crate::world::GameContext;

/// Why an item reward did not land in the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantFailure {
    UnknownItem,
    InventoryFull,
}

/// What a reward bundle actually delivered.
///
/// Items that could not be granted are listed in `failed_items`; everything
/// else in the bundle is still applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardReceipt {
    pub gold: i64,
    pub experience: u32,
    pub items: Vec<ItemGrant>,
    pub failed_items: Vec<(ItemGrant, GrantFailure)>,
    pub reputation: Vec<(String, i32)>,
    pub unlocked_dialogues: Vec<String>,
    pub lore: Vec<String>,
}

impl RewardReceipt {
    pub fn is_complete(&self) -> bool {
        self.failed_items.is_empty()
    }
}

pub struct QuestEngine {
    content: Arc<ContentStore>,
    hooks: HookRegistry,
    active: Vec<QuestInstance>,
    completed: Vec<QuestInstance>,
    failed: Vec<QuestInstance>,
    completion_counts: HashMap<String, u32>,
    reputation: HashMap<String, i32>,
    unlocked_dialogues: BTreeSet<String>,
    log: QuestLog,
}

impl QuestEngine {
    pub fn new(content: Arc<ContentStore>, hooks: HookRegistry, config: &EngineConfig) -> Self {
        for quest in content.quests.all() {
            for name in quest.hook_names() {
                if !hooks.contains(name) {
                    warn!("Quest '{}' names unregistered hook '{}'", quest.id, name);
                }
            }
        }

        Self {
            content,
            hooks,
            active: Vec::new(),
            completed: Vec::new(),
            failed: Vec::new(),
            completion_counts: HashMap::new(),
            reputation: HashMap::new(),
            unlocked_dialogues: BTreeSet::new(),
            log: QuestLog::new(config.quest_log_limit),
        }
    }

    pub fn content(&self) -> &Arc<ContentStore> {
        &self.content
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    // ========================================================================
    // Acceptance
    // ========================================================================

    /// Check whether a quest could be accepted right now.
    pub fn can_accept(&self, quest_id: &str, world: &mut GameContext<'_>) -> Result<Arc<QuestTemplate>> {
        let template = self
            .content
            .quests
            .get(quest_id)
            .cloned()
            .ok_or_else(|| NarrativeError::not_found(ContentKind::Quest, quest_id))?;

        let state = self.quest_state(quest_id);
        if state != QuestState::NotStarted {
            return Err(NarrativeError::AlreadyInState {
                quest_id: quest_id.to_string(),
                state,
            });
        }

        let facts = world.facts(self);
        if let Some(unmet) = condition::first_unmet(&template.prerequisites, &facts) {
            return Err(NarrativeError::PrerequisiteNotMet {
                quest_id: quest_id.to_string(),
                requirement: unmet.describe(),
            });
        }

        if world.player.level() < template.min_level {
            return Err(NarrativeError::PrerequisiteNotMet {
                quest_id: quest_id.to_string(),
                requirement: format!("level {}", template.min_level),
            });
        }

        Ok(template)
    }

    pub fn accept_quest(&mut self, quest_id: &str, world: &mut GameContext<'_>) -> Result<()> {
        let template = match self.can_accept(quest_id, world) {
            Ok(template) => template,
            Err(e) => {
                debug!("Cannot accept quest {}: {}", quest_id, e);
                return Err(e);
            }
        };

        self.active.push(QuestInstance::from_template(&template));
        self.log.push(format!("Accepted: {}", template.name));
        info!("Quest accepted: {} ({})", template.name, quest_id);

        self.run_hooks(&template.on_accept, quest_id, None, world);
        Ok(())
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Apply a gameplay event to every matching incomplete objective of every
    /// active quest. Quests left with all objectives done complete here.
    pub fn record_event(&mut self, event: &QuestEvent, world: &mut GameContext<'_>) -> Vec<ObjectiveUpdate> {
        let mut updates = Vec::new();
        let mut finished = Vec::new();
        let content = Arc::clone(&self.content);

        for index in 0..self.active.len() {
            let quest_id = self.active[index].quest_id.clone();
            let Some(template) = content.quests.get(&quest_id) else {
                warn!("Active quest '{}' has no template", quest_id);
                continue;
            };

            for objective in &template.objectives {
                if !event.matches(&objective.kind) {
                    continue;
                }
                let Some(update) = self.advance_objective(index, objective, event, world) else {
                    continue;
                };
                if update.objective_completed {
                    self.log.push(format!("Objective completed: {}", objective.description));
                    self.on_objective_completed(&quest_id, objective, world);
                }
                updates.push(update);
            }

            if self.active[index].all_complete() {
                finished.push(quest_id);
            }
        }

        if !updates.is_empty() {
            debug!("{} event touched {} objective(s)", event.event_type(), updates.len());
        }

        for quest_id in finished {
            match self.complete_quest(&quest_id, world) {
                Ok(_) => {
                    if let Some(last) = updates.iter_mut().rev().find(|u| u.quest_id == quest_id) {
                        last.quest_completed = true;
                    }
                }
                Err(e) => warn!("Auto-completion of {} failed: {}", quest_id, e),
            }
        }

        updates
    }

    fn advance_objective(
        &mut self,
        index: usize,
        objective: &ObjectiveTemplate,
        event: &QuestEvent,
        world: &mut GameContext<'_>,
    ) -> Option<ObjectiveUpdate> {
        let instance = &mut self.active[index];
        let quest_id = instance.quest_id.clone();
        let progress = instance.objective_mut(&objective.id)?;
        if progress.completed {
            return None;
        }
        let before = progress.current;

        let newly_completed = match event {
            QuestEvent::Collect { item_id, .. } => progress.reconcile(world.inventory.item_count(item_id)),
            QuestEvent::Deliver { item_id, npc_id } => {
                let quantity = match &objective.kind {
                    ObjectiveKind::Deliver { quantity, .. } => *quantity,
                    _ => 1,
                };
                if !world.inventory.remove_item(item_id, quantity) {
                    debug!("Delivery of {} to {} ignored, not enough held", item_id, npc_id);
                    return None;
                }
                progress.add_progress(1)
            }
            QuestEvent::Survive { delta_seconds } => progress.add_seconds(*delta_seconds),
            QuestEvent::Craft { quantity, .. } => progress.add_progress(*quantity),
            QuestEvent::Kill { .. } | QuestEvent::Talk { .. } | QuestEvent::Explore { .. } => progress.add_progress(1),
        };

        // Only report objectives that actually moved
        if !newly_completed && progress.current == before {
            return None;
        }

        Some(ObjectiveUpdate {
            quest_id,
            objective_id: objective.id.clone(),
            progress: progress.current,
            target: progress.target,
            objective_completed: newly_completed,
            quest_completed: false,
        })
    }

    fn on_objective_completed(&mut self, quest_id: &str, objective: &ObjectiveTemplate, world: &mut GameContext<'_>) {
        info!("Objective {} of {} completed", objective.id, quest_id);

        if let Some(lore_id) = &objective.lore_id {
            world.lore.discover_lore(lore_id);
        }
        if let Some(dialogue_id) = &objective.dialogue_id {
            self.unlock_dialogue(dialogue_id);
        }
        self.run_hooks(&objective.on_complete, quest_id, Some(objective.id.as_str()), world);
    }

    // ========================================================================
    // Completion and failure
    // ========================================================================

    /// Move an active quest to Completed and issue its rewards, whether or
    /// not every objective is done.
    pub fn complete_quest(&mut self, quest_id: &str, world: &mut GameContext<'_>) -> Result<RewardReceipt> {
        let Some(index) = self.active.iter().position(|q| q.quest_id == quest_id) else {
            return Err(NarrativeError::QuestNotActive {
                quest_id: quest_id.to_string(),
                state: self.quest_state(quest_id),
            });
        };

        let mut instance = self.active.remove(index);
        instance.complete();
        let name = instance.name.clone();
        self.completed.push(instance);
        *self.completion_counts.entry(quest_id.to_string()).or_insert(0) += 1;

        self.log.push(format!("Completed: {}", name));
        info!("Quest completed: {} ({})", name, quest_id);

        let Some(template) = self.content.quests.get(quest_id).cloned() else {
            warn!("Completed quest '{}' has no template, no rewards issued", quest_id);
            return Ok(RewardReceipt::default());
        };

        let receipt = self.grant_rewards(&template.rewards, world);
        self.run_hooks(&template.on_complete, quest_id, None, world);
        Ok(receipt)
    }

    pub fn fail_quest(&mut self, quest_id: &str, reason: &str) -> Result<()> {
        let Some(index) = self.active.iter().position(|q| q.quest_id == quest_id) else {
            return Err(NarrativeError::QuestNotActive {
                quest_id: quest_id.to_string(),
                state: self.quest_state(quest_id),
            });
        };

        let mut instance = self.active.remove(index);
        instance.fail(reason);
        self.log.push(format!("Failed: {} - {}", instance.name, reason));
        info!("Quest failed: {} ({}): {}", instance.name, quest_id, reason);
        self.failed.push(instance);
        Ok(())
    }

    /// Forget a completed repeatable quest so it can be accepted again.
    pub fn reset_repeatable(&mut self, quest_id: &str) -> Result<()> {
        let template = self
            .content
            .quests
            .get(quest_id)
            .ok_or_else(|| NarrativeError::not_found(ContentKind::Quest, quest_id))?;

        if !template.is_repeatable() {
            return Err(NarrativeError::NotRepeatable {
                quest_id: quest_id.to_string(),
                reason: "not a repeatable quest".to_string(),
            });
        }

        let before = self.completed.len();
        self.completed.retain(|q| q.quest_id != quest_id);
        if self.completed.len() == before {
            return Err(NarrativeError::NotRepeatable {
                quest_id: quest_id.to_string(),
                reason: format!("quest is {}", self.quest_state(quest_id)),
            });
        }

        debug!("Repeatable quest {} reset", quest_id);
        Ok(())
    }

    // ========================================================================
    // Rewards
    // ========================================================================

    /// Apply a reward bundle. Used for quest completion and for bonus
    /// rewards attached to dialogue responses.
    pub fn grant_rewards(&mut self, rewards: &RewardBundle, world: &mut GameContext<'_>) -> RewardReceipt {
        let mut receipt = RewardReceipt::default();

        if rewards.gold != 0 {
            world.inventory.add_gold(rewards.gold);
            world.notifier.notify(&format!("Received {} gold", rewards.gold));
            receipt.gold = rewards.gold;
        }

        if rewards.experience > 0 {
            world.player.gain_experience(rewards.experience);
            world.notifier.notify(&format!("Gained {} XP", rewards.experience));
            receipt.experience = rewards.experience;
        }

        for grant in &rewards.items {
            let Some(item) = self.content.items.get(&grant.item_id) else {
                warn!("Reward item '{}' does not exist", grant.item_id);
                receipt.failed_items.push((grant.clone(), GrantFailure::UnknownItem));
                continue;
            };

            if world.inventory.add_item(item, grant.quantity) {
                let message = if grant.quantity > 1 {
                    format!("Received: {} x{}", item.display_name, grant.quantity)
                } else {
                    format!("Received: {}", item.display_name)
                };
                world.notifier.notify(&message);
                receipt.items.push(grant.clone());
            } else {
                warn!("No room for reward item '{}' x{}", grant.item_id, grant.quantity);
                world.notifier.notify("Inventory is full!");
                receipt.failed_items.push((grant.clone(), GrantFailure::InventoryFull));
            }
        }

        for (faction, delta) in &rewards.reputation {
            self.modify_reputation(faction, *delta);
            receipt.reputation.push((faction.clone(), *delta));
        }

        for dialogue_id in &rewards.unlock_dialogue {
            self.unlock_dialogue(dialogue_id);
            receipt.unlocked_dialogues.push(dialogue_id.clone());
        }

        for lore_id in &rewards.lore {
            world.lore.discover_lore(lore_id);
            receipt.lore.push(lore_id.clone());
        }

        receipt
    }

    pub fn modify_reputation(&mut self, faction: &str, delta: i32) {
        let value = self.reputation.entry(faction.to_string()).or_insert(0);
        *value = value.saturating_add(delta);
        debug!("Reputation with {} now {}", faction, value);
    }

    pub fn reputation(&self, faction: &str) -> i32 {
        self.reputation.get(faction).copied().unwrap_or(0)
    }

    pub fn unlock_dialogue(&mut self, dialogue_id: &str) {
        if self.unlocked_dialogues.insert(dialogue_id.to_string()) {
            info!("Dialogue unlocked: {}", dialogue_id);
        }
    }

    pub fn is_dialogue_unlocked(&self, dialogue_id: &str) -> bool {
        self.unlocked_dialogues.contains(dialogue_id)
    }

    pub fn unlocked_dialogues(&self) -> impl Iterator<Item = &str> {
        self.unlocked_dialogues.iter().map(String::as_str)
    }

    fn run_hooks(&self, names: &[String], source: &str, objective_id: Option<&str>, world: &mut GameContext<'_>) {
        for name in names {
            let mut ctx = HookContext {
                source,
                objective_id,
                world: &mut *world,
            };
            self.hooks.run(name, &mut ctx);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn quest_state(&self, quest_id: &str) -> QuestState {
        if self.is_completed(quest_id) {
            QuestState::Completed
        } else if self.is_active(quest_id) {
            QuestState::Active
        } else if self.is_failed(quest_id) {
            QuestState::Failed
        } else {
            QuestState::NotStarted
        }
    }

    pub fn is_active(&self, quest_id: &str) -> bool {
        self.active.iter().any(|q| q.quest_id == quest_id)
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.completed.iter().any(|q| q.quest_id == quest_id)
    }

    pub fn is_failed(&self, quest_id: &str) -> bool {
        self.failed.iter().any(|q| q.quest_id == quest_id)
    }

    pub fn instance(&self, quest_id: &str) -> Option<&QuestInstance> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .chain(self.failed.iter())
            .find(|q| q.quest_id == quest_id)
    }

    pub fn active_quests(&self) -> &[QuestInstance] {
        &self.active
    }

    pub fn completed_quests(&self) -> &[QuestInstance] {
        &self.completed
    }

    pub fn failed_quests(&self) -> &[QuestInstance] {
        &self.failed
    }

    /// How many times a quest has been completed, counting repeats
    pub fn completion_count(&self, quest_id: &str) -> u32 {
        self.completion_counts.get(quest_id).copied().unwrap_or(0)
    }

    /// Quests `npc_id` hands out that could be accepted right now. Hidden
    /// quests are never offered; they are found through dialogue.
    pub fn offered_quests(&self, npc_id: &str, world: &mut GameContext<'_>) -> Vec<Arc<QuestTemplate>> {
        self.content
            .quests
            .quests_for_npc(npc_id)
            .into_iter()
            .filter(|quest| !quest.is_hidden() && self.can_accept(&quest.id, world).is_ok())
            .collect()
    }

    /// First active quest with an incomplete talk objective aimed at `npc_id`.
    pub fn npc_quest(&self, npc_id: &str) -> Option<&QuestInstance> {
        self.npc_objective(npc_id).map(|(instance, _)| instance)
    }

    /// Dialogue the NPC should open because an active quest sends the player
    /// to talk to them.
    pub fn dialogue_for_npc(&self, npc_id: &str) -> Option<&str> {
        self.npc_objective(npc_id)
            .and_then(|(_, objective)| objective.dialogue_id.as_deref())
    }

    fn npc_objective(&self, npc_id: &str) -> Option<(&QuestInstance, &ObjectiveTemplate)> {
        self.active.iter().find_map(|instance| {
            let template = self.content.quests.get(&instance.quest_id)?;
            template
                .objectives
                .iter()
                .filter(|o| o.talks_to(npc_id))
                .find(|o| instance.objective(&o.id).is_some_and(|p| !p.completed))
                .map(|objective| (instance, objective))
        })
    }

    pub fn log(&self) -> &QuestLog {
        &self.log
    }
}
