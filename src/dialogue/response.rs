//! Dialogue responses.
//!
//! A response is the side effect attached to a node (fired on entry) or to
//! an option (fired on selection). Each kind is handled by a plain function
//! looked up in a [`ResponseTable`], so games can add kinds or swap the
//! standard handlers without touching the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ContentKind, NarrativeError, Result};
use crate::quest::{QuestEngine, QuestState, RewardBundle, RewardReceipt};
use crate::world::GameContext;

/// Flat form of a response, resolved by `TryFrom`. An unrecognised `type`
/// still parses and keeps its name.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub quest_id: Option<String>,
    pub quest_name: Option<String>,
    pub rewards: Option<RewardBundle>,
    pub item_id: Option<String>,
    pub quantity: Option<u32>,
    pub next_node: Option<String>,
    pub success_node: Option<String>,
    pub failure_node: Option<String>,
    pub not_started: Option<String>,
    pub active: Option<String>,
    pub completed: Option<String>,
    pub failed: Option<String>,
    pub default_node: Option<String>,
    pub shop_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawResponse")]
pub enum Response {
    QuestAccept {
        quest_id: String,
        quest_name: Option<String>,
    },
    QuestComplete {
        quest_id: String,
        quest_name: Option<String>,
        /// Paid on top of the quest's own rewards
        rewards: Option<RewardBundle>,
    },
    GiveItem {
        item_id: String,
        quantity: u32,
        next_node: Option<String>,
    },
    CheckItem {
        item_id: String,
        success_node: Option<String>,
        failure_node: Option<String>,
    },
    CheckQuest {
        quest_id: String,
        not_started: Option<String>,
        active: Option<String>,
        completed: Option<String>,
        failed: Option<String>,
        default_node: Option<String>,
    },
    Shop {
        shop_id: String,
    },
    /// Kind this build does not know, under its authored name
    Unknown { kind: String },
}

impl TryFrom<RawResponse> for Response {
    type Error = String;

    fn try_from(raw: RawResponse) -> std::result::Result<Self, String> {
        let kind = raw.kind.as_str();
        let required = |field: Option<String>, name: &str| field.ok_or_else(|| format!("{} needs {}", kind, name));

        let response = match kind {
            "quest_accept" => Response::QuestAccept {
                quest_id: required(raw.quest_id, "quest_id")?,
                quest_name: raw.quest_name,
            },
            "quest_complete" => Response::QuestComplete {
                quest_id: required(raw.quest_id, "quest_id")?,
                quest_name: raw.quest_name,
                rewards: raw.rewards,
            },
            "give_item" => Response::GiveItem {
                item_id: required(raw.item_id, "item_id")?,
                quantity: raw.quantity.unwrap_or(1),
                next_node: raw.next_node,
            },
            "check_item" => Response::CheckItem {
                item_id: required(raw.item_id, "item_id")?,
                success_node: raw.success_node,
                failure_node: raw.failure_node,
            },
            "check_quest" => Response::CheckQuest {
                quest_id: required(raw.quest_id, "quest_id")?,
                not_started: raw.not_started,
                active: raw.active,
                completed: raw.completed,
                failed: raw.failed,
                default_node: raw.default_node,
            },
            "shop" => Response::Shop { shop_id: required(raw.shop_id, "shop_id")? },
            _ => Response::Unknown { kind: kind.to_string() },
        };
        Ok(response)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    QuestAccept,
    QuestComplete,
    GiveItem,
    CheckItem,
    CheckQuest,
    Shop,
    Unknown,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::QuestAccept => "quest_accept",
            ResponseKind::QuestComplete => "quest_complete",
            ResponseKind::GiveItem => "give_item",
            ResponseKind::CheckItem => "check_item",
            ResponseKind::CheckQuest => "check_quest",
            ResponseKind::Shop => "shop",
            ResponseKind::Unknown => "unknown",
        }
    }
}

impl Response {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::QuestAccept { .. } => ResponseKind::QuestAccept,
            Response::QuestComplete { .. } => ResponseKind::QuestComplete,
            Response::GiveItem { .. } => ResponseKind::GiveItem,
            Response::CheckItem { .. } => ResponseKind::CheckItem,
            Response::CheckQuest { .. } => ResponseKind::CheckQuest,
            Response::Shop { .. } => ResponseKind::Shop,
            Response::Unknown { .. } => ResponseKind::Unknown,
        }
    }

    /// The `type` as authored, so unknown kinds can be named in messages
    pub fn type_name(&self) -> &str {
        match self {
            Response::Unknown { kind } => kind,
            _ => self.kind().as_str(),
        }
    }

    /// Nodes this response may jump to
    pub fn node_targets(&self) -> Vec<&str> {
        match self {
            Response::GiveItem { next_node, .. } => next_node.iter().map(String::as_str).collect(),
            Response::CheckItem {
                success_node,
                failure_node,
                ..
            } => success_node.iter().chain(failure_node.iter()).map(String::as_str).collect(),
            Response::CheckQuest {
                not_started,
                active,
                completed,
                failed,
                default_node,
                ..
            } => [not_started, active, completed, failed, default_node]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn quest_id(&self) -> Option<&str> {
        match self {
            Response::QuestAccept { quest_id, .. }
            | Response::QuestComplete { quest_id, .. }
            | Response::CheckQuest { quest_id, .. } => Some(quest_id),
            _ => None,
        }
    }

    pub fn item_ids(&self) -> Vec<&str> {
        match self {
            Response::GiveItem { item_id, .. } | Response::CheckItem { item_id, .. } => vec![item_id.as_str()],
            Response::QuestComplete { rewards: Some(bundle), .. } => {
                bundle.items.iter().map(|i| i.item_id.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// The capabilities a response handler is given.
pub struct ResponseContext<'r, 'a> {
    quests: &'r mut QuestEngine,
    world: &'r mut GameContext<'a>,
    jump: Option<String>,
    shop: Option<String>,
}

impl<'r, 'a> ResponseContext<'r, 'a> {
    pub fn new(quests: &'r mut QuestEngine, world: &'r mut GameContext<'a>) -> Self {
        Self {
            quests,
            world,
            jump: None,
            shop: None,
        }
    }

    pub fn accept_quest(&mut self, quest_id: &str) -> Result<()> {
        self.quests.accept_quest(quest_id, self.world)
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> Result<RewardReceipt> {
        self.quests.complete_quest(quest_id, self.world)
    }

    pub fn grant_rewards(&mut self, rewards: &RewardBundle) -> RewardReceipt {
        self.quests.grant_rewards(rewards, self.world)
    }

    pub fn quest_state(&self, quest_id: &str) -> QuestState {
        self.quests.quest_state(quest_id)
    }

    /// Put items in the inventory. `Ok(false)` when they do not fit.
    pub fn give_item(&mut self, item_id: &str, quantity: u32) -> Result<bool> {
        let item = self
            .quests
            .content()
            .items
            .get(item_id)
            .ok_or_else(|| NarrativeError::not_found(ContentKind::Item, item_id))?;

        if self.world.inventory.add_item(item, quantity) {
            let message = if quantity > 1 {
                format!("Received: {} x{}", item.display_name, quantity)
            } else {
                format!("Received: {}", item.display_name)
            };
            self.world.notifier.notify(&message);
            Ok(true)
        } else {
            self.world.notifier.notify("Inventory is full!");
            Ok(false)
        }
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.world.inventory.item_count(item_id) > 0
    }

    /// Ask the engine to continue at `node_id` instead of the option's own target.
    pub fn jump_to(&mut self, node_id: &str) {
        self.jump = Some(node_id.to_string());
    }

    pub fn notify(&mut self, message: &str) {
        self.world.notifier.notify(message);
    }

    /// Surface a shop request to the caller
    pub fn open_shop(&mut self, shop_id: &str) {
        self.shop = Some(shop_id.to_string());
    }

    pub(crate) fn take_jump(&mut self) -> Option<String> {
        self.jump.take()
    }

    pub(crate) fn take_shop(&mut self) -> Option<String> {
        self.shop.take()
    }
}

pub type ResponseHandler = fn(&Response, &mut ResponseContext<'_, '_>) -> Result<()>;

#[derive(Clone)]
pub struct ResponseTable {
    handlers: HashMap<ResponseKind, ResponseHandler>,
}

impl std::fmt::Debug for ResponseTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<&str> = self.handlers.keys().map(|k| k.as_str()).collect();
        f.debug_struct("ResponseTable").field("kinds", &kinds).finish()
    }
}

impl ResponseTable {
    /// A table with no handlers at all
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Handlers for every built-in kind
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(ResponseKind::QuestAccept, handle_quest_accept);
        table.register(ResponseKind::QuestComplete, handle_quest_complete);
        table.register(ResponseKind::GiveItem, handle_give_item);
        table.register(ResponseKind::CheckItem, handle_check_item);
        table.register(ResponseKind::CheckQuest, handle_check_quest);
        table.register(ResponseKind::Shop, handle_shop);
        table
    }

    pub fn register(&mut self, kind: ResponseKind, handler: ResponseHandler) {
        self.handlers.insert(kind, handler);
    }

    pub fn remove(&mut self, kind: ResponseKind) {
        self.handlers.remove(&kind);
    }

    pub fn handles(&self, kind: ResponseKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn dispatch(&self, response: &Response, ctx: &mut ResponseContext<'_, '_>) -> Result<()> {
        let Some(handler) = self.handlers.get(&response.kind()) else {
            warn!("No handler for response kind '{}'", response.type_name());
            return Err(NarrativeError::UnhandledResponseKind(response.type_name().to_string()));
        };
        debug!("Dispatching {} response", response.type_name());
        handler(response, ctx)
    }
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Standard handlers
// ============================================================================

fn handle_quest_accept(response: &Response, ctx: &mut ResponseContext<'_, '_>) -> Result<()> {
    let Response::QuestAccept { quest_id, quest_name } = response else {
        return Ok(());
    };
    ctx.accept_quest(quest_id)?;
    let name = quest_name.as_deref().unwrap_or(quest_id);
    ctx.notify(&format!("Quest accepted: {}", name));
    Ok(())
}

fn handle_quest_complete(response: &Response, ctx: &mut ResponseContext<'_, '_>) -> Result<()> {
    let Response::QuestComplete {
        quest_id,
        quest_name,
        rewards,
    } = response
    else {
        return Ok(());
    };
    ctx.complete_quest(quest_id)?;
    let name = quest_name.as_deref().unwrap_or(quest_id);
    ctx.notify(&format!("Quest completed: {}", name));
    if let Some(bonus) = rewards {
        ctx.grant_rewards(bonus);
    }
    Ok(())
}

fn handle_give_item(response: &Response, ctx: &mut ResponseContext<'_, '_>) -> Result<()> {
    let Response::GiveItem {
        item_id,
        quantity,
        next_node,
    } = response
    else {
        return Ok(());
    };
    // The continuation only follows a grant that landed
    if ctx.give_item(item_id, *quantity)? {
        if let Some(next) = next_node {
            ctx.jump_to(next);
        }
    }
    Ok(())
}

fn handle_check_item(response: &Response, ctx: &mut ResponseContext<'_, '_>) -> Result<()> {
    let Response::CheckItem {
        item_id,
        success_node,
        failure_node,
    } = response
    else {
        return Ok(());
    };
    let target = if ctx.has_item(item_id) { success_node } else { failure_node };
    if let Some(node) = target {
        ctx.jump_to(node);
    }
    Ok(())
}

fn handle_check_quest(response: &Response, ctx: &mut ResponseContext<'_, '_>) -> Result<()> {
    let Response::CheckQuest {
        quest_id,
        not_started,
        active,
        completed,
        failed,
        default_node,
    } = response
    else {
        return Ok(());
    };
    let specific = match ctx.quest_state(quest_id) {
        QuestState::NotStarted => not_started,
        QuestState::Active => active,
        QuestState::Completed => completed,
        QuestState::Failed => failed,
    };
    if let Some(node) = specific.as_ref().or(default_node.as_ref()) {
        ctx.jump_to(node);
    }
    Ok(())
}

fn handle_shop(response: &Response, ctx: &mut ResponseContext<'_, '_>) -> Result<()> {
    let Response::Shop { shop_id } = response else {
        return Ok(());
    };
    info!("Opening shop: {}", shop_id);
    ctx.open_shop(shop_id);
    Ok(())
}
