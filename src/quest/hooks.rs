//! Named hooks.
//!
//! Content refers to side effects by name (`on_accept`, `on_complete`,
//! dialogue `on_start`). The embedding game registers plain functions under
//! those names; a name with no function is logged and skipped.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::world::GameContext;

/// What a hook gets to see and touch.
pub struct HookContext<'c, 'a> {
    /// Quest id, or dialogue tree id for `on_start` hooks
    pub source: &'c str,
    pub objective_id: Option<&'c str>,
    pub world: &'c mut GameContext<'a>,
}

pub type HookFn = fn(&mut HookContext<'_, '_>);

#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, HookFn>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.hooks.keys().collect();
        names.sort();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}

impl HookRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the hooks the bundled content names.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("cathedral_depths_unlocked", cathedral_depths_unlocked);
        registry.register("log_conversation_start", log_conversation_start);
        registry.register("announce_hidden_quest", announce_hidden_quest);
        registry
    }

    pub fn register(&mut self, name: &str, hook: HookFn) {
        if self.hooks.insert(name.to_string(), hook).is_some() {
            debug!("Hook '{}' replaced", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Run a hook by name. Returns false when nothing is registered under it.
    pub fn run(&self, name: &str, ctx: &mut HookContext<'_, '_>) -> bool {
        match self.hooks.get(name) {
            Some(hook) => {
                debug!("Running hook '{}' for {}", name, ctx.source);
                hook(ctx);
                true
            }
            None => {
                warn!("Hook '{}' requested by {} is not registered", name, ctx.source);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

fn cathedral_depths_unlocked(ctx: &mut HookContext<'_, '_>) {
    ctx.world.notifier.notify("The cathedral depths are now accessible");
}

fn log_conversation_start(ctx: &mut HookContext<'_, '_>) {
    info!("Beginning conversation: {}", ctx.source);
}

fn announce_hidden_quest(ctx: &mut HookContext<'_, '_>) {
    ctx.world.notifier.notify("You have uncovered a hidden quest");
}
