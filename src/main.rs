use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use narrative_engine::dialogue::{DialogueOutcome, FrameInput, HistoryEntry};
use narrative_engine::quest::{ObjectiveUpdate, QuestEvent};
use narrative_engine::sandbox::Sandbox;
use narrative_engine::world::Inventory;
use narrative_engine::{EngineConfig, Narrative};

const CONFIG_PATH: &str = "narrative.toml";
const TICK: Duration = Duration::from_millis(50); // 20 Hz

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Command {
    /// Open a conversation with an NPC
    Talk(String),
    /// Number key for a visible option
    Choose(u8),
    Skip,
    Leave,
    Accept(String),
    /// Put items in the backpack without reporting an event
    Give { item_id: String, quantity: u32 },
    Event(QuestEvent),
    Quests,
    Log,
    History,
    Inventory,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Err("empty command".to_string());
        };

        if let Ok(digit) = verb.parse::<u8>() {
            return if (1..=9).contains(&digit) && args.is_empty() {
                Ok(Command::Choose(digit))
            } else {
                Err(format!("options are numbered 1-9, got '{}'", line.trim()))
            };
        }

        let arg = |i: usize| args.get(i).map(|s| s.to_string()).ok_or_else(|| format!("'{}' needs more arguments", verb));
        let quantity = |i: usize| match args.get(i) {
            Some(raw) => raw.parse::<u32>().map_err(|_| format!("'{}' is not a quantity", raw)),
            None => Ok(1),
        };

        let command = match verb {
            "talk" => Command::Talk(arg(0)?),
            "skip" => Command::Skip,
            "leave" | "bye" => Command::Leave,
            "accept" => Command::Accept(arg(0)?),
            "give" => Command::Give {
                item_id: arg(0)?,
                quantity: quantity(1)?,
            },
            "kill" => Command::Event(QuestEvent::kill(&arg(0)?)),
            "collect" => Command::Event(QuestEvent::collect(&arg(0)?, quantity(1)?)),
            "explore" => Command::Event(QuestEvent::explore(&arg(0)?)),
            "deliver" => Command::Event(QuestEvent::deliver(&arg(0)?, &arg(1)?)),
            "craft" => Command::Event(QuestEvent::craft(&arg(0)?, quantity(1)?)),
            "survive" => {
                let seconds = arg(0)?;
                let seconds = seconds
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a number of seconds", seconds))?;
                Command::Event(QuestEvent::survive(seconds))
            }
            "quests" => Command::Quests,
            "log" => Command::Log,
            "history" => Command::History,
            "inv" | "inventory" => Command::Inventory,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(command)
    }
}

const HELP: &str = "\
talk <npc>                 open a conversation
1-9                        pick an option
skip | leave               reveal the whole line | end the conversation
accept <quest>             accept a quest directly
give <item> [qty]          put items in the backpack
kill <enemy>               report a kill
collect <item> [qty]       pick up items (adds them, then reports)
explore <zone>             report entering a zone
deliver <item> <npc>       hand an item over
craft <item> [qty]         report crafting (adds the items)
survive <seconds>          report time survived
quests | log | history | inv
quit";

// ============================================================================
// Driver
// ============================================================================

struct Driver {
    narrative: Narrative,
    sandbox: Sandbox,
    /// One input per frame so several queued digits are not merged
    inputs: VecDeque<FrameInput>,
    /// Node text waiting for its reveal to finish before printing
    awaiting_line: bool,
    last_frame: Instant,
}

impl Driver {
    fn new(narrative: Narrative, sandbox: Sandbox) -> Self {
        Self {
            narrative,
            sandbox,
            inputs: VecDeque::new(),
            awaiting_line: false,
            last_frame: Instant::now(),
        }
    }

    /// Returns false when the driver should stop
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Talk(npc_id) => {
                let result = self.narrative.interact(&npc_id, &mut self.sandbox.context());
                self.show_result(result);
                for quest in self.narrative.quests().offered_quests(&npc_id, &mut self.sandbox.context()) {
                    println!("(offers '{}': accept {})", quest.name, quest.id);
                }
            }
            Command::Choose(digit) => self.inputs.push_back(FrameInput {
                digit: Some(digit),
                skip: false,
            }),
            Command::Skip => self.inputs.push_back(FrameInput { digit: None, skip: true }),
            Command::Leave => {
                self.narrative.end_conversation();
                self.awaiting_line = false;
                println!("(conversation ended)");
            }
            Command::Accept(quest_id) => match self.narrative.accept_quest(&quest_id, &mut self.sandbox.context()) {
                Ok(()) => println!("Quest accepted: {}", quest_id),
                Err(e) => println!("Cannot accept {}: {}", quest_id, e),
            },
            Command::Give { item_id, quantity } => {
                self.stock(&item_id, quantity);
            }
            Command::Event(event) => {
                if let QuestEvent::Collect { item_id, quantity } | QuestEvent::Craft { item_id, quantity } = &event {
                    if !self.stock(item_id, *quantity) {
                        return true;
                    }
                }
                let updates = self.narrative.record_event(&event, &mut self.sandbox.context());
                if updates.is_empty() {
                    println!("(no quest progress)");
                }
                for update in &updates {
                    print_update(update);
                }
            }
            Command::Quests => self.print_quests(),
            Command::Log => {
                for entry in self.narrative.quests().log().entries() {
                    println!("{} {}", entry.timestamp.format("%H:%M:%S"), entry.message);
                }
            }
            Command::History => {
                for entry in self.narrative.dialogue().history() {
                    match entry {
                        HistoryEntry::Line { speaker, text } => println!("{}: {}", speaker, text),
                        HistoryEntry::Choice { text } => println!("  > {}", text),
                    }
                }
            }
            Command::Inventory => self.print_inventory(),
            Command::Help => println!("{}", HELP),
            Command::Quit => return false,
        }
        self.flush_notifications();
        true
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;

        let input = self.inputs.pop_front().unwrap_or_default();
        match self.narrative.per_frame_input_tick(input, dt, &mut self.sandbox.context()) {
            Ok(Some(outcome)) => self.show_outcome(outcome),
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }

        if self.awaiting_line {
            if let Some(view) = self.narrative.dialogue().view() {
                if view.typing_complete {
                    println!("{}: {}", view.speaker, view.text);
                    for (i, option) in view.options.iter().enumerate() {
                        println!("  {}. {}", i + 1, option.text);
                    }
                    self.awaiting_line = false;
                }
            }
        }
        self.flush_notifications();
    }

    fn stock(&mut self, item_id: &str, quantity: u32) -> bool {
        let Some(item) = self.narrative.content().item(item_id).cloned() else {
            println!("Unknown item '{}'", item_id);
            return false;
        };
        if self.sandbox.backpack.add_item(&item, quantity) {
            println!("+{} {}", quantity, item.display_name);
            true
        } else {
            println!("Inventory is full!");
            false
        }
    }

    fn show_result(&mut self, result: narrative_engine::Result<DialogueOutcome>) {
        match result {
            Ok(outcome) => self.show_outcome(outcome),
            Err(e) => println!("{}", e),
        }
    }

    fn show_outcome(&mut self, outcome: DialogueOutcome) {
        for e in &outcome.errors {
            warn!("Dialogue response failed: {}", e);
        }
        if let Some(shop) = &outcome.shop {
            println!("(the {} shop would open here)", shop);
        }
        if outcome.ended {
            self.awaiting_line = false;
            println!("(conversation ended)");
        } else if outcome.node_id.is_some() {
            self.awaiting_line = true;
        }
    }

    fn flush_notifications(&mut self) {
        for message in self.sandbox.notifications.drain() {
            println!("* {}", message);
        }
    }

    fn print_quests(&self) {
        let quests = self.narrative.quests();
        for instance in quests.active_quests() {
            println!("[active] {}", instance.name);
            for objective in &instance.objectives {
                if objective.completed {
                    println!("  [x] {}", objective.objective_id);
                } else {
                    println!(
                        "  [ ] {} {}/{} ({} to go)",
                        objective.objective_id,
                        objective.current,
                        objective.target,
                        objective.remaining()
                    );
                }
            }
        }
        for instance in quests.completed_quests() {
            println!("[done]   {} ({}s)", instance.name, instance.duration_secs());
        }
        for instance in quests.failed_quests() {
            println!(
                "[failed] {} - {}",
                instance.name,
                instance.fail_reason.as_deref().unwrap_or("no reason")
            );
        }
    }

    fn print_inventory(&self) {
        let backpack = &self.sandbox.backpack;
        println!(
            "Gold: {}  Level: {}  Slots: {}/{}",
            backpack.gold(),
            self.sandbox.player.level,
            backpack.used_slots(),
            backpack.slots.len()
        );
        for (slot, stack) in backpack.contents() {
            let name = self
                .narrative
                .content()
                .item(&stack.item_id)
                .map_or(stack.item_id.as_str(), |item| item.display_name.as_str());
            println!("  {:>2}: {} x{}", slot, name, stack.quantity);
        }
    }
}

fn print_update(update: &ObjectiveUpdate) {
    println!(
        "[{}] {} {}/{}{}",
        update.quest_id,
        update.objective_id,
        update.progress,
        update.target,
        if update.objective_completed { " (done)" } else { "" }
    );
    if update.quest_completed {
        println!("[{}] quest complete", update.quest_id);
    }
}

fn init_logging(config: &EngineConfig) {
    let mut filter = EnvFilter::from_default_env();
    match config.log_filter.parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring log filter '{}': {}", config.log_filter, e),
    }
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let (config, config_error) = match EngineConfig::load(Path::new(CONFIG_PATH)) {
        Ok(config) => (config, None),
        Err(e) => (EngineConfig::default().with_env_overrides(), Some(e)),
    };

    // Initialize logging
    init_logging(&config);
    if let Some(e) = config_error {
        warn!("Failed to load {}: {}, using defaults", CONFIG_PATH, e);
    }

    let narrative = match Narrative::load(&config) {
        Ok(narrative) => narrative,
        Err(e) => {
            error!("Failed to load content: {}", e);
            std::process::exit(1);
        }
    };

    info!("Narrative engine ready, type 'help' for commands");
    let mut driver = Driver::new(narrative, Sandbox::new(config.inventory_slots));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(TICK);
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                driver.frame();
                // Piped input: keep ticking until queued picks and the last line are shown
                if !input_open && driver.inputs.is_empty() && !driver.awaiting_line {
                    break;
                }
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match Command::parse(&line) {
                    Ok(command) => {
                        if !driver.handle(command) {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                Ok(None) => input_open = false,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    input_open = false;
                }
            },
        }
    }

    info!("Goodbye");
}
