//! Quest State Tracking
//!
//! Per-player quest instances, objective progress and the quest log.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::definition::QuestTemplate;

/// Status of a quest instance the player has accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Active => "active",
            QuestStatus::Completed => "completed",
            QuestStatus::Failed => "failed",
        }
    }
}

/// Where a quest stands from the player's point of view, including quests
/// that were never accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestState {
    NotStarted,
    Active,
    Completed,
    Failed,
}

impl QuestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestState::NotStarted => "not_started",
            QuestState::Active => "active",
            QuestState::Completed => "completed",
            QuestState::Failed => "failed",
        }
    }
}

impl fmt::Display for QuestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<QuestStatus> for QuestState {
    fn from(status: QuestStatus) -> Self {
        match status {
            QuestStatus::Active => QuestState::Active,
            QuestStatus::Completed => QuestState::Completed,
            QuestStatus::Failed => QuestState::Failed,
        }
    }
}

/// Progress on a single objective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    pub objective_id: String,
    pub current: u32,
    pub target: u32,
    pub completed: bool,
    /// Sub-second remainder for survive objectives
    #[serde(skip)]
    partial_seconds: f64,
}

impl ObjectiveProgress {
    pub fn new(objective_id: &str, target: u32) -> Self {
        Self {
            objective_id: objective_id.to_string(),
            current: 0,
            target,
            completed: false,
            partial_seconds: 0.0,
        }
    }

    /// Add progress and return true if newly completed
    pub fn add_progress(&mut self, amount: u32) -> bool {
        if self.completed {
            return false;
        }
        self.current = self.current.saturating_add(amount).min(self.target);
        self.check_complete()
    }

    /// Bring progress up to an absolute count (e.g. items held), never
    /// lowering it. Returns true if newly completed.
    pub fn reconcile(&mut self, absolute: u32) -> bool {
        if self.completed {
            return false;
        }
        self.current = self.current.max(absolute.min(self.target));
        self.check_complete()
    }

    /// Accumulate elapsed time; whole seconds count as progress.
    pub fn add_seconds(&mut self, seconds: f64) -> bool {
        if self.completed || !seconds.is_finite() || seconds <= 0.0 {
            return false;
        }
        self.partial_seconds += seconds;
        let whole = self.partial_seconds.floor();
        self.partial_seconds -= whole;
        let whole = if whole >= u32::MAX as f64 { u32::MAX } else { whole as u32 };
        self.add_progress(whole)
    }

    fn check_complete(&mut self) -> bool {
        if self.current >= self.target {
            self.completed = true;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> u32 {
        self.target - self.current
    }
}

/// A player's copy of a quest template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestInstance {
    pub quest_id: String,
    pub name: String,
    pub status: QuestStatus,
    /// Progress per objective, in template order
    pub objectives: Vec<ObjectiveProgress>,
    pub accepted_at: DateTime<Utc>,
    /// When the quest was completed or failed
    pub finished_at: Option<DateTime<Utc>>,
    pub fail_reason: Option<String>,
}

impl QuestInstance {
    pub fn from_template(template: &QuestTemplate) -> Self {
        let objectives = template
            .objectives
            .iter()
            .map(|o| ObjectiveProgress::new(&o.id, o.target))
            .collect();

        Self {
            quest_id: template.id.clone(),
            name: template.name.clone(),
            status: QuestStatus::Active,
            objectives,
            accepted_at: Utc::now(),
            finished_at: None,
            fail_reason: None,
        }
    }

    pub fn objective(&self, objective_id: &str) -> Option<&ObjectiveProgress> {
        self.objectives.iter().find(|o| o.objective_id == objective_id)
    }

    pub fn objective_mut(&mut self, objective_id: &str) -> Option<&mut ObjectiveProgress> {
        self.objectives.iter_mut().find(|o| o.objective_id == objective_id)
    }

    pub fn all_complete(&self) -> bool {
        self.objectives.iter().all(|o| o.completed)
    }

    /// Mark quest as completed
    pub fn complete(&mut self) {
        self.status = QuestStatus::Completed;
        self.finished_at = Some(Utc::now());
    }

    /// Mark quest as failed
    pub fn fail(&mut self, reason: &str) {
        self.status = QuestStatus::Failed;
        self.finished_at = Some(Utc::now());
        self.fail_reason = Some(reason.to_string());
    }

    /// Get duration in seconds
    pub fn duration_secs(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.accepted_at).num_seconds()
    }

    /// Check if quest is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, QuestStatus::Completed | QuestStatus::Failed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestLogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Bounded, newest-last record of quest happenings.
#[derive(Debug, Clone)]
pub struct QuestLog {
    entries: VecDeque<QuestLogEntry>,
    limit: usize,
}

impl QuestLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.limit == 0 {
            return;
        }
        while self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(QuestLogEntry {
            timestamp: Utc::now(),
            message: message.into(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &QuestLogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&QuestLogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
