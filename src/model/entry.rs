// File: ./src/model/entry.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix carried by placeholder identities of lightweight items that have
/// not been committed to a store yet.
pub const PLACEHOLDER_PREFIX: &str = "temp-";

fn default_uid() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Task,
    Event,
    Idea,
    Insight,
    Reflection,
    Journal,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Task => write!(f, "task"),
            EntryType::Event => write!(f, "event"),
            EntryType::Idea => write!(f, "idea"),
            EntryType::Insight => write!(f, "insight"),
            EntryType::Reflection => write!(f, "reflection"),
            EntryType::Journal => write!(f, "journal"),
        }
    }
}

/// Type vocabulary of the lightweight brain-dump profile.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Task,
    Idea,
    Thought,
    Journal,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Task => write!(f, "task"),
            ItemKind::Idea => write!(f, "idea"),
            ItemKind::Thought => write!(f, "thought"),
            ItemKind::Journal => write!(f, "journal"),
        }
    }
}

/// Ordered from least to most pressing, so `max()` picks the strongest cue.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl EntryStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Lifecycle: pending -> in_progress -> completed, pending -> completed.
    /// Completed is terminal. Re-asserting the current status is allowed.
    pub fn can_transition_to(&self, next: EntryStatus) -> bool {
        match (self, next) {
            (a, b) if *a == b => true,
            (Self::Pending, Self::InProgress) => true,
            (Self::Pending, Self::Completed) => true,
            (Self::InProgress, Self::Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Pending => write!(f, "pending"),
            EntryStatus::InProgress => write!(f, "in_progress"),
            EntryStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoActionType {
    PrepTask,
}

/// A follow-up derived from an entry, e.g. the preparation reminder of an event.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AutoAction {
    #[serde(default = "default_uid")]
    pub uid: String,
    #[serde(rename = "type")]
    pub kind: AutoActionType,
    pub content: String,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

impl AutoAction {
    pub fn prep_task(content: &str, due_date: DateTime<Utc>) -> Self {
        Self {
            uid: default_uid(),
            kind: AutoActionType::PrepTask,
            content: format!("Prepare for: {}", content),
            due_date: Some(due_date),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Durable identity, assigned by the store on commit.
    #[serde(default)]
    pub uid: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub confidence: f32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: EntryStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    #[serde(default)]
    pub auto_actions: Vec<AutoAction>,
    #[serde(default)]
    pub related_ids: Vec<String>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// The degenerate record produced for empty input. Callers discard these.
    pub fn is_placeholder(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Lightweight record of the brain-dump profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub tags: Vec<String>,
    pub confidence: f32,
}

impl ParsedItem {
    pub fn new(content: String, kind: ItemKind, tags: Vec<String>, confidence: f32) -> Self {
        Self {
            id: format!("{}{}", PLACEHOLDER_PREFIX, Uuid::new_v4()),
            content,
            kind,
            tags,
            confidence,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_committed(&self) -> bool {
        !self.id.starts_with(PLACEHOLDER_PREFIX)
    }
}
