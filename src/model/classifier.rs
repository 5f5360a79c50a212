// File: ./src/model/classifier.rs
//! Rule-based classification of candidate strings.
//!
//! Each profile is an ordered table of [`Rule`]s. Rules are evaluated top to
//! bottom against the lower-cased candidate and the first match decides the
//! type and confidence. Nothing here is learned or random: the same input
//! always classifies the same way.
use crate::model::entry::{EntryType, ItemKind, Priority};
use crate::model::tags::extract_tags;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Confidence of the fall-through rule.
pub const DEFAULT_CONFIDENCE: f32 = 0.6;

/// Which record shape and rule table a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Entries with six types, dates, location and derived actions.
    #[default]
    Full,
    /// Brain-dump items: task, idea, thought or journal, with tags.
    Lightweight,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Full => write!(f, "full"),
            Profile::Lightweight => write!(f, "lightweight"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification<K> {
    #[serde(rename = "type")]
    pub kind: K,
    pub confidence: f32,
    pub reasoning: String,
    pub tags: Vec<String>,
    pub priority: Priority,
}

/// One step of a cascade.
pub struct Rule<K: 'static> {
    pub name: &'static str,
    pub kind: K,
    pub confidence: f32,
    pub matches: fn(&str) -> bool,
}

impl<K: 'static> fmt::Debug for Rule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("confidence", &self.confidence)
            .finish()
    }
}

// --- Cue patterns (matched against lower-cased text) ---

static OBLIGATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(need to|needs to|must|should|have to|has to|got to|gotta|don't forget|dont forget|do not forget|remember to|make sure)\b",
    )
    .expect("valid regex")
});
static ACTION_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(buy|call|email|schedule|book|pay|submit|finish|review)\b").expect("valid regex")
});
static TASK_OPENING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(i\s+(need to|should|have to|must)\b|todo:|to-do:)").expect("valid regex")
});
static IMPERATIVE_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(please\s+)?(buy|call|email|text|schedule|book|pay|submit|finish|review|send|fix|clean|write|pick up|order|cancel|renew|prepare|update|file|organize|check|follow up|reply|contact|complete|return|print|sign|register|get|make|do)\b",
    )
    .expect("valid regex")
});
static DEADLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(deadline|due|urgent|urgently|asap|by (today|tonight|tomorrow|eod|end of (the )?(day|week|month)))\b",
    )
    .expect("valid regex")
});
static EVENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(meeting|meetup|appointment|appt|conference|interview|webinar|standup|stand-up|lunch|dinner|party|concert|wedding|birthday|class|session|event|today|tonight|tomorrow|next week)\b",
    )
    .expect("valid regex")
});
static CLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bat \d{1,2}(:\d{2})?\s*(am|pm)\b").expect("valid regex"));
static ON_DAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bon \w+").expect("valid regex"));
static WITH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bwith\b|@").expect("valid regex"));
static IDEA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(ideas?|what if|maybe we could|maybe i could|could we|how about|brainstorm|brainstorming|concept|imagine|wouldn't it be|it would be (cool|nice|great))\b",
    )
    .expect("valid regex")
});
static INSIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(noticed|realized|realised|discovered|learned|learnt|pattern|patterns|trend|trends|insight|turns out)\b",
    )
    .expect("valid regex")
});
static EMOTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(feel|feeling|felt|happy|sad|anxious|grateful|thankful|frustrated|excited|worried|stressed|proud|angry|tired|overwhelmed|lonely|calm|hopeful)\b",
    )
    .expect("valid regex")
});
static PERSONAL_OPENING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(i feel|i am|i'm|today i)\b").expect("valid regex"));
static NARRATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(today|yesterday|this morning|this evening|woke up|went to|had (breakfast|lunch|dinner)|after work|commute|workout|routine|dear diary)\b",
    )
    .expect("valid regex")
});

static URGENT_PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(urgent|urgently|asap|emergency)\b").expect("valid regex"));
static HIGH_PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(important|deadline|due)\b").expect("valid regex"));
static MEDIUM_PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(priority|focus)\b").expect("valid regex"));

// --- Predicates ---

fn is_task_cue(text: &str) -> bool {
    OBLIGATION_RE.is_match(text)
        || ACTION_VERB_RE.is_match(text)
        || TASK_OPENING_RE.is_match(text)
        || IMPERATIVE_START_RE.is_match(text)
}

fn is_task_cue_strict(text: &str) -> bool {
    is_task_cue(text) || DEADLINE_RE.is_match(text)
}

fn is_event_cue(text: &str) -> bool {
    EVENT_RE.is_match(text)
        || CLOCK_TIME_RE.is_match(text)
        || ON_DAY_RE.is_match(text)
        || WITH_RE.is_match(text)
}

fn is_idea_cue(text: &str) -> bool {
    IDEA_RE.is_match(text)
}

fn is_insight_cue(text: &str) -> bool {
    INSIGHT_RE.is_match(text)
}

fn is_reflection_cue(text: &str) -> bool {
    EMOTION_RE.is_match(text) || PERSONAL_OPENING_RE.is_match(text)
}

fn is_narrative_cue(text: &str) -> bool {
    NARRATIVE_RE.is_match(text)
}

// --- Rule tables ---

pub const FULL_RULES: &[Rule<EntryType>] = &[
    Rule {
        name: "task",
        kind: EntryType::Task,
        confidence: 0.9,
        matches: is_task_cue_strict,
    },
    Rule {
        name: "event",
        kind: EntryType::Event,
        confidence: 0.85,
        matches: is_event_cue,
    },
    Rule {
        name: "idea",
        kind: EntryType::Idea,
        confidence: 0.85,
        matches: is_idea_cue,
    },
    Rule {
        name: "insight",
        kind: EntryType::Insight,
        confidence: 0.75,
        matches: is_insight_cue,
    },
    Rule {
        name: "reflection",
        kind: EntryType::Reflection,
        confidence: 0.8,
        matches: is_reflection_cue,
    },
    Rule {
        name: "journal",
        kind: EntryType::Journal,
        confidence: 0.75,
        matches: is_narrative_cue,
    },
];

pub const LIGHTWEIGHT_RULES: &[Rule<ItemKind>] = &[
    Rule {
        name: "task",
        kind: ItemKind::Task,
        confidence: 0.8,
        matches: is_task_cue,
    },
    Rule {
        name: "idea",
        kind: ItemKind::Idea,
        confidence: 0.8,
        matches: is_idea_cue,
    },
    Rule {
        name: "journal",
        kind: ItemKind::Journal,
        confidence: 0.85,
        matches: is_narrative_cue,
    },
    Rule {
        name: "journal (personal tone)",
        kind: ItemKind::Journal,
        confidence: 0.75,
        matches: is_reflection_cue,
    },
];

/// Scan for the strongest priority cue.
pub fn infer_priority(text: &str) -> Priority {
    let lower = text.to_lowercase();
    if URGENT_PRIORITY_RE.is_match(&lower) {
        Priority::Urgent
    } else if HIGH_PRIORITY_RE.is_match(&lower) {
        Priority::High
    } else if MEDIUM_PRIORITY_RE.is_match(&lower) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Evaluate `rules` in order; `fallback` applies when none match.
pub fn classify_with<K: Copy + 'static>(
    candidate: &str,
    rules: &[Rule<K>],
    fallback: K,
) -> Classification<K> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Classification {
            kind: fallback,
            confidence: 0.0,
            reasoning: "Empty input".to_string(),
            tags: Vec::new(),
            priority: Priority::Low,
        };
    }

    let lower = trimmed.to_lowercase();
    let (kind, confidence, reasoning) = match rules.iter().find(|r| (r.matches)(&lower)) {
        Some(rule) => {
            log::debug!("'{}' matched {} rule", trimmed, rule.name);
            (rule.kind, rule.confidence, format!("Matched {} cues", rule.name))
        }
        None => (
            fallback,
            DEFAULT_CONFIDENCE,
            "No specific cues matched".to_string(),
        ),
    };

    Classification {
        kind,
        confidence,
        reasoning,
        tags: extract_tags(trimmed).tags,
        priority: infer_priority(trimmed),
    }
}

/// Full profile: six types, unmatched input defaults to an insight.
pub fn classify(candidate: &str) -> Classification<EntryType> {
    classify_with(candidate, FULL_RULES, EntryType::Insight)
}

/// Lightweight profile: unmatched input defaults to a thought.
pub fn classify_lightweight(candidate: &str) -> Classification<ItemKind> {
    classify_with(candidate, LIGHTWEIGHT_RULES, ItemKind::Thought)
}
