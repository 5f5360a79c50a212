// File: ./src/model/assembler.rs
use crate::model::classifier::Classification;
use crate::model::entry::{AutoAction, Entry, EntryStatus, EntryType};
use crate::model::spatial::SpatialMatch;
use crate::model::temporal::TemporalMatch;
use chrono::{Duration, Utc};

/// Length given to an event when the text does not say otherwise.
pub const DEFAULT_EVENT_DURATION: Duration = Duration::hours(1);
/// How far ahead of an event its preparation task falls due.
pub const PREP_LEAD_TIME: Duration = Duration::hours(24);

/// Build one entry from the independent stage outputs of a candidate.
///
/// `content` is the candidate with explicit `#tags` already stripped.
/// Tasks take their due date from the first temporal match, events their
/// start date (plus a default end and a preparation action). Nothing is
/// defaulted when no date was found.
pub fn assemble_entry(
    content: &str,
    classification: Classification<EntryType>,
    dates: &[TemporalMatch],
    location: Option<SpatialMatch>,
) -> Entry {
    let now = Utc::now();
    let content = content.trim().to_string();
    let first_date = dates.first().map(|m| m.date);

    let mut entry = Entry {
        uid: None,
        content,
        kind: classification.kind,
        confidence: classification.confidence.clamp(0.0, 1.0),
        tags: classification.tags,
        priority: classification.priority,
        status: EntryStatus::Pending,
        due_date: None,
        start_date: None,
        end_date: None,
        location: location.map(|l| l.location),
        auto_actions: Vec::new(),
        related_ids: Vec::new(),
        notes: String::new(),
        created_at: now,
        updated_at: now,
    };

    match (entry.kind, first_date) {
        (EntryType::Task, Some(due)) => entry.due_date = Some(due),
        (EntryType::Event, Some(start)) => {
            entry.start_date = Some(start);
            entry.end_date = Some(start + DEFAULT_EVENT_DURATION);
            entry
                .auto_actions
                .push(AutoAction::prep_task(&entry.content, start - PREP_LEAD_TIME));
        }
        _ => {}
    }

    entry
}
