// File: ./src/model/suggest.rs
use crate::model::entry::{Entry, EntryType, Priority};

/// Advisory follow-ups for one capture batch, in entry order.
pub fn suggestions(entries: &[Entry]) -> Vec<String> {
    let mut out = Vec::new();
    for entry in entries {
        if entry.kind == EntryType::Event && entry.start_date.is_some() {
            out.push(format!(
                "Set reminder for {} 15 minutes before.",
                entry.content
            ));
        }
        if entry.kind == EntryType::Task && entry.priority == Priority::High {
            out.push(format!("Block time in calendar for {}.", entry.content));
        }
        if entry.has_tag("goal") {
            out.push(format!("Break down {} into smaller tasks.", entry.content));
        }
    }
    out
}
