// File: ./src/pipeline.rs
//! Capture-to-structure pipeline.
//!
//! raw text -> segments -> {classification, dates, location, tags} per
//! segment -> entries -> suggestions over the batch. Every stage is pure;
//! the only collaborator is the injected [`DateResolver`].
use crate::model::{
    DateResolver, Entry, ParsedItem, SmartDateResolver, assemble_entry, classify,
    classify_lightweight, extract_dates, extract_location, extract_tags, segment, suggestions,
};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Output of one full-profile capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capture {
    pub entries: Vec<Entry>,
    pub suggestions: Vec<String>,
}

impl Capture {
    /// Entries worth showing or persisting (the empty-input placeholder removed).
    pub fn visible(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_placeholder())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline<R = SmartDateResolver> {
    resolver: R,
}

impl Pipeline<SmartDateResolver> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: DateResolver> Pipeline<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Full profile, relative dates resolved against the current instant.
    pub fn capture(&self, text: &str) -> Capture {
        self.capture_at(text, Local::now())
    }

    /// Full profile with an explicit reference instant for relative dates.
    pub fn capture_at(&self, text: &str, now: DateTime<Local>) -> Capture {
        let entries: Vec<Entry> = segment(text)
            .iter()
            .map(|candidate| {
                let classification = classify(candidate);
                let dates = extract_dates(&self.resolver, candidate, now);
                let location = extract_location(candidate);
                let tagged = extract_tags(candidate);
                assemble_entry(&tagged.content, classification, &dates, location)
            })
            .collect();

        let suggestions = suggestions(&entries);
        log::debug!(
            "Captured {} entries, {} suggestions",
            entries.len(),
            suggestions.len()
        );
        Capture {
            entries,
            suggestions,
        }
    }

    /// Lightweight brain-dump profile. Items carry placeholder identities.
    pub fn brain_dump(&self, text: &str) -> Vec<ParsedItem> {
        segment(text)
            .iter()
            .map(|candidate| {
                let classification = classify_lightweight(candidate);
                let tagged = extract_tags(candidate);
                ParsedItem::new(
                    tagged.content,
                    classification.kind,
                    classification.tags,
                    classification.confidence,
                )
            })
            .collect()
    }
}
