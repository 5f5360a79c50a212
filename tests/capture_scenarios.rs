// End-to-end captures through the pipeline.
use anyhow::Result;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use jotter::model::{
    AutoActionType, DateResolver, EntryStatus, EntryType, ItemKind, Priority, ResolvedDate,
};
use jotter::pipeline::Pipeline;

fn reference() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// Resolves every candidate to the same fixed instant.
struct FixedResolver(DateTime<Utc>);

impl DateResolver for FixedResolver {
    fn resolve(&self, text: &str, _reference: DateTime<Local>) -> Result<Vec<ResolvedDate>> {
        Ok(vec![ResolvedDate {
            matched_text: text.to_string(),
            date: self.0,
            day_certain: true,
        }])
    }
}

#[test]
fn test_scenario_dentist_task() {
    let capture = Pipeline::new().capture_at("Call the dentist tomorrow at 3pm #health", reference());
    assert_eq!(capture.entries.len(), 1);

    let entry = &capture.entries[0];
    assert_eq!(entry.kind, EntryType::Task);
    assert_eq!(entry.confidence, 0.9);
    assert_eq!(entry.content, "Call the dentist tomorrow at 3pm");
    assert!(entry.has_tag("health"));
    assert_eq!(entry.due_date, Some(local(2026, 3, 11, 15, 0)));
    assert_eq!(entry.start_date, None);
    assert!(entry.auto_actions.is_empty());
    assert_eq!(entry.status, EntryStatus::Pending);
    assert!(entry.uid.is_none());
}

#[test]
fn test_scenario_meeting_event() {
    let text = "Meeting with Sarah at WeWork tomorrow 10am";
    let capture = Pipeline::new().capture_at(text, reference());
    assert_eq!(capture.entries.len(), 1);

    let entry = &capture.entries[0];
    let start = local(2026, 3, 11, 10, 0);
    assert_eq!(entry.kind, EntryType::Event);
    assert_eq!(entry.confidence, 0.85);
    assert_eq!(entry.location.as_deref(), Some("WeWork"));
    assert_eq!(entry.start_date, Some(start));
    assert_eq!(entry.end_date, Some(start + Duration::hours(1)));
    assert_eq!(entry.due_date, None);

    assert_eq!(entry.auto_actions.len(), 1);
    let action = &entry.auto_actions[0];
    assert_eq!(action.kind, AutoActionType::PrepTask);
    assert_eq!(action.content, format!("Prepare for: {}", text));
    assert_eq!(action.due_date, Some(start - Duration::hours(24)));
    assert!(!action.completed);

    assert_eq!(
        capture.suggestions,
        vec![format!("Set reminder for {} 15 minutes before.", text)]
    );
}

#[test]
fn test_scenario_empty_input() {
    let capture = Pipeline::new().capture_at("", reference());
    assert_eq!(capture.entries.len(), 1);
    assert_eq!(capture.entries[0].content, "");
    assert_eq!(capture.entries[0].confidence, 0.0);
    assert!(capture.entries[0].is_placeholder());
    assert_eq!(capture.visible().count(), 0);
    assert!(capture.suggestions.is_empty());
}

#[test]
fn test_scenario_idea() {
    let capture =
        Pipeline::new().capture_at("Idea: what if we built a plant-watering app", reference());
    assert_eq!(capture.entries[0].kind, EntryType::Idea);
    assert_eq!(capture.entries[0].confidence, 0.85);
}

#[test]
fn test_scenario_sentence_list() {
    let capture = Pipeline::new().capture_at("Buy milk. Call mom. Pay rent.", reference());
    let contents: Vec<_> = capture.entries.iter().map(|e| e.content.as_str()).collect();
    assert_eq!(contents, vec!["Buy milk.", "Call mom.", "Pay rent."]);
    assert!(capture.entries.iter().all(|e| e.kind == EntryType::Task));
}

#[test]
fn test_undated_entries_get_no_defaults() {
    let capture = Pipeline::new().capture_at("Buy milk\nTeam meeting with design", reference());
    assert_eq!(capture.entries.len(), 2);

    let task = &capture.entries[0];
    assert_eq!(task.kind, EntryType::Task);
    assert_eq!(task.due_date, None);

    let event = &capture.entries[1];
    assert_eq!(event.kind, EntryType::Event);
    assert_eq!(event.start_date, None);
    assert_eq!(event.end_date, None);
    assert!(event.auto_actions.is_empty());
    assert!(capture.suggestions.is_empty());
}

#[test]
fn test_suggestions_follow_entry_order() {
    let text = "Important: submit the report\nMy goal is to run a marathon";
    let capture = Pipeline::new().capture_at(text, reference());

    assert_eq!(capture.entries[0].priority, Priority::High);
    assert_eq!(
        capture.suggestions,
        vec![
            "Block time in calendar for Important: submit the report.".to_string(),
            "Break down My goal is to run a marathon into smaller tasks.".to_string(),
        ]
    );
}

#[test]
fn test_injected_resolver_drives_dates() {
    let fixed = local(2030, 1, 2, 8, 0);
    let pipeline = Pipeline::with_resolver(FixedResolver(fixed));
    let capture = pipeline.capture_at("Dentist appointment", reference());

    let entry = &capture.entries[0];
    assert_eq!(entry.kind, EntryType::Event);
    assert_eq!(entry.start_date, Some(fixed));
    assert_eq!(entry.auto_actions[0].due_date, Some(fixed - Duration::hours(24)));
}

#[test]
fn test_capture_is_deterministic_apart_from_timestamps() {
    let pipeline = Pipeline::new();
    let text = "Lunch with Ana on friday; I noticed I sleep better after yoga";
    let a = pipeline.capture_at(text, reference());
    let b = pipeline.capture_at(text, reference());

    assert_eq!(a.entries.len(), b.entries.len());
    for (x, y) in a.entries.iter().zip(&b.entries) {
        assert_eq!(x.kind, y.kind);
        assert_eq!(x.content, y.content);
        assert_eq!(x.start_date, y.start_date);
        assert_eq!(x.tags, y.tags);
    }
    assert_eq!(a.suggestions, b.suggestions);
}

#[test]
fn test_brain_dump_items() {
    let items = Pipeline::new().brain_dump("Buy milk. Call mom. Pay rent.");
    assert_eq!(items.len(), 3);
    for item in &items {
        assert_eq!(item.kind, ItemKind::Task);
        assert_eq!(item.confidence, 0.8);
        assert!(item.id.starts_with("temp-"));
        assert!(!item.is_committed());
    }
    assert_ne!(items[0].id, items[1].id);
}

#[test]
fn test_brain_dump_strips_tags_and_keeps_placeholder() {
    let items = Pipeline::new().brain_dump("what if plants could text you #garden");
    assert_eq!(items[0].kind, ItemKind::Idea);
    assert_eq!(items[0].content, "what if plants could text you");
    assert_eq!(items[0].tags, vec!["garden"]);

    let empty = Pipeline::new().brain_dump("   ");
    assert_eq!(empty.len(), 1);
    assert!(empty[0].is_placeholder());
    assert_eq!(empty[0].confidence, 0.0);
}

#[test]
fn test_ordinary_words_do_not_schedule_entries() {
    let capture = Pipeline::new().capture_at(
        "Buy sunscreen to sit in the sun\nI sat with Ana for an hour",
        reference(),
    );
    assert_eq!(capture.entries.len(), 2);

    let task = &capture.entries[0];
    assert_eq!(task.kind, EntryType::Task);
    assert_eq!(task.due_date, None);

    let event = &capture.entries[1];
    assert_eq!(event.kind, EntryType::Event);
    assert_eq!(event.start_date, None);
    assert!(event.auto_actions.is_empty());
}
