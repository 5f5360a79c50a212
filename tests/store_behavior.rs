use anyhow::Result;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use jotter::context::TestContext;
use jotter::model::{Entry, EntryStatus, EntryType};
use jotter::pipeline::Pipeline;
use jotter::storage::{JsonFileBackend, MemoryBackend, StorageBackend};
use jotter::store::EntryStore;
use std::cell::Cell;

fn reference() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
}

fn captured(text: &str) -> Vec<Entry> {
    Pipeline::new().capture_at(text, reference()).entries
}

fn store_with(text: &str) -> (EntryStore<MemoryBackend>, Vec<Entry>) {
    let mut store = EntryStore::open(MemoryBackend::new()).unwrap();
    let committed = store.commit(captured(text)).unwrap();
    (store, committed)
}

fn uid(entry: &Entry) -> &str {
    entry.uid.as_deref().unwrap()
}

/// Backend whose saves start failing once `fail` is set.
#[derive(Default)]
struct FlakyBackend {
    inner: MemoryBackend,
    fail: Cell<bool>,
}

impl StorageBackend for FlakyBackend {
    fn load(&self) -> Result<Vec<Entry>> {
        self.inner.load()
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        if self.fail.get() {
            anyhow::bail!("disk full");
        }
        self.inner.save(entries)
    }
}

#[test]
fn test_commit_assigns_uids_and_drops_placeholders() {
    let mut store = EntryStore::open(MemoryBackend::new()).unwrap();
    let mut entries = captured("Buy milk. Call mom.");
    entries.extend(captured(""));

    let committed = store.commit(entries).unwrap();
    assert_eq!(committed.len(), 2);
    assert!(committed.iter().all(|e| e.uid.is_some()));
    assert_ne!(committed[0].uid, committed[1].uid);
    assert_eq!(store.entries().len(), 2);

    let backend = store.into_backend();
    assert_eq!(backend.load().unwrap().len(), 2);
}

#[test]
fn test_status_lifecycle() {
    let (mut store, committed) = store_with("Buy milk");
    let id = uid(&committed[0]);

    let started = store.set_status(id, EntryStatus::InProgress).unwrap();
    assert_eq!(started.status, EntryStatus::InProgress);
    assert!(started.updated_at >= committed[0].updated_at);

    store.set_status(id, EntryStatus::Completed).unwrap();
    assert!(store.set_status(id, EntryStatus::Pending).is_err());
    assert!(store.set_status(id, EntryStatus::InProgress).is_err());
    assert_eq!(store.get(id).unwrap().status, EntryStatus::Completed);
}

#[test]
fn test_unknown_uid_is_an_error() {
    let (mut store, _) = store_with("Buy milk");
    assert!(store.set_status("nope", EntryStatus::Completed).is_err());
    assert!(store.delete("nope").is_err());
    assert!(store.get("nope").is_none());
}

#[test]
fn test_complete_auto_action() {
    let (mut store, committed) = store_with("Meeting with Sarah at WeWork tomorrow 10am");
    let id = uid(&committed[0]);
    let action_uid = committed[0].auto_actions[0].uid.clone();

    let updated = store.complete_auto_action(id, &action_uid).unwrap();
    assert!(updated.auto_actions[0].completed);
    assert!(store.complete_auto_action(id, "missing").is_err());
}

#[test]
fn test_retag_normalizes() {
    let (mut store, committed) = store_with("Buy milk #errands");
    let updated = store
        .retag(uid(&committed[0]), ["#home", "errands", "home"])
        .unwrap();
    assert_eq!(updated.tags, vec!["errands", "home"]);
}

#[test]
fn test_reschedule_task_and_event() {
    let (mut store, committed) =
        store_with("Pay rent tomorrow\nMeeting with Sarah at WeWork tomorrow 10am");
    let task_id = uid(&committed[0]).to_string();
    let event_id = uid(&committed[1]).to_string();

    let new_due = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
    let task = store.reschedule(&task_id, new_due).unwrap();
    assert_eq!(task.kind, EntryType::Task);
    assert_eq!(task.due_date, Some(new_due));

    let old_start = committed[1].start_date.unwrap();
    let new_start = old_start + Duration::days(2);
    let event = store.reschedule(&event_id, new_start).unwrap();
    assert_eq!(event.start_date, Some(new_start));
    assert_eq!(event.end_date, Some(new_start + Duration::hours(1)));
    assert_eq!(
        event.auto_actions[0].due_date,
        Some(new_start - Duration::hours(24))
    );
}

#[test]
fn test_notes_and_delete() {
    let (mut store, committed) = store_with("Buy milk\nCall mom");
    let id = uid(&committed[0]).to_string();

    let noted = store.set_notes(&id, "oat milk").unwrap();
    assert_eq!(noted.notes, "oat milk");

    let removed = store.delete(&id).unwrap();
    assert_eq!(removed.content, "Buy milk");
    assert_eq!(store.entries().len(), 1);
    assert!(store.get(&id).is_none());
}

#[test]
fn test_views() {
    let now = Local::now();
    let (mut store, committed) = store_with("Buy milk\nStandup today at 11pm\nI noticed a trend");
    let done_id = uid(&committed[0]).to_string();
    store.set_status(&done_id, EntryStatus::Completed).unwrap();

    let today_event = committed[1].clone();
    let today_uid = uid(&today_event).to_string();
    store.reschedule(&today_uid, now.with_timezone(&Utc)).unwrap();

    let due: Vec<_> = store.due_today(now).iter().map(|e| e.content.clone()).collect();
    assert_eq!(due, vec!["Standup today at 11pm".to_string()]);

    assert_eq!(store.active().len(), 2);
    assert_eq!(store.by_type(EntryType::Event).len(), 1);
    assert_eq!(store.by_type(EntryType::Insight).len(), 1);
}

#[test]
fn test_failed_save_rolls_back() {
    let mut store = EntryStore::open(FlakyBackend::default()).unwrap();
    let committed = store.commit(captured("Buy milk")).unwrap();
    let id = uid(&committed[0]).to_string();

    let backend = store.into_backend();
    backend.fail.set(true);
    let mut store = EntryStore::open(backend).unwrap();

    assert!(store.set_status(&id, EntryStatus::Completed).is_err());
    assert_eq!(store.get(&id).unwrap().status, EntryStatus::Pending);

    assert!(store.commit(captured("Call mom")).is_err());
    assert_eq!(store.entries().len(), 1);

    assert!(store.delete(&id).is_err());
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn test_json_backend_survives_reopen() {
    let ctx = TestContext::new();
    let backend = JsonFileBackend::from_context(&ctx).unwrap();
    let mut store = EntryStore::open(backend.clone()).unwrap();
    let committed = store
        .commit(captured("Meeting with Sarah at WeWork tomorrow 10am #work"))
        .unwrap();
    let id = uid(&committed[0]).to_string();
    store.set_status(&id, EntryStatus::InProgress).unwrap();
    drop(store);

    let reopened = EntryStore::open(backend).unwrap();
    let entry = reopened.get(&id).unwrap();
    assert_eq!(entry.status, EntryStatus::InProgress);
    assert_eq!(entry.location.as_deref(), Some("WeWork"));
    assert_eq!(entry.tags, vec!["work"]);
    assert_eq!(entry.auto_actions.len(), 1);
}
