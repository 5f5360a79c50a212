// File: src/store.rs
use crate::model::{Entry, EntryStatus, EntryType, normalize_tags};
use crate::storage::StorageBackend;
use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

/// Owns the committed entries and is their only writer.
///
/// Every mutation is validated, applied to the in-memory collection and then
/// persisted through the backend. A failed save rolls the collection back so
/// memory and storage never disagree.
#[derive(Debug)]
pub struct EntryStore<B: StorageBackend> {
    backend: B,
    entries: Vec<Entry>,
}

impl<B: StorageBackend> EntryStore<B> {
    pub fn open(backend: B) -> Result<Self> {
        let entries = backend.load()?;
        log::debug!("Loaded {} entries", entries.len());
        Ok(Self { backend, entries })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, uid: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.uid.as_deref() == Some(uid))
    }

    fn position(&self, uid: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.uid.as_deref() == Some(uid))
            .ok_or_else(|| anyhow!("Entry '{}' not found", uid))
    }

    fn persist_or_rollback(&mut self, previous: Vec<Entry>) -> Result<()> {
        if let Err(e) = self.backend.save(&self.entries) {
            log::warn!("Save failed, rolling back: {:#}", e);
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Apply `f` to one entry, bump `updated_at` and persist.
    fn modify<F>(&mut self, uid: &str, f: F) -> Result<Entry>
    where
        F: FnOnce(&mut Entry) -> Result<()>,
    {
        let idx = self.position(uid)?;
        let previous = self.entries.clone();
        let entry = &mut self.entries[idx];
        f(entry)?;
        entry.updated_at = Utc::now();
        let updated = entry.clone();
        self.persist_or_rollback(previous)?;
        Ok(updated)
    }

    /// Assign identities to freshly assembled entries and persist them.
    /// Placeholders from empty input are dropped.
    pub fn commit(&mut self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        let previous = self.entries.clone();
        let committed: Vec<Entry> = entries
            .into_iter()
            .filter(|e| !e.is_placeholder())
            .map(|mut e| {
                e.uid = Some(Uuid::new_v4().to_string());
                e
            })
            .collect();

        self.entries.extend(committed.iter().cloned());
        self.persist_or_rollback(previous)?;
        log::info!("Committed {} entries", committed.len());
        Ok(committed)
    }

    pub fn set_status(&mut self, uid: &str, status: EntryStatus) -> Result<Entry> {
        self.modify(uid, |entry| {
            if !entry.status.can_transition_to(status) {
                bail!(
                    "Cannot move entry '{}' from {} to {}",
                    uid,
                    entry.status,
                    status
                );
            }
            entry.status = status;
            Ok(())
        })
    }

    pub fn complete_auto_action(&mut self, uid: &str, action_uid: &str) -> Result<Entry> {
        self.modify(uid, |entry| {
            let action = entry
                .auto_actions
                .iter_mut()
                .find(|a| a.uid == action_uid)
                .ok_or_else(|| anyhow!("Action '{}' not found on entry '{}'", action_uid, uid))?;
            action.completed = true;
            Ok(())
        })
    }

    pub fn retag<I, S>(&mut self, uid: &str, tags: I) -> Result<Entry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = normalize_tags(tags);
        self.modify(uid, |entry| {
            entry.tags = tags;
            Ok(())
        })
    }

    /// Move an entry in time. Tasks get a new due date; events keep their
    /// duration and their preparation actions shift along.
    pub fn reschedule(&mut self, uid: &str, date: DateTime<Utc>) -> Result<Entry> {
        self.modify(uid, |entry| {
            match (entry.kind, entry.start_date) {
                (EntryType::Event, Some(start)) => {
                    let shift = date - start;
                    entry.start_date = Some(date);
                    entry.end_date = entry.end_date.map(|end| end + shift);
                    for action in &mut entry.auto_actions {
                        action.due_date = action.due_date.map(|d| d + shift);
                    }
                }
                (EntryType::Event, None) => entry.start_date = Some(date),
                _ => entry.due_date = Some(date),
            }
            Ok(())
        })
    }

    pub fn set_notes(&mut self, uid: &str, notes: &str) -> Result<Entry> {
        self.modify(uid, |entry| {
            entry.notes = notes.to_string();
            Ok(())
        })
    }

    pub fn delete(&mut self, uid: &str) -> Result<Entry> {
        let idx = self.position(uid)?;
        let previous = self.entries.clone();
        let removed = self.entries.remove(idx);
        self.persist_or_rollback(previous)?;
        Ok(removed)
    }

    // --- Read views ---

    /// Entries due (tasks) or starting (events) on the local day of `now`.
    pub fn due_today(&self, now: DateTime<Local>) -> Vec<&Entry> {
        let today = now.date_naive();
        let on_today = |d: Option<DateTime<Utc>>| {
            d.is_some_and(|d| d.with_timezone(&Local).date_naive() == today)
        };
        self.entries
            .iter()
            .filter(|e| on_today(e.due_date) || on_today(e.start_date))
            .collect()
    }

    pub fn active(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|e| !e.status.is_done()).collect()
    }

    pub fn by_type(&self, kind: EntryType) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
