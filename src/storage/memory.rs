//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::AtomicBool;
#[cfg(test)]
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::id::DocumentId;
use crate::notebooks::NoteBook;
use crate::notes::Flag;
use crate::notes::Note;
use crate::notes::NoteFilter;
use crate::reminders::Reminder;
use crate::tags::Tag;
use crate::users::User;

use super::ChangePasswordValues;
use super::CreateNoteBookValues;
use super::CreateNoteValues;
use super::CreateReminderValues;
use super::CreateTagValues;
use super::CreateUserValues;
use super::Error;
use super::NoteUpdate;
use super::Result;
use super::Storage;
use super::UpdateNoteBookValues;
use super::UpdateOutcome;
use super::UpdateReminderValues;
use super::UpdateTagValues;

/// Collection of documents, ordered by ID which follows creation order
type Collection<T> = Arc<Mutex<BTreeMap<DocumentId, T>>>;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All users in storage
    users: Collection<User>,

    /// All notebooks in storage
    notebooks: Collection<NoteBook>,

    /// All tags in storage
    tags: Collection<Tag>,

    /// All notes in storage
    notes: Collection<Note>,

    /// All reminders in storage
    reminders: Collection<Reminder>,

    /// Make every bulk note update fail
    #[cfg(test)]
    fail_bulk_updates: Arc<AtomicBool>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Let all following bulk note updates fail, like a lost connection would
    #[cfg(test)]
    pub fn fail_bulk_updates(&self) {
        self.fail_bulk_updates.store(true, Ordering::SeqCst);
    }
}

/// Replace the field when a different value is given
fn replace<T>(field: &mut T, value: Option<&T>) -> bool
where
    T: Clone + PartialEq,
{
    match value {
        Some(value) if field != value => {
            *field = value.clone();
            true
        }
        _ => false,
    }
}

/// Apply an update to a note, returns if the note changed
fn apply_note_update(note: &mut Note, update: &NoteUpdate) -> bool {
    match update {
        NoteUpdate::Fields(values) => {
            let mut changed = replace(&mut note.name, values.name.as_ref());
            changed |= replace(&mut note.text, values.text.as_ref());
            changed |= replace(&mut note.color, values.color.as_ref());
            changed |= replace(&mut note.order, values.order.as_ref());

            if changed {
                note.updated_at = values.updated_at;
            }

            changed
        }
        NoteUpdate::SetDeleted(is_deleted) => {
            replace(&mut note.is_deleted, Some(&Flag::from(*is_deleted)))
        }
        NoteUpdate::SetArchived(is_archived) => {
            replace(&mut note.is_archived, Some(&Flag::from(*is_archived)))
        }
        NoteUpdate::SetNotebook(notebook_id) => replace(&mut note.notebook_id, Some(notebook_id)),
        NoteUpdate::AddTag(tag_id) => {
            if note.has_tag(tag_id) {
                false
            } else {
                note.tags.push(*tag_id);
                true
            }
        }
        NoteUpdate::RemoveTag(tag_id) => {
            let before = note.tags.len();
            note.tags.retain(|id| id != tag_id);
            before != note.tags.len()
        }
    }
}

/// Update a single document with a function reporting the change
async fn update_single<T, F>(collection: &Collection<T>, id: &DocumentId, f: F) -> UpdateOutcome
where
    F: FnOnce(&mut T) -> bool,
{
    match collection.lock().await.get_mut(id) {
        Some(document) => UpdateOutcome {
            matched: 1,
            modified: u64::from(f(document)),
        },
        None => UpdateOutcome::default(),
    }
}

/// Remove a single document
async fn delete_single<T>(collection: &Collection<T>, id: &DocumentId) -> u64 {
    u64::from(collection.lock().await.remove(id).is_some())
}

#[async_trait]
impl Storage for Memory {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_single_user_by_id(&self, id: &DocumentId) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let mut users = self.users.lock().await;

        if users.values().any(|user| user.email == values.email) {
            return Err(Error::Duplicate(format!("email {}", values.email)));
        }

        let user = User {
            id: DocumentId::new(),
            session_id: *values.session_id,
            email: values.email.to_string(),
            hashed_password: values.hashed_password.to_string(),
            first_name: values.first_name.to_string(),
            last_name: values.last_name.to_string(),
            created_at: values.created_at,
        };

        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn change_password(
        &self,
        user: &User,
        values: &ChangePasswordValues<'_>,
    ) -> Result<User> {
        self.users
            .lock()
            .await
            .get_mut(&user.id)
            .map(|user| {
                user.session_id = *values.session_id;
                user.hashed_password = values.hashed_password.to_string();

                user.clone()
            })
            .ok_or_else(|| Error::Connection(format!("user {} disappeared", user.id)))
    }

    async fn find_all_notebooks(&self) -> Result<Vec<NoteBook>> {
        Ok(self.notebooks.lock().await.values().cloned().collect())
    }

    async fn find_single_notebook_by_id(&self, id: &DocumentId) -> Result<Option<NoteBook>> {
        Ok(self.notebooks.lock().await.get(id).cloned())
    }

    async fn create_notebook(&self, values: &CreateNoteBookValues<'_>) -> Result<NoteBook> {
        let notebook = NoteBook {
            id: DocumentId::new(),
            name: values.name.to_string(),
            description: values.description.to_string(),
            is_active: values.is_active,
        };

        self.notebooks
            .lock()
            .await
            .insert(notebook.id, notebook.clone());

        Ok(notebook)
    }

    async fn update_notebook(
        &self,
        id: &DocumentId,
        values: &UpdateNoteBookValues,
    ) -> Result<UpdateOutcome> {
        Ok(update_single(&self.notebooks, id, |notebook| {
            let mut changed = replace(&mut notebook.name, values.name.as_ref());
            changed |= replace(&mut notebook.description, values.description.as_ref());
            changed |= replace(&mut notebook.is_active, values.is_active.as_ref());
            changed
        })
        .await)
    }

    async fn delete_notebook(&self, id: &DocumentId) -> Result<u64> {
        Ok(delete_single(&self.notebooks, id).await)
    }

    async fn find_all_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.lock().await.values().cloned().collect())
    }

    async fn find_single_tag_by_id(&self, id: &DocumentId) -> Result<Option<Tag>> {
        Ok(self.tags.lock().await.get(id).cloned())
    }

    async fn create_tag(&self, values: &CreateTagValues<'_>) -> Result<Tag> {
        let tag = Tag {
            id: DocumentId::new(),
            name: values.name.to_string(),
            color: values.color.to_string(),
        };

        self.tags.lock().await.insert(tag.id, tag.clone());

        Ok(tag)
    }

    async fn update_tag(&self, id: &DocumentId, values: &UpdateTagValues) -> Result<UpdateOutcome> {
        Ok(update_single(&self.tags, id, |tag| {
            let mut changed = replace(&mut tag.name, values.name.as_ref());
            changed |= replace(&mut tag.color, values.color.as_ref());
            changed
        })
        .await)
    }

    async fn delete_tag(&self, id: &DocumentId) -> Result<u64> {
        Ok(delete_single(&self.tags, id).await)
    }

    async fn find_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| filter.matches(note))
            .cloned()
            .collect())
    }

    async fn find_single_note_by_id(&self, id: &DocumentId) -> Result<Option<Note>> {
        Ok(self.notes.lock().await.get(id).cloned())
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let note = Note {
            id: DocumentId::new(),
            name: values.name.to_string(),
            text: values.text.to_string(),
            color: values.color.to_string(),
            order: values.order,
            is_deleted: Flag::False,
            is_archived: Flag::False,
            notebook_id: values.notebook_id,
            tags: Vec::new(),
            created_at: values.created_at,
            updated_at: values.created_at,
        };

        self.notes.lock().await.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(&self, id: &DocumentId, update: &NoteUpdate) -> Result<UpdateOutcome> {
        Ok(update_single(&self.notes, id, |note| apply_note_update(note, update)).await)
    }

    async fn update_many_notes(&self, filter: &NoteFilter, update: &NoteUpdate) -> Result<u64> {
        #[cfg(test)]
        if self.fail_bulk_updates.load(Ordering::SeqCst) {
            return Err(Error::Connection("bulk update failed".to_string()));
        }

        Ok(self
            .notes
            .lock()
            .await
            .values_mut()
            .filter(|note| filter.matches(note))
            .map(|note| u64::from(apply_note_update(note, update)))
            .sum())
    }

    async fn delete_note(&self, id: &DocumentId) -> Result<u64> {
        Ok(delete_single(&self.notes, id).await)
    }

    async fn find_reminders_by_note(&self, note_id: &DocumentId) -> Result<Vec<Reminder>> {
        Ok(self
            .reminders
            .lock()
            .await
            .values()
            .filter(|reminder| &reminder.note_id == note_id)
            .cloned()
            .collect())
    }

    async fn find_single_reminder_by_id(&self, id: &DocumentId) -> Result<Option<Reminder>> {
        Ok(self.reminders.lock().await.get(id).cloned())
    }

    async fn create_reminder(&self, values: &CreateReminderValues<'_>) -> Result<Reminder> {
        let reminder = Reminder {
            id: DocumentId::new(),
            note_id: values.note_id,
            name: values.name.to_string(),
            message: values.message.to_string(),
            remind_at: values.remind_at,
            is_active: Flag::True,
            repeat: values.repeat,
        };

        self.reminders
            .lock()
            .await
            .insert(reminder.id, reminder.clone());

        Ok(reminder)
    }

    async fn update_reminder(
        &self,
        id: &DocumentId,
        values: &UpdateReminderValues,
    ) -> Result<UpdateOutcome> {
        Ok(update_single(&self.reminders, id, |reminder| {
            let is_active = values.is_active.map(Flag::from);

            let mut changed = replace(&mut reminder.name, values.name.as_ref());
            changed |= replace(&mut reminder.message, values.message.as_ref());
            changed |= replace(&mut reminder.remind_at, values.remind_at.as_ref());
            changed |= replace(&mut reminder.is_active, is_active.as_ref());
            changed |= replace(&mut reminder.repeat, values.repeat.as_ref());
            changed
        })
        .await)
    }

    async fn delete_reminder(&self, id: &DocumentId) -> Result<u64> {
        Ok(delete_single(&self.reminders, id).await)
    }

    async fn delete_reminders_by_note(&self, note_id: &DocumentId) -> Result<u64> {
        let mut reminders = self.reminders.lock().await;

        let before = reminders.len();
        reminders.retain(|_, reminder| &reminder.note_id != note_id);

        Ok((before - reminders.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    async fn note(storage: &Memory, name: &str) -> Note {
        let values = CreateNoteValues {
            name,
            text: "",
            color: "",
            order: 0,
            notebook_id: None,
            created_at: Utc::now().fixed_offset(),
        };

        storage.create_note(&values).await.unwrap()
    }

    #[tokio::test]
    async fn test_bulk_update_until_failure_is_switched_on() {
        let storage = Memory::new();

        let a = note(&storage, "A").await;
        note(&storage, "B").await;

        let modified = storage
            .update_many_notes(&NoteFilter::Active, &NoteUpdate::SetArchived(true))
            .await
            .unwrap();
        assert_eq!(2, modified);

        storage.fail_bulk_updates();

        let result = storage
            .update_many_notes(&NoteFilter::Archived, &NoteUpdate::SetArchived(false))
            .await;
        assert!(matches!(result, Err(Error::Connection(_))));

        // single updates keep working
        let outcome = storage
            .update_note(&a.id, &NoteUpdate::SetArchived(false))
            .await
            .unwrap();
        assert_eq!(1, outcome.modified);
    }
}
