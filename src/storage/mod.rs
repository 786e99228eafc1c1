//! All things related to the storage of notes, notebooks, tags, reminders and users
//!
//! Every entity lives in its own collection. The storage knows nothing about the rules of the
//! note lifecycle, it only filters, patches and deletes documents.

use async_trait::async_trait;
use thiserror::Error;

use crate::id::DocumentId;
use crate::notebooks::NoteBook;
use crate::notes::Note;
use crate::notes::NoteFilter;
use crate::reminders::Reminder;
use crate::tags::Tag;
use crate::users::User;

pub use form_types::*;
pub use memory::Memory;
pub use mongo::Mongo;

mod form_types;
mod memory;
mod mongo;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// A unique index rejected the document
    #[error("Duplicate key: {0}")]
    Duplicate(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Outcome of an update of a single document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of documents matching the ID
    pub matched: u64,

    /// Number of documents actually changed
    pub modified: u64,
}

impl UpdateOutcome {
    /// Did the ID resolve to a document
    pub fn is_matched(self) -> bool {
        self.matched > 0
    }
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Check the storage is reachable
    async fn ping(&self) -> Result<()>;

    /// Finds a single user by its email
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Finds a single user by its ID
    async fn find_single_user_by_id(&self, id: &DocumentId) -> Result<Option<User>>;

    /// Create a single user
    ///
    /// Fails with [`Error::Duplicate`] when the email is taken
    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User>;

    /// Change the password of a user
    async fn change_password(&self, user: &User, values: &ChangePasswordValues<'_>)
    -> Result<User>;

    /// Find all notebooks, in storage order
    async fn find_all_notebooks(&self) -> Result<Vec<NoteBook>>;

    /// Find a single notebook by ID
    async fn find_single_notebook_by_id(&self, id: &DocumentId) -> Result<Option<NoteBook>>;

    /// Create a notebook
    async fn create_notebook(&self, values: &CreateNoteBookValues<'_>) -> Result<NoteBook>;

    /// Update the supplied fields of a notebook
    async fn update_notebook(
        &self,
        id: &DocumentId,
        values: &UpdateNoteBookValues,
    ) -> Result<UpdateOutcome>;

    /// Delete a notebook, returns the number of deleted documents
    async fn delete_notebook(&self, id: &DocumentId) -> Result<u64>;

    /// Find all tags, in storage order
    async fn find_all_tags(&self) -> Result<Vec<Tag>>;

    /// Find a single tag by ID
    async fn find_single_tag_by_id(&self, id: &DocumentId) -> Result<Option<Tag>>;

    /// Create a tag
    async fn create_tag(&self, values: &CreateTagValues<'_>) -> Result<Tag>;

    /// Update the supplied fields of a tag
    async fn update_tag(&self, id: &DocumentId, values: &UpdateTagValues)
    -> Result<UpdateOutcome>;

    /// Delete a tag, returns the number of deleted documents
    async fn delete_tag(&self, id: &DocumentId) -> Result<u64>;

    /// Find all notes matching the filter, in storage order
    async fn find_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>>;

    /// Find a single note by ID, regardless of trash or archive
    async fn find_single_note_by_id(&self, id: &DocumentId) -> Result<Option<Note>>;

    /// Create a note, neither trashed nor archived
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note>;

    /// Apply an update to a single note
    async fn update_note(&self, id: &DocumentId, update: &NoteUpdate) -> Result<UpdateOutcome>;

    /// Apply an update to every note matching the filter, returns the number of changed notes
    async fn update_many_notes(&self, filter: &NoteFilter, update: &NoteUpdate) -> Result<u64>;

    /// Delete a note, returns the number of deleted documents
    async fn delete_note(&self, id: &DocumentId) -> Result<u64>;

    /// Find all reminders of a note
    async fn find_reminders_by_note(&self, note_id: &DocumentId) -> Result<Vec<Reminder>>;

    /// Find a single reminder by ID
    async fn find_single_reminder_by_id(&self, id: &DocumentId) -> Result<Option<Reminder>>;

    /// Create a reminder, active from the start
    async fn create_reminder(&self, values: &CreateReminderValues<'_>) -> Result<Reminder>;

    /// Update the supplied fields of a reminder
    async fn update_reminder(
        &self,
        id: &DocumentId,
        values: &UpdateReminderValues,
    ) -> Result<UpdateOutcome>;

    /// Delete a reminder, returns the number of deleted documents
    async fn delete_reminder(&self, id: &DocumentId) -> Result<u64>;

    /// Delete all reminders of a note, returns the number of deleted documents
    async fn delete_reminders_by_note(&self, note_id: &DocumentId) -> Result<u64>;
}
