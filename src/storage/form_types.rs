//! Form types

use chrono::DateTime;
use chrono::FixedOffset;
use uuid::Uuid;

use crate::id::DocumentId;
use crate::reminders::Repeat;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The initial session ID for the user
    pub session_id: &'a Uuid,

    /// The normalized email
    pub email: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,

    pub first_name: &'a str,

    pub last_name: &'a str,

    /// Registration date
    pub created_at: DateTime<FixedOffset>,
}

/// Values to change a password of a user
pub struct ChangePasswordValues<'a> {
    /// New session ID to invalidate current tokens
    pub session_id: &'a Uuid,

    /// The new hashed password
    pub hashed_password: &'a str,
}

/// Values to create a NoteBook
pub struct CreateNoteBookValues<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub is_active: bool,
}

/// Values to update a NoteBook
///
/// Only the `Some` fields are written
#[derive(Debug, Default)]
pub struct UpdateNoteBookValues {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateNoteBookValues {
    /// Nothing to write
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_active.is_none()
    }
}

/// Values to create a Tag
pub struct CreateTagValues<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

/// Values to update a Tag
///
/// Only the `Some` fields are written
#[derive(Debug, Default)]
pub struct UpdateTagValues {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl UpdateTagValues {
    /// Nothing to write
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

/// Values to create a Note
///
/// There is no way to create a note in the trash or the archive
pub struct CreateNoteValues<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub color: &'a str,
    pub order: i64,

    /// Already verified notebook
    pub notebook_id: Option<DocumentId>,

    /// Creation date, also used as the first modification date
    pub created_at: DateTime<FixedOffset>,
}

/// Values to update the content of a Note
///
/// Only the `Some` fields are written, `updated_at` always is
#[derive(Clone, Debug)]
pub struct UpdateNoteValues {
    pub name: Option<String>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub order: Option<i64>,
    pub updated_at: DateTime<FixedOffset>,
}

impl UpdateNoteValues {
    /// No content field to write
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.text.is_none() && self.color.is_none() && self.order.is_none()
    }
}

/// Possible updates of a note
#[derive(Clone, Debug)]
pub enum NoteUpdate {
    /// Sparse patch of the content
    Fields(UpdateNoteValues),

    /// Move to or restore from the trash
    SetDeleted(bool),

    /// Move to or restore from the archive
    SetArchived(bool),

    /// Link to a notebook, or unlink with `None`
    SetNotebook(Option<DocumentId>),

    /// Set-union of the tags with a single tag
    AddTag(DocumentId),

    /// Set-difference of the tags with a single tag
    RemoveTag(DocumentId),
}

/// Values to create a Reminder
pub struct CreateReminderValues<'a> {
    pub note_id: DocumentId,
    pub name: &'a str,
    pub message: &'a str,
    pub remind_at: DateTime<FixedOffset>,
    pub repeat: Repeat,
}

/// Values to update a Reminder
///
/// Only the `Some` fields are written
#[derive(Debug, Default)]
pub struct UpdateReminderValues {
    pub name: Option<String>,
    pub message: Option<String>,
    pub remind_at: Option<DateTime<FixedOffset>>,
    pub is_active: Option<bool>,
    pub repeat: Option<Repeat>,
}

impl UpdateReminderValues {
    /// Nothing to write
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.message.is_none()
            && self.remind_at.is_none()
            && self.is_active.is_none()
            && self.repeat.is_none()
    }
}
