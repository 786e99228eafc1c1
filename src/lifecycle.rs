//! Note lifecycle
//!
//! Owns the trash and archive flags, the notebook link and the tag set of every note. All
//! preconditions are checked against the storage before a transition is issued, a failed check
//! leaves the note untouched.

use crate::clock::Clock;
use crate::error::Error;
use crate::error::Result;
use crate::id::DocumentId;
use crate::notes::Note;
use crate::notes::NoteFilter;
use crate::storage::CreateNoteValues;
use crate::storage::NoteUpdate;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;
use crate::utils::changed;
use crate::utils::supplied;

/// Content fields of a note as sent by a client
///
/// Empty strings and a zero order count as not supplied
#[derive(Clone, Debug, Default)]
pub struct NoteFields {
    pub name: Option<String>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub order: Option<i64>,
}

impl NoteFields {
    /// Drop everything that counts as not supplied
    fn normalize(self) -> Self {
        Self {
            name: supplied(self.name),
            text: supplied(self.text),
            color: supplied(self.color),
            order: self.order.filter(|order| *order != 0),
        }
    }
}

/// Create a note, never in the trash or the archive
///
/// # Errors
///
/// Will return `Err` when the notebook does not exist, or the storage fails
pub async fn create_note<S: Storage>(
    storage: &S,
    clock: &Clock,
    fields: NoteFields,
    notebook_id: Option<DocumentId>,
) -> Result<Note> {
    if let Some(notebook_id) = &notebook_id {
        ensure_notebook(storage, notebook_id).await?;
    }

    let fields = fields.normalize();

    let values = CreateNoteValues {
        name: fields.name.as_deref().unwrap_or_default(),
        text: fields.text.as_deref().unwrap_or_default(),
        color: fields.color.as_deref().unwrap_or_default(),
        order: fields.order.unwrap_or_default(),
        notebook_id,
        created_at: clock.now(),
    };

    let note = storage.create_note(&values).await?;

    tracing::info!("Created note {}", note.id);

    Ok(note)
}

/// Find a single note, regardless of trash or archive
///
/// # Errors
///
/// Will return `Err` when the note does not exist, or the storage fails
pub async fn find_note<S: Storage>(storage: &S, id: &DocumentId) -> Result<Note> {
    storage
        .find_single_note_by_id(id)
        .await?
        .ok_or(Error::NotFound("Note"))
}

/// List the notes matching a filter, in storage order
///
/// # Errors
///
/// Will return `Err` when the tag set is empty, the notebook does not exist, or the storage
/// fails
pub async fn list_notes<S: Storage>(storage: &S, filter: &NoteFilter) -> Result<Vec<Note>> {
    match filter {
        NoteFilter::ByTags(tag_ids) if tag_ids.is_empty() => {
            return Err(Error::Validation("At least one tag is required".to_string()));
        }
        NoteFilter::ByNotebook(notebook_id) => ensure_notebook(storage, notebook_id).await?,
        _ => {}
    }

    tracing::debug!("Listing notes: {filter:?}");

    Ok(storage.find_notes(filter).await?)
}

/// Move a note to the trash, the archive flag is left alone
///
/// # Errors
///
/// Will return `Err` when the note does not exist, or the storage fails
pub async fn move_to_trash<S: Storage>(storage: &S, id: &DocumentId) -> Result<u64> {
    transition(storage, id, NoteUpdate::SetDeleted(true)).await
}

/// Restore a note from the trash, the archive flag is left alone
///
/// # Errors
///
/// Will return `Err` when the note does not exist, or the storage fails
pub async fn restore_from_trash<S: Storage>(storage: &S, id: &DocumentId) -> Result<u64> {
    transition(storage, id, NoteUpdate::SetDeleted(false)).await
}

/// Move a note to the archive, the trash flag is left alone
///
/// # Errors
///
/// Will return `Err` when the note does not exist, or the storage fails
pub async fn move_to_archive<S: Storage>(storage: &S, id: &DocumentId) -> Result<u64> {
    transition(storage, id, NoteUpdate::SetArchived(true)).await
}

/// Restore a note from the archive, the trash flag is left alone
///
/// # Errors
///
/// Will return `Err` when the note does not exist, or the storage fails
pub async fn restore_from_archive<S: Storage>(storage: &S, id: &DocumentId) -> Result<u64> {
    transition(storage, id, NoteUpdate::SetArchived(false)).await
}

/// Link a note to another notebook, or unlink it with `None`
///
/// # Errors
///
/// Will return `Err` when the notebook or the note does not exist, or the storage fails
pub async fn reassign_notebook<S: Storage>(
    storage: &S,
    id: &DocumentId,
    notebook_id: Option<DocumentId>,
) -> Result<u64> {
    if let Some(notebook_id) = &notebook_id {
        ensure_notebook(storage, notebook_id).await?;
    }

    transition(storage, id, NoteUpdate::SetNotebook(notebook_id)).await
}

/// Attach a tag to a note, attaching it again changes nothing
///
/// # Errors
///
/// Will return `Err` when the tag or the note does not exist, or the storage fails
pub async fn attach_tag<S: Storage>(
    storage: &S,
    id: &DocumentId,
    tag_id: &DocumentId,
) -> Result<u64> {
    ensure_tag(storage, tag_id).await?;

    transition(storage, id, NoteUpdate::AddTag(*tag_id)).await
}

/// Detach a tag from a note, detaching an absent tag changes nothing
///
/// # Errors
///
/// Will return `Err` when the tag or the note does not exist, or the storage fails
pub async fn detach_tag<S: Storage>(
    storage: &S,
    id: &DocumentId,
    tag_id: &DocumentId,
) -> Result<u64> {
    ensure_tag(storage, tag_id).await?;

    transition(storage, id, NoteUpdate::RemoveTag(*tag_id)).await
}

/// Sparse update of the content of a note
///
/// Only fields that differ from the stored note are written, `updated_at` is refreshed when at
/// least one is. Returns the number of modified notes.
///
/// # Errors
///
/// Will return `Err` when the note does not exist, or the storage fails
pub async fn update_note_fields<S: Storage>(
    storage: &S,
    clock: &Clock,
    id: &DocumentId,
    fields: NoteFields,
) -> Result<u64> {
    let note = find_note(storage, id).await?;
    let fields = fields.normalize();

    let values = UpdateNoteValues {
        name: changed(fields.name, &note.name),
        text: changed(fields.text, &note.text),
        color: changed(fields.color, &note.color),
        order: changed(fields.order, &note.order),
        updated_at: clock.now(),
    };

    if values.is_empty() {
        tracing::debug!("Nothing to update for note {id}");
        return Ok(0);
    }

    transition(storage, id, NoteUpdate::Fields(values)).await
}

/// Delete a note for good, together with its reminders
///
/// # Errors
///
/// Will return `Err` when the note does not exist, or the storage fails
pub async fn delete_note<S: Storage>(storage: &S, id: &DocumentId) -> Result<()> {
    let reminders = storage.delete_reminders_by_note(id).await?;
    tracing::debug!("Deleted {reminders} reminder(s) of note {id}");

    if storage.delete_note(id).await? == 0 {
        return Err(Error::NotFound("Note"));
    }

    tracing::info!("Deleted note {id}");

    Ok(())
}

/// Issue an update to a single note
async fn transition<S: Storage>(storage: &S, id: &DocumentId, update: NoteUpdate) -> Result<u64> {
    tracing::debug!("Updating note {id}: {update:?}");

    let outcome = storage.update_note(id, &update).await?;

    if !outcome.is_matched() {
        return Err(Error::NotFound("Note"));
    }

    Ok(outcome.modified)
}

/// The notebook must exist to be referenced
async fn ensure_notebook<S: Storage>(storage: &S, notebook_id: &DocumentId) -> Result<()> {
    match storage.find_single_notebook_by_id(notebook_id).await? {
        Some(_) => Ok(()),
        None => Err(Error::InvalidReference("Notebook")),
    }
}

/// The tag must exist to be referenced
async fn ensure_tag<S: Storage>(storage: &S, tag_id: &DocumentId) -> Result<()> {
    match storage.find_single_tag_by_id(tag_id).await? {
        Some(_) => Ok(()),
        None => Err(Error::InvalidReference("Tag")),
    }
}
