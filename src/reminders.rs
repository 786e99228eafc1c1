//! Reminders attached to notes

use chrono::DateTime;
use chrono::FixedOffset;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::id::DocumentId;
use crate::notes::Flag;
use crate::storage::CreateReminderValues;
use crate::storage::Storage;
use crate::storage::UpdateReminderValues;
use crate::utils::supplied;

/// How often a reminder comes back
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repeat {
    /// Fires once
    #[default]
    Never,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Reminder attached to a note
#[derive(Clone, Debug)]
pub struct Reminder {
    pub id: DocumentId,
    pub note_id: DocumentId,
    pub name: String,
    pub message: String,
    pub remind_at: DateTime<FixedOffset>,
    pub is_active: Flag,
    pub repeat: Repeat,
}

/// Fields of a new reminder as sent by a client
#[derive(Debug, Default)]
pub struct NewReminder {
    pub name: Option<String>,
    pub message: Option<String>,
    pub remind_at: Option<DateTime<FixedOffset>>,
    pub repeat: Option<Repeat>,
}

/// Create an active reminder for an existing note
///
/// # Errors
///
/// Will return `Err` when the note does not exist, the moment is missing, or the storage fails
pub async fn create_reminder<S: Storage>(
    storage: &S,
    note_id: &DocumentId,
    reminder: NewReminder,
) -> Result<Reminder> {
    if storage.find_single_note_by_id(note_id).await?.is_none() {
        return Err(Error::InvalidReference("Note"));
    }

    let remind_at = reminder
        .remind_at
        .ok_or_else(|| Error::Validation("`remindAt` is required".to_string()))?;

    let values = CreateReminderValues {
        note_id: *note_id,
        name: reminder.name.as_deref().unwrap_or_default(),
        message: reminder.message.as_deref().unwrap_or_default(),
        remind_at,
        repeat: reminder.repeat.unwrap_or_default(),
    };

    let reminder = storage.create_reminder(&values).await?;

    tracing::info!("Created reminder {} for note {note_id}", reminder.id);

    Ok(reminder)
}

/// All reminders of an existing note
///
/// # Errors
///
/// Will return `Err` when the note does not exist, or the storage fails
pub async fn list_reminders<S: Storage>(storage: &S, note_id: &DocumentId) -> Result<Vec<Reminder>> {
    if storage.find_single_note_by_id(note_id).await?.is_none() {
        return Err(Error::NotFound("Note"));
    }

    Ok(storage.find_reminders_by_note(note_id).await?)
}

/// Find a single reminder
///
/// # Errors
///
/// Will return `Err` when the reminder does not exist, or the storage fails
pub async fn find_reminder<S: Storage>(storage: &S, id: &DocumentId) -> Result<Reminder> {
    storage
        .find_single_reminder_by_id(id)
        .await?
        .ok_or(Error::NotFound("Reminder"))
}

/// Sparse update of a reminder, returns the number of modified reminders
///
/// # Errors
///
/// Will return `Err` when the reminder does not exist, or the storage fails
pub async fn update_reminder<S: Storage>(
    storage: &S,
    id: &DocumentId,
    values: UpdateReminderValues,
) -> Result<u64> {
    let values = UpdateReminderValues {
        name: supplied(values.name),
        message: supplied(values.message),
        ..values
    };

    if values.is_empty() {
        find_reminder(storage, id).await?;
        return Ok(0);
    }

    let outcome = storage.update_reminder(id, &values).await?;

    if !outcome.is_matched() {
        return Err(Error::NotFound("Reminder"));
    }

    Ok(outcome.modified)
}

/// Delete a reminder
///
/// # Errors
///
/// Will return `Err` when the reminder does not exist, or the storage fails
pub async fn delete_reminder<S: Storage>(storage: &S, id: &DocumentId) -> Result<()> {
    if storage.delete_reminder(id).await? == 0 {
        return Err(Error::NotFound("Reminder"));
    }

    tracing::info!("Deleted reminder {id}");

    Ok(())
}
