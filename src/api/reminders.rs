//! Reminder API management

use axum::Extension;
use chrono::DateTime;
use chrono::FixedOffset;
use serde::Deserialize;
use serde::Serialize;

use crate::reminders;
use crate::reminders::NewReminder;
use crate::reminders::Reminder;
use crate::reminders::Repeat;
use crate::storage::Storage;
use crate::storage::UpdateReminderValues;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::notes::ModifiedResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    /// Reminder ID
    pub id: String,

    /// Note the reminder belongs to
    pub note_id: String,

    /// Short title
    pub name: String,

    /// Message shown when it fires
    pub message: String,

    /// Moment it fires
    pub remind_at: DateTime<FixedOffset>,

    /// Switched on
    pub is_active: bool,

    /// How often it comes back
    pub repeat: Repeat,
}

impl ReminderResponse {
    fn from_reminder(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.to_string(),
            note_id: reminder.note_id.to_string(),
            name: reminder.name,
            message: reminder.message,
            remind_at: reminder.remind_at,
            is_active: reminder.is_active.is_set(),
            repeat: reminder.repeat,
        }
    }
}

/// All reminders of a note
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<Vec<ReminderResponse>>, Error> {
    let reminders = reminders::list_reminders(&storage, &note_id.parse()?).await?;

    Ok(Success::ok(
        reminders
            .into_iter()
            .map(ReminderResponse::from_reminder)
            .collect(),
    ))
}

pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(reminder_id): PathParameters<String>,
) -> Result<Success<ReminderResponse>, Error> {
    let reminder = reminders::find_reminder(&storage, &reminder_id.parse()?).await?;

    Ok(Success::ok(ReminderResponse::from_reminder(reminder)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderForm {
    /// Title, empty means not supplied
    name: Option<String>,

    /// Message, empty means not supplied
    message: Option<String>,

    /// RFC 3339 moment, required on create
    remind_at: Option<DateTime<FixedOffset>>,

    /// Applied whenever present, ignored on create
    is_active: Option<bool>,

    /// Defaults to `never` on create
    repeat: Option<Repeat>,
}

/// Create a reminder for a note
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "name": "Call", "remindAt": "2026-01-01T09:00:00+01:00", "repeat": "weekly" }' \
///     http://localhost:6000/api/v1/notes/<id>/reminders
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<String>,
    Form(form): Form<ReminderForm>,
) -> Result<Success<ReminderResponse>, Error> {
    let reminder = NewReminder {
        name: form.name,
        message: form.message,
        remind_at: form.remind_at,
        repeat: form.repeat,
    };

    let reminder = reminders::create_reminder(&storage, &note_id.parse()?, reminder).await?;

    Ok(Success::created(ReminderResponse::from_reminder(reminder)))
}

pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(reminder_id): PathParameters<String>,
    Form(form): Form<ReminderForm>,
) -> Result<Success<ModifiedResponse>, Error> {
    let values = UpdateReminderValues {
        name: form.name,
        message: form.message,
        remind_at: form.remind_at,
        is_active: form.is_active,
        repeat: form.repeat,
    };

    let modified = reminders::update_reminder(&storage, &reminder_id.parse()?, values).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(reminder_id): PathParameters<String>,
) -> Result<Success<()>, Error> {
    reminders::delete_reminder(&storage, &reminder_id.parse()?).await?;

    Ok(Success::empty())
}
