//! Note API management
//!
//! Reading is open to everyone, every mutation needs a [`CurrentUser`]

use axum::Extension;
use chrono::DateTime;
use chrono::FixedOffset;
use serde::Deserialize;
use serde::Serialize;

use crate::clock::Clock;
use crate::id::DocumentId;
use crate::lifecycle;
use crate::lifecycle::NoteFields;
use crate::notes::Note;
use crate::notes::NoteFilter;
use crate::storage::Storage;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::QueryParameters;
use super::Success;
use super::request::parse_id_list;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID
    pub id: String,

    /// Title of the note
    pub name: String,

    /// Body of the note
    pub text: String,

    /// Display color, free form
    pub color: String,

    /// Position set by the client
    pub order: i64,

    /// In the trash
    pub is_deleted: bool,

    /// In the archive
    pub is_archived: bool,

    /// Notebook the note belongs to, if any
    pub notebook_id: Option<String>,

    /// IDs of the attached tags
    pub tags: Vec<String>,

    /// Creation date
    pub created_at: DateTime<FixedOffset>,

    /// Last time the content changed
    pub updated_at: DateTime<FixedOffset>,
}

impl NoteResponse {
    pub fn from_note(note: Note) -> Self {
        Self {
            id: note.id.to_string(),
            name: note.name,
            text: note.text,
            color: note.color,
            order: note.order,
            is_deleted: note.is_deleted.is_set(),
            is_archived: note.is_archived.is_set(),
            notebook_id: note.notebook_id.map(|notebook_id| notebook_id.to_string()),
            tags: note.tags.iter().map(ToString::to_string).collect(),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    pub fn from_note_multiple(notes: Vec<Note>) -> Vec<Self> {
        notes.into_iter().map(Self::from_note).collect()
    }
}

/// Number of documents an update changed
#[derive(Debug, Serialize)]
pub struct ModifiedResponse {
    /// Number of documents that actually changed
    pub modified: u64,
}

impl ModifiedResponse {
    pub fn new(modified: u64) -> Self {
        Self { modified }
    }
}

async fn list_by<S: Storage>(
    storage: &S,
    filter: NoteFilter,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let notes = lifecycle::list_notes(storage, &filter).await?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

/// List all notes that are neither trashed nor archived
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/v1/notes
/// ```
///
/// Response:
/// ```json
/// { "data": [ { "id": "<id>", "name": "Groceries", ... } ], "error": "" }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    list_by(&storage, NoteFilter::Active).await
}

/// List all notes in the trash
pub async fn list_trash<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    list_by(&storage, NoteFilter::Trashed).await
}

/// List all notes in the archive
pub async fn list_archive<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    list_by(&storage, NoteFilter::Archived).await
}

#[derive(Debug, Deserialize)]
pub struct TaggedQuery {
    /// Comma separated tag IDs
    #[serde(default)]
    tags: String,
}

/// List all notes carrying every one of the tags
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:6000/api/v1/notes/tagged?tags=<id>,<id>'
/// ```
pub async fn list_tagged<S: Storage>(
    Extension(storage): Extension<S>,
    QueryParameters(query): QueryParameters<TaggedQuery>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let tag_ids = parse_id_list(&query.tags)?;

    list_by(&storage, NoteFilter::ByTags(tag_ids)).await
}

pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<NoteResponse>, Error> {
    let note = lifecycle::find_note(&storage, &note_id.parse()?).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Content of a note as sent by a client
///
/// The trash and archive flags are not part of it, those only change through their own routes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteForm {
    /// Title, empty means not supplied
    name: Option<String>,

    /// Body, empty means not supplied
    text: Option<String>,

    /// Display color, empty means not supplied
    color: Option<String>,

    /// Position, zero means not supplied
    order: Option<i64>,

    /// Notebook to create the note in, ignored on update
    notebook_id: Option<String>,
}

impl NoteForm {
    fn fields(self) -> NoteFields {
        NoteFields {
            name: self.name,
            text: self.text,
            color: self.color,
            order: self.order,
        }
    }
}

/// Create a new note
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "name": "Groceries", "text": "Milk", "notebookId": "<id>" }' \
///     http://localhost:6000/api/v1/notes
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Extension(clock): Extension<Clock>,
    _current_user: CurrentUser<S>,
    Form(form): Form<NoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let notebook_id = DocumentId::parse_optional(form.notebook_id.as_deref())?;

    let note = lifecycle::create_note(&storage, &clock, form.fields(), notebook_id).await?;

    Ok(Success::created(NoteResponse::from_note(note)))
}

/// Update the content of a note
///
/// Only non-empty fields are written, the notebook is changed through its own route
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    Extension(clock): Extension<Clock>,
    _current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<String>,
    Form(form): Form<NoteForm>,
) -> Result<Success<ModifiedResponse>, Error> {
    let modified =
        lifecycle::update_note_fields(&storage, &clock, &note_id.parse()?, form.fields()).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

/// Delete a note and its reminders for good
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<()>, Error> {
    lifecycle::delete_note(&storage, &note_id.parse()?).await?;

    Ok(Success::empty())
}

pub async fn move_to_trash<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<ModifiedResponse>, Error> {
    let modified = lifecycle::move_to_trash(&storage, &note_id.parse()?).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

pub async fn restore_from_trash<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<ModifiedResponse>, Error> {
    let modified = lifecycle::restore_from_trash(&storage, &note_id.parse()?).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

pub async fn move_to_archive<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<ModifiedResponse>, Error> {
    let modified = lifecycle::move_to_archive(&storage, &note_id.parse()?).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

pub async fn restore_from_archive<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<ModifiedResponse>, Error> {
    let modified = lifecycle::restore_from_archive(&storage, &note_id.parse()?).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookForm {
    /// Notebook to link to, empty or `null` unlinks
    notebook_id: Option<String>,
}

/// Link a note to a notebook, an empty or missing `notebookId` unlinks it
///
/// Request:
/// ```sh
/// curl -v -X PUT -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "notebookId": "<id>" }' \
///     http://localhost:6000/api/v1/notes/<id>/notebook
/// ```
pub async fn reassign_notebook<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<String>,
    Form(form): Form<NotebookForm>,
) -> Result<Success<ModifiedResponse>, Error> {
    let note_id = note_id.parse()?;
    let notebook_id = DocumentId::parse_optional(form.notebook_id.as_deref())?;

    let modified = lifecycle::reassign_notebook(&storage, &note_id, notebook_id).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

pub async fn attach_tag<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters((note_id, tag_id)): PathParameters<(String, String)>,
) -> Result<Success<ModifiedResponse>, Error> {
    let modified = lifecycle::attach_tag(&storage, &note_id.parse()?, &tag_id.parse()?).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

pub async fn detach_tag<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters((note_id, tag_id)): PathParameters<(String, String)>,
) -> Result<Success<ModifiedResponse>, Error> {
    let modified = lifecycle::detach_tag(&storage, &note_id.parse()?, &tag_id.parse()?).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}
