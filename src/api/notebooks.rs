//! Notebook API management

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::cleanup;
use crate::lifecycle;
use crate::notebooks;
use crate::notebooks::NoteBook;
use crate::notes::NoteFilter;
use crate::storage::Storage;
use crate::storage::UpdateNoteBookValues;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::notes::ModifiedResponse;
use super::notes::NoteResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteBookResponse {
    /// Notebook ID
    pub id: String,

    /// Name of the notebook
    pub name: String,

    /// Free form description
    pub description: String,

    /// Marked active by the client
    pub is_active: bool,
}

impl NoteBookResponse {
    fn from_notebook(notebook: NoteBook) -> Self {
        Self {
            id: notebook.id.to_string(),
            name: notebook.name,
            description: notebook.description,
            is_active: notebook.is_active,
        }
    }
}

pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<NoteBookResponse>>, Error> {
    let notebooks = storage
        .find_all_notebooks()
        .await
        .map_err(crate::error::Error::from)?;

    Ok(Success::ok(
        notebooks
            .into_iter()
            .map(NoteBookResponse::from_notebook)
            .collect(),
    ))
}

pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(notebook_id): PathParameters<String>,
) -> Result<Success<NoteBookResponse>, Error> {
    let notebook = notebooks::find_notebook(&storage, &notebook_id.parse()?).await?;

    Ok(Success::ok(NoteBookResponse::from_notebook(notebook)))
}

/// All notes in the notebook, trashed and archived ones included
pub async fn notes<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(notebook_id): PathParameters<String>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let filter = NoteFilter::ByNotebook(notebook_id.parse()?);
    let notes = lifecycle::list_notes(&storage, &filter).await?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteBookForm {
    /// Name, required on create, empty means not supplied
    name: Option<String>,

    /// Description, empty means not supplied
    description: Option<String>,

    /// Applied whenever present
    is_active: Option<bool>,
}

/// Create a new notebook
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "name": "Work", "description": "Office things", "isActive": true }' \
///     http://localhost:6000/api/v1/notebooks
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    Form(form): Form<NoteBookForm>,
) -> Result<Success<NoteBookResponse>, Error> {
    let notebook = notebooks::create_notebook(
        &storage,
        form.name,
        form.description,
        form.is_active.unwrap_or_default(),
    )
    .await?;

    Ok(Success::created(NoteBookResponse::from_notebook(notebook)))
}

pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(notebook_id): PathParameters<String>,
    Form(form): Form<NoteBookForm>,
) -> Result<Success<ModifiedResponse>, Error> {
    let values = UpdateNoteBookValues {
        name: form.name,
        description: form.description,
        is_active: form.is_active,
    };

    let modified = notebooks::update_notebook(&storage, &notebook_id.parse()?, values).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

/// Delete a notebook, its notes stay without a notebook
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(notebook_id): PathParameters<String>,
) -> Result<Success<()>, Error> {
    cleanup::delete_notebook(&storage, &notebook_id.parse()?).await?;

    Ok(Success::empty())
}
