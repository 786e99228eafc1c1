//! Notebooks
//!
//! Notes point to their notebook, the notebook knows nothing about them. Deleting a notebook
//! goes through [`crate::cleanup`].

use crate::error::Error;
use crate::error::Result;
use crate::id::DocumentId;
use crate::storage::CreateNoteBookValues;
use crate::storage::Storage;
use crate::storage::UpdateNoteBookValues;
use crate::utils::supplied;

/// Named grouping of notes
#[derive(Clone, Debug)]
pub struct NoteBook {
    pub id: DocumentId,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

/// Create a notebook
///
/// # Errors
///
/// Will return `Err` when the name is missing, or the storage fails
pub async fn create_notebook<S: Storage>(
    storage: &S,
    name: Option<String>,
    description: Option<String>,
    is_active: bool,
) -> Result<NoteBook> {
    let name = supplied(name).ok_or_else(|| Error::Validation("Name is required".to_string()))?;

    let values = CreateNoteBookValues {
        name: &name,
        description: description.as_deref().unwrap_or_default(),
        is_active,
    };

    let notebook = storage.create_notebook(&values).await?;

    tracing::info!("Created notebook {}", notebook.id);

    Ok(notebook)
}

/// Find a single notebook
///
/// # Errors
///
/// Will return `Err` when the notebook does not exist, or the storage fails
pub async fn find_notebook<S: Storage>(storage: &S, id: &DocumentId) -> Result<NoteBook> {
    storage
        .find_single_notebook_by_id(id)
        .await?
        .ok_or(Error::NotFound("Notebook"))
}

/// Sparse update of a notebook, returns the number of modified notebooks
///
/// Empty strings count as not supplied, `is_active` is written whenever present
///
/// # Errors
///
/// Will return `Err` when the notebook does not exist, or the storage fails
pub async fn update_notebook<S: Storage>(
    storage: &S,
    id: &DocumentId,
    values: UpdateNoteBookValues,
) -> Result<u64> {
    let values = UpdateNoteBookValues {
        name: supplied(values.name),
        description: supplied(values.description),
        is_active: values.is_active,
    };

    if values.is_empty() {
        find_notebook(storage, id).await?;
        return Ok(0);
    }

    let outcome = storage.update_notebook(id, &values).await?;

    if !outcome.is_matched() {
        return Err(Error::NotFound("Notebook"));
    }

    Ok(outcome.modified)
}
