//! Tags
//!
//! Notes carry the IDs of their tags. Deleting a tag goes through [`crate::cleanup`].

use crate::error::Error;
use crate::error::Result;
use crate::id::DocumentId;
use crate::storage::CreateTagValues;
use crate::storage::Storage;
use crate::storage::UpdateTagValues;
use crate::utils::supplied;

/// Label a note may carry
#[derive(Clone, Debug)]
pub struct Tag {
    pub id: DocumentId,
    pub name: String,
    pub color: String,
}

/// Create a tag
///
/// # Errors
///
/// Will return `Err` when the name is missing, or the storage fails
pub async fn create_tag<S: Storage>(
    storage: &S,
    name: Option<String>,
    color: Option<String>,
) -> Result<Tag> {
    let name = supplied(name).ok_or_else(|| Error::Validation("Name is required".to_string()))?;

    let values = CreateTagValues {
        name: &name,
        color: color.as_deref().unwrap_or_default(),
    };

    let tag = storage.create_tag(&values).await?;

    tracing::info!("Created tag {}", tag.id);

    Ok(tag)
}

/// Find a single tag
///
/// # Errors
///
/// Will return `Err` when the tag does not exist, or the storage fails
pub async fn find_tag<S: Storage>(storage: &S, id: &DocumentId) -> Result<Tag> {
    storage
        .find_single_tag_by_id(id)
        .await?
        .ok_or(Error::NotFound("Tag"))
}

/// Sparse update of a tag, returns the number of modified tags
///
/// # Errors
///
/// Will return `Err` when the tag does not exist, or the storage fails
pub async fn update_tag<S: Storage>(
    storage: &S,
    id: &DocumentId,
    values: UpdateTagValues,
) -> Result<u64> {
    let values = UpdateTagValues {
        name: supplied(values.name),
        color: supplied(values.color),
    };

    if values.is_empty() {
        find_tag(storage, id).await?;
        return Ok(0);
    }

    let outcome = storage.update_tag(id, &values).await?;

    if !outcome.is_matched() {
        return Err(Error::NotFound("Tag"));
    }

    Ok(outcome.modified)
}
