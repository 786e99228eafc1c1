//! Tag API management

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::cleanup;
use crate::storage::Storage;
use crate::storage::UpdateTagValues;
use crate::tags;
use crate::tags::Tag;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::notes::ModifiedResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    /// Tag ID
    pub id: String,

    /// Label of the tag
    pub name: String,

    /// Display color, free form
    pub color: String,
}

impl TagResponse {
    fn from_tag(tag: Tag) -> Self {
        Self {
            id: tag.id.to_string(),
            name: tag.name,
            color: tag.color,
        }
    }
}

pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<TagResponse>>, Error> {
    let tags = storage
        .find_all_tags()
        .await
        .map_err(crate::error::Error::from)?;

    Ok(Success::ok(tags.into_iter().map(TagResponse::from_tag).collect()))
}

pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(tag_id): PathParameters<String>,
) -> Result<Success<TagResponse>, Error> {
    let tag = tags::find_tag(&storage, &tag_id.parse()?).await?;

    Ok(Success::ok(TagResponse::from_tag(tag)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagForm {
    /// Label, required on create, empty means not supplied
    name: Option<String>,

    /// Display color, empty means not supplied
    color: Option<String>,
}

/// Create a new tag
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "name": "urgent", "color": "red" }' \
///     http://localhost:6000/api/v1/tags
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    Form(form): Form<TagForm>,
) -> Result<Success<TagResponse>, Error> {
    let tag = tags::create_tag(&storage, form.name, form.color).await?;

    Ok(Success::created(TagResponse::from_tag(tag)))
}

pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(tag_id): PathParameters<String>,
    Form(form): Form<TagForm>,
) -> Result<Success<ModifiedResponse>, Error> {
    let values = UpdateTagValues {
        name: form.name,
        color: form.color,
    };

    let modified = tags::update_tag(&storage, &tag_id.parse()?, values).await?;

    Ok(Success::ok(ModifiedResponse::new(modified)))
}

/// Delete a tag, after removing it from every note
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(tag_id): PathParameters<String>,
) -> Result<Success<()>, Error> {
    cleanup::delete_tag(&storage, &tag_id.parse()?).await?;

    Ok(Success::empty())
}
