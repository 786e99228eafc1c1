//! All API endpoint setup

use axum::Extension;
use axum::Router;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;

use crate::storage::Storage;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use response::Error;
pub use response::Success;

mod current_user;
mod notebooks;
mod notes;
mod reminders;
mod request;
mod response;
mod tags;
mod users;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let users = Router::new()
        .route("/register", post(users::register::<S>))
        .route("/login", post(users::login::<S>))
        .route("/me", get(users::me::<S>))
        .route("/me/password", put(users::change_password::<S>));

    let notes = Router::new()
        .route("/", get(notes::list::<S>).post(notes::create::<S>))
        .route("/trash", get(notes::list_trash::<S>))
        .route("/archive", get(notes::list_archive::<S>))
        .route("/tagged", get(notes::list_tagged::<S>))
        .route(
            "/{note}",
            get(notes::single::<S>)
                .patch(notes::update::<S>)
                .delete(notes::delete::<S>),
        )
        .route(
            "/{note}/trash",
            put(notes::move_to_trash::<S>).delete(notes::restore_from_trash::<S>),
        )
        .route(
            "/{note}/archive",
            put(notes::move_to_archive::<S>).delete(notes::restore_from_archive::<S>),
        )
        .route("/{note}/notebook", put(notes::reassign_notebook::<S>))
        .route(
            "/{note}/tags/{tag}",
            put(notes::attach_tag::<S>).delete(notes::detach_tag::<S>),
        )
        .route(
            "/{note}/reminders",
            get(reminders::list::<S>).post(reminders::create::<S>),
        );

    let notebooks = Router::new()
        .route("/", get(notebooks::list::<S>).post(notebooks::create::<S>))
        .route(
            "/{notebook}",
            get(notebooks::single::<S>)
                .patch(notebooks::update::<S>)
                .delete(notebooks::delete::<S>),
        )
        .route("/{notebook}/notes", get(notebooks::notes::<S>));

    let tags = Router::new()
        .route("/", get(tags::list::<S>).post(tags::create::<S>))
        .route(
            "/{tag}",
            get(tags::single::<S>)
                .patch(tags::update::<S>)
                .delete(tags::delete::<S>),
        );

    let reminders = Router::new().route(
        "/{reminder}",
        get(reminders::single::<S>)
            .patch(reminders::update::<S>)
            .delete(reminders::delete::<S>),
    );

    Router::new()
        .route("/health", get(health::<S>))
        .nest("/users", users)
        .nest("/notes", notes)
        .nest("/notebooks", notebooks)
        .nest("/tags", tags)
        .nest("/reminders", reminders)
}

/// Check the storage can be reached
pub async fn health<S: Storage>(Extension(storage): Extension<S>) -> Result<Success<()>, Error> {
    storage.ping().await.map_err(crate::error::Error::from)?;

    Ok(Success::empty())
}

/// Every unknown route
pub async fn not_found() -> Error {
    Error::not_found("Route not found")
}
