//! User API management

use axum::Extension;
use axum_extra::extract::cookie::CookieJar;
use chrono::DateTime;
use chrono::FixedOffset;
use serde::Deserialize;
use serde::Serialize;

use crate::clock::Clock;
use crate::storage::Storage;
use crate::users::Registration;
use crate::users::User;
use crate::users::authenticate;
use crate::users::change_password as change_user_password;
use crate::users::register as register_user;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::JwtKeys;
use super::Success;
use super::current_user::Token;
use super::current_user::generate_token;

/// The user response information
///
/// A subset of all the information, ready to be serialized for the outside world
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// The user ID
    pub id: String,

    /// Normalized email, used to log in
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Registration date
    pub created_at: DateTime<FixedOffset>,
}

impl UserResponse {
    /// Create a user response from a [`User`](User)
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: user.created_at,
        }
    }
}

/// Register form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// Required
    email: Option<String>,

    /// Required
    password: Option<String>,

    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

/// Register a new user
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "email": "ada@example.com", "password": "verysecret" }' \
///     http://localhost:6000/api/v1/users/register
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": "<id>", "email": "ada@example.com", ... }, "error": "" }
/// ```
pub async fn register<S: Storage>(
    Extension(storage): Extension<S>,
    Extension(clock): Extension<Clock>,
    Form(form): Form<RegisterForm>,
) -> Result<Success<UserResponse>, Error> {
    let (Some(email), Some(password)) = (form.email, form.password) else {
        return Err(Error::bad_request("Email and password are required"));
    };

    let registration = Registration {
        email,
        password,
        first_name: form.first_name,
        last_name: form.last_name,
    };

    let user = register_user(&storage, &clock, registration).await?;

    Ok(Success::created(UserResponse::from_user(&user)))
}

/// Login form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    /// Email of the user
    email: String,
    /// Password of the user
    password: String,
}

/// Get a token for a user "session"
///
/// The token can then be used to access the rest of the API routes by using it in the
/// `Authorization` header, browsers get it as a cookie as well
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "email": "ada@example.com", "password": "verysecret" }' \
///     http://localhost:6000/api/v1/users/login
/// ```
///
/// Response
/// ```json
/// { "data": { "token_type": "Bearer", "expires_in": 86400, "access_token": "some token" }, "error": "" }
/// ```
pub async fn login<S: Storage>(
    Extension(jwt_keys): Extension<JwtKeys>,
    Extension(storage): Extension<S>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Success<Token>), Error> {
    let user = authenticate(&storage, &form.email, &form.password).await?;

    let token = generate_token(&jwt_keys, &user)?;

    tracing::info!("User {} logged in", user.id);

    Ok((jar.add(token.to_cookie()), Success::ok(token)))
}

/// Get the current user
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/v1/users/me
/// ```
pub async fn me<S: Storage>(current_user: CurrentUser<S>) -> Success<UserResponse> {
    Success::ok(UserResponse::from_user(&current_user))
}

/// Change password form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    /// Password the token was issued for
    current_password: String,

    /// New password
    password: String,
}

/// Change the password of the current user
///
/// All earlier tokens stop working, the response holds a fresh one
///
/// Request:
/// ```sh
/// curl -v -X PUT -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "currentPassword": "verysecret", "password": "evenmoresecret" }' \
///     http://localhost:6000/api/v1/users/me/password
/// ```
pub async fn change_password<S: Storage>(
    Extension(jwt_keys): Extension<JwtKeys>,
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    jar: CookieJar,
    Form(form): Form<ChangePasswordForm>,
) -> Result<(CookieJar, Success<Token>), Error> {
    let user = change_user_password(
        &storage,
        &current_user,
        &form.current_password,
        &form.password,
    )
    .await?;

    let token = generate_token(&jwt_keys, &user)?;

    Ok((jar.add(token.to_cookie()), Success::ok(token)))
}
