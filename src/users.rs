//! User accounts

use chrono::DateTime;
use chrono::FixedOffset;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::Error;
use crate::error::Result;
use crate::id::DocumentId;
use crate::password::hash;
use crate::password::verify;
use crate::storage;
use crate::storage::ChangePasswordValues;
use crate::storage::CreateUserValues;
use crate::storage::Storage;

/// Message for every failed login, it does not tell which part was wrong
const WRONG_CREDENTIALS: &str = "User not found or wrong password";

#[derive(Clone, Debug)]
pub struct User {
    pub id: DocumentId,
    pub session_id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<FixedOffset>,
}

/// Values to register a new user
#[derive(Debug, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Normalize an email address for storage and lookups
///
/// Only checks the bare minimum, the address is never used to send anything
pub fn parse_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(Error::Validation("Invalid email address".to_string())),
    }
}

/// A password needs at least some content
fn parse_password(password: &str) -> Result<&str> {
    if password.is_empty() {
        return Err(Error::Validation("Password is required".to_string()));
    }

    Ok(password)
}

/// Register a new user with a unique email
///
/// # Errors
///
/// Will return `Err` when the email or password is missing, the email is taken, or the
/// storage fails
pub async fn register<S: Storage>(
    storage: &S,
    clock: &Clock,
    registration: Registration,
) -> Result<User> {
    let email = parse_email(&registration.email)?;
    let hashed_password = hash(parse_password(&registration.password)?)?;

    if storage.find_single_user_by_email(&email).await?.is_some() {
        return Err(Error::Validation("User already exists".to_string()));
    }

    let values = CreateUserValues {
        session_id: &Uuid::new_v4(),
        email: &email,
        hashed_password: &hashed_password,
        first_name: registration.first_name.trim(),
        last_name: registration.last_name.trim(),
        created_at: clock.now(),
    };

    let user = storage.create_user(&values).await.map_err(|err| match err {
        storage::Error::Duplicate(_) => Error::Validation("User already exists".to_string()),
        err => Error::Store(err),
    })?;

    tracing::info!("Registered user {}", user.id);

    Ok(user)
}

/// Find the user with matching credentials
///
/// # Errors
///
/// Will return `Err` when the email is unknown, the password does not match, or the storage
/// fails
pub async fn authenticate<S: Storage>(storage: &S, email: &str, password: &str) -> Result<User> {
    let Ok(email) = parse_email(email) else {
        return Err(Error::Auth(WRONG_CREDENTIALS.to_string()));
    };

    match storage.find_single_user_by_email(&email).await? {
        Some(user) if verify(&user.hashed_password, password) => Ok(user),
        _ => {
            tracing::debug!("Failed login for {email}");
            Err(Error::Auth(WRONG_CREDENTIALS.to_string()))
        }
    }
}

/// Change the password of a user, after checking the current one
///
/// A new session ID invalidates every token handed out before
///
/// # Errors
///
/// Will return `Err` when the current password does not match, the new password is missing,
/// or the storage fails
pub async fn change_password<S: Storage>(
    storage: &S,
    user: &User,
    current_password: &str,
    password: &str,
) -> Result<User> {
    if !verify(&user.hashed_password, current_password) {
        return Err(Error::Validation("Invalid password".to_string()));
    }

    let hashed_password = hash(parse_password(password)?)?;

    let values = ChangePasswordValues {
        session_id: &Uuid::new_v4(),
        hashed_password: &hashed_password,
    };

    let user = storage.change_password(user, &values).await?;

    tracing::info!("Changed password of user {}", user.id);

    Ok(user)
}
