//! Current user service
//!
//! Get the current user from the request based on the Authorization header, or the cookie set
//! at login

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::api::Error;
use crate::id::DocumentId;
use crate::storage::Storage;
use crate::users::User;

/// Name of the cookie holding the access token
pub const AUTH_COOKIE: &str = "auth_token";

/// Tokens are valid for a day
const EXPIRES_IN: i64 = 24 * 60 * 60;

/// The keys used for encoding/decoding JWT tokens
#[derive(Clone)]
pub struct JwtKeys {
    /// The encoding key
    encoding: EncodingKey,

    /// The decoding key
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Create new encoding/decoding keys, derived from a secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// The JWT claims to identifies a user
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    /// The user ID, in hexadecimal
    sub: String,

    /// When does the token expire, as a UNIX timestamp
    exp: i64,

    /// A sessions ID, used to expire/invalidate tokens before the expiration date
    jti: Uuid,
}

/// Token information served to the user
#[derive(Debug, Serialize)]
pub struct Token {
    /// Type of the token: Bearer
    #[allow(clippy::struct_field_names)] // `type` is a reserved keyword
    token_type: String,

    /// In how many seconds does the token expire
    expires_in: i64,

    /// The access token to provide to follow up requests in the Authorization header
    #[allow(clippy::struct_field_names)] // `access_token` is the name of the field
    access_token: String,
}

impl Token {
    /// Create a new token response
    fn new(access_token: String, expires_in: i64) -> Self {
        Self {
            token_type: "Bearer".to_string(),
            expires_in,
            access_token,
        }
    }

    /// HTTP-only cookie carrying the access token
    pub fn to_cookie(&self) -> Cookie<'static> {
        Cookie::build((AUTH_COOKIE, self.access_token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// Current user service
pub struct CurrentUser<S> {
    /// The actual user
    user: Arc<User>,

    storage: PhantomData<S>,
}

impl<S> CurrentUser<S> {
    /// Create the current user from a user
    fn new(user: User) -> Self {
        Self {
            user: Arc::new(user),
            storage: PhantomData,
        }
    }
}

impl<S> Deref for CurrentUser<S> {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

/// Generate a token for the outside world for a given user
pub fn generate_token(jwt_keys: &JwtKeys, user: &User) -> Result<Token, Error> {
    use jsonwebtoken::Header;
    use jsonwebtoken::encode;

    let claims = Claims {
        sub: user.id.to_string(),
        exp: chrono::Utc::now().timestamp() + EXPIRES_IN,
        jti: user.session_id,
    };

    let access_token = encode(&Header::default(), &claims, &jwt_keys.encoding)
        .map_err(Error::internal_server_error)?;

    Ok(Token::new(access_token, EXPIRES_IN))
}

/// Get the raw token from the Authorization header, or else from the cookie
async fn extract_token<B>(parts: &mut Parts, state: &B) -> Option<String>
where
    B: Send + Sync,
{
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

impl<B, S> FromRequestParts<B> for CurrentUser<S>
where
    B: Send + Sync,
    S: Storage,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        use jsonwebtoken::Validation;
        use jsonwebtoken::decode;

        let token = extract_token(parts, state)
            .await
            .ok_or_else(|| Error::unauthorized("Missing API token"))?;

        let Extension(jwt_keys) = parts
            .extract::<Extension<JwtKeys>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get JWT keys"))?;

        let Extension(storage) = parts
            .extract::<Extension<S>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get storage"))?;

        // Decode the user data
        let token_data = decode::<Claims>(&token, &jwt_keys.decoding, &Validation::default())
            .map_err(|err| Error::unauthorized(format!("Invalid token: {err}")))?;

        let claims = token_data.claims;

        let id = claims
            .sub
            .parse::<DocumentId>()
            .map_err(|_| Error::unauthorized("Invalid token subject"))?;

        let user = storage
            .find_single_user_by_id(&id)
            .await
            .map_err(|_| Error::unauthorized("Could not find user"))?
            .ok_or_else(|| Error::unauthorized("Could not find user"))?;

        // mechanism to invalidate JWT tokens
        if claims.jti != user.session_id {
            return Err(Error::unauthorized("Token expired"));
        }

        Ok(CurrentUser::new(user))
    }
}
