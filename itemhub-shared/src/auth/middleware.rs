/// Request authentication
///
/// Protected routes expect the plaintext API token in the `X-API-TOKEN`
/// header. The token is hashed and looked up; a missing header, an unknown
/// token, or a token belonging to a deactivated user all fail with
/// [`AuthError`] before any handler runs.
///
/// On success the API layer stores the returned [`AuthContext`] in the
/// request extensions, where handlers read it with `Extension<AuthContext>`.
///
/// # Example
///
/// ```no_run
/// use axum::http::HeaderMap;
/// use itemhub_shared::auth::middleware::authenticate;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, headers: HeaderMap) {
/// match authenticate(&pool, &headers).await {
///     Ok(auth) => println!("request from user {}", auth.user_id),
///     Err(e) => println!("rejected: {}", e),
/// }
/// # }
/// ```

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use super::api_token::API_TOKEN_HEADER;
use crate::models::user::User;

/// Authenticated caller, added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// ID of the user owning the presented token
    pub user_id: i64,

    /// That user's email
    pub email: String,
}

impl AuthContext {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Authentication failure
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `X-API-TOKEN` header, or an empty one
    #[error("Missing API token")]
    MissingCredentials,

    /// No user holds this token, or its holder is inactive
    #[error("Invalid API token")]
    InvalidToken,

    /// Lookup failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Reads the raw token from the request headers
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(API_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingCredentials)
}

/// Resolves the request's token to an active user
pub async fn authenticate(pool: &PgPool, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
    let token = extract_token(headers)?;

    let user = User::find_by_token(pool, token)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    if !user.is_active {
        debug!(user_id = user.id, "Rejected token of inactive user");
        return Err(AuthError::InvalidToken);
    }

    Ok(AuthContext::from_user(&user))
}
