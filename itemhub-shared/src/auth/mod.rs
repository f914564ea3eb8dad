/// Authentication primitives for ItemHub
///
/// # Modules
///
/// - [`api_token`]: Bearer token generation and SHA-256 hashing
/// - [`password`]: Argon2id password hashing and verification
/// - [`middleware`]: Axum middleware resolving `X-API-TOKEN` to a user
///
/// # Example
///
/// ```
/// use itemhub_shared::auth::api_token::{generate_api_token, hash_api_token};
///
/// let token = generate_api_token();
/// let stored = hash_api_token(&token);
/// assert_eq!(stored.len(), 64);
/// assert_ne!(stored, token);
/// ```

pub mod api_token;
pub mod middleware;
pub mod password;
