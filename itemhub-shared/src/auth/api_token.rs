/// API token generation and hashing
///
/// Every user receives one bearer token at creation time. Only the SHA-256
/// hash of the token is persisted; the plaintext is handed to the client once
/// and can never be read back.
///
/// # Token Format
///
/// `ihub_` followed by 43 random base62 characters (48 characters total,
/// roughly 256 bits of entropy).
///
/// # Example
///
/// ```
/// use itemhub_shared::auth::api_token::{generate_api_token, hash_api_token};
///
/// let token = generate_api_token();
/// assert!(token.starts_with("ihub_"));
/// assert_eq!(token.len(), 48);
///
/// let hash = hash_api_token(&token);
/// assert_eq!(hash.len(), 64);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Header carrying the bearer token (`X-API-TOKEN`)
pub const API_TOKEN_HEADER: &str = "x-api-token";

const TOKEN_PREFIX: &str = "ihub_";

const TOKEN_RANDOM_LENGTH: usize = 43;

/// Total length of a generated token
pub const API_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a fresh plaintext token
pub fn generate_api_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let random: String = (0..TOKEN_RANDOM_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    format!("{}{}", TOKEN_PREFIX, random)
}

/// Hashes a token for storage and lookup
///
/// Deterministic and one-way; returns 64 lowercase hex characters.
///
/// ```
/// use itemhub_shared::auth::api_token::hash_api_token;
///
/// let hash = hash_api_token("ihub_example");
/// assert_eq!(hash, hash_api_token("ihub_example"));
/// assert_ne!(hash, hash_api_token("ihub_other"));
/// ```
pub fn hash_api_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_api_token_format() {
        let token = generate_api_token();

        assert!(token.starts_with("ihub_"));
        assert_eq!(token.len(), API_TOKEN_LENGTH);
        assert!(token.len() >= 32);
        assert!(token[TOKEN_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_api_token_is_random() {
        let first = generate_api_token();
        let second = generate_api_token();
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_api_token_known_value() {
        // sha256("abc")
        assert_eq!(
            hash_api_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let token = generate_api_token();
        let hash = hash_api_token(&token);
        assert_eq!(hash.len(), 64);
        assert!(!hash.contains(&token));
    }
}
