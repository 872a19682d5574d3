/// Personal access token utilities
///
/// Tokens are opaque bearer credentials issued at registration and login.
/// These helpers cover generation, hashing and format checks; persistence
/// lives in `models::access_token`.
///
/// # Token Format
///
/// `hrd_` followed by 40 base62 characters (44 characters total).
///
/// # Example
///
/// ```
/// use hrdesk_shared::auth::token::{generate_token, hash_token, validate_token_format};
///
/// let (token, digest) = generate_token();
/// assert!(token.starts_with("hrd_"));
/// assert!(validate_token_format(&token));
/// assert_eq!(digest, hash_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of a token
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Token prefix
pub const TOKEN_PREFIX: &str = "hrd_";

/// Total length of a token (prefix + random)
pub const TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new token
///
/// Returns `(plaintext, sha256_hex)`. The plaintext goes to the client, the
/// digest to the database.
pub fn generate_token() -> (String, String) {
    let token = format!("{}{}", TOKEN_PREFIX, random_base62(TOKEN_RANDOM_LENGTH));
    let digest = hash_token(&token);

    (token, digest)
}

fn random_base62(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Hashes a token with SHA-256 (hex encoded, 64 chars)
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Checks prefix, length and alphabet without touching the database
pub fn validate_token_format(token: &str) -> bool {
    if token.len() != TOKEN_LENGTH {
        return false;
    }

    match token.strip_prefix(TOKEN_PREFIX) {
        Some(random) => random.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}
