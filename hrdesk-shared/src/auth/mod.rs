/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Opaque personal access token generation and hashing
/// - [`middleware`]: Bearer token guard for protected routes
///
/// Tokens are opaque random strings. Only their SHA-256 digest is persisted;
/// the plaintext is handed to the client exactly once, at issuance.
///
/// # Example
///
/// ```
/// use hrdesk_shared::auth::password::{hash_password, verify_password};
/// use hrdesk_shared::auth::token::{generate_token, hash_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("password1")?;
/// assert!(verify_password("password1", &hash)?);
///
/// let (token, digest) = generate_token();
/// assert_eq!(hash_token(&token), digest);
/// # Ok(())
/// # }
/// ```

pub mod middleware;
pub mod password;
pub mod token;
