/// Middleware modules for the API server
///
/// - `security`: security response headers
///
/// The bearer token guard lives in `hrdesk_shared::auth::middleware`.

pub mod security;
