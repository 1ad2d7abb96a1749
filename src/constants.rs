//! Application constants and configuration

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend host used when settings.json does not name one
pub const DEFAULT_BACKEND_HOST: &str = "localhost";
/// The vote endpoint port is fixed; only the host is configurable
pub const BACKEND_PORT: u16 = 30002;

/// Shown when the name field is empty after trimming
pub const NAME_REQUIRED_MSG: &str = "Please enter your name";
/// Shown when the vote POST fails or the backend answers non-2xx
pub const SUBMIT_FAILED_MSG: &str = "Error: Could not submit vote.";

/// Vote endpoint for the given backend host
pub fn vote_url(host: &str) -> String {
    format!("http://{}:{}/vote", host, BACKEND_PORT)
}
