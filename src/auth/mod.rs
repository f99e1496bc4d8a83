//! Admin credential check.
//!
//! Implements constant-time comparison to mitigate timing attacks. The expected pair
//! comes from configuration and is only ever compared on the server.

use subtle::{Choice, ConstantTimeEq};

use crate::config::AdminCredentials;

/// Generic message for any rejected admin login; never says which field was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "Invalid credentials. Please check your username and password.";

/// Check an admin login attempt against the configured pair.
///
/// Both fields are always compared so the timing does not reveal which one failed.
/// Empty input and an unconfigured admin area never match.
pub fn verify_admin(expected: Option<&AdminCredentials>, username: &str, password: &str) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    if username.is_empty() || password.is_empty() {
        return false;
    }

    let user_ok = constant_time_eq(username, &expected.username);
    let pass_ok = constant_time_eq(password, &expected.password);
    (user_ok & pass_ok).into()
}

/// Perform constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> Choice {
    a.as_bytes().ct_eq(b.as_bytes())
}
