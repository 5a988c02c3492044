use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

use crate::constants;

/// Generates a fresh boundary token for one body.
///
/// Alphanumeric keeps the token valid both inside the `Content-Type` header
/// and on the boundary lines themselves, and 32 characters of randomness make
/// a collision with part content a non-concern.
pub(crate) fn generate() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(constants::BOUNDARY_TOKEN_LEN)
        .map(char::from)
        .collect()
}
