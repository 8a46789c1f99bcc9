//! Random password generation.
//!
//! Service users are provisioned with a freshly generated password on every
//! pass; the adapter never stores it, so there is no hashing here — only
//! generation of a random printable string that is forwarded upstream.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Password length used for provisioned users.
pub const GENERATED_PASSWORD_LEN: usize = 12;

/// Generates a random alphanumeric password of the given length.
pub fn random_password(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates a password of the default service-user length.
pub fn generated_password() -> String {
    random_password(GENERATED_PASSWORD_LEN)
}
