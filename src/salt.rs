use rand::Rng;
use tracing::{debug, instrument};

use crate::SALT_LENGTH;

// Consts

// bcrypt salts can be A-Z, a-z, 0-9, `.` and `/`
const SALT_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789./";

// Traits

#[cfg_attr(test, mockall::automock)]
pub trait SaltGenerator: Send + Sync {
    fn generate(&self) -> String;
}

// RandSaltGenerator

/// Salts only need to be unique, not secret, so the thread RNG is more than
/// enough here.
pub struct RandSaltGenerator;

impl SaltGenerator for RandSaltGenerator {
    #[instrument(skip(self))]
    fn generate(&self) -> String {
        debug!("generating salt");
        let mut rng = rand::thread_rng();
        (0..SALT_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..SALT_CHARS.len());
                char::from(SALT_CHARS[idx])
            })
            .collect()
    }
}

// Tests
