use tracing::{debug, instrument};

use crypt::{BcryptCrypt, Crypt};
use err::{Error, Result};
use salt::{RandSaltGenerator, SaltGenerator};

// Mods

pub mod crypt;
pub mod err;
pub mod salt;

// Consts

/// Lowest cost factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest cost factor bcrypt accepts.
pub const MAX_COST: u32 = 31;
/// Default cost factor. 9 won't slow callers down too much but it's still
/// quite slow.
pub const DEFAULT_COST: u32 = 9;
/// Length of the encoded salt.
pub const SALT_LENGTH: usize = 22;

// `$2a$` is subject to high-bit attacks, always emit `$2y$`.
const VARIANT: &str = "2y";

// Cheapest setting bcrypt accepts, used to probe the primitive at
// construction.
const PROBE_SETTING: &str = "$2y$04$......................";
const PROBE_PASSWORD: &str = "probe";

// Hasher

/// Produces and checks salted bcrypt password hashes.
pub struct Hasher<CRYPT: Crypt, SALT: SaltGenerator> {
    cost: u32,
    crypt: CRYPT,
    salt_generator: SALT,
}

impl Hasher<BcryptCrypt, RandSaltGenerator> {
    pub fn new() -> Result<Self> {
        Self::with_cost(DEFAULT_COST)
    }

    pub fn with_cost(cost: u32) -> Result<Self> {
        Self::from_parts(BcryptCrypt, RandSaltGenerator, cost)
    }
}

impl<CRYPT: Crypt, SALT: SaltGenerator> Hasher<CRYPT, SALT> {
    /// Fails with [`Error::PrimitiveUnavailable`] if `crypt` can't compute a
    /// bcrypt hash.
    pub fn from_parts(crypt: CRYPT, salt_generator: SALT, cost: u32) -> Result<Self> {
        crypt
            .crypt(PROBE_PASSWORD, PROBE_SETTING)
            .map_err(|_| Error::PrimitiveUnavailable)?;
        let mut hasher = Self {
            cost: DEFAULT_COST,
            crypt,
            salt_generator,
        };
        hasher.set_cost(cost);
        Ok(hasher)
    }

    /// Effective cost factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Silently clamps `cost` to `[MIN_COST, MAX_COST]`.
    pub fn set_cost(&mut self, cost: u32) {
        self.cost = cost.clamp(MIN_COST, MAX_COST);
    }

    /// Hashes `password` with a fresh random salt. The salt and the cost are
    /// part of the returned string.
    #[instrument(skip(self, password))]
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = self.salt_generator.generate();
        let cost = self.cost;
        let setting = format!("${VARIANT}${cost:02}${salt}");
        debug!("hashing password");
        self.crypt.crypt(password, &setting)
    }

    /// Re-hashes `password` with the cost and salt recovered from `hash` and
    /// compares the results. A malformed `hash` never matches, so this
    /// returns `false` instead of an error.
    #[instrument(skip(self, password, hash))]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        debug!("verifying password");
        match self.crypt.crypt(password, hash) {
            Ok(computed) => computed == hash,
            Err(_) => {
                debug!("hash is not a bcrypt hash");
                false
            }
        }
    }
}

// Tests
