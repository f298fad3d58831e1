use std::fmt;
use std::sync::Arc;

use aes_gcm::{Aes256Gcm, Key, KeyInit};
use moka::future::Cache;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tokio::task::spawn_blocking;
use tracing::debug;

use crate::codec::errors::{CodecError, KeyMaterialError};

pub const DEFAULT_ITERATIONS: u32 = 100_000;
pub const PASSPHRASE_VAR: &str = "SAVINGS_LEDGER_PASSPHRASE";
pub const SALT_VAR: &str = "SAVINGS_LEDGER_SALT";
pub const ITERATIONS_VAR: &str = "SAVINGS_LEDGER_KDF_ITERATIONS";

const KEY_LENGTH: usize = 32;
const DEFAULT_CACHE_CAPACITY: u64 = 16;

/// Passphrase, salt and PBKDF2 work factor the envelope key is derived from.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KeyMaterial {
    passphrase: String,
    salt: Vec<u8>,
    iterations: u32
}

impl KeyMaterial {
    pub fn new(passphrase: impl Into<String>, salt: impl Into<Vec<u8>>) -> Self {
        Self {
            passphrase: passphrase.into(),
            salt: salt.into(),
            iterations: DEFAULT_ITERATIONS
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Reads the material from `SAVINGS_LEDGER_PASSPHRASE`, `SAVINGS_LEDGER_SALT`
    /// and the optional `SAVINGS_LEDGER_KDF_ITERATIONS`.
    pub fn from_env() -> Result<Self, KeyMaterialError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, KeyMaterialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let passphrase = lookup(PASSPHRASE_VAR)
            .filter(|value| !value.is_empty())
            .ok_or(KeyMaterialError::Missing(PASSPHRASE_VAR))?;

        let salt = lookup(SALT_VAR)
            .filter(|value| !value.is_empty())
            .ok_or(KeyMaterialError::Missing(SALT_VAR))?;

        let iterations = match lookup(ITERATIONS_VAR) {
            None => DEFAULT_ITERATIONS,
            Some(raw) => raw.trim().parse::<u32>().ok()
                .filter(|iterations| *iterations > 0)
                .ok_or(KeyMaterialError::InvalidIterations(raw))?
        };

        Ok(Self::new(passphrase, salt.into_bytes()).with_iterations(iterations))
    }

    /// PBKDF2-HMAC-SHA256 into a 256-bit AES key. CPU bound, async callers go through the blocking pool.
    pub fn derive(&self) -> Result<DerivedKey, CodecError> {
        if self.iterations == 0 {
            return Err(CodecError::KeyDerivation("iteration count must be positive".to_string()));
        }

        let mut key = [0u8; KEY_LENGTH];
        pbkdf2_hmac::<Sha256>(self.passphrase.as_bytes(), &self.salt, self.iterations, &mut key);

        Ok(DerivedKey(Key::<Aes256Gcm>::clone_from_slice(&key)))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("KeyMaterial")
            .field("passphrase", &"<redacted>")
            .field("salt_len", &self.salt.len())
            .field("iterations", &self.iterations)
            .finish()
    }
}

pub struct DerivedKey(Key<Aes256Gcm>);

impl DerivedKey {
    pub(crate) fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(&self.0)
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("DerivedKey(<redacted>)")
    }
}

/// Runs the key derivation on the blocking pool.
pub(crate) async fn derive_blocking(material: KeyMaterial) -> Result<Arc<DerivedKey>, CodecError> {
    let derived = spawn_blocking(move || material.derive()).await
        .map_err(|error| CodecError::KeyDerivation(error.to_string()))??;

    Ok(Arc::new(derived))
}

/// Process-lifetime cache of derived keys, owned by whoever builds the codec.
#[derive(Clone)]
pub struct KeyCache {
    keys: Cache<KeyMaterial, Arc<DerivedKey>>
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            keys: Cache::new(capacity)
        }
    }

    pub async fn get_or_derive(&self, material: &KeyMaterial) -> Result<Arc<DerivedKey>, CodecError> {
        self.keys.try_get_with(material.clone(), async {
            debug!("Deriving envelope key with {} iterations", material.iterations);
            derive_blocking(material.clone()).await
        })
        .await
        .map_err(|error| (*error).clone())
    }

    pub fn contains(&self, material: &KeyMaterial) -> bool {
        self.keys.contains_key(material)
    }
}

impl fmt::Debug for KeyCache {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("KeyCache")
            .field("entries", &self.keys.entry_count())
            .finish()
    }
}
