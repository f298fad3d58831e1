use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::codec::envelope::{Envelope, StoredAmount};
use crate::codec::errors::CodecError;
use crate::codec::key::{derive_blocking, DerivedKey, KeyCache, KeyMaterial};
use crate::types::Amount;

// Optional sign, digits, optional fraction and exponent at the start of the text.
static LEADING_DECIMAL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)").ok()
});

/// Converts amounts to and from their persisted text form.
///
/// `encode` and `decode` never fail: encryption problems degrade to storing
/// the plain decimal. Stored text that is not a well-formed envelope is read
/// up to its first non-numeric character (`12.50:note` is 12.50), else zero.
/// A well-formed envelope that fails to decrypt decodes to zero. The `try_*`
/// variants expose the underlying errors.
#[derive(Debug, Clone)]
pub struct AmountCodec {
    material: Arc<KeyMaterial>,
    keys: Option<KeyCache>
}

impl AmountCodec {
    /// A codec that re-derives the key on every call.
    pub fn new(material: KeyMaterial) -> Self {
        Self {
            material: Arc::new(material),
            keys: None
        }
    }

    pub fn with_key_cache(mut self, keys: KeyCache) -> Self {
        self.keys = Some(keys);
        self
    }

    pub async fn encode(&self, amount: Amount) -> String {
        match self.try_encode(amount).await {
            Ok(envelope) => envelope.into_string(),
            Err(error) => {
                warn!("{error}, persisting amount unencrypted");
                amount.to_string()
            }
        }
    }

    pub async fn try_encode(&self, amount: Amount) -> Result<Envelope, CodecError> {
        let key = self.key().await?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = key.cipher()
            .encrypt(&nonce, amount.to_string().as_bytes())
            .map_err(|error| CodecError::EncodingFailure(error.to_string()))?;

        Ok(Envelope::seal(nonce.as_slice(), &ciphertext))
    }

    pub async fn decode(&self, stored: impl Into<StoredAmount>) -> Amount {
        match stored.into() {
            StoredAmount::Absent => Amount::ZERO,
            StoredAmount::Amount(amount) => amount,
            StoredAmount::LegacyPlain(text) => parse_or_zero(&text),
            StoredAmount::Envelope(envelope) => match self.try_decode(&envelope).await {
                Ok(amount) => amount,
                Err(error @ CodecError::MalformedEnvelope(_)) => {
                    warn!("{error}, reading stored value as a plain decimal");
                    parse_or_zero(envelope.as_str())
                }
                Err(error) => {
                    warn!("{error}, defaulting stored value to zero");
                    Amount::ZERO
                }
            }
        }
    }

    pub async fn try_decode(&self, envelope: &Envelope) -> Result<Amount, CodecError> {
        let (iv, ciphertext) = envelope.parts()?;
        let key = self.key().await?;

        let plaintext = key.cipher()
            .decrypt(Nonce::from_slice(&iv), ciphertext.as_slice())
            .map_err(|error| CodecError::DecodingFailure(error.to_string()))?;

        let text = String::from_utf8(plaintext)
            .map_err(|error| CodecError::DecodingFailure(error.to_string()))?;

        Amount::from_str(&text).map_err(|error| CodecError::DecodingFailure(error.to_string()))
    }

    async fn key(&self) -> Result<Arc<DerivedKey>, CodecError> {
        match &self.keys {
            Some(keys) => keys.get_or_derive(&self.material).await,
            None => derive_blocking(KeyMaterial::clone(&self.material)).await
        }
    }
}

fn parse_or_zero(text: &str) -> Amount {
    leading_decimal(text).unwrap_or_else(|| {
        debug!("Stored amount '{text}' does not start with a decimal, defaulting to zero");
        Amount::ZERO
    })
}

fn leading_decimal(text: &str) -> Option<Amount> {
    let number = LEADING_DECIMAL.as_ref()?.captures(text)?.get(1)?.as_str();
    let number = number.strip_prefix('+').unwrap_or(number);

    let decimal = if number.contains(['e', 'E']) {
        Decimal::from_scientific(number).ok()?
    } else {
        Decimal::from_str(number).ok()?
    };

    Some(Amount::from_decimal(decimal))
}
