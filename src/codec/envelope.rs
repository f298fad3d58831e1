use std::fmt;
use std::fmt::{Display, Formatter};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::codec::errors::CodecError;
use crate::types::Amount;

pub(crate) const DELIMITER: char = ':';
pub(crate) const IV_LENGTH: usize = 12;

/// Persisted text form of an encrypted amount: `base64(iv):base64(ciphertext+tag)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope(String);

impl Envelope {
    pub(crate) fn seal(iv: &[u8], ciphertext: &[u8]) -> Self {
        Envelope(format!("{}{DELIMITER}{}", STANDARD.encode(iv), STANDARD.encode(ciphertext)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Splits and base64-decodes the IV and ciphertext halves.
    pub fn parts(&self) -> Result<(Vec<u8>, Vec<u8>), CodecError> {
        let (iv, ciphertext) = self.0.split_once(DELIMITER)
            .ok_or_else(|| CodecError::MalformedEnvelope("missing delimiter".to_string()))?;

        let iv = STANDARD.decode(iv)
            .map_err(|error| CodecError::MalformedEnvelope(format!("invalid IV encoding: {error}")))?;

        let ciphertext = STANDARD.decode(ciphertext)
            .map_err(|error| CodecError::MalformedEnvelope(format!("invalid ciphertext encoding: {error}")))?;

        if iv.len() != IV_LENGTH {
            return Err(CodecError::MalformedEnvelope(format!("IV is {} bytes, expected {IV_LENGTH}", iv.len())));
        }

        Ok((iv, ciphertext))
    }
}

impl Display for Envelope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Everything a persistence layer may hand back for a stored amount.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredAmount {
    /// No value was stored.
    Absent,
    /// Already decoded, e.g. a caller that bypassed the codec.
    Amount(Amount),
    Envelope(Envelope),
    /// Bare decimal text written before encryption was introduced.
    LegacyPlain(String)
}

impl StoredAmount {
    /// Classifies raw persisted text; anything containing the delimiter is treated as an envelope.
    pub fn from_persisted(raw: Option<&str>) -> Self {
        match raw {
            None => StoredAmount::Absent,
            Some(text) if text.contains(DELIMITER) => StoredAmount::Envelope(Envelope(text.to_string())),
            Some(text) => StoredAmount::LegacyPlain(text.to_string())
        }
    }
}

impl From<Amount> for StoredAmount {
    fn from(amount: Amount) -> Self {
        StoredAmount::Amount(amount)
    }
}

impl From<&str> for StoredAmount {
    fn from(raw: &str) -> Self {
        StoredAmount::from_persisted(Some(raw))
    }
}

impl From<Option<&str>> for StoredAmount {
    fn from(raw: Option<&str>) -> Self {
        StoredAmount::from_persisted(raw)
    }
}

impl From<Envelope> for StoredAmount {
    fn from(envelope: Envelope) -> Self {
        StoredAmount::Envelope(envelope)
    }
}
