use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CodecError {
    #[error("Encoding failure: {0}")]
    EncodingFailure(String),
    #[error("Decoding failure: {0}")]
    DecodingFailure(String),
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("Key derivation failure: {0}")]
    KeyDerivation(String)
}

#[derive(Debug, Error)]
pub enum KeyMaterialError {
    #[error("Key material error: {0} is not set")]
    Missing(&'static str),
    #[error("Key material error: invalid iteration count '{0}'")]
    InvalidIterations(String)
}
