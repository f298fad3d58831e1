mod amount_codec;
mod envelope;
mod errors;
mod key;

pub use amount_codec::AmountCodec;
pub use envelope::{Envelope, StoredAmount};
pub use errors::{CodecError, KeyMaterialError};
pub use key::{DerivedKey, KeyCache, KeyMaterial};
