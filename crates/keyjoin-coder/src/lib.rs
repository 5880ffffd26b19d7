//! Byte encodings for keys and values moved through `keyjoin` datasets.
//!
//! Grouping compares keys by their encoded bytes, so the key coder must be deterministic: equal
//! keys must always produce equal bytes. Each [`Coder`] reports whether it can make that promise
//! through [`Coder::verify_deterministic`].
//!
//! Encodings are context sensitive (see [`Context`]): a value encoded in [`Context::Nested`] is
//! self-delimiting, so it can be followed by further data in the same buffer, while
//! [`Context::Outer`] may consume the rest of the buffer.

#![forbid(unsafe_code)]

mod coder;
mod composite;
mod default;
mod primitives;
mod text;
pub mod varint;

pub use crate::coder::{decode_all, encode_to_vec, Coder, CoderError, CoderResult, Context};
pub use crate::composite::{IterableCoder, KvCoder};
pub use crate::default::DefaultCoder;
pub use crate::primitives::{
    BigEndianI32Coder, BigEndianI64Coder, BoolCoder, F64Coder, VarU64Coder,
};
pub use crate::text::{BytesCoder, StringUtf8Coder};
