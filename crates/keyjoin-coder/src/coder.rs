pub type CoderResult<T> = Result<T, CoderError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoderError {
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("varint does not fit in 64 bits")]
    VarintOverflow,

    #[error("invalid UTF-8 in encoded string: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("invalid encoded length {0}")]
    InvalidLength(i64),

    #[error("invalid encoded boolean byte {0:#04x}")]
    InvalidBool(u8),

    #[error("{remaining} trailing bytes after decoding")]
    TrailingBytes { remaining: usize },

    #[error("{coder} is not deterministic: {reason}")]
    NonDeterministic { coder: String, reason: String },
}

impl CoderError {
    pub(crate) fn non_deterministic(coder: impl Into<String>, reason: impl Into<String>) -> Self {
        CoderError::NonDeterministic {
            coder: coder.into(),
            reason: reason.into(),
        }
    }
}

/// Where an encoded value sits in the surrounding buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Context {
    /// The value is the last thing in the buffer and may consume all remaining bytes.
    #[default]
    Outer,
    /// The value is followed by other data and must encode its own extent.
    Nested,
}

/// Encodes and decodes values of type `T`.
///
/// Coders are shared read-only between grouping workers, hence the `Send + Sync` bound.
pub trait Coder<T>: Send + Sync {
    fn encode(&self, value: &T, context: Context, out: &mut Vec<u8>) -> CoderResult<()>;

    /// Decodes one value, advancing `input` past the consumed bytes.
    fn decode(&self, input: &mut &[u8], context: Context) -> CoderResult<T>;

    /// Succeeds only if equal values always encode to equal bytes.
    fn verify_deterministic(&self) -> CoderResult<()>;

    /// Whether two values are equal exactly when their encodings are equal.
    fn consistent_with_equals(&self) -> bool {
        self.verify_deterministic().is_ok()
    }

    fn encoded_size(&self, value: &T, context: Context) -> CoderResult<usize> {
        let mut buf = Vec::new();
        self.encode(value, context, &mut buf)?;
        Ok(buf.len())
    }
}

/// Encodes `value` on its own, in the outer context.
pub fn encode_to_vec<T, C: Coder<T> + ?Sized>(coder: &C, value: &T) -> CoderResult<Vec<u8>> {
    let mut out = Vec::new();
    coder.encode(value, Context::Outer, &mut out)?;
    Ok(out)
}

/// Decodes a value that must span all of `bytes`.
pub fn decode_all<T, C: Coder<T> + ?Sized>(coder: &C, bytes: &[u8]) -> CoderResult<T> {
    let mut input = bytes;
    let value = coder.decode(&mut input, Context::Outer)?;
    if !input.is_empty() {
        return Err(CoderError::TrailingBytes {
            remaining: input.len(),
        });
    }
    Ok(value)
}

pub(crate) fn take<'a>(input: &mut &'a [u8], n: usize) -> CoderResult<&'a [u8]> {
    if input.len() < n {
        return Err(CoderError::UnexpectedEof {
            needed: n,
            remaining: input.len(),
        });
    }
    let (head, rest) = input.split_at(n);
    *input = rest;
    Ok(head)
}

pub(crate) fn take_array<const N: usize>(input: &mut &[u8]) -> CoderResult<[u8; N]> {
    let bytes = take(input, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

pub(crate) fn take_rest<'a>(input: &mut &'a [u8]) -> &'a [u8] {
    std::mem::take(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_reports_shortfall() {
        let mut input: &[u8] = &[1, 2];
        assert_eq!(
            take(&mut input, 3),
            Err(CoderError::UnexpectedEof {
                needed: 3,
                remaining: 2,
            })
        );
        // A failed take leaves the input untouched.
        assert_eq!(input, &[1, 2]);
    }

    #[test]
    fn take_array_advances_input() {
        let mut input: &[u8] = &[1, 2, 3];
        assert_eq!(take_array::<2>(&mut input), Ok([1, 2]));
        assert_eq!(input, &[3]);
        assert_eq!(take_rest(&mut input), &[3]);
        assert!(input.is_empty());
    }
}
