use crate::coder::{take_array, Coder, CoderError, CoderResult, Context};
use crate::varint;

/// Fixed-width big-endian `i64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BigEndianI64Coder;

impl Coder<i64> for BigEndianI64Coder {
    fn encode(&self, value: &i64, _context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        out.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    fn decode(&self, input: &mut &[u8], _context: Context) -> CoderResult<i64> {
        Ok(i64::from_be_bytes(take_array(input)?))
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        Ok(())
    }

    fn encoded_size(&self, _value: &i64, _context: Context) -> CoderResult<usize> {
        Ok(8)
    }
}

/// Fixed-width big-endian `i32`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BigEndianI32Coder;

impl Coder<i32> for BigEndianI32Coder {
    fn encode(&self, value: &i32, _context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        out.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    fn decode(&self, input: &mut &[u8], _context: Context) -> CoderResult<i32> {
        Ok(i32::from_be_bytes(take_array(input)?))
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        Ok(())
    }

    fn encoded_size(&self, _value: &i32, _context: Context) -> CoderResult<usize> {
        Ok(4)
    }
}

/// Variable-length `u64`; small values take a single byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VarU64Coder;

impl Coder<u64> for VarU64Coder {
    fn encode(&self, value: &u64, _context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        varint::write_u64(*value, out);
        Ok(())
    }

    fn decode(&self, input: &mut &[u8], _context: Context) -> CoderResult<u64> {
        varint::read_u64(input)
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        Ok(())
    }

    fn encoded_size(&self, value: &u64, _context: Context) -> CoderResult<usize> {
        Ok(varint::encoded_len(*value))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoolCoder;

impl Coder<bool> for BoolCoder {
    fn encode(&self, value: &bool, _context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        out.push(u8::from(*value));
        Ok(())
    }

    fn decode(&self, input: &mut &[u8], _context: Context) -> CoderResult<bool> {
        match take_array::<1>(input)? {
            [0] => Ok(false),
            [1] => Ok(true),
            [other] => Err(CoderError::InvalidBool(other)),
        }
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        Ok(())
    }

    fn encoded_size(&self, _value: &bool, _context: Context) -> CoderResult<usize> {
        Ok(1)
    }
}

/// IEEE 754 bits of an `f64`, big-endian.
///
/// The byte format itself is stable, but floating point arithmetic is not guaranteed to produce
/// bit-identical results across machines, so this coder refuses to vouch for determinism and
/// `f64` cannot be used as a grouping key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct F64Coder;

impl Coder<f64> for F64Coder {
    fn encode(&self, value: &f64, _context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        out.extend_from_slice(&value.to_bits().to_be_bytes());
        Ok(())
    }

    fn decode(&self, input: &mut &[u8], _context: Context) -> CoderResult<f64> {
        Ok(f64::from_bits(u64::from_be_bytes(take_array(input)?)))
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        Err(CoderError::non_deterministic(
            "F64Coder",
            "Floating point encodings are not guaranteed to be deterministic.",
        ))
    }

    fn consistent_with_equals(&self) -> bool {
        true
    }

    fn encoded_size(&self, _value: &f64, _context: Context) -> CoderResult<usize> {
        Ok(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::{decode_all, encode_to_vec};

    #[test]
    fn i64_is_big_endian() {
        assert_eq!(
            encode_to_vec(&BigEndianI64Coder, &1i64).unwrap(),
            vec![0, 0, 0, 0, 0, 0, 0, 1]
        );
        let decoded: i64 = decode_all(&BigEndianI64Coder, &[0xff; 8]).unwrap();
        assert_eq!(decoded, -1);
    }

    #[test]
    fn bool_rejects_unknown_bytes() {
        let decoded: CoderResult<bool> = decode_all(&BoolCoder, &[2]);
        assert_eq!(decoded, Err(CoderError::InvalidBool(2)));
    }

    #[test]
    fn f64_preserves_bits() {
        let bytes = encode_to_vec(&F64Coder, &-0.0f64).unwrap();
        let decoded: f64 = decode_all(&F64Coder, &bytes).unwrap();
        assert!(decoded.is_sign_negative());
        assert_eq!(decoded, 0.0);
    }

    #[test]
    fn f64_is_not_deterministic() {
        let err = F64Coder.verify_deterministic().unwrap_err();
        assert_eq!(
            err.to_string(),
            "F64Coder is not deterministic: Floating point encodings are not guaranteed to be deterministic."
        );
        assert!(F64Coder.consistent_with_equals());
    }
}
