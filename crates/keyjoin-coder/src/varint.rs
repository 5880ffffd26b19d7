//! Unsigned LEB128 varints, used for length prefixes in nested encodings.

use crate::coder::{CoderError, CoderResult};

/// Largest number of bytes a `u64` varint can occupy.
pub const MAX_VARINT_LEN: usize = 10;

pub fn write_u64(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

pub fn read_u64(input: &mut &[u8]) -> CoderResult<u64> {
    let mut result = 0u64;
    for idx in 0..MAX_VARINT_LEN {
        let Some((&byte, rest)) = input.split_first() else {
            return Err(CoderError::UnexpectedEof {
                needed: 1,
                remaining: 0,
            });
        };
        *input = rest;

        let shift = 7 * idx as u32;
        let payload = u64::from(byte & 0x7f);
        // The tenth byte only has room for the top bit.
        if shift == 63 && payload > 1 {
            return Err(CoderError::VarintOverflow);
        }
        result |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(CoderError::VarintOverflow)
}

pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_u64(value, &mut out);
        out
    }

    #[test]
    fn small_values_take_one_byte() {
        assert_eq!(encode(0), vec![0]);
        assert_eq!(encode(1), vec![1]);
        assert_eq!(encode(127), vec![0x7f]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xac, 0x02]);
    }

    #[test]
    fn max_value_uses_ten_bytes() {
        let bytes = encode(u64::MAX);
        assert_eq!(bytes.len(), MAX_VARINT_LEN);
        assert_eq!(encoded_len(u64::MAX), MAX_VARINT_LEN);
        let mut input = bytes.as_slice();
        assert_eq!(read_u64(&mut input), Ok(u64::MAX));
        assert!(input.is_empty());
    }

    #[test]
    fn encoded_len_matches_writer() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 1 << 32, u64::MAX / 3] {
            assert_eq!(encoded_len(value), encode(value).len(), "value {value}");
        }
    }

    #[test]
    fn truncated_varint_is_eof() {
        let mut input: &[u8] = &[0x80, 0x80];
        assert!(matches!(
            read_u64(&mut input),
            Err(CoderError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn overlong_varint_is_rejected() {
        let mut bytes = vec![0xff; 9];
        bytes.push(0x02);
        let mut input = bytes.as_slice();
        assert_eq!(read_u64(&mut input), Err(CoderError::VarintOverflow));

        let bytes = vec![0x80; 11];
        let mut input = bytes.as_slice();
        assert_eq!(read_u64(&mut input), Err(CoderError::VarintOverflow));
    }
}
