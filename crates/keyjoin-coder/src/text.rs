use crate::coder::{take, take_rest, Coder, CoderError, CoderResult, Context};
use crate::varint;

fn write_bytes(bytes: &[u8], context: Context, out: &mut Vec<u8>) {
    if context == Context::Nested {
        varint::write_u64(bytes.len() as u64, out);
    }
    out.extend_from_slice(bytes);
}

fn read_bytes<'a>(input: &mut &'a [u8], context: Context) -> CoderResult<&'a [u8]> {
    match context {
        Context::Outer => Ok(take_rest(input)),
        Context::Nested => {
            let len = varint::read_u64(input)?;
            let len = usize::try_from(len).map_err(|_| CoderError::InvalidLength(len as i64))?;
            take(input, len)
        }
    }
}

fn sized(len: usize, context: Context) -> usize {
    match context {
        Context::Outer => len,
        Context::Nested => varint::encoded_len(len as u64) + len,
    }
}

/// UTF-8 text; nested encodings carry a varint byte-length prefix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StringUtf8Coder;

impl Coder<String> for StringUtf8Coder {
    fn encode(&self, value: &String, context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        write_bytes(value.as_bytes(), context, out);
        Ok(())
    }

    fn decode(&self, input: &mut &[u8], context: Context) -> CoderResult<String> {
        let bytes = read_bytes(input, context)?;
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        Ok(())
    }

    fn encoded_size(&self, value: &String, context: Context) -> CoderResult<usize> {
        Ok(sized(value.len(), context))
    }
}

/// Raw bytes; nested encodings carry a varint length prefix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BytesCoder;

impl Coder<Vec<u8>> for BytesCoder {
    fn encode(&self, value: &Vec<u8>, context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        write_bytes(value, context, out);
        Ok(())
    }

    fn decode(&self, input: &mut &[u8], context: Context) -> CoderResult<Vec<u8>> {
        Ok(read_bytes(input, context)?.to_vec())
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        Ok(())
    }

    fn encoded_size(&self, value: &Vec<u8>, context: Context) -> CoderResult<usize> {
        Ok(sized(value.len(), context))
    }
}
