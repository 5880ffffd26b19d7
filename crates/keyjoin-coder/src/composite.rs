use crate::coder::{take_array, Coder, CoderError, CoderResult, Context};

fn component_error(coder: &str, component: &str, err: CoderError) -> CoderError {
    match err {
        CoderError::NonDeterministic {
            coder: inner,
            reason,
        } => CoderError::non_deterministic(coder, format!("{component} coder {inner}: {reason}")),
        other => other,
    }
}

/// Key/value pairs: the key is always nested, the value inherits the outer context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KvCoder<KC, VC> {
    key: KC,
    value: VC,
}

impl<KC, VC> KvCoder<KC, VC> {
    pub fn new(key: KC, value: VC) -> Self {
        Self { key, value }
    }

    pub fn key_coder(&self) -> &KC {
        &self.key
    }

    pub fn value_coder(&self) -> &VC {
        &self.value
    }
}

impl<K, V, KC, VC> Coder<(K, V)> for KvCoder<KC, VC>
where
    KC: Coder<K>,
    VC: Coder<V>,
{
    fn encode(&self, value: &(K, V), context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        self.key.encode(&value.0, Context::Nested, out)?;
        self.value.encode(&value.1, context, out)
    }

    fn decode(&self, input: &mut &[u8], context: Context) -> CoderResult<(K, V)> {
        let key = self.key.decode(input, Context::Nested)?;
        let value = self.value.decode(input, context)?;
        Ok((key, value))
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        self.key
            .verify_deterministic()
            .map_err(|err| component_error("KvCoder", "key", err))?;
        self.value
            .verify_deterministic()
            .map_err(|err| component_error("KvCoder", "value", err))
    }

    fn consistent_with_equals(&self) -> bool {
        self.key.consistent_with_equals() && self.value.consistent_with_equals()
    }
}

/// Sequences, written as a big-endian `i32` element count followed by nested elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IterableCoder<C> {
    element: C,
}

impl<C> IterableCoder<C> {
    pub fn new(element: C) -> Self {
        Self { element }
    }
}

impl<T, C> Coder<Vec<T>> for IterableCoder<C>
where
    C: Coder<T>,
{
    fn encode(&self, value: &Vec<T>, _context: Context, out: &mut Vec<u8>) -> CoderResult<()> {
        let count = i32::try_from(value.len())
            .map_err(|_| CoderError::InvalidLength(value.len() as i64))?;
        out.extend_from_slice(&count.to_be_bytes());
        for element in value {
            self.element.encode(element, Context::Nested, out)?;
        }
        Ok(())
    }

    fn decode(&self, input: &mut &[u8], _context: Context) -> CoderResult<Vec<T>> {
        let count = i32::from_be_bytes(take_array(input)?);
        let count = usize::try_from(count).map_err(|_| CoderError::InvalidLength(count.into()))?;
        // Every element occupies at least one byte, so a count larger than the input is bogus.
        if count > input.len() {
            return Err(CoderError::UnexpectedEof {
                needed: count,
                remaining: input.len(),
            });
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.element.decode(input, Context::Nested)?);
        }
        Ok(out)
    }

    fn verify_deterministic(&self) -> CoderResult<()> {
        self.element
            .verify_deterministic()
            .map_err(|err| component_error("IterableCoder", "element", err))
    }

    fn consistent_with_equals(&self) -> bool {
        self.element.consistent_with_equals()
    }
}
