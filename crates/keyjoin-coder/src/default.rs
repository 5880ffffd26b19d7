use crate::coder::Coder;
use crate::composite::KvCoder;
use crate::primitives::{BigEndianI32Coder, BigEndianI64Coder, BoolCoder, F64Coder, VarU64Coder};
use crate::text::{BytesCoder, StringUtf8Coder};

/// Associates a type with the coder used for it when none is given explicitly.
pub trait DefaultCoder: Sized {
    type Coder: Coder<Self> + Default;

    fn default_coder() -> Self::Coder {
        Self::Coder::default()
    }
}

macro_rules! default_coder {
    ($($ty:ty => $coder:ty),* $(,)?) => {
        $(
            impl DefaultCoder for $ty {
                type Coder = $coder;
            }
        )*
    };
}

default_coder! {
    i64 => BigEndianI64Coder,
    i32 => BigEndianI32Coder,
    u64 => VarU64Coder,
    bool => BoolCoder,
    f64 => F64Coder,
    String => StringUtf8Coder,
    Vec<u8> => BytesCoder,
}

impl<A: DefaultCoder, B: DefaultCoder> DefaultCoder for (A, B) {
    type Coder = KvCoder<A::Coder, B::Coder>;
}
