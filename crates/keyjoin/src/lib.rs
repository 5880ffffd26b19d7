//! Equi-joins over keyed collections.
//!
//! Both inputs are collections of [`KeyedRecord`]s sharing a key type. A join co-groups them by
//! key (see [`keyjoin_dataset::CoGrouper`]) and then pairs every left value with every right value
//! of the same key. Outer joins substitute a caller-supplied default for a side that has no values.
//!
//! The free functions use a [`JoinEngine`] with default options; build an engine directly to pick
//! the grouper, shard count or execution mode.
//!
//! Arguments that may be absent are taken as `impl Into<Option<_>>`, so callers pass `&dataset`
//! or a plain value and get [`JoinError::InvalidArgument`] for `None`.

#![forbid(unsafe_code)]

mod combine;
mod error;
mod join;
mod model;
mod validate;

pub use crate::combine::{combine, combine_entry, Pairs, FAN_OUT_WARN_THRESHOLD};
pub use crate::error::{JoinError, JoinOutcome};
pub use crate::join::JoinEngine;
pub use crate::model::{Bag, GroupedEntry, JoinMode, JoinPolicy, JoinResult, KeyedRecord};
pub use keyjoin_coder as coder;
pub use keyjoin_dataset::{
    CoGrouper, Dataset, Execution, GroupKey, GroupingError, GroupingOptions, GroupingResult,
    HashCoGrouper,
};

use crate::join::Keyed;

/// [`JoinEngine::inner_join`] on a default engine.
pub fn inner_join<'a, K, V1, V2>(
    left: impl Into<Keyed<'a, K, V1>>,
    right: impl Into<Keyed<'a, K, V2>>,
) -> JoinOutcome<Dataset<JoinResult<K, V1, V2>>>
where
    K: GroupKey + 'a,
    V1: Clone + Send + Sync + 'a,
    V2: Clone + Send + Sync + 'a,
{
    JoinEngine::new().inner_join(left, right)
}

/// [`JoinEngine::left_outer_join`] on a default engine.
pub fn left_outer_join<'a, K, V1, V2>(
    left: impl Into<Keyed<'a, K, V1>>,
    right: impl Into<Keyed<'a, K, V2>>,
    right_default: impl Into<Option<V2>>,
) -> JoinOutcome<Dataset<JoinResult<K, V1, V2>>>
where
    K: GroupKey + 'a,
    V1: Clone + Send + Sync + 'a,
    V2: Clone + Send + Sync + 'a,
{
    JoinEngine::new().left_outer_join(left, right, right_default)
}

/// [`JoinEngine::right_outer_join`] on a default engine.
pub fn right_outer_join<'a, K, V1, V2>(
    left: impl Into<Keyed<'a, K, V1>>,
    right: impl Into<Keyed<'a, K, V2>>,
    left_default: impl Into<Option<V1>>,
) -> JoinOutcome<Dataset<JoinResult<K, V1, V2>>>
where
    K: GroupKey + 'a,
    V1: Clone + Send + Sync + 'a,
    V2: Clone + Send + Sync + 'a,
{
    JoinEngine::new().right_outer_join(left, right, left_default)
}

/// [`JoinEngine::full_outer_join`] on a default engine.
pub fn full_outer_join<'a, K, V1, V2>(
    left: impl Into<Keyed<'a, K, V1>>,
    right: impl Into<Keyed<'a, K, V2>>,
    left_default: impl Into<Option<V1>>,
    right_default: impl Into<Option<V2>>,
) -> JoinOutcome<Dataset<JoinResult<K, V1, V2>>>
where
    K: GroupKey + 'a,
    V1: Clone + Send + Sync + 'a,
    V2: Clone + Send + Sync + 'a,
{
    JoinEngine::new().full_outer_join(left, right, left_default, right_default)
}
