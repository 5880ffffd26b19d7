use crate::dataset::Dataset;
use crate::options::{Execution, GroupingOptions};
use crate::parallel;
use crate::record::{GroupedEntry, KeyedRecord};
use ahash::{AHashMap, RandomState};
use keyjoin_coder::{Coder, CoderError, Context, DefaultCoder};
use std::collections::hash_map::Entry;

pub type GroupingResult<T> = Result<T, GroupingError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupingError {
    #[error("key type {key_type} cannot be grouped: {source}")]
    NonDeterministicKey {
        key_type: &'static str,
        source: CoderError,
    },

    #[error("failed to encode key: {0}")]
    Coder(#[from] CoderError),

    #[error("grouping backend failed: {0}")]
    Backend(String),
}

/// Key types the grouping stage can partition: they need a deterministic default coder and must be
/// shareable with worker threads.
pub trait GroupKey: DefaultCoder + Clone + Send + Sync {}

impl<K: DefaultCoder + Clone + Send + Sync> GroupKey for K {}

/// The co-group primitive the join engine runs on.
///
/// Implementations must emit every key present in either input exactly once, with complete bags
/// for both sides. Failures are reported as [`GroupingError`] and no partial output is returned.
pub trait CoGrouper: Send + Sync {
    fn co_group_by_key<K, V1, V2>(
        &self,
        left: &Dataset<KeyedRecord<K, V1>>,
        right: &Dataset<KeyedRecord<K, V2>>,
    ) -> GroupingResult<Dataset<GroupedEntry<K, V1, V2>>>
    where
        K: GroupKey,
        V1: Clone + Send + Sync,
        V2: Clone + Send + Sync;
}

impl<G: CoGrouper + ?Sized> CoGrouper for &G {
    fn co_group_by_key<K, V1, V2>(
        &self,
        left: &Dataset<KeyedRecord<K, V1>>,
        right: &Dataset<KeyedRecord<K, V2>>,
    ) -> GroupingResult<Dataset<GroupedEntry<K, V1, V2>>>
    where
        K: GroupKey,
        V1: Clone + Send + Sync,
        V2: Clone + Send + Sync,
    {
        (**self).co_group_by_key(left, right)
    }
}

/// Fixed seeds so that a key lands in the same shard on every run and every worker.
const SHARD_SEEDS: [u64; 4] = [
    0x243F_6A88_85A3_08D3,
    0x1319_8A2E_0370_7344,
    0xA409_3822_299F_31D0,
    0x082E_FA98_EC4E_6C89,
];

fn shard_hasher() -> RandomState {
    let [k0, k1, k2, k3] = SHARD_SEEDS;
    RandomState::with_seeds(k0, k1, k2, k3)
}

/// A record routed to a shard, tagged with its encoded key.
struct Routed<K, V> {
    encoded: Vec<u8>,
    key: K,
    value: V,
}

/// In-process co-group: hash-partitions both inputs by encoded key, then groups each shard.
///
/// Keys are compared by their encoded bytes, which is why the key coder has to be deterministic.
/// When several equal keys are seen, the first one encountered in a shard is kept.
#[derive(Clone, Debug, Default)]
pub struct HashCoGrouper {
    options: GroupingOptions,
}

impl HashCoGrouper {
    pub fn new(options: GroupingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GroupingOptions {
        &self.options
    }
}

fn scatter<K, V, C>(
    part: &[KeyedRecord<K, V>],
    coder: &C,
    hasher: &RandomState,
    shards: usize,
) -> GroupingResult<Vec<Vec<Routed<K, V>>>>
where
    K: Clone,
    V: Clone,
    C: Coder<K>,
{
    let mut buckets: Vec<Vec<Routed<K, V>>> = (0..shards).map(|_| Vec::new()).collect();
    for record in part {
        let mut encoded = Vec::new();
        coder.encode(record.key(), Context::Outer, &mut encoded)?;
        let shard = (hasher.hash_one(encoded.as_slice()) % shards as u64) as usize;
        buckets[shard].push(Routed {
            encoded,
            key: record.key().clone(),
            value: record.value().clone(),
        });
    }
    Ok(buckets)
}

/// Scatters every partition of `dataset` into per-shard buckets.
fn route<K, V, C>(
    dataset: &Dataset<KeyedRecord<K, V>>,
    coder: &C,
    hasher: &RandomState,
    shards: usize,
    execution: Execution,
) -> GroupingResult<Vec<Vec<Vec<Routed<K, V>>>>>
where
    K: Clone + Send + Sync,
    V: Clone + Send + Sync,
    C: Coder<K>,
{
    parallel::try_map_vec(dataset.shared_partitions(), execution, |part| {
        scatter(&part, coder, hasher, shards)
    })
}

fn slot_for<K, V1, V2>(
    index: &mut AHashMap<Vec<u8>, usize>,
    entries: &mut Vec<GroupedEntry<K, V1, V2>>,
    encoded: Vec<u8>,
    key: K,
) -> usize {
    match index.entry(encoded) {
        Entry::Occupied(slot) => *slot.get(),
        Entry::Vacant(slot) => {
            let idx = entries.len();
            entries.push(GroupedEntry::empty(key));
            slot.insert(idx);
            idx
        }
    }
}

fn gather<K, V1, V2>(
    left: Vec<Routed<K, V1>>,
    right: Vec<Routed<K, V2>>,
) -> Vec<GroupedEntry<K, V1, V2>> {
    let mut index: AHashMap<Vec<u8>, usize> = AHashMap::new();
    let mut entries: Vec<GroupedEntry<K, V1, V2>> = Vec::new();
    for routed in left {
        let idx = slot_for(&mut index, &mut entries, routed.encoded, routed.key);
        entries[idx].left.push(routed.value);
    }
    for routed in right {
        let idx = slot_for(&mut index, &mut entries, routed.encoded, routed.key);
        entries[idx].right.push(routed.value);
    }
    entries
}

/// Moves per-partition buckets into per-shard lists.
fn transpose<T>(scattered: Vec<Vec<Vec<T>>>, shards: usize) -> Vec<Vec<T>> {
    let mut out: Vec<Vec<T>> = (0..shards).map(|_| Vec::new()).collect();
    for buckets in scattered {
        for (shard, bucket) in out.iter_mut().zip(buckets) {
            shard.extend(bucket);
        }
    }
    out
}

impl CoGrouper for HashCoGrouper {
    fn co_group_by_key<K, V1, V2>(
        &self,
        left: &Dataset<KeyedRecord<K, V1>>,
        right: &Dataset<KeyedRecord<K, V2>>,
    ) -> GroupingResult<Dataset<GroupedEntry<K, V1, V2>>>
    where
        K: GroupKey,
        V1: Clone + Send + Sync,
        V2: Clone + Send + Sync,
    {
        let coder = K::default_coder();
        coder
            .verify_deterministic()
            .map_err(|source| GroupingError::NonDeterministicKey {
                key_type: std::any::type_name::<K>(),
                source,
            })?;

        let shards = self
            .options
            .shard_count(left.num_partitions().max(right.num_partitions()));
        let execution = self.options.execution;
        let hasher = shard_hasher();
        log::debug!(
            "co-grouping {} left and {} right records into {shards} shards ({execution})",
            left.len(),
            right.len(),
        );

        let left_routed = route(left, &coder, &hasher, shards, execution)?;
        let right_routed = route(right, &coder, &hasher, shards, execution)?;

        let shard_inputs: Vec<_> = transpose(left_routed, shards)
            .into_iter()
            .zip(transpose(right_routed, shards))
            .collect();
        let grouped = parallel::map_vec(shard_inputs, execution, |(l, r)| gather(l, r));

        for (shard, entries) in grouped.iter().enumerate() {
            log::trace!("shard {shard}: {} keys", entries.len());
        }
        Ok(Dataset::from_partitions(grouped))
    }
}
