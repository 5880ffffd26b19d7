use crate::combine::combine_entry;
use crate::error::JoinOutcome;
use crate::model::{JoinPolicy, JoinResult, KeyedRecord};
use crate::validate::{require_collection, require_default, Side};
use keyjoin_dataset::{CoGrouper, Dataset, Execution, GroupKey, GroupingOptions, HashCoGrouper};

pub(crate) type Keyed<'a, K, V> = Option<&'a Dataset<KeyedRecord<K, V>>>;

/// Runs joins as a co-group stage followed by a per-key combine stage.
///
/// Neither input is modified. Output is unordered, and a key that appears `m` times on the left
/// and `n` times on the right yields `m * n` rows. Arguments are checked before the grouping
/// stage runs, left before right and collections before defaults.
#[derive(Clone, Debug, Default)]
pub struct JoinEngine<G = HashCoGrouper> {
    grouper: G,
    execution: Execution,
}

impl JoinEngine<HashCoGrouper> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose grouping options (and combine execution) come from the environment.
    pub fn from_env() -> Self {
        let options = GroupingOptions::from_env();
        let execution = options.execution;
        Self::with_grouper(HashCoGrouper::new(options)).with_execution(execution)
    }
}

impl<G: CoGrouper> JoinEngine<G> {
    pub fn with_grouper(grouper: G) -> Self {
        Self {
            grouper,
            execution: Execution::default(),
        }
    }

    /// How the combine stage runs. Grouping follows the grouper's own options.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn grouper(&self) -> &G {
        &self.grouper
    }

    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Rows only for keys present on both sides.
    pub fn inner_join<'a, K, V1, V2>(
        &self,
        left: impl Into<Keyed<'a, K, V1>>,
        right: impl Into<Keyed<'a, K, V2>>,
    ) -> JoinOutcome<Dataset<JoinResult<K, V1, V2>>>
    where
        K: GroupKey + 'a,
        V1: Clone + Send + Sync + 'a,
        V2: Clone + Send + Sync + 'a,
    {
        let left = require_collection(left.into(), Side::Left)?;
        let right = require_collection(right.into(), Side::Right)?;
        self.join(left, right, JoinPolicy::Inner)
    }

    /// Every left row is kept; keys with no right values pair with `right_default`.
    pub fn left_outer_join<'a, K, V1, V2>(
        &self,
        left: impl Into<Keyed<'a, K, V1>>,
        right: impl Into<Keyed<'a, K, V2>>,
        right_default: impl Into<Option<V2>>,
    ) -> JoinOutcome<Dataset<JoinResult<K, V1, V2>>>
    where
        K: GroupKey + 'a,
        V1: Clone + Send + Sync + 'a,
        V2: Clone + Send + Sync + 'a,
    {
        let left = require_collection(left.into(), Side::Left)?;
        let right = require_collection(right.into(), Side::Right)?;
        let right_default = require_default(right_default.into(), Side::Right)?;
        self.join(left, right, JoinPolicy::LeftOuter { right_default })
    }

    /// Every right row is kept; keys with no left values pair with `left_default`.
    pub fn right_outer_join<'a, K, V1, V2>(
        &self,
        left: impl Into<Keyed<'a, K, V1>>,
        right: impl Into<Keyed<'a, K, V2>>,
        left_default: impl Into<Option<V1>>,
    ) -> JoinOutcome<Dataset<JoinResult<K, V1, V2>>>
    where
        K: GroupKey + 'a,
        V1: Clone + Send + Sync + 'a,
        V2: Clone + Send + Sync + 'a,
    {
        let left = require_collection(left.into(), Side::Left)?;
        let right = require_collection(right.into(), Side::Right)?;
        let left_default = require_default(left_default.into(), Side::Left)?;
        self.join(left, right, JoinPolicy::RightOuter { left_default })
    }

    /// Rows for every key on either side, substituting the default for whichever side is absent.
    pub fn full_outer_join<'a, K, V1, V2>(
        &self,
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
        let left = require_collection(left.into(), Side::Left)?;
        let right = require_collection(right.into(), Side::Right)?;
        let left_default = require_default(left_default.into(), Side::Left)?;
        let right_default = require_default(right_default.into(), Side::Right)?;
        self.join(
            left,
            right,
            JoinPolicy::FullOuter {
                left_default,
                right_default,
            },
        )
    }

    /// Joins under an explicit policy. The policy carries its own defaults, so there is nothing
    /// left to validate.
    pub fn join<K, V1, V2>(
        &self,
        left: &Dataset<KeyedRecord<K, V1>>,
        right: &Dataset<KeyedRecord<K, V2>>,
        policy: JoinPolicy<V1, V2>,
    ) -> JoinOutcome<Dataset<JoinResult<K, V1, V2>>>
    where
        K: GroupKey,
        V1: Clone + Send + Sync,
        V2: Clone + Send + Sync,
    {
        let mode = policy.mode();
        log::debug!(
            "{mode} join: co-grouping {} left and {} right records",
            left.len(),
            right.len()
        );

        let grouped = self.grouper.co_group_by_key(left, right)?;
        log::debug!(
            "{mode} join: combining {} keys across {} partitions ({})",
            grouped.len(),
            grouped.num_partitions(),
            self.execution
        );

        let joined = grouped.flat_map(self.execution, |entry| combine_entry(entry, &policy));
        log::debug!("{mode} join produced {} rows", joined.len());
        Ok(joined)
    }
}
