//! In-process keyed-collection engine used by `keyjoin`.
//!
//! This crate provides:
//! - [`Dataset`]: an immutable, partitioned collection that is cheap to clone.
//! - [`KeyedRecord`], [`Bag`] and [`GroupedEntry`]: the record shapes the join engine consumes.
//! - [`CoGrouper`] / [`HashCoGrouper`]: co-partitioning of two keyed datasets by encoded key.
//! - Worker logging options (`name#LEVEL` overrides) for hosts that run grouping in workers.

#![forbid(unsafe_code)]

mod dataset;
mod grouping;
pub mod logging;
mod options;
mod parallel;
mod record;

pub use crate::dataset::Dataset;
pub use crate::grouping::{CoGrouper, GroupKey, GroupingError, GroupingResult, HashCoGrouper};
pub use crate::options::{Execution, GroupingOptions, EXECUTION_ENV, SHARDS_ENV};
pub use crate::record::{Bag, GroupedEntry, KeyedRecord};
