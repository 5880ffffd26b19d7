//! Argument checks shared by the join entry points.

use crate::error::{JoinError, JoinOutcome};
use keyjoin_dataset::Dataset;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

fn missing(side: Side, what: &str) -> JoinError {
    JoinError::InvalidArgument(format!("{side} {what} must not be null"))
}

pub(crate) fn require_collection<T>(
    dataset: Option<&Dataset<T>>,
    side: Side,
) -> JoinOutcome<&Dataset<T>> {
    dataset.ok_or_else(|| missing(side, "collection"))
}

pub(crate) fn require_default<V>(value: Option<V>, side: Side) -> JoinOutcome<V> {
    value.ok_or_else(|| missing(side, "default value"))
}
