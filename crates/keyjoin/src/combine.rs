//! The pairing combiner: turns one key's left and right values into join rows.

use crate::model::{GroupedEntry, JoinPolicy, JoinResult};
use std::iter::Peekable;

/// Cross products above this many rows for a single key are logged as skew.
pub const FAN_OUT_WARN_THRESHOLD: usize = 1_000_000;

/// Combines one key's values into join rows according to `policy`.
///
/// - Both sides non-empty: every `(l, r)` pair exactly once.
/// - One side empty: each value of the other side paired with the policy's default for the
///   missing side, or nothing if the policy keeps no unmatched rows on that side.
/// - Both sides empty: nothing.
///
/// Each side is consumed in a single pass. Crossing requires holding one side in memory, so the
/// side whose size hint bounds it smaller is buffered and the other one drives the outer loop
/// (ties buffer the right side). Nothing is buffered when either side is empty.
pub fn combine<K, V1, V2, L, R>(
    key: K,
    left: L,
    right: R,
    policy: &JoinPolicy<V1, V2>,
) -> Pairs<K, V1, V2, L::IntoIter, R::IntoIter>
where
    K: Clone,
    V1: Clone,
    V2: Clone,
    L: IntoIterator<Item = V1>,
    R: IntoIterator<Item = V2>,
{
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    let plan = match (left.peek().is_some(), right.peek().is_some()) {
        (false, false) => Plan::Done,
        (true, false) => match policy.right_default() {
            Some(right_default) => Plan::LeftOnly {
                left,
                right_default: right_default.clone(),
            },
            None => Plan::Done,
        },
        (false, true) => match policy.left_default() {
            Some(left_default) => Plan::RightOnly {
                right,
                left_default: left_default.clone(),
            },
            None => Plan::Done,
        },
        (true, true) => {
            if buffer_left(left.size_hint(), right.size_hint()) {
                Plan::StreamRight {
                    left: left.collect(),
                    right,
                    current: None,
                    pos: 0,
                }
            } else {
                Plan::StreamLeft {
                    right: right.collect(),
                    left,
                    current: None,
                    pos: 0,
                }
            }
        }
    };

    Pairs { key, plan }
}

/// [`combine`] over a grouped entry, warning when the key's cross product is unusually large.
pub fn combine_entry<K, V1, V2>(
    entry: GroupedEntry<K, V1, V2>,
    policy: &JoinPolicy<V1, V2>,
) -> Pairs<K, V1, V2, std::vec::IntoIter<V1>, std::vec::IntoIter<V2>>
where
    K: Clone,
    V1: Clone,
    V2: Clone,
{
    let fan_out = entry.left.len().saturating_mul(entry.right.len());
    if fan_out > FAN_OUT_WARN_THRESHOLD {
        log::warn!(
            "skewed key: {} left x {} right values produce {fan_out} {} join rows",
            entry.left.len(),
            entry.right.len(),
            policy.mode(),
        );
    }
    let (key, left, right) = entry.into_parts();
    combine(key, left, right, policy)
}

/// Whether the left side should be the buffered one, given both sides' size hints.
fn buffer_left(left: (usize, Option<usize>), right: (usize, Option<usize>)) -> bool {
    match (left.1, right.1) {
        (Some(l), Some(r)) => l < r,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

enum Plan<V1, V2, L: Iterator, R: Iterator> {
    Done,
    LeftOnly {
        left: Peekable<L>,
        right_default: V2,
    },
    RightOnly {
        right: Peekable<R>,
        left_default: V1,
    },
    /// Left drives the outer loop, right is buffered.
    StreamLeft {
        left: Peekable<L>,
        right: Vec<V2>,
        current: Option<V1>,
        pos: usize,
    },
    /// Right drives the outer loop, left is buffered.
    StreamRight {
        right: Peekable<R>,
        left: Vec<V1>,
        current: Option<V2>,
        pos: usize,
    },
}

/// Join rows for one key, produced lazily by [`combine`].
pub struct Pairs<K, V1, V2, L: Iterator, R: Iterator> {
    key: K,
    plan: Plan<V1, V2, L, R>,
}

/// Next `(outer, inner)` pair of a nested loop over a streamed outer side and a buffered inner
/// side. The outer value is cloned for all but its last pairing, which takes it.
fn next_crossed<A, B, I>(
    outer: &mut I,
    current: &mut Option<A>,
    inner: &[B],
    pos: &mut usize,
) -> Option<(A, B)>
where
    A: Clone,
    B: Clone,
    I: Iterator<Item = A>,
{
    if inner.is_empty() {
        return None;
    }
    if current.is_none() {
        *current = Some(outer.next()?);
        *pos = 0;
    }
    let b = inner.get(*pos)?.clone();
    *pos += 1;
    let a = if *pos == inner.len() {
        current.take()?
    } else {
        current.clone()?
    };
    Some((a, b))
}

impl<K, V1, V2, L, R> Iterator for Pairs<K, V1, V2, L, R>
where
    K: Clone,
    V1: Clone,
    V2: Clone,
    L: Iterator<Item = V1>,
    R: Iterator<Item = V2>,
{
    type Item = JoinResult<K, V1, V2>;

    fn next(&mut self) -> Option<Self::Item> {
        let (l, r) = match &mut self.plan {
            Plan::Done => return None,
            Plan::LeftOnly {
                left,
                right_default,
            } => (left.next()?, right_default.clone()),
            Plan::RightOnly {
                right,
                left_default,
            } => (left_default.clone(), right.next()?),
            Plan::StreamLeft {
                left,
                right,
                current,
                pos,
            } => next_crossed(left, current, right, pos)?,
            Plan::StreamRight {
                right,
                left,
                current,
                pos,
            } => {
                let (r, l) = next_crossed(right, current, left, pos)?;
                (l, r)
            }
        };
        Some(JoinResult::of(self.key.clone(), (l, r)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.plan {
            Plan::Done => (0, Some(0)),
            Plan::LeftOnly { left, .. } => left.size_hint(),
            Plan::RightOnly { right, .. } => right.size_hint(),
            Plan::StreamLeft {
                left,
                right,
                current,
                pos,
            } => crossed_size_hint(left.size_hint(), right.len(), current.is_some(), *pos),
            Plan::StreamRight {
                right,
                left,
                current,
                pos,
            } => crossed_size_hint(right.size_hint(), left.len(), current.is_some(), *pos),
        }
    }
}

fn crossed_size_hint(
    outer: (usize, Option<usize>),
    inner: usize,
    has_current: bool,
    pos: usize,
) -> (usize, Option<usize>) {
    let in_flight = if has_current { inner - pos } else { 0 };
    let lower = outer.0.saturating_mul(inner).saturating_add(in_flight);
    let upper = outer
        .1
        .and_then(|n| n.checked_mul(inner))
        .and_then(|n| n.checked_add(in_flight));
    (lower, upper)
}
