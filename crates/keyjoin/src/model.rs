use std::fmt;

pub use keyjoin_dataset::{Bag, GroupedEntry, KeyedRecord};

/// One output row of a join: the key with one left and one right value, either of which may be a
/// caller-supplied default.
pub type JoinResult<K, V1, V2> = KeyedRecord<K, (V1, V2)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JoinMode {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl JoinMode {
    pub const ALL: [JoinMode; 4] = [
        JoinMode::Inner,
        JoinMode::LeftOuter,
        JoinMode::RightOuter,
        JoinMode::FullOuter,
    ];

    /// Whether keys with left values but no right values produce output.
    pub fn keeps_unmatched_left(self) -> bool {
        matches!(self, JoinMode::LeftOuter | JoinMode::FullOuter)
    }

    /// Whether keys with right values but no left values produce output.
    pub fn keeps_unmatched_right(self) -> bool {
        matches!(self, JoinMode::RightOuter | JoinMode::FullOuter)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JoinMode::Inner => "inner",
            JoinMode::LeftOuter => "left outer",
            JoinMode::RightOuter => "right outer",
            JoinMode::FullOuter => "full outer",
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A join mode together with the defaults it substitutes for a missing side.
///
/// `left_default` fills in for keys that only have right values and `right_default` for keys that
/// only have left values, so each outer mode carries exactly the defaults it can use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JoinPolicy<V1, V2> {
    Inner,
    LeftOuter { right_default: V2 },
    RightOuter { left_default: V1 },
    FullOuter { left_default: V1, right_default: V2 },
}

impl<V1, V2> JoinPolicy<V1, V2> {
    pub fn mode(&self) -> JoinMode {
        match self {
            JoinPolicy::Inner => JoinMode::Inner,
            JoinPolicy::LeftOuter { .. } => JoinMode::LeftOuter,
            JoinPolicy::RightOuter { .. } => JoinMode::RightOuter,
            JoinPolicy::FullOuter { .. } => JoinMode::FullOuter,
        }
    }

    pub fn left_default(&self) -> Option<&V1> {
        match self {
            JoinPolicy::RightOuter { left_default }
            | JoinPolicy::FullOuter { left_default, .. } => Some(left_default),
            JoinPolicy::Inner | JoinPolicy::LeftOuter { .. } => None,
        }
    }

    pub fn right_default(&self) -> Option<&V2> {
        match self {
            JoinPolicy::LeftOuter { right_default }
            | JoinPolicy::FullOuter { right_default, .. } => Some(right_default),
            JoinPolicy::Inner | JoinPolicy::RightOuter { .. } => None,
        }
    }
}
