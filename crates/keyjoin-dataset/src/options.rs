use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable overriding [`GroupingOptions::shards`].
pub const SHARDS_ENV: &str = "KEYJOIN_SHARDS";
/// Environment variable overriding [`GroupingOptions::execution`] (`parallel` / `sequential`).
pub const EXECUTION_ENV: &str = "KEYJOIN_EXECUTION";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Execution {
    #[default]
    Parallel,
    Sequential,
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Execution::Parallel => "parallel",
            Execution::Sequential => "sequential",
        })
    }
}

impl FromStr for Execution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parallel" => Ok(Execution::Parallel),
            "sequential" => Ok(Execution::Sequential),
            other => Err(format!("unknown execution mode {other:?}")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupingOptions {
    /// Number of shards keys are hashed into. Defaults to the larger input partition count.
    pub shards: Option<usize>,
    pub execution: Execution,
}

impl GroupingOptions {
    /// Upper bound on the shard count, whatever the configuration says.
    pub const MAX_SHARDS: usize = 4096;

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = Some(shards);
        self
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Defaults overridden by `KEYJOIN_SHARDS` / `KEYJOIN_EXECUTION`.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides read through `lookup`. Unparseable values are ignored with a warning.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(SHARDS_ENV) {
            let max = Self::MAX_SHARDS;
            match raw.replace('_', "").trim().parse::<usize>() {
                Ok(shards) if (1..=max).contains(&shards) => self.shards = Some(shards),
                _ => log::warn!("ignoring {SHARDS_ENV}={raw:?}: expected 1..={max}"),
            }
        }
        if let Some(raw) = lookup(EXECUTION_ENV) {
            match raw.parse() {
                Ok(execution) => self.execution = execution,
                Err(err) => log::warn!("ignoring {EXECUTION_ENV}: {err}"),
            }
        }
        self
    }

    /// Shard count for inputs spread over `input_partitions` partitions.
    pub fn shard_count(&self, input_partitions: usize) -> usize {
        self.shards
            .unwrap_or(input_partitions)
            .clamp(1, Self::MAX_SHARDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn shard_count_defaults_to_input_partitions() {
        let options = GroupingOptions::default();
        assert_eq!(options.shard_count(0), 1);
        assert_eq!(options.shard_count(7), 7);
        assert_eq!(options.shard_count(1_000_000), GroupingOptions::MAX_SHARDS);
        assert_eq!(options.with_shards(3).shard_count(7), 3);
    }

    #[test]
    fn env_overrides_are_applied() {
        let options = GroupingOptions::default().with_env_overrides(lookup(&[
            (SHARDS_ENV, "1_024"),
            (EXECUTION_ENV, " Sequential "),
        ]));
        assert_eq!(options.shards, Some(1024));
        assert_eq!(options.execution, Execution::Sequential);
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let options = GroupingOptions::default()
            .with_env_overrides(lookup(&[(SHARDS_ENV, "0"), (EXECUTION_ENV, "threads")]));
        assert_eq!(options, GroupingOptions::default());
    }
}
