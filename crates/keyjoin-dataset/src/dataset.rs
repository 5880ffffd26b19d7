use crate::options::Execution;
use crate::parallel;
use std::fmt;
use std::sync::Arc;

/// An immutable collection split into partitions.
///
/// Partitions are shared behind `Arc`, so cloning a dataset never copies records and no operation
/// can mutate a dataset another caller holds.
pub struct Dataset<T> {
    partitions: Vec<Arc<Vec<T>>>,
}

impl<T> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        Self {
            partitions: self.partitions.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Dataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("partitions", &self.partitions.len())
            .field("len", &self.len())
            .finish()
    }
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Dataset<T> {
    pub fn empty() -> Self {
        Self {
            partitions: Vec::new(),
        }
    }

    /// A dataset with exactly the given partitions (empty ones included).
    pub fn from_partitions(partitions: Vec<Vec<T>>) -> Self {
        Self {
            partitions: partitions.into_iter().map(Arc::new).collect(),
        }
    }

    /// Spreads `values` round-robin over `partitions` partitions (at least one).
    pub fn with_partitions(values: Vec<T>, partitions: usize) -> Self {
        let partitions = partitions.max(1);
        let per_partition = values.len().div_ceil(partitions);
        let mut parts: Vec<Vec<T>> = (0..partitions)
            .map(|_| Vec::with_capacity(per_partition))
            .collect();
        for (idx, value) in values.into_iter().enumerate() {
            parts[idx % partitions].push(value);
        }
        Self::from_partitions(parts)
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn partition(&self, idx: usize) -> Option<&[T]> {
        self.partitions.get(idx).map(|p| p.as_slice())
    }

    pub fn partitions(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.partitions.iter().map(|p| p.as_slice())
    }

    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(|p| p.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.partitions.iter().flat_map(|p| p.iter())
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    pub(crate) fn shared_partitions(&self) -> Vec<Arc<Vec<T>>> {
        self.partitions.clone()
    }

    /// Takes the partitions back, copying only those still shared with another dataset.
    pub fn into_partitions(self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.partitions
            .into_iter()
            .map(|p| Arc::try_unwrap(p).unwrap_or_else(|shared| shared.as_ref().clone()))
            .collect()
    }

    /// Maps every record to zero or more outputs, partition by partition.
    ///
    /// Output partition `i` holds the outputs of input partition `i`. Partitions are processed on
    /// the worker pool when `execution` is [`Execution::Parallel`].
    pub fn flat_map<U, I, F>(self, execution: Execution, f: F) -> Dataset<U>
    where
        T: Clone + Send,
        U: Send,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Sync + Send,
    {
        let parts = parallel::map_vec(self.into_partitions(), execution, |part| {
            part.into_iter().flat_map(&f).collect::<Vec<U>>()
        });
        Dataset::from_partitions(parts)
    }
}

impl<T> From<Vec<T>> for Dataset<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_partitions(vec![values])
    }
}

impl<T> FromIterator<T> for Dataset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}
