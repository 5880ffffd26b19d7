use std::slice;
use std::vec;

/// An immutable key/value pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyedRecord<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyedRecord<K, V> {
    pub fn of(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for KeyedRecord<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::of(key, value)
    }
}

impl<K, V> From<KeyedRecord<K, V>> for (K, V) {
    fn from(record: KeyedRecord<K, V>) -> Self {
        record.into_parts()
    }
}

/// A multiset of values sharing one key on one side of a co-group.
///
/// Iteration order carries no meaning; duplicates are preserved.
#[derive(Clone, Debug)]
pub struct Bag<V> {
    values: Vec<V>,
}

impl<V> Bag<V> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, V> {
        self.values.iter()
    }

    pub(crate) fn push(&mut self, value: V) {
        self.values.push(value);
    }
}

impl<V> Default for Bag<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<V> for Bag<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<V> From<Vec<V>> for Bag<V> {
    fn from(values: Vec<V>) -> Self {
        Self { values }
    }
}

impl<V> IntoIterator for Bag<V> {
    type Item = V;
    type IntoIter = vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Bag<V> {
    type Item = &'a V;
    type IntoIter = slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Everything both inputs hold for one distinct key.
///
/// A side with no records for the key has an empty bag, never a missing one.
#[derive(Clone, Debug)]
pub struct GroupedEntry<K, V1, V2> {
    pub key: K,
    pub left: Bag<V1>,
    pub right: Bag<V2>,
}

impl<K, V1, V2> GroupedEntry<K, V1, V2> {
    pub fn new(key: K, left: Bag<V1>, right: Bag<V2>) -> Self {
        Self { key, left, right }
    }

    pub(crate) fn empty(key: K) -> Self {
        Self::new(key, Bag::new(), Bag::new())
    }

    pub fn into_parts(self) -> (K, Bag<V1>, Bag<V2>) {
        (self.key, self.left, self.right)
    }
}
