use keyjoin_dataset::{
    CoGrouper, Dataset, Execution, GroupedEntry, GroupingError, GroupingOptions, HashCoGrouper,
    KeyedRecord,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

type Summary = BTreeMap<String, (Vec<i64>, Vec<String>)>;

fn kv<V>(key: &str, value: V) -> KeyedRecord<String, V> {
    KeyedRecord::of(key.to_string(), value)
}

fn summarize(grouped: &Dataset<GroupedEntry<String, i64, String>>) -> Summary {
    let mut out = Summary::new();
    for entry in grouped.iter() {
        let mut left: Vec<i64> = entry.left.iter().copied().collect();
        let mut right: Vec<String> = entry.right.iter().cloned().collect();
        left.sort();
        right.sort();
        let previous = out.insert(entry.key.clone(), (left, right));
        assert!(previous.is_none(), "key {} grouped twice", entry.key);
    }
    out
}

fn group<L, R>(
    grouper: &HashCoGrouper,
    left: &Dataset<KeyedRecord<String, L>>,
    right: &Dataset<KeyedRecord<String, R>>,
) -> Dataset<GroupedEntry<String, L, R>>
where
    L: Clone + Send + Sync,
    R: Clone + Send + Sync,
{
    grouper.co_group_by_key(left, right).unwrap()
}

fn sample_inputs() -> (Dataset<KeyedRecord<String, i64>>, Dataset<KeyedRecord<String, String>>) {
    let left = Dataset::with_partitions(
        vec![kv("Key1", 5), kv("Key2", 4), kv("Key2", 6), kv("Key4", 1)],
        3,
    );
    let right = Dataset::with_partitions(
        vec![
            kv("Key1", "foo".to_string()),
            kv("Key2", "bar".to_string()),
            kv("Key2", "gazonk".to_string()),
            kv("Key3", "baz".to_string()),
        ],
        2,
    );
    (left, right)
}

fn expected_summary() -> Summary {
    let mut expected = Summary::new();
    expected.insert("Key1".into(), (vec![5], vec!["foo".into()]));
    let key2_right = vec!["bar".into(), "gazonk".into()];
    expected.insert("Key2".into(), (vec![4, 6], key2_right));
    expected.insert("Key3".into(), (vec![], vec!["baz".into()]));
    expected.insert("Key4".into(), (vec![1], vec![]));
    expected
}

#[test]
fn every_key_appears_once_with_complete_bags() {
    let (left, right) = sample_inputs();
    let grouped = group(&HashCoGrouper::default(), &left, &right);
    assert_eq!(summarize(&grouped), expected_summary());
}

#[test]
fn grouping_is_independent_of_shards_and_execution() {
    let (left, right) = sample_inputs();
    for shards in [1, 2, 7, 64] {
        for execution in [Execution::Parallel, Execution::Sequential] {
            let options = GroupingOptions::default().with_shards(shards);
            let grouper = HashCoGrouper::new(options.with_execution(execution));
            let grouped = group(&grouper, &left, &right);
            assert_eq!(grouped.num_partitions(), shards);
            assert_eq!(
                summarize(&grouped),
                expected_summary(),
                "shards={shards} execution={execution}"
            );
        }
    }
}

#[test]
fn empty_inputs_group_to_nothing() {
    let left: Dataset<KeyedRecord<String, i64>> = Dataset::empty();
    let right: Dataset<KeyedRecord<String, String>> = Dataset::empty();
    let grouped = group(&HashCoGrouper::default(), &left, &right);
    assert!(grouped.is_empty());
}

#[test]
fn one_sided_input_yields_empty_bags_on_the_other_side() {
    let left = Dataset::from(vec![kv("Key2", 4i64)]);
    let right: Dataset<KeyedRecord<String, String>> = Dataset::empty();
    let grouped = group(&HashCoGrouper::default(), &left, &right);
    let entries = grouped.to_vec();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "Key2");
    assert_eq!(entries[0].left.len(), 1);
    assert!(entries[0].right.is_empty());
}

#[test]
fn grouping_does_not_mutate_inputs() {
    let (left, right) = sample_inputs();
    let before = (left.to_vec(), right.to_vec());
    let grouper = HashCoGrouper::default();
    let first = summarize(&group(&grouper, &left, &right));
    let second = summarize(&group(&grouper, &left, &right));
    assert_eq!(first, second);
    assert_eq!((left.to_vec(), right.to_vec()), before);
}

#[test]
fn composite_keys_group_by_all_components() {
    let left = Dataset::from(vec![
        KeyedRecord::of(("a".to_string(), 1i64), 10i64),
        KeyedRecord::of(("a".to_string(), 2i64), 20i64),
    ]);
    let right = Dataset::from(vec![KeyedRecord::of(("a".to_string(), 1i64), 'x')]);
    let grouped = HashCoGrouper::default()
        .co_group_by_key(&left, &right)
        .unwrap();
    let mut sizes: Vec<((String, i64), usize, usize)> = grouped
        .iter()
        .map(|e| (e.key.clone(), e.left.len(), e.right.len()))
        .collect();
    sizes.sort();
    assert_eq!(
        sizes,
        vec![(("a".to_string(), 1), 1, 1), (("a".to_string(), 2), 1, 0)]
    );
}

#[test]
fn floating_point_keys_are_rejected() {
    let left = Dataset::from(vec![KeyedRecord::of(1.5f64, 1i64)]);
    let right = Dataset::from(vec![KeyedRecord::of(1.5f64, 2i64)]);
    let err = HashCoGrouper::default()
        .co_group_by_key(&left, &right)
        .unwrap_err();
    match &err {
        GroupingError::NonDeterministicKey { key_type, .. } => assert_eq!(*key_type, "f64"),
        other => panic!("unexpected error {other:?}"),
    }
    let message = err.to_string();
    assert!(
        message.contains("not guaranteed to be deterministic"),
        "{message}"
    );
}
