mod common;

use common::{left_of, right_of, row, sorted, sorted_rows};
use keyjoin::{inner_join, Dataset, JoinError, KeyedRecord};
use pretty_assertions::assert_eq;

#[test]
fn one_to_one_mapping() {
    let left = left_of(&[("Key1", 5), ("Key2", 4)]);
    let right = right_of(&[("Key1", "foo"), ("Key2", "bar")]);

    let output = inner_join(&left, &right).unwrap();

    assert_eq!(
        sorted_rows(&output),
        sorted(vec![row("Key1", 5, "foo"), row("Key2", 4, "bar")])
    );
}

#[test]
fn many_to_many_mapping_is_a_cross_product() {
    let left = left_of(&[("Key2", 4), ("Key2", 6)]);
    let right = right_of(&[("Key2", "bar"), ("Key2", "gazonk")]);

    let output = inner_join(&left, &right).unwrap();

    assert_eq!(
        sorted_rows(&output),
        sorted(vec![
            row("Key2", 4, "bar"),
            row("Key2", 4, "gazonk"),
            row("Key2", 6, "bar"),
            row("Key2", 6, "gazonk"),
        ])
    );
}

#[test]
fn unmatched_keys_are_dropped() {
    let left = left_of(&[("Key2", 4)]);
    let right = right_of(&[("Key3", "bar")]);

    let output = inner_join(&left, &right).unwrap();

    assert!(output.is_empty());
}

#[test]
fn empty_side_yields_nothing() {
    let left = left_of(&[("Key1", 5)]);
    let right = right_of(&[]);

    assert!(inner_join(&left, &right).unwrap().is_empty());
    assert!(inner_join(&left_of(&[]), &right).unwrap().is_empty());
}

#[test]
fn inputs_are_left_untouched() {
    let left = left_of(&[("Key1", 5), ("Key2", 4)]);
    let right = right_of(&[("Key1", "foo")]);
    let before = (left.to_vec(), right.to_vec());

    let first = sorted_rows(&inner_join(&left, &right).unwrap());
    let second = sorted_rows(&inner_join(&left, &right).unwrap());

    assert_eq!(first, second);
    assert_eq!((left.to_vec(), right.to_vec()), before);
}

#[test]
fn missing_collections_are_rejected() {
    let right = right_of(&[]);
    let missing_left: Option<&Dataset<KeyedRecord<String, i64>>> = None;
    let missing_right: Option<&Dataset<KeyedRecord<String, String>>> = None;

    assert_eq!(
        inner_join(missing_left, &right).unwrap_err(),
        JoinError::InvalidArgument("left collection must not be null".to_string())
    );
    assert_eq!(
        inner_join(missing_left, missing_right).unwrap_err(),
        JoinError::InvalidArgument("left collection must not be null".to_string())
    );
    assert_eq!(
        inner_join(&left_of(&[]), missing_right).unwrap_err(),
        JoinError::InvalidArgument("right collection must not be null".to_string())
    );
}
