#![allow(dead_code)]

use keyjoin::{Dataset, JoinResult, KeyedRecord};

pub type Row = (String, (i64, String));

pub fn kv<V>(key: &str, value: V) -> KeyedRecord<String, V> {
    KeyedRecord::of(key.to_string(), value)
}

pub fn left_of(records: &[(&str, i64)]) -> Dataset<KeyedRecord<String, i64>> {
    records.iter().map(|(k, v)| kv(k, *v)).collect()
}

pub fn right_of(records: &[(&str, &str)]) -> Dataset<KeyedRecord<String, String>> {
    records.iter().map(|(k, v)| kv(k, v.to_string())).collect()
}

pub fn row(key: &str, left: i64, right: &str) -> Row {
    (key.to_string(), (left, right.to_string()))
}

/// Join output as a sorted list, since joins make no ordering promise.
pub fn sorted_rows(output: &Dataset<JoinResult<String, i64, String>>) -> Vec<Row> {
    let mut rows: Vec<Row> = output.to_vec().into_iter().map(Into::into).collect();
    rows.sort();
    rows
}

pub fn sorted(mut rows: Vec<Row>) -> Vec<Row> {
    rows.sort();
    rows
}
