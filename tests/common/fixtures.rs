use gatewave::batch::Batch;
use gatewave::kernel::Kernel;
use serde_json::{Value, json};

/// Batch of empty records under the given entry keys.
pub fn keyed_batch(keys: &[&str]) -> Batch<Value> {
    keys.iter().map(|k| ((*k).into(), json!({}))).collect()
}

/// Batch of explicit records.
pub fn record_batch(entries: &[(&str, Value)]) -> Batch<Value> {
    entries
        .iter()
        .map(|(k, record)| ((*k).into(), record.clone()))
        .collect()
}

/// Sorted entry keys present in a node's lane.
pub fn lane_keys(kernel: &Kernel<Value>, node: &str) -> Vec<String> {
    let mut keys: Vec<String> = kernel
        .signals()
        .lane(node)
        .map(|lane| lane.keys().map(|k| k.as_str().to_string()).collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

pub fn assert_signal(kernel: &Kernel<Value>, node: &str, entry: &str, expected: bool) {
    assert_eq!(
        kernel.signals().get(node, entry),
        Some(expected),
        "expected node '{node}' for entry '{entry}' to be {expected}",
    );
}
