//! CSV Export
//!
//! One row per sampled transaction. Nested values are left to the JSON export.

use std::path::Path;

use serde_json::Value;

use crate::domain::TransactionRecord;

/// Write records to CSV file
pub fn write_records(
    path: &Path,
    records: &[TransactionRecord],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    // Write header
    wtr.write_record(["index", "tx_hash", "fields", "log_count"])?;

    // Write data rows
    for (idx, record) in records.iter().enumerate() {
        wtr.write_record([
            (idx + 1).to_string(),
            record.tx_hash().unwrap_or_default().to_string(),
            scalar_fields(record),
            record
                .log_count()
                .map(|count| count.to_string())
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(records.len())
}

/// Top-level scalar fields other than `tx_hash` as `key=value; ...`
fn scalar_fields(record: &TransactionRecord) -> String {
    record
        .fields()
        .iter()
        .filter(|(key, _)| key.as_str() != "tx_hash")
        .filter_map(|(key, value)| match value {
            Value::Object(_) | Value::Array(_) => None,
            Value::String(s) => Some(format!("{key}={s}")),
            other => Some(format!("{key}={other}")),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
