//! JSON Export
//!
//! Writes the raw records together with the query that produced them.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::core::session::LastResult;
use crate::domain::TransactionRecord;

#[derive(Serialize)]
struct ExportableResult<'a> {
    chain: &'a str,
    address: &'a str,
    query: String,
    received_at: String,
    exported_at: String,
    records: &'a [TransactionRecord],
}

/// Write a result to JSON file
pub fn write_result(path: &Path, result: &LastResult) -> Result<usize, Box<dyn std::error::Error>> {
    let exportable = ExportableResult {
        chain: result.query.chain.wire_value(),
        address: &result.query.address,
        query: result.query.to_query_string(),
        received_at: result.received_at.to_rfc3339(),
        exported_at: chrono::Local::now().to_rfc3339(),
        records: &result.records,
    };

    let json = serde_json::to_string_pretty(&exportable)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(result.records.len())
}
