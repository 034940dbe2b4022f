//! Export Module
//!
//! Writes the last successful sample result to disk.
//!
//! - `:export` or `x` triggers export
//! - `.csv` target → one row per record
//! - anything else → pretty JSON with the query and timestamp
//! - default target is a timestamped file under the data dir's exports/

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::config;
use crate::core::session::LastResult;
use crate::core::{Action, NotifyLevel, Session};

/// Get the export directory path, creating it if needed
fn get_export_dir() -> std::io::Result<PathBuf> {
    let export_dir = config::exports_dir().unwrap_or_else(|| PathBuf::from(".sampler").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export the session's last result to `target`, or to a default file
pub fn export_last_result(session: &Session, target: Option<&str>) -> Action {
    let Some(result) = session.last_result.as_ref() else {
        return Action::Notify(
            "Nothing to export yet - submit an address first".to_string(),
            NotifyLevel::Warn,
        );
    };

    let path = match target.map(str::trim).filter(|t| !t.is_empty()) {
        Some(target) => PathBuf::from(target),
        None => match get_export_dir() {
            Ok(dir) => dir.join(generate_filename("samples", "json")),
            Err(e) => {
                return Action::Notify(
                    format!("Failed to create export directory: {}", e),
                    NotifyLevel::Error,
                )
            }
        },
    };

    match write_result(&path, result) {
        Ok(count) => {
            info!(path = %path.display(), count, "exported samples");
            Action::Notify(
                format!("Exported {} records to {}", count, path.display()),
                NotifyLevel::Info,
            )
        }
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}

/// Pick the format from the file extension
pub fn write_result(path: &Path, result: &LastResult) -> Result<usize, Box<dyn std::error::Error>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        csv_export::write_records(path, &result.records)
    } else {
        json_export::write_result(path, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chain, QueryParams, TransactionRecord};
    use serde_json::json;

    fn last_result() -> LastResult {
        let records: Vec<TransactionRecord> = serde_json::from_value(json!([
            { "tx_hash": "0xaaa", "block": 1, "logs": [["0x1", "Transfer()"]] },
            { "tx_hash": "0xbbb", "receipt": { "status": "1" } }
        ]))
        .unwrap();
        LastResult {
            query: QueryParams::new(Chain::Ethereum, format!("0x{}", "c".repeat(40))),
            records,
            received_at: Local::now(),
        }
    }

    #[test]
    fn test_export_without_result_warns() {
        let action = export_last_result(&Session::default(), Some("/tmp/unused.json"));
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Warn)));
    }

    #[test]
    fn test_export_json_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::default();
        session.last_result = Some(last_result());

        let json_path = dir.path().join("out.json");
        let action = export_last_result(&session, json_path.to_str());
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Info)));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(written["chain"], "eth");
        assert_eq!(written["records"].as_array().unwrap().len(), 2);
        assert_eq!(written["records"][0]["tx_hash"], "0xaaa");

        let csv_path = dir.path().join("out.CSV");
        let count = write_result(&csv_path, session.last_result.as_ref().unwrap()).unwrap();
        assert_eq!(count, 2);
        let text = fs::read_to_string(&csv_path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("index,tx_hash,fields,log_count"));
        assert_eq!(lines.next(), Some("1,0xaaa,block=1,1"));
        assert_eq!(lines.next(), Some("2,0xbbb,,"));
    }
}
