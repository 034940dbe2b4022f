//! Backend response model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TransportError;

/// Body of `GET /sample`. Unknown top-level fields (e.g. `status`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SampleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<TransactionRecord>>,
}

impl SampleResponse {
    /// `error_message` wins over `data`; a missing `data` is an empty result.
    pub fn into_outcome(self) -> FetchOutcome {
        match self.error_message {
            Some(message) => FetchOutcome::SoftError(message),
            None => FetchOutcome::Records(self.data.unwrap_or_default()),
        }
    }
}

/// One sampled transaction: an arbitrary JSON object in backend key order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TransactionRecord(pub Map<String, Value>);

impl TransactionRecord {
    pub fn tx_hash(&self) -> Option<&str> {
        self.0.get("tx_hash").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Number of entries under `logs`, when it is a list
    pub fn log_count(&self) -> Option<usize> {
        self.0.get("logs").and_then(Value::as_array).map(Vec::len)
    }
}

impl From<Map<String, Value>> for TransactionRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// How one submission ended
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 2xx without `error_message`; may be empty
    Records(Vec<TransactionRecord>),
    /// 2xx carrying `error_message`
    SoftError(String),
    /// Timeout, connection failure, non-2xx or undecodable body
    Transport(TransportError),
}

impl From<Result<SampleResponse, TransportError>> for FetchOutcome {
    fn from(result: Result<SampleResponse, TransportError>) -> Self {
        match result {
            Ok(response) => response.into_outcome(),
            Err(err) => FetchOutcome::Transport(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> SampleResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_error_message_is_soft_error() {
        let outcome = parse(r#"{"error_message": "chain not supported"}"#).into_outcome();
        assert_eq!(outcome, FetchOutcome::SoftError("chain not supported".into()));
    }

    #[test]
    fn test_error_message_wins_over_data() {
        let outcome = parse(r#"{"error_message": "nope", "data": [{"tx_hash": "0x1"}]}"#)
            .into_outcome();
        assert!(matches!(outcome, FetchOutcome::SoftError(_)));
    }

    #[test]
    fn test_missing_and_empty_data_are_empty_records() {
        assert_eq!(parse("{}").into_outcome(), FetchOutcome::Records(vec![]));
        assert_eq!(
            parse(r#"{"data": []}"#).into_outcome(),
            FetchOutcome::Records(vec![])
        );
    }

    #[test]
    fn test_records_keep_key_order_and_ignore_wrapper_fields() {
        let response = parse(
            r#"{"status": 1, "data": [{"tx_hash": "0xabc", "chain": "eth", "block": 7}]}"#,
        );
        let FetchOutcome::Records(records) = response.into_outcome() else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 1);
        let keys: Vec<&str> = records[0].fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["tx_hash", "chain", "block"]);
        assert_eq!(records[0].tx_hash(), Some("0xabc"));
        assert_eq!(records[0].log_count(), None);
    }

    #[test]
    fn test_non_string_tx_hash_is_absent() {
        let record: TransactionRecord = serde_json::from_str(r#"{"tx_hash": 12}"#).unwrap();
        assert_eq!(record.tx_hash(), None);
    }
}
