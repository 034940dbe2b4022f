//! Per-session state shared by the screen modules
//!
//! One `Session` is created at startup and lives until exit. The in-flight
//! marker is set when a request is dispatched and cleared when its result
//! arrives, whatever the result is.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::domain::{QueryParams, SampleRequest, TransactionRecord};

/// Last successful payload, kept for export
#[derive(Debug, Clone)]
pub struct LastResult {
    pub query: QueryParams,
    pub records: Vec<TransactionRecord>,
    pub received_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct Session {
    /// Shareable query; written only after a submission validates
    pub query: QueryParams,

    /// `alias -> name` table from config
    pub chain_aliases: BTreeMap<String, String>,

    /// Last text copied to the clipboard
    pub clipboard: Option<String>,

    pub last_result: Option<LastResult>,

    in_flight: Option<u64>,
    next_request_id: u64,
}

impl Session {
    pub fn new(query: QueryParams, chain_aliases: BTreeMap<String, String>) -> Self {
        Self {
            query,
            chain_aliases,
            ..Self::default()
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record `query` and mark a request outstanding.
    ///
    /// Returns `None` when another request is still in flight.
    pub fn begin_request(&mut self, query: QueryParams) -> Option<(u64, SampleRequest)> {
        if self.in_flight.is_some() {
            return None;
        }
        self.next_request_id += 1;
        let id = self.next_request_id;
        self.in_flight = Some(id);
        self.last_result = None;
        let request = SampleRequest::from(&query);
        self.query = query;
        Some((id, request))
    }

    /// Clear the in-flight marker if `id` is the outstanding request.
    pub fn finish_request(&mut self, id: u64) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Clear the in-flight marker regardless of which request holds it.
    pub fn abort_request(&mut self) -> Option<u64> {
        self.in_flight.take()
    }

    pub fn set_clipboard(&mut self, content: String) {
        self.clipboard = Some(content);
    }

    pub fn share_query(&self) -> String {
        self.query.to_query_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chain;

    fn query() -> QueryParams {
        QueryParams::new(Chain::Ethereum, format!("0x{}", "1".repeat(40)))
    }

    #[test]
    fn test_single_request_in_flight() {
        let mut session = Session::default();
        let (id, request) = session.begin_request(query()).unwrap();
        assert!(session.is_in_flight());
        assert_eq!(request.address, query().address);
        assert_eq!(session.query, query());

        assert!(session.begin_request(query()).is_none());

        assert!(session.finish_request(id));
        assert!(!session.is_in_flight());
        assert!(session.begin_request(query()).is_some());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut session = Session::default();
        let (id, _) = session.begin_request(query()).unwrap();
        assert!(!session.finish_request(id + 1));
        assert!(session.is_in_flight());
        assert_eq!(session.abort_request(), Some(id));
        assert!(!session.is_in_flight());
    }
}
