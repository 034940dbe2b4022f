//! Shareable query string (`?chain=eth&address=0x..`) and the request built from it

use reqwest::Url;

use super::chain::Chain;

/// Base used to borrow `Url`'s query encoding; never contacted.
const QUERY_BASE: &str = "sampler://session/";

/// The (chain, address) pair that survives across submissions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    pub chain: Chain,
    pub address: String,
}

impl QueryParams {
    pub fn new(chain: Chain, address: impl Into<String>) -> Self {
        Self {
            chain,
            address: address.into(),
        }
    }

    /// Parse `chain=..&address=..` with or without a leading `?`.
    ///
    /// Each parameter falls back independently: an absent or unknown chain
    /// becomes Ethereum, an absent address becomes empty.
    pub fn parse(query: &str) -> Self {
        let trimmed = query.trim();
        let trimmed = trimmed
            .rsplit_once('?')
            .map(|(_, rest)| rest)
            .unwrap_or(trimmed);

        let Ok(url) = Url::parse(&format!("{QUERY_BASE}?{trimmed}")) else {
            return Self::default();
        };

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "chain" => params.chain = Chain::from_wire(&value).unwrap_or_default(),
                "address" => params.address = value.into_owned(),
                _ => {}
            }
        }
        params
    }

    /// Encoded form including the leading `?`
    pub fn to_query_string(&self) -> String {
        let Ok(mut url) = Url::parse(QUERY_BASE) else {
            return String::new();
        };
        url.query_pairs_mut()
            .append_pair("chain", self.chain.wire_value())
            .append_pair("address", &self.address);
        url.query().map(|q| format!("?{q}")).unwrap_or_default()
    }

    /// Same query with a chain the form can actually submit
    pub fn into_selectable(mut self) -> Self {
        if !self.chain.is_selectable() {
            self.chain = Chain::default();
        }
        self
    }
}

/// One validated call to the backend's `/sample` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRequest {
    pub chain: Chain,
    pub address: String,
}

impl From<&QueryParams> for SampleRequest {
    fn from(params: &QueryParams) -> Self {
        Self {
            chain: params.chain,
            address: params.address.clone(),
        }
    }
}
