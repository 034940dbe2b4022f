//! HTTP access to `GET {backend_url}/sample`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::domain::{SampleRequest, SampleResponse};
use crate::error::TransportError;

/// Longest error body kept in a status error
const MAX_ERROR_BODY: usize = 200;

/// Anything that can answer a sample request
#[async_trait]
pub trait SampleClient: Send + Sync {
    async fn fetch_sample(&self, request: &SampleRequest) -> Result<SampleResponse, TransportError>;
}

pub struct HttpSampleClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSampleClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/sample?chain=..&address=..`
    pub fn sample_url(&self, request: &SampleRequest) -> Result<Url, TransportError> {
        let raw = format!("{}/sample", self.base_url);
        let mut url = Url::parse(&raw).map_err(|err| TransportError::InvalidUrl {
            url: raw.clone(),
            reason: err.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("chain", request.chain.wire_value())
            .append_pair("address", &request.address);
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connect(error_chain(&err))
        } else if err.is_decode() {
            TransportError::Decode(error_chain(&err))
        } else {
            TransportError::Request(error_chain(&err))
        }
    }
}

#[async_trait]
impl SampleClient for HttpSampleClient {
    async fn fetch_sample(&self, request: &SampleRequest) -> Result<SampleResponse, TransportError> {
        let url = self.sample_url(request)?;
        debug!(%url, "requesting samples");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate(body.trim(), MAX_ERROR_BODY),
            });
        }

        response
            .json::<SampleResponse>()
            .await
            .map_err(|err| self.classify(err))
    }
}

/// `err` plus its sources, joined with `: `
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chain;

    fn request() -> SampleRequest {
        SampleRequest {
            chain: Chain::Ethereum,
            address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".into(),
        }
    }

    #[test]
    fn test_sample_url() {
        let client =
            HttpSampleClient::new("http://127.0.0.1:8080/", Duration::from_secs(60)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
        let url = client.sample_url(&request()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/sample?chain=eth&address=0xdAC17F958D2ee523a2206206994597C13D831ec7"
        );
    }

    #[test]
    fn test_sample_url_keeps_base_path() {
        let client = HttpSampleClient::new("https://api.example.com/v1", Duration::from_secs(5))
            .unwrap();
        let url = client.sample_url(&request()).unwrap();
        assert_eq!(url.path(), "/v1/sample");
    }

    #[test]
    fn test_invalid_base_url() {
        let client = HttpSampleClient::new("not a url", Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.sample_url(&request()),
            Err(TransportError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
