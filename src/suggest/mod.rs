mod response;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use response::{decode_body, parse_suggestions};

pub const DEFAULT_ENDPOINT: &str = "http://suggestqueries.google.com/complete/search";
const OUTPUT_FORMAT: &str = "firefox";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Autocomplete payloads are a few KB; anything far beyond that is not a suggestion list.
const MAX_BODY_BYTES: usize = 1_000_000;

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Suggestion service returned status {0}")]
    Status(u16),

    #[error("Malformed suggestion payload: {0}")]
    Malformed(String),

    #[error("Suggestion payload too large (>{} bytes)", MAX_BODY_BYTES)]
    TooLarge,

    #[error("Invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Source of autocomplete suggestions for a single query.
/// Implemented by `SuggestClient` for production; mock implementations used in tests.
pub trait SuggestSource {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, SuggestError>;
}

/// HTTP client for the autocomplete endpoint.
///
/// Certificate verification is disabled on this client only; the upstream
/// endpoint's trust chain is not something callers can rely on.
#[derive(Clone, Debug)]
pub struct SuggestClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl SuggestClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SuggestError> {
        let endpoint = Url::parse(endpoint)?;
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .user_agent(crate::USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            timeout,
        })
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("output", OUTPUT_FORMAT)
            .append_pair("q", query);
        url
    }

    async fn download(&self, query: &str) -> Result<String, SuggestError> {
        let response = self
            .http
            .get(self.request_url(query))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Status(status.as_u16()));
        }

        if let Some(len) = response.content_length()
            && len as usize > MAX_BODY_BYTES
        {
            return Err(SuggestError::TooLarge);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();
        let mut stream = response;
        while let Some(chunk) = stream.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() > MAX_BODY_BYTES {
                return Err(SuggestError::TooLarge);
            }
        }

        Ok(decode_body(&body, content_type.as_deref()))
    }
}

impl SuggestSource for SuggestClient {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, SuggestError> {
        let body = self.download(query).await?;
        let suggestions = parse_suggestions(&body)?;
        debug!(query, count = suggestions.len(), "suggestions fetched");
        Ok(suggestions)
    }
}
