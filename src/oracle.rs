//! Oracle access.
//!
//! The oracle owns the decision tree and exposes two endpoints:
//!
//! - `GET start` returns the root node
//! - `GET question/{id}` returns the node reached through a branch id
//!
//! [`Oracle`] is the seam the traversal controller talks through;
//! [`HttpOracle`] is the reqwest implementation used by the binary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{GuessError, GuessResult};
use crate::node::{Node, NodeId};

/// Where the next node comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Root,
    Node(NodeId),
}

#[async_trait]
pub trait Oracle: Send + Sync {
    async fn root(&self) -> GuessResult<Node>;

    async fn node(&self, id: &NodeId) -> GuessResult<Node>;

    async fn fetch(&self, target: &Target) -> GuessResult<Node> {
        match target {
            Target::Root => self.root().await,
            Target::Node(id) => self.node(id).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Down-jitter factor (0.25 = up to 25% shorter).
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    /// Exponential backoff for the given retry step (0 before the first retry).
    pub fn delay(&self, step: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * 2.0_f64.powi(step as i32);
        let capped = base.min(self.max_delay.as_secs_f64());
        let jitter = 1.0 - rand::random::<f64>() * self.jitter_factor;
        Duration::from_secs_f64(capped * jitter)
    }
}

// ---------------------------------------------------------------------------
// HTTP oracle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: Client,
    base: Url,
    retry: RetryConfig,
}

impl HttpOracle {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryConfig) -> GuessResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpOracle {
            client,
            base: normalize_base(base_url)?,
            retry,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> GuessResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| GuessError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_node(&self, url: Url) -> GuessResult<Node> {
        let mut attempt = 0;
        loop {
            match self.get_once(&url).await {
                Ok(node) => return Ok(node),
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt);
                    tracing::warn!(%url, attempt, ?delay, error = %err, "Oracle request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_once(&self, url: &Url) -> GuessResult<Node> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GuessError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(GuessError::EmptyResponse {
                url: url.to_string(),
            });
        }
        Node::from_json(&body)
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn root(&self) -> GuessResult<Node> {
        let url = self.endpoint(&["start"])?;
        self.get_node(url).await
    }

    async fn node(&self, id: &NodeId) -> GuessResult<Node> {
        let url = self.endpoint(&["question", id.as_str()])?;
        self.get_node(url).await
    }
}

/// Parse the base URL and make sure relative endpoints land beneath it.
fn normalize_base(base_url: &str) -> GuessResult<Url> {
    let mut url =
        Url::parse(base_url.trim()).map_err(|e| GuessError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(GuessError::InvalidBaseUrl(base_url.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle(base: &str) -> HttpOracle {
        HttpOracle::new(base, Duration::from_secs(1), RetryConfig::default()).unwrap()
    }

    #[test]
    fn test_base_gets_trailing_slash() {
        assert_eq!(oracle("http://localhost:8000/api").base_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(oracle("http://localhost:8000").base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_question_endpoint_encodes_id() {
        let o = oracle("http://localhost:8000/api/");
        let url = o.endpoint(&["question", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/question/a%20b%2Fc");
    }

    #[test]
    fn test_start_endpoint() {
        let o = oracle("http://localhost:8000");
        assert_eq!(o.endpoint(&["start"]).unwrap().as_str(), "http://localhost:8000/start");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let err = HttpOracle::new("mailto:oracle@example.com", Duration::from_secs(1), RetryConfig::default())
            .unwrap_err();
        assert!(matches!(err, GuessError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_delay_is_capped_and_jittered() {
        let retry = RetryConfig::default();
        for step in 0..10 {
            let delay = retry.delay(step);
            assert!(delay <= retry.max_delay);
            assert!(delay >= retry.initial_delay.mul_f64(0.75).min(retry.max_delay.mul_f64(0.75)));
        }
    }
}
