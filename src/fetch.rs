//! Best-effort retrieval of CSV sources over HTTP.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Request, Response};
use tracing::warn;

/// Transport seam between the pipeline and the network, so tests can run
/// the pipeline against a substitute client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Plain [`reqwest::Client`] transport used by the server binary.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

/// Transport-level GET; a non-success status is an error.
async fn get_text<C: HttpClient>(client: &C, url: &str) -> Result<String> {
    let req = Request::new(reqwest::Method::GET, url.parse()?);
    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.text().await?)
}

/// Fetches one source location, best effort.
///
/// Returns `None` (never an error) when the location is blank, the transfer
/// fails, the server answers with a non-success status, or the body is
/// empty. Each case is logged as a warning and contributes zero records to
/// the evaluation.
#[tracing::instrument(skip(client), fields(source = %url))]
pub async fn fetch_text<C: HttpClient>(client: &C, url: &str) -> Option<String> {
    if url.trim().is_empty() {
        warn!("no source location given, skipping");
        return None;
    }

    match get_text(client, url).await {
        Ok(body) if body.trim().is_empty() => {
            warn!("downloaded content is empty");
            None
        }
        Ok(body) => Some(body),
        Err(error) => {
            warn!(%error, "download failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fails the test if the pipeline touches the network at all.
    struct NoCallClient;

    #[async_trait]
    impl HttpClient for NoCallClient {
        async fn execute(&self, _req: Request) -> reqwest::Result<Response> {
            unreachable!("transport must not be used");
        }
    }

    #[tokio::test]
    async fn blank_location_yields_no_content_without_a_request() {
        assert_eq!(fetch_text(&NoCallClient, "").await, None);
        assert_eq!(fetch_text(&NoCallClient, "   ").await, None);
    }

    #[tokio::test]
    async fn unparsable_location_yields_no_content() {
        assert_eq!(fetch_text(&NoCallClient, "not a url").await, None);
    }
}
