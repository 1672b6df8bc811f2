use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, trace, warn};

use crate::config::PipelineConfig;

/// Redirect resolution seam used by the canonicalizer's TLD fallback.
#[allow(async_fn_in_trait)]
pub trait ResolveRedirect {
    /// Issues one probe request and returns the final URL after
    /// redirects, or `None` when the host could not be reached.
    async fn resolve_final_url(&self, url: &str) -> Option<String>;
}

/// Resolves redirects with a single HEAD request.
///
/// The client follows redirects on its own; the whole exchange is
/// bounded by the configured timeout and is never retried.
#[derive(Debug, Clone)]
pub struct HeadResolver {
    client: Client,
}

impl HeadResolver {
    /// Builds the resolver's HTTP client from the pipeline configuration
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.resolve_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client for redirect resolution")?;

        Ok(Self { client })
    }
}

impl ResolveRedirect for HeadResolver {
    async fn resolve_final_url(&self, url: &str) -> Option<String> {
        trace!("Resolving redirects for {}", url);
        match self.client.head(url).send().await {
            Ok(response) => {
                let final_url = response.url().to_string();
                debug!("Resolved {} to {}", url, final_url);
                Some(final_url)
            }
            Err(e) => {
                // Timeouts, DNS failures, refused connections, and TLS
                // errors all land here; the URI is simply dropped.
                warn!("Failed to resolve {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> PipelineConfig {
        PipelineConfig::new().with_resolve_timeout(Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_redirect_chain_is_followed_to_final_url() {
        let mut server = mockito::Server::new_async().await;
        let hop = server
            .mock("HEAD", "/")
            .with_status(301)
            .with_header("location", &format!("{}/final", server.url()))
            .create_async()
            .await;
        let landing = server
            .mock("HEAD", "/final")
            .with_status(200)
            .create_async()
            .await;

        let resolver = HeadResolver::new(&test_config()).unwrap();
        let resolved = resolver.resolve_final_url(&server.url()).await;

        assert_eq!(resolved, Some(format!("{}/final", server.url())));
        hop.assert_async().await;
        landing.assert_async().await;
    }

    #[tokio::test]
    async fn test_direct_response_returns_requested_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("HEAD", "/")
            .with_status(200)
            .create_async()
            .await;

        let resolver = HeadResolver::new(&test_config()).unwrap();
        let resolved = resolver.resolve_final_url(&server.url()).await;

        assert_eq!(resolved, Some(format!("{}/", server.url())));
    }

    #[tokio::test]
    async fn test_connection_error_yields_none() {
        // Bind then drop to find a loopback port that refuses connections.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let resolver = HeadResolver::new(&test_config()).unwrap();
        let url = format!("http://127.0.0.1:{}/", port);
        assert_eq!(resolver.resolve_final_url(&url).await, None);
    }
}
