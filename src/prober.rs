use crate::http_client::{HttpClientOptions, build_http_client};
use futures::future::join;
use reqwest::Client;

/// Redirects a probe may follow before the resource counts as missing
pub const PROBE_MAX_REDIRECTS: usize = 2;

/// Checks whether auxiliary resources such as robots.txt exist.
pub struct ResourceProber {
    client: Client,
}

impl ResourceProber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_options(options: &HttpClientOptions) -> reqwest::Result<Self> {
        let options = HttpClientOptions {
            max_redirects: PROBE_MAX_REDIRECTS,
            ..options.clone()
        };
        Ok(Self::new(build_http_client(&options)?))
    }

    /// True when the final status is 2xx or 3xx. Never fails.
    pub async fn probe(&self, url: &str) -> bool {
        // Use GET rather than HEAD, many servers answer HEAD incorrectly
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                let found = status.is_success() || status.is_redirection();
                if !found {
                    tracing::info!(url = %url, status = %status, "Resource not found");
                }
                found
            }
            Err(e) => {
                tracing::info!(url = %url, error = %e, "Resource probe failed");
                false
            }
        }
    }

    /// Probes `<origin>/robots.txt` and `<origin>/sitemap.xml` concurrently.
    pub async fn probe_site(&self, origin: &str) -> (bool, bool) {
        let robots_url = format!("{}/robots.txt", origin);
        let sitemap_url = format!("{}/sitemap.xml", origin);
        join(self.probe(&robots_url), self.probe(&sitemap_url)).await
    }
}
