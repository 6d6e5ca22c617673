use crate::error::FetchError;
use crate::http_client::{HttpClientOptions, build_http_client};
use reqwest::Client;

pub const HTML_ACCEPT: &str = "text/html,application/xhtml+xml";

/// Downloads the landing page HTML
pub struct HtmlFetcher {
    client: Client,
}

impl HtmlFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_options(options: &HttpClientOptions) -> reqwest::Result<Self> {
        let options = HttpClientOptions {
            accept: Some(HTML_ACCEPT),
            ..options.clone()
        };
        Ok(Self::new(build_http_client(&options)?))
    }

    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Some(ct) = content_type
            && !is_textual(&ct)
        {
            return Err(FetchError::NonText(ct));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::Empty);
        }

        tracing::debug!(url = %url, bytes = body.len(), "Fetched HTML");
        Ok(body)
    }
}

fn is_textual(content_type: &str) -> bool {
    let ct = content_type.to_lowercase();
    ct.starts_with("text/") || ct.contains("html") || ct.contains("xml")
}
