use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;

/// Identifies the analyzer to the sites it fetches
pub const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (SEO analyzer)"
);
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Settings for one outbound HTTP concern (page fetch, probes, vendor API)
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Value of the Accept header, if any
    pub accept: Option<&'static str>,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            max_redirects: 5,
            user_agent: USER_AGENT.to_string(),
            accept: None,
        }
    }
}

/// Creates a reqwest client from the given options
pub fn build_http_client(options: &HttpClientOptions) -> reqwest::Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    if let Some(accept) = options.accept {
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(accept));
    }

    ClientBuilder::new()
        .user_agent(options.user_agent.as_str())
        .default_headers(headers)
        .timeout(options.timeout)
        .redirect(reqwest::redirect::Policy::limited(options.max_redirects))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}
