use crate::error::AnalysisError;
use crate::fetcher::HtmlFetcher;
use crate::html_analyzer::HtmlAnalyzer;
use crate::http_client::HttpClientOptions;
use crate::models::{AnalysisContext, RemoteCrawl, SeoReport};
use crate::prober::ResourceProber;
use crate::remote_crawl::{RemoteCrawlClient, RemoteCrawlSettings};
use crate::reporter::Reporter;
use crate::rules;
use url::Url;

/// Everything needed to build the analyzer's HTTP clients
#[derive(Debug, Clone, Default)]
pub struct AnalyzerSettings {
    pub http: HttpClientOptions,
    /// `None` disables the remote crawl entirely
    pub remote: Option<RemoteCrawlSettings>,
}

pub struct SeoAnalyzer {
    fetcher: HtmlFetcher,
    prober: ResourceProber,
    remote: Option<RemoteCrawlClient>,
}

impl SeoAnalyzer {
    pub fn new(settings: AnalyzerSettings) -> Result<Self, AnalysisError> {
        Ok(Self {
            fetcher: HtmlFetcher::from_options(&settings.http)?,
            prober: ResourceProber::from_options(&settings.http)?,
            remote: settings.remote.map(RemoteCrawlClient::new).transpose()?,
        })
    }

    /// Runs the full pipeline for one URL. Only input validation errors are
    /// returned; network failures become report content.
    pub async fn analyze(&self, input: &str) -> Result<SeoReport, AnalysisError> {
        let url = normalize_url(input)?;
        let ctx = self.build_context(&url).await;
        let evaluation = rules::evaluate(&ctx);

        tracing::info!(
            url = %ctx.url,
            checks = evaluation.checks.len(),
            issues = evaluation.issues.len(),
            "Analysis complete"
        );

        Ok(Reporter::assemble(&ctx, evaluation))
    }

    /// Gathers all network inputs concurrently and freezes them into a context.
    pub async fn build_context(&self, url: &Url) -> AnalysisContext {
        let origin = url.origin().ascii_serialization();
        let target = url.as_str();

        let (remote, html, (robots_txt_found, sitemap_found)) = tokio::join!(
            self.remote_crawl(target),
            self.fetcher.fetch_html(target),
            self.prober.probe_site(&origin),
        );

        let (html, html_error) = match html {
            Ok(body) => (Some(HtmlAnalyzer::analyze(&body, &origin)), None),
            Err(e) => {
                tracing::warn!(url = %target, error = %e, "Failed to fetch HTML");
                (None, Some(format!("Unable to fetch HTML: {}", e)))
            }
        };

        AnalysisContext {
            url: target.to_string(),
            https: url.scheme() == "https",
            origin,
            html,
            html_error,
            robots_txt_found,
            sitemap_found,
            remote,
        }
    }

    async fn remote_crawl(&self, url: &str) -> RemoteCrawl {
        let Some(client) = &self.remote else {
            return RemoteCrawl::Unavailable("Remote crawl disabled".to_string());
        };

        match client.crawl(url).await {
            Ok(summary) => RemoteCrawl::Available(summary),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Remote crawl unavailable, continuing without it");
                RemoteCrawl::Unavailable(e.to_string())
            }
        }
    }
}

/// Trims the input and prepends `https://` to bare hosts.
pub fn normalize_url(input: &str) -> Result<Url, AnalysisError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyUrl);
    }

    let candidate = match explicit_scheme(trimmed) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
        {
            trimmed.to_string()
        }
        Some(scheme) => return Err(AnalysisError::UnsupportedScheme(scheme.to_string())),
        None => format!("https://{}", trimmed),
    };

    let url = Url::parse(&candidate).map_err(|e| AnalysisError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none_or(|host| host.is_empty()) {
        return Err(AnalysisError::InvalidUrl {
            url: trimmed.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

/// Returns the leading `scheme` of `scheme://...`, if the prefix is a valid
/// scheme token. A `://` later in a path or query does not count.
fn explicit_scheme(input: &str) -> Option<&str> {
    let (scheme, _) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}
