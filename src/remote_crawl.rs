//! Client for the DataForSEO On-Page API.
//!
//! One crawl is a small state machine: create a task, poll it until the
//! vendor reports completion, then fetch and map its summary.

use crate::error::RemoteCrawlError;
use crate::html_analyzer::is_social_link;
use crate::http_client::{HttpClientOptions, build_http_client};
use crate::models::{
    LinkMetrics, MobileSignals, OnPageSummary, PageMeta, PageMetrics, SocialSignals,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com/v3";

/// Vendor status code for an accepted task
const TASK_CREATED: u32 = 20100;
/// Vendor status code for a finished task
const TASK_COMPLETED: u32 = 20000;
/// Vendor status codes at or above this are errors
const TASK_ERROR_FLOOR: u32 = 40000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RemoteCrawlSettings {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub max_crawl_pages: u32,
    pub enable_javascript: bool,
    pub user_agent: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for RemoteCrawlSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            max_crawl_pages: 1,
            enable_javascript: true,
            user_agent: crate::http_client::USER_AGENT.to_string(),
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(120),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct TaskPost<'a> {
    target: &'a str,
    max_crawl_pages: u32,
    enable_javascript: bool,
    custom_user_agent: &'a str,
    load_resources: bool,
    enable_content_analysis: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default = "Vec::new")]
    tasks: Vec<ApiTask<T>>,
}

#[derive(Debug, Deserialize)]
struct ApiTask<T> {
    id: Option<String>,
    #[serde(default)]
    status_code: u32,
    status_message: Option<String>,
    result: Option<Vec<T>>,
}

/// Result of a completed task as reported by `task_get`
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    pub task_id: String,
    pub status_code: u32,
    pub items_count: usize,
}

// Vendor summary shape. Only `map_summary` reads these.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataForSeoSummary {
    pub status_code: Option<u16>,
    pub page_metrics: Option<DataForSeoPageMetrics>,
    pub page_snapshot: Option<DataForSeoPageSnapshot>,
    pub links: Option<DataForSeoLinks>,
    pub structured_data: Option<Vec<DataForSeoStructuredData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataForSeoPageMetrics {
    pub content_size: Option<u64>,
    pub page_timing: Option<DataForSeoPageTiming>,
    pub resource_fetches: Option<u32>,
    pub html_size: Option<u64>,
    pub depth: Option<u32>,
    pub is_mobile_friendly: Option<bool>,
    pub headings: Option<BTreeMap<String, u32>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataForSeoPageTiming {
    pub time_to_interactive: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataForSeoPageSnapshot {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_robots: Option<String>,
    pub canonical: Option<String>,
    pub meta_viewport: Option<String>,
    pub og_tags_count: Option<u32>,
    pub twitter_tags_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataForSeoLinks {
    pub internal_links: Option<Vec<DataForSeoLink>>,
    pub internal_links_count: Option<u32>,
    pub external_links_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataForSeoLink {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataForSeoStructuredData {
    pub schema_type: Option<String>,
}

pub struct RemoteCrawlClient {
    client: Client,
    settings: RemoteCrawlSettings,
}

impl RemoteCrawlClient {
    pub fn new(settings: RemoteCrawlSettings) -> reqwest::Result<Self> {
        let client = build_http_client(&HttpClientOptions {
            timeout: settings.request_timeout,
            accept: Some("application/json"),
            ..HttpClientOptions::default()
        })?;
        Ok(Self { client, settings })
    }

    /// Runs a full crawl: create, poll, summarize.
    pub async fn crawl(&self, url: &str) -> Result<OnPageSummary, RemoteCrawlError> {
        let task_id = self.create_task(url).await?;
        tracing::info!(task_id = %task_id, url = %url, "On-Page task created");
        self.poll_task(&task_id).await?;
        self.fetch_summary(&task_id).await
    }

    fn credentials(&self) -> Result<&Credentials, RemoteCrawlError> {
        self.settings
            .credentials
            .as_ref()
            .ok_or(RemoteCrawlError::CredentialsMissing)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, RemoteCrawlError> {
        let credentials = self.credentials()?;
        let response = self
            .client
            .get(self.endpoint(path))
            .basic_auth(&credentials.login, Some(&credentials.password))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn create_task(&self, url: &str) -> Result<String, RemoteCrawlError> {
        let credentials = self.credentials()?;
        let payload = [TaskPost {
            target: url,
            max_crawl_pages: self.settings.max_crawl_pages.clamp(1, 5),
            enable_javascript: self.settings.enable_javascript,
            custom_user_agent: &self.settings.user_agent,
            load_resources: true,
            enable_content_analysis: true,
        }];

        let response = self
            .client
            .post(self.endpoint("/on_page/task_post"))
            .basic_auth(&credentials.login, Some(&credentials.password))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteCrawlError::TaskCreationFailed(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let data: ApiResponse<serde_json::Value> = response.json().await?;
        let task = data.tasks.into_iter().next().ok_or_else(|| {
            RemoteCrawlError::TaskCreationFailed(
                "Unexpected response from task creation".to_string(),
            )
        })?;

        match task.id {
            Some(id) if task.status_code == TASK_CREATED && !id.is_empty() => Ok(id),
            _ => Err(RemoteCrawlError::TaskCreationFailed(
                task.status_message
                    .unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }

    /// Waits for the task to finish. Checks the time budget before every poll
    /// and gives up on the first vendor error status.
    pub async fn poll_task(&self, task_id: &str) -> Result<TaskResult, RemoteCrawlError> {
        let start = Instant::now();
        let path = format!("/on_page/task_get/{}", task_id);

        loop {
            if start.elapsed() > self.settings.poll_timeout {
                return Err(RemoteCrawlError::PollTimeout(self.settings.poll_timeout));
            }

            let data: ApiResponse<serde_json::Value> = self.get(&path).await?;

            if let Some(task) = data.tasks.into_iter().next() {
                if task.status_code == TASK_COMPLETED {
                    return Ok(TaskResult {
                        task_id: task_id.to_string(),
                        status_code: task.status_code,
                        items_count: task.result.map_or(0, |r| r.len()),
                    });
                }

                if task.status_code >= TASK_ERROR_FLOOR {
                    return Err(RemoteCrawlError::TaskFailed(
                        task.status_message
                            .unwrap_or_else(|| format!("status {}", task.status_code)),
                    ));
                }

                tracing::debug!(task_id = %task_id, status = task.status_code, "On-Page task pending");
            }

            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    pub async fn fetch_summary(&self, task_id: &str) -> Result<OnPageSummary, RemoteCrawlError> {
        let path = format!("/on_page/summary/{}", task_id);
        let data: ApiResponse<DataForSeoSummary> = self.get(&path).await?;

        let raw = data
            .tasks
            .into_iter()
            .next()
            .and_then(|task| task.result)
            .and_then(|result| result.into_iter().next());

        Ok(raw.map(map_summary).unwrap_or_default())
    }
}

/// Maps the vendor summary into the neutral shape. Vendor schema changes
/// should only ever touch this function and the `DataForSeo*` types.
pub fn map_summary(raw: DataForSeoSummary) -> OnPageSummary {
    let metrics = raw.page_metrics.unwrap_or_default();
    let snapshot = raw.page_snapshot.unwrap_or_default();
    let links = raw.links.unwrap_or_default();

    let social_links = links
        .internal_links
        .unwrap_or_default()
        .into_iter()
        .filter_map(|link| link.url)
        .filter(|url| is_social_link(url))
        .collect();

    let schema_types = raw
        .structured_data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| item.schema_type)
        .filter(|schema_type| !schema_type.is_empty())
        .collect();

    OnPageSummary {
        status_code: raw.status_code,
        meta: PageMeta {
            title: snapshot.title,
            description: snapshot.meta_description,
            robots: snapshot.meta_robots,
            canonical: snapshot.canonical,
        },
        page_metrics: PageMetrics {
            size: metrics.content_size,
            load_time: metrics.page_timing.and_then(|t| t.time_to_interactive),
            resources: metrics.resource_fetches,
            html_bytes: metrics.html_size,
        },
        links: LinkMetrics {
            internal: links.internal_links_count,
            external: links.external_links_count,
            depth: metrics.depth,
        },
        mobile: MobileSignals {
            friendly: metrics.is_mobile_friendly,
            viewport: snapshot.meta_viewport.is_some_and(|v| !v.is_empty()),
        },
        social: SocialSignals {
            open_graph: snapshot.og_tags_count.is_some_and(|n| n > 0),
            twitter: snapshot.twitter_tags_count.is_some_and(|n| n > 0),
            social_links,
        },
        headings: metrics.headings.unwrap_or_default(),
        schema_types,
    }
}
