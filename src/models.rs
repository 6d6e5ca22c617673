use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The six independently scored health categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Technical,
    ContentTags,
    Performance,
    Mobile,
    Navigability,
    Social,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Technical,
        Category::ContentTags,
        Category::Performance,
        Category::Mobile,
        Category::Navigability,
        Category::Social,
    ];

    /// Contribution of this category to the overall score. Weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            Category::Technical => 0.25,
            Category::ContentTags => 0.15,
            Category::Performance => 0.2,
            Category::Mobile => 0.15,
            Category::Navigability => 0.15,
            Category::Social => 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// A scored failure. Issues are static templates copied into each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: &'static str,
    pub title: &'static str,
    pub why: &'static str,
    pub how_to_fix: &'static str,
    pub impact: Impact,
    pub categories: &'static [Category],
    pub penalty: u32,
}

/// Audit record of one evaluated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDetail {
    pub category: String,
    pub item: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMap {
    pub technical: u8,
    pub content_tags: u8,
    pub performance: u8,
    pub mobile: u8,
    pub navigability: u8,
    pub social: u8,
    pub overall: u8,
}

impl ScoreMap {
    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Technical => self.technical,
            Category::ContentTags => self.content_tags,
            Category::Performance => self.performance,
            Category::Mobile => self.mobile,
            Category::Navigability => self.navigability,
            Category::Social => self.social,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFix {
    pub title: String,
    pub why: String,
    pub how_to_fix: String,
    pub impact: Impact,
}

impl From<&Issue> for TopFix {
    fn from(issue: &Issue) -> Self {
        TopFix {
            title: issue.title.to_string(),
            why: issue.why.to_string(),
            how_to_fix: issue.how_to_fix.to_string(),
            impact: issue.impact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoReport {
    pub url: String,
    pub analyzed_at: String,
    pub status: ReportStatus,
    pub scores: ScoreMap,
    pub summary: serde_json::Map<String, serde_json::Value>,
    pub top_fixes: Vec<TopFix>,
    pub checks: Vec<CheckDetail>,
}

/// Flat structural facts extracted from a page's HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlStructuralFacts {
    pub title: Option<String>,
    pub has_title: bool,
    pub meta_description: Option<String>,
    pub has_meta_description: bool,
    pub canonical: Option<String>,
    pub has_canonical: bool,
    pub meta_robots: Option<String>,
    pub has_noindex: bool,
    pub has_viewport: bool,
    pub h1_count: usize,
    pub og_tags: usize,
    pub twitter_tags: usize,
    pub hreflang_count: usize,
    pub image_count: usize,
    pub images_missing_alt: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub social_links: Vec<String>,
    pub script_count: usize,
    pub stylesheet_count: usize,
    pub heading_structure: BTreeMap<String, usize>,
    pub html_bytes: usize,
}

/// Vendor-neutral summary of a remote on-page crawl.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnPageSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub meta: PageMeta,
    pub page_metrics: PageMetrics,
    pub links: LinkMetrics,
    pub mobile: MobileSignals,
    pub social: SocialSignals,
    pub headings: BTreeMap<String, u32>,
    pub schema_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MobileSignals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly: Option<bool>,
    pub viewport: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSignals {
    pub open_graph: bool,
    pub twitter: bool,
    pub social_links: Vec<String>,
}

/// Outcome of the optional remote crawl.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCrawl {
    Available(OnPageSummary),
    Unavailable(String),
}

impl RemoteCrawl {
    pub fn summary(&self) -> Option<&OnPageSummary> {
        match self {
            RemoteCrawl::Available(summary) => Some(summary),
            RemoteCrawl::Unavailable(_) => None,
        }
    }
}

/// Everything the rule catalogue can look at during one run.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub url: String,
    pub origin: String,
    pub html: Option<HtmlStructuralFacts>,
    /// Why `html` is absent, when it is.
    pub html_error: Option<String>,
    pub robots_txt_found: bool,
    pub sitemap_found: bool,
    pub https: bool,
    pub remote: RemoteCrawl,
}

impl AnalysisContext {
    pub fn crawl_depth(&self) -> Option<u32> {
        self.remote.summary().and_then(|s| s.links.depth)
    }

    pub fn mobile_friendly(&self) -> Option<bool> {
        self.remote.summary().and_then(|s| s.mobile.friendly)
    }

    pub fn page_load_time(&self) -> Option<f64> {
        self.remote.summary().and_then(|s| s.page_metrics.load_time)
    }

    pub fn resource_count(&self) -> Option<u32> {
        self.remote.summary().and_then(|s| s.page_metrics.resources)
    }
}
