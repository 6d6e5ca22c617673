use crate::models::HtmlStructuralFacts;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Networks whose profile links count as social links
pub const SOCIAL_NETWORKS: [&str; 6] = [
    "facebook",
    "twitter",
    "linkedin",
    "instagram",
    "youtube",
    "tiktok",
];

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("selector {css:?} should be valid: {e}"))
}

// Cached selectors to avoid repeated parsing
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("head > title"));
static META_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static CANONICAL_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"link[rel="canonical"]"#));
static META_ROBOTS_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="robots"]"#));
static VIEWPORT_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="viewport"]"#));
static OG_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property^="og:"]"#));
static TWITTER_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name^="twitter:"]"#));
static HREFLANG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| selector(r#"link[rel="alternate"][hreflang]"#));
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("img"));
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| selector(r#"script[src], script[type="module"]"#));
static STYLESHEET_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(r#"link[rel="stylesheet"]"#));
static HEADING_SELECTORS: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| {
    HEADING_TAGS
        .iter()
        .map(|tag| (*tag, selector(tag)))
        .collect()
});

/// Link counts for one document
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub internal: usize,
    pub external: usize,
    pub social: Vec<String>,
}

/// Where a single href points relative to the page's origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    Internal(String),
    External(String),
    /// Fragments, `mailto:` and `tel:` links, and empty hrefs
    Ignored,
}

pub struct HtmlAnalyzer;

impl HtmlAnalyzer {
    /// Extracts structural facts from an HTML document. Broken markup never
    /// fails; missing elements simply yield empty values and zero counts.
    pub fn analyze(html: &str, origin: &str) -> HtmlStructuralFacts {
        let document = Html::parse_document(html);

        let title = first_text(&document, &TITLE_SELECTOR);
        let meta_description = first_attr(&document, &META_DESC_SELECTOR, "content");
        let canonical = first_attr(&document, &CANONICAL_SELECTOR, "href");
        let meta_robots = document
            .select(&META_ROBOTS_SELECTOR)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.to_lowercase());
        let has_noindex = meta_robots
            .as_deref()
            .is_some_and(|robots| robots.contains("noindex"));

        let image_count = document.select(&IMG_SELECTOR).count();
        let images_missing_alt = document
            .select(&IMG_SELECTOR)
            .filter(|img| {
                img.value()
                    .attr("alt")
                    .is_none_or(|alt| alt.trim().is_empty())
            })
            .count();

        let links = Self::extract_links(&document, origin);

        let heading_structure: BTreeMap<String, usize> = HEADING_SELECTORS
            .iter()
            .map(|(tag, sel)| (tag.to_string(), document.select(sel).count()))
            .collect();
        let h1_count = heading_structure.get("h1").copied().unwrap_or(0);

        HtmlStructuralFacts {
            has_title: title.is_some(),
            title,
            has_meta_description: meta_description.is_some(),
            meta_description,
            has_canonical: canonical.is_some(),
            canonical,
            meta_robots,
            has_noindex,
            has_viewport: document.select(&VIEWPORT_SELECTOR).next().is_some(),
            h1_count,
            og_tags: document.select(&OG_SELECTOR).count(),
            twitter_tags: document.select(&TWITTER_SELECTOR).count(),
            hreflang_count: document.select(&HREFLANG_SELECTOR).count(),
            image_count,
            images_missing_alt,
            internal_links: links.internal,
            external_links: links.external,
            social_links: links.social,
            script_count: document.select(&SCRIPT_SELECTOR).count(),
            stylesheet_count: document.select(&STYLESHEET_SELECTOR).count(),
            heading_structure,
            html_bytes: html.len(),
        }
    }

    fn extract_links(document: &Html, origin: &str) -> LinkStats {
        let mut stats = LinkStats::default();

        for anchor in document.select(&ANCHOR_SELECTOR) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            let absolute = match Self::classify_link(href, origin) {
                LinkKind::Internal(absolute) => {
                    stats.internal += 1;
                    absolute
                }
                LinkKind::External(absolute) => {
                    stats.external += 1;
                    absolute
                }
                LinkKind::Ignored => continue,
            };

            if is_social_link(&absolute) {
                stats.social.push(absolute);
            }
        }

        stats
    }

    /// Resolves `href` against `origin` and classifies it. A link is internal
    /// iff its absolute form starts with the origin.
    pub fn classify_link(href: &str, origin: &str) -> LinkKind {
        let href = href.trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
        {
            return LinkKind::Ignored;
        }

        let absolute = Url::parse(origin)
            .and_then(|base| base.join(href))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string());

        if absolute.starts_with(origin) {
            LinkKind::Internal(absolute)
        } else {
            LinkKind::External(absolute)
        }
    }
}

pub fn is_social_link(url: &str) -> bool {
    let lower = url.to_lowercase();
    SOCIAL_NETWORKS.iter().any(|network| lower.contains(network))
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el: ElementRef| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

fn first_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
