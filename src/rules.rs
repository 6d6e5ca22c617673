//! The check catalogue.
//!
//! Every check is a [`Rule`] descriptor. [`evaluate`] walks the catalogue in
//! order and turns each rule's [`Outcome`] into one [`CheckDetail`] and, for
//! scored failures, one [`Issue`]. Adding a check means appending a rule.

use crate::models::{
    AnalysisContext, Category, CheckDetail, HtmlStructuralFacts, Impact, Issue, OnPageSummary,
};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Largest HTML payload that passes the size check
pub const MAX_HTML_BYTES: usize = 200 * 1024;
pub const MIN_INTERNAL_LINKS: usize = 5;
pub const MAX_RESOURCES: u32 = 150;
pub const MAX_CRAWL_DEPTH: u32 = 3;

/// What a rule inspects. HTML rules are skipped when the page could not be
/// fetched; remote rules return `None` when their field is absent.
#[derive(Clone, Copy)]
pub enum Probe {
    Html(fn(&HtmlStructuralFacts) -> Outcome),
    Site(fn(&AnalysisContext) -> Outcome),
    Remote(fn(&OnPageSummary) -> Option<Outcome>),
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub category: &'static str,
    pub item: &'static str,
    pub probe: Probe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub passed: bool,
    pub details: Option<String>,
    pub issue: Option<&'static Issue>,
}

impl Outcome {
    fn pass(details: Option<String>) -> Self {
        Self {
            passed: true,
            details,
            issue: None,
        }
    }

    fn fail(details: Option<String>, issue: &'static Issue) -> Self {
        Self {
            passed: false,
            details,
            issue: Some(issue),
        }
    }

    /// A failure that is recorded in the checklist but not scored.
    fn fail_unscored(details: Option<String>) -> Self {
        Self {
            passed: false,
            details,
            issue: None,
        }
    }

    fn check(passed: bool, details: Option<String>, issue: &'static Issue) -> Self {
        if passed {
            Self::pass(details)
        } else {
            Self::fail(details, issue)
        }
    }
}

/// Checklist plus the scored failures of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub checks: Vec<CheckDetail>,
    pub issues: Vec<Issue>,
}

pub mod issues {
    use super::{Category, Impact, Issue};

    pub const HTML_FETCH_FAILURE: Issue = Issue {
        id: "html-fetch-failure",
        title: "Failed to fetch landing page HTML",
        why: "The analyzer could not download the HTML of the target page.",
        how_to_fix: "Ensure the page is accessible publicly without authentication or blocking common user agents.",
        impact: Impact::High,
        categories: &[Category::Technical, Category::Performance, Category::ContentTags],
        penalty: 20,
    };

    pub const MISSING_TITLE: Issue = Issue {
        id: "missing-title",
        title: "Missing title tag",
        why: "Pages without title tags rank poorly because search engines rely on them for context.",
        how_to_fix: "Add a concise, keyword-focused <title> tag to the page head.",
        impact: Impact::High,
        categories: &[Category::ContentTags],
        penalty: 25,
    };

    pub const MISSING_CANONICAL: Issue = Issue {
        id: "missing-canonical",
        title: "Missing canonical URL",
        why: "Without a canonical tag, search engines may index duplicate versions of this page.",
        how_to_fix: "Add a <link rel=\"canonical\"> tag referencing the preferred URL.",
        impact: Impact::Medium,
        categories: &[Category::Technical],
        penalty: 10,
    };

    pub const NOINDEX: Issue = Issue {
        id: "noindex",
        title: "Page blocked from indexing",
        why: "The robots meta tag contains noindex so the page can't appear in search results.",
        how_to_fix: "Remove the noindex directive from the robots meta tag or ensure it's intended.",
        impact: Impact::High,
        categories: &[Category::Technical],
        penalty: 50,
    };

    pub const MISSING_H1: Issue = Issue {
        id: "missing-h1",
        title: "Missing H1 heading",
        why: "The primary H1 heading helps search engines and users understand page focus.",
        how_to_fix: "Add a single descriptive H1 heading to the main page content.",
        impact: Impact::Low,
        categories: &[Category::ContentTags],
        penalty: 10,
    };

    pub const MULTIPLE_H1: Issue = Issue {
        id: "multiple-h1",
        title: "Multiple H1 headings",
        why: "Using more than one H1 dilutes relevance and confuses crawlers.",
        how_to_fix: "Limit the page to a single H1 and use H2/H3 tags for subtopics.",
        impact: Impact::Low,
        categories: &[Category::ContentTags],
        penalty: 5,
    };

    pub const LARGE_HTML: Issue = Issue {
        id: "large-html",
        title: "HTML payload is heavy",
        why: "Pages larger than 200 KB load slower and consume more crawl budget.",
        how_to_fix: "Minify HTML and remove unused markup or inline scripts to reduce size.",
        impact: Impact::Medium,
        categories: &[Category::Performance],
        penalty: 10,
    };

    pub const MISSING_VIEWPORT: Issue = Issue {
        id: "missing-viewport",
        title: "Missing viewport meta tag",
        why: "Without a viewport tag, the page renders poorly on mobile devices.",
        how_to_fix: "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.",
        impact: Impact::High,
        categories: &[Category::Mobile],
        penalty: 25,
    };

    pub const MISSING_OG: Issue = Issue {
        id: "missing-og",
        title: "Open Graph tags missing",
        why: "Social sharing platforms rely on OG tags to render rich previews.",
        how_to_fix: "Add standard og:title, og:description, og:image, and og:url tags.",
        impact: Impact::Medium,
        categories: &[Category::Social],
        penalty: 8,
    };

    pub const MISSING_TWITTER: Issue = Issue {
        id: "missing-twitter",
        title: "Twitter card tags missing",
        why: "Twitter uses dedicated tags to show previews when your link is shared.",
        how_to_fix: "Add twitter:card, twitter:title, and twitter:description meta tags.",
        impact: Impact::Medium,
        categories: &[Category::Social],
        penalty: 7,
    };

    pub const MISSING_ALT: Issue = Issue {
        id: "missing-alt",
        title: "Images missing alt text",
        why: "Alt text improves accessibility and helps search engines understand images.",
        how_to_fix: "Add descriptive alt attributes to significant images.",
        impact: Impact::Low,
        categories: &[Category::ContentTags],
        penalty: 5,
    };

    pub const LOW_INTERNAL_LINKS: Issue = Issue {
        id: "low-internal-links",
        title: "Weak internal linking",
        why: "Few internal links make it harder for crawlers and users to discover content.",
        how_to_fix: "Add contextual internal links pointing to related pages.",
        impact: Impact::Medium,
        categories: &[Category::Navigability],
        penalty: 10,
    };

    pub const HTTP_PROTOCOL: Issue = Issue {
        id: "http-protocol",
        title: "Site not served over HTTPS",
        why: "Secure HTTPS is a ranking signal and protects user data.",
        how_to_fix: "Install an SSL certificate and redirect HTTP traffic to HTTPS.",
        impact: Impact::High,
        categories: &[Category::Technical],
        penalty: 20,
    };

    pub const MISSING_ROBOTS: Issue = Issue {
        id: "missing-robots",
        title: "robots.txt not found",
        why: "Without robots.txt you cannot control crawler access effectively.",
        how_to_fix: "Create robots.txt at the site root to manage crawl behaviour.",
        impact: Impact::Low,
        categories: &[Category::Technical],
        penalty: 5,
    };

    pub const MISSING_SITEMAP: Issue = Issue {
        id: "missing-sitemap",
        title: "sitemap.xml not found",
        why: "Sitemaps help search engines discover and prioritise your pages.",
        how_to_fix: "Generate a sitemap.xml and reference it in robots.txt and Search Console.",
        impact: Impact::Medium,
        categories: &[Category::Technical, Category::Navigability],
        penalty: 5,
    };

    pub const EXCESSIVE_REQUESTS: Issue = Issue {
        id: "excessive-requests",
        title: "Too many network requests",
        why: "Request-heavy pages are slower to load and hurt Core Web Vitals.",
        how_to_fix: "Concatenate assets, lazy-load below-the-fold content, and remove unused scripts.",
        impact: Impact::Medium,
        categories: &[Category::Performance],
        penalty: 15,
    };

    pub const NOT_MOBILE_FRIENDLY: Issue = Issue {
        id: "not-mobile-friendly",
        title: "Page is not mobile-friendly",
        why: "Mobile usability issues impact rankings and conversion on handheld devices.",
        how_to_fix: "Adopt responsive layouts and ensure tap targets and fonts meet mobile guidelines.",
        impact: Impact::High,
        categories: &[Category::Mobile],
        penalty: 20,
    };

    pub const DEEP_PAGE: Issue = Issue {
        id: "deep-page",
        title: "Page is deeply nested",
        why: "Pages more than three clicks from the homepage receive less crawl frequency.",
        how_to_fix: "Expose the page via menus, breadcrumbs, or internal links closer to the homepage.",
        impact: Impact::Medium,
        categories: &[Category::Navigability],
        penalty: 10,
    };
}

/// The ordered check catalogue
pub static RULES: &[Rule] = &[
    Rule {
        category: "Content",
        item: "Title tag present",
        probe: Probe::Html(|html| {
            Outcome::check(html.has_title, html.title.clone(), &issues::MISSING_TITLE)
        }),
    },
    Rule {
        category: "Content",
        item: "Meta description present",
        // Recorded but never scored, matching the historical report output.
        probe: Probe::Html(|html| {
            if html.has_meta_description {
                Outcome::pass(html.meta_description.clone())
            } else {
                Outcome::fail_unscored(None)
            }
        }),
    },
    Rule {
        category: "Technical",
        item: "Canonical tag configured",
        probe: Probe::Html(|html| {
            Outcome::check(
                html.has_canonical,
                html.canonical.clone(),
                &issues::MISSING_CANONICAL,
            )
        }),
    },
    Rule {
        category: "Technical",
        item: "Page set to index",
        probe: Probe::Html(|html| {
            if html.has_noindex {
                Outcome::fail(html.meta_robots.clone(), &issues::NOINDEX)
            } else {
                Outcome::pass(Some("indexable".to_string()))
            }
        }),
    },
    Rule {
        category: "Content",
        item: "Single H1 heading",
        probe: Probe::Html(|html| match html.h1_count {
            0 => Outcome::fail(Some("No H1 tag found".to_string()), &issues::MISSING_H1),
            1 => Outcome::pass(Some("Exactly one H1 tag found".to_string())),
            n => Outcome::fail(Some(format!("Found {} H1 tags", n)), &issues::MULTIPLE_H1),
        }),
    },
    Rule {
        category: "Performance",
        item: "HTML size under 200 KB",
        probe: Probe::Html(|html| {
            let kb = (html.html_bytes as f64 / 1024.0).round();
            Outcome::check(
                html.html_bytes <= MAX_HTML_BYTES,
                Some(format!("{} KB", kb)),
                &issues::LARGE_HTML,
            )
        }),
    },
    Rule {
        category: "Mobile",
        item: "Viewport meta tag present",
        probe: Probe::Html(|html| {
            Outcome::check(html.has_viewport, None, &issues::MISSING_VIEWPORT)
        }),
    },
    Rule {
        category: "Social",
        item: "Open Graph tags present",
        probe: Probe::Html(|html| {
            Outcome::check(
                html.og_tags > 0,
                Some(format!("{} OG tags", html.og_tags)),
                &issues::MISSING_OG,
            )
        }),
    },
    Rule {
        category: "Social",
        item: "Twitter card tags present",
        probe: Probe::Html(|html| {
            Outcome::check(
                html.twitter_tags > 0,
                Some(format!("{} Twitter tags", html.twitter_tags)),
                &issues::MISSING_TWITTER,
            )
        }),
    },
    Rule {
        category: "Content",
        item: "Image alt text coverage ≥ 80%",
        probe: Probe::Html(|html| {
            let with_alt = html.image_count.saturating_sub(html.images_missing_alt);
            Outcome::check(
                alt_coverage_ok(html.image_count, html.images_missing_alt),
                Some(format!("{}/{} images with alt", with_alt, html.image_count)),
                &issues::MISSING_ALT,
            )
        }),
    },
    Rule {
        category: "Navigability",
        item: "Internal links adequate",
        probe: Probe::Html(|html| {
            Outcome::check(
                html.internal_links >= MIN_INTERNAL_LINKS,
                Some(format!("{} internal links", html.internal_links)),
                &issues::LOW_INTERNAL_LINKS,
            )
        }),
    },
    Rule {
        category: "Technical",
        item: "HTTPS in use",
        probe: Probe::Site(|ctx| Outcome::check(ctx.https, Some(ctx.url.clone()), &issues::HTTP_PROTOCOL)),
    },
    Rule {
        category: "Technical",
        item: "robots.txt available",
        probe: Probe::Site(|ctx| {
            Outcome::check(
                ctx.robots_txt_found,
                Some(format!("{}/robots.txt", ctx.origin)),
                &issues::MISSING_ROBOTS,
            )
        }),
    },
    Rule {
        category: "Technical",
        item: "sitemap.xml available",
        probe: Probe::Site(|ctx| {
            Outcome::check(
                ctx.sitemap_found,
                Some(format!("{}/sitemap.xml", ctx.origin)),
                &issues::MISSING_SITEMAP,
            )
        }),
    },
    Rule {
        category: "Performance",
        item: "Requests under 150",
        probe: Probe::Remote(|summary| {
            let resources = summary.page_metrics.resources?;
            Some(Outcome::check(
                resources <= MAX_RESOURCES,
                Some(format!("{} resources", resources)),
                &issues::EXCESSIVE_REQUESTS,
            ))
        }),
    },
    Rule {
        category: "Mobile",
        item: "Mobile-friendly per remote crawl",
        probe: Probe::Remote(|summary| {
            let friendly = summary.mobile.friendly?;
            Some(Outcome::check(friendly, None, &issues::NOT_MOBILE_FRIENDLY))
        }),
    },
    Rule {
        category: "Navigability",
        item: "Crawl depth ≤ 3",
        probe: Probe::Remote(|summary| {
            let depth = summary.links.depth?;
            Some(Outcome::check(
                depth <= MAX_CRAWL_DEPTH,
                Some(format!("Depth {}", depth)),
                &issues::DEEP_PAGE,
            ))
        }),
    },
];

/// Alt coverage of at least 80%; vacuously true for pages without images.
pub fn alt_coverage_ok(image_count: usize, missing_alt: usize) -> bool {
    if image_count == 0 {
        return true;
    }
    let with_alt = image_count.saturating_sub(missing_alt);
    with_alt * 5 >= image_count * 4
}

/// Evaluates the full catalogue against `ctx`.
pub fn evaluate(ctx: &AnalysisContext) -> Evaluation {
    evaluate_rules(RULES, ctx)
}

/// Evaluates `rules` in order. When the page HTML is missing, HTML rules are
/// replaced by a single failing "HTML analyzer" check and the fetch failure
/// issue.
pub fn evaluate_rules(rules: &[Rule], ctx: &AnalysisContext) -> Evaluation {
    let mut evaluation = Evaluation::default();
    let mut html_fallback_recorded = false;

    for rule in rules {
        let outcome = match (&rule.probe, &ctx.html) {
            (Probe::Html(_), None) => {
                if !html_fallback_recorded {
                    html_fallback_recorded = true;
                    evaluation.issues.push(issues::HTML_FETCH_FAILURE);
                    evaluation.checks.push(CheckDetail {
                        category: "Technical".to_string(),
                        item: "HTML analyzer".to_string(),
                        passed: false,
                        details: Some(
                            ctx.html_error
                                .clone()
                                .unwrap_or_else(|| "Unable to parse HTML".to_string()),
                        ),
                    });
                }
                continue;
            }
            (Probe::Html(probe), Some(html)) => guarded(rule, || Some(probe(html))),
            (Probe::Site(probe), _) => guarded(rule, || Some(probe(ctx))),
            (Probe::Remote(probe), _) => match ctx.remote.summary() {
                Some(summary) => guarded(rule, || probe(summary)),
                None => None,
            },
        };

        let Some(outcome) = outcome else {
            tracing::debug!(item = rule.item, "Check skipped, remote data absent");
            continue;
        };

        evaluation.checks.push(CheckDetail {
            category: rule.category.to_string(),
            item: rule.item.to_string(),
            passed: outcome.passed,
            details: outcome.details,
        });

        if !outcome.passed
            && let Some(issue) = outcome.issue
        {
            evaluation.issues.push(*issue);
        }
    }

    evaluation
}

/// Runs a probe, converting a panic into a failing, unscored outcome.
fn guarded(rule: &Rule, probe: impl FnOnce() -> Option<Outcome>) -> Option<Outcome> {
    match catch_unwind(AssertUnwindSafe(probe)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::error!(item = rule.item, error = %message, "Check panicked");
            Some(Outcome::fail_unscored(Some(format!(
                "Check could not be evaluated: {}",
                message
            ))))
        }
    }
}
