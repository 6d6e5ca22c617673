mod server;

use actix_web::{HttpResponse, web};
use serde_json::json;
use server::{DEMO_PAGE, HEALTHY_PAGE, Site, spawn_server, spawn_site};
use sitegrade::analyzer::{AnalyzerSettings, SeoAnalyzer};
use sitegrade::error::AnalysisError;
use sitegrade::http_client::HttpClientOptions;
use sitegrade::models::{RemoteCrawl, ReportStatus};
use sitegrade::remote_crawl::{Credentials, RemoteCrawlSettings};
use sitegrade::rules::issues;
use sitegrade::scoring::weighted_overall;
use std::time::Duration;

fn local_only() -> AnalyzerSettings {
    AnalyzerSettings {
        http: HttpClientOptions {
            timeout: Duration::from_secs(5),
            ..Default::default()
        },
        remote: None,
    }
}

#[tokio::test]
async fn test_demo_page_end_to_end() {
    let base_url = spawn_site(Site::serving(DEMO_PAGE)).await;
    let analyzer = SeoAnalyzer::new(local_only()).unwrap();

    let report = analyzer.analyze(&base_url).await.unwrap();

    assert_eq!(report.url, format!("{}/", base_url));
    assert_eq!(report.status, ReportStatus::Ok);

    let scores = &report.scores;
    assert_eq!(scores.technical, 70); // https -20, canonical -10
    assert_eq!(scores.mobile, 75); // viewport -25
    assert_eq!(scores.content_tags, 85); // alt -5, h1 -10
    assert_eq!(scores.performance, 100);
    assert_eq!(scores.navigability, 90); // no internal links -10
    assert_eq!(scores.social, 85); // og -8, twitter -7
    let expected = weighted_overall(|c| f64::from(scores.get(c))).round() as u8;
    assert_eq!(scores.overall, expected);

    let failing: Vec<&str> = report
        .checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| c.item.as_str())
        .collect();
    assert_eq!(
        failing,
        vec![
            "Meta description present",
            "Canonical tag configured",
            "Single H1 heading",
            "Viewport meta tag present",
            "Open Graph tags present",
            "Twitter card tags present",
            "Image alt text coverage ≥ 80%",
            "Internal links adequate",
            "HTTPS in use",
        ]
    );
    assert_eq!(report.checks.len(), 14);

    let fixes: Vec<&str> = report.top_fixes.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(
        fixes,
        vec![
            issues::MISSING_VIEWPORT.title,
            issues::HTTP_PROTOCOL.title,
            issues::MISSING_CANONICAL.title,
            issues::LOW_INTERNAL_LINKS.title,
            issues::MISSING_OG.title,
        ]
    );

    assert_eq!(report.summary["robotsTxtFound"], json!(true));
    assert_eq!(report.summary["sitemapFound"], json!(true));
    assert_eq!(report.summary["https"], json!(false));
    assert_eq!(report.summary["html"]["title"], json!("Demo"));
    assert_eq!(report.summary["html"]["imageCount"], json!(1));
    assert!(report.summary.get("pageMetrics").is_none());
}

#[tokio::test]
async fn test_healthy_page_scores_perfect_except_https() {
    let base_url = spawn_site(Site::serving(HEALTHY_PAGE)).await;
    let analyzer = SeoAnalyzer::new(local_only()).unwrap();

    let report = analyzer.analyze(&base_url).await.unwrap();

    let failing: Vec<&str> = report
        .checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| c.item.as_str())
        .collect();
    assert_eq!(failing, vec!["HTTPS in use"]);
    assert_eq!(report.scores.technical, 80);
    assert_eq!(report.scores.social, 100);
    assert_eq!(report.top_fixes.len(), 1);
    assert_eq!(
        report.summary["html"]["socialLinks"],
        json!(["https://www.facebook.com/example"])
    );
}

#[tokio::test]
async fn test_missing_robots_and_sitemap() {
    let base_url = spawn_site(Site {
        robots: false,
        sitemap: false,
        ..Site::serving(HEALTHY_PAGE)
    })
    .await;
    let analyzer = SeoAnalyzer::new(local_only()).unwrap();

    let report = analyzer.analyze(&base_url).await.unwrap();

    assert_eq!(report.summary["robotsTxtFound"], json!(false));
    assert_eq!(report.summary["sitemapFound"], json!(false));
    // https -20, robots -5, sitemap -5
    assert_eq!(report.scores.technical, 70);
    assert_eq!(report.scores.navigability, 95);
}

#[tokio::test]
async fn test_fetch_failure_still_produces_report() {
    let base_url = spawn_site(Site {
        page_status: 500,
        ..Site::serving(DEMO_PAGE)
    })
    .await;
    let analyzer = SeoAnalyzer::new(local_only()).unwrap();

    let report = analyzer.analyze(&base_url).await.unwrap();

    assert_eq!(report.status, ReportStatus::Ok);
    assert_eq!(report.checks.len(), 4);
    let first = &report.checks[0];
    assert_eq!(first.item, "HTML analyzer");
    assert!(!first.passed);
    assert!(first.details.as_deref().unwrap().contains("HTTP 500"));

    assert_eq!(report.top_fixes[0].title, issues::HTML_FETCH_FAILURE.title);
    // fetch failure -20, https -20
    assert_eq!(report.scores.technical, 60);
    assert_eq!(report.scores.performance, 80);
    assert_eq!(report.scores.content_tags, 80);
    assert_eq!(report.summary["html"], json!(null));
}

#[tokio::test]
async fn test_non_html_response_counts_as_fetch_failure() {
    let base_url = spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .content_type("application/pdf")
                    .body("%PDF-1.4")
            }),
        );
    })
    .await;
    let analyzer = SeoAnalyzer::new(local_only()).unwrap();

    let report = analyzer.analyze(&base_url).await.unwrap();
    assert_eq!(report.checks[0].item, "HTML analyzer");
    assert!(
        report.checks[0]
            .details
            .as_deref()
            .unwrap()
            .contains("application/pdf")
    );
}

#[tokio::test]
async fn test_missing_credentials_degrade_to_local_checks() {
    let base_url = spawn_site(Site::serving(DEMO_PAGE)).await;
    let analyzer = SeoAnalyzer::new(AnalyzerSettings {
        remote: Some(RemoteCrawlSettings {
            credentials: None,
            ..Default::default()
        }),
        ..local_only()
    })
    .unwrap();

    let url = sitegrade::analyzer::normalize_url(&base_url).unwrap();
    let ctx = analyzer.build_context(&url).await;
    assert!(matches!(ctx.remote, RemoteCrawl::Unavailable(ref reason) if reason.contains("credentials")));

    let report = analyzer.analyze(&base_url).await.unwrap();
    assert_eq!(report.checks.len(), 14);
    assert_eq!(report.scores.technical, 70);
}

async fn spawn_vendor() -> String {
    spawn_server(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/on_page/task_post",
            web::post().to(|| async {
                HttpResponse::Ok().json(json!({
                    "tasks": [{ "id": "t-1", "status_code": 20100 }]
                }))
            }),
        )
        .route(
            "/on_page/task_get/{id}",
            web::get().to(|| async {
                HttpResponse::Ok().json(json!({
                    "tasks": [{ "id": "t-1", "status_code": 20000, "result": [] }]
                }))
            }),
        )
        .route(
            "/on_page/summary/{id}",
            web::get().to(|| async {
                HttpResponse::Ok().json(json!({
                    "tasks": [{
                        "id": "t-1",
                        "status_code": 20000,
                        "result": [{
                            "page_metrics": {
                                "resource_fetches": 200,
                                "depth": 2,
                                "is_mobile_friendly": false
                            }
                        }]
                    }]
                }))
            }),
        );
    })
    .await
}

fn with_vendor(vendor_url: String) -> AnalyzerSettings {
    AnalyzerSettings {
        remote: Some(RemoteCrawlSettings {
            base_url: vendor_url,
            credentials: Some(Credentials {
                login: "user".to_string(),
                password: "secret".to_string(),
            }),
            poll_interval: Duration::from_millis(10),
            ..Default::default()
        }),
        ..local_only()
    }
}

#[tokio::test]
async fn test_remote_summary_adds_remote_checks() {
    let vendor_url = spawn_vendor().await;
    let site_url = spawn_site(Site::serving(HEALTHY_PAGE)).await;

    let analyzer = SeoAnalyzer::new(with_vendor(vendor_url)).unwrap();

    let report = analyzer.analyze(&site_url).await.unwrap();

    assert_eq!(report.checks.len(), 17);
    let remote_checks: Vec<(&str, bool)> = report.checks[14..]
        .iter()
        .map(|c| (c.item.as_str(), c.passed))
        .collect();
    assert_eq!(
        remote_checks,
        vec![
            ("Requests under 150", false),
            ("Mobile-friendly per remote crawl", false),
            ("Crawl depth ≤ 3", true),
        ]
    );
    assert_eq!(report.scores.performance, 85);
    assert_eq!(report.scores.mobile, 80);
    assert_eq!(report.summary["pageMetrics"]["resources"], json!(200));
    assert_eq!(report.summary["links"]["depth"], json!(2));
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let base_url = spawn_site(Site::serving(DEMO_PAGE)).await;
    let analyzer = SeoAnalyzer::new(local_only()).unwrap();

    let first = analyzer.analyze(&base_url).await.unwrap();
    let second = analyzer.analyze(&base_url).await.unwrap();

    assert_eq!(first.scores, second.scores);
    assert_eq!(first.checks, second.checks);
    assert_eq!(first.top_fixes, second.top_fixes);
    assert_eq!(first.summary, second.summary);
}

#[tokio::test]
async fn test_repeated_runs_with_remote_data_are_identical() {
    let vendor_url = spawn_vendor().await;
    let site_url = spawn_site(Site::serving(DEMO_PAGE)).await;
    let analyzer = SeoAnalyzer::new(with_vendor(vendor_url)).unwrap();

    let first = analyzer.analyze(&site_url).await.unwrap();
    let second = analyzer.analyze(&site_url).await.unwrap();

    assert_eq!(first.checks.len(), 17);
    assert_eq!(first.scores, second.scores);
    assert_eq!(first.checks, second.checks);
    assert_eq!(first.top_fixes, second.top_fixes);
    assert_eq!(first.summary, second.summary);
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let analyzer = SeoAnalyzer::new(local_only()).unwrap();

    assert!(matches!(
        analyzer.analyze("").await,
        Err(AnalysisError::EmptyUrl)
    ));
    assert!(matches!(
        analyzer.analyze("ftp://example.com").await,
        Err(AnalysisError::UnsupportedScheme(_))
    ));
    assert!(matches!(
        analyzer.analyze("http://").await,
        Err(AnalysisError::InvalidUrl { .. })
    ));
}
