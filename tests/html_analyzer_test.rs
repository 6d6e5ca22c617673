use sitegrade::html_analyzer::{HtmlAnalyzer, LinkKind, is_social_link};

const ORIGIN: &str = "https://example.com";

#[test]
fn test_analyze_full_document() {
    let html = r##"<!DOCTYPE html>
<html>
<head>
    <title>  Example Title  </title>
    <meta name="description" content="An example page">
    <meta name="robots" content="NOINDEX, follow">
    <meta name="viewport" content="width=device-width">
    <link rel="canonical" href="https://example.com/">
    <meta property="og:title" content="Example">
    <meta property="og:image" content="https://example.com/og.png">
    <meta name="twitter:card" content="summary">
    <link rel="alternate" hreflang="fr" href="https://example.com/fr/">
    <link rel="alternate" hreflang="de" href="https://example.com/de/">
    <link rel="stylesheet" href="/main.css">
    <script src="/app.js"></script>
    <script type="module">console.log("inline module")</script>
    <script>console.log("inline")</script>
</head>
<body>
    <h1>Heading</h1>
    <h2>Sub 1</h2>
    <h2>Sub 2</h2>
    <img src="/a.png" alt="A">
    <img src="/b.png" alt="  ">
    <img src="/c.png">
    <a href="/about">About</a>
    <a href="https://example.com/contact">Contact</a>
    <a href="https://other.org/">Other</a>
    <a href="https://twitter.com/example">Twitter</a>
    <a href="#top">Top</a>
    <a href="mailto:hi@example.com">Mail</a>
    <a href="tel:+123">Call</a>
</body>
</html>"##;

    let facts = HtmlAnalyzer::analyze(html, ORIGIN);

    assert_eq!(facts.title.as_deref(), Some("Example Title"));
    assert!(facts.has_title);
    assert_eq!(facts.meta_description.as_deref(), Some("An example page"));
    assert!(facts.has_meta_description);
    assert_eq!(facts.canonical.as_deref(), Some("https://example.com/"));
    assert_eq!(facts.meta_robots.as_deref(), Some("noindex, follow"));
    assert!(facts.has_noindex);
    assert!(facts.has_viewport);
    assert_eq!(facts.h1_count, 1);
    assert_eq!(facts.og_tags, 2);
    assert_eq!(facts.twitter_tags, 1);
    assert_eq!(facts.hreflang_count, 2);
    assert_eq!(facts.image_count, 3);
    assert_eq!(facts.images_missing_alt, 2);
    assert_eq!(facts.internal_links, 2);
    assert_eq!(facts.external_links, 2);
    assert_eq!(facts.social_links, vec!["https://twitter.com/example"]);
    assert_eq!(facts.script_count, 2);
    assert_eq!(facts.stylesheet_count, 1);
    assert_eq!(facts.heading_structure.get("h2"), Some(&2));
    assert_eq!(facts.heading_structure.get("h6"), Some(&0));
    assert_eq!(facts.html_bytes, html.len());
}

#[test]
fn test_analyze_empty_markup() {
    let facts = HtmlAnalyzer::analyze("<html><body></body></html>", ORIGIN);

    assert!(!facts.has_title);
    assert_eq!(facts.title, None);
    assert!(!facts.has_meta_description);
    assert!(!facts.has_canonical);
    assert!(!facts.has_noindex);
    assert!(!facts.has_viewport);
    assert_eq!(facts.h1_count, 0);
    assert_eq!(facts.image_count, 0);
    assert_eq!(facts.internal_links, 0);
    assert_eq!(facts.heading_structure.len(), 6);
}

#[test]
fn test_index_follow_is_not_noindex() {
    let html = r#"<html><head><meta name="robots" content="index, follow"></head><body></body></html>"#;
    let facts = HtmlAnalyzer::analyze(html, ORIGIN);

    assert_eq!(facts.meta_robots.as_deref(), Some("index, follow"));
    assert!(!facts.has_noindex);
}

#[test]
fn test_analyze_broken_markup_never_fails() {
    let facts = HtmlAnalyzer::analyze("<html><head><title>Oops</title><body><h1>Unclosed<p><div>", ORIGIN);
    assert_eq!(facts.h1_count, 1);
}

#[test]
fn test_blank_values_count_as_missing() {
    let html = r#"<html><head>
        <title>   </title>
        <meta name="description" content="">
        <link rel="canonical" href=" ">
    </head></html>"#;

    let facts = HtmlAnalyzer::analyze(html, ORIGIN);
    assert!(!facts.has_title);
    assert!(!facts.has_meta_description);
    assert!(!facts.has_canonical);
}

#[test]
fn test_classify_link() {
    assert_eq!(
        HtmlAnalyzer::classify_link("/about", ORIGIN),
        LinkKind::Internal("https://example.com/about".to_string())
    );
    assert_eq!(
        HtmlAnalyzer::classify_link("https://example.com/x?y=1", ORIGIN),
        LinkKind::Internal("https://example.com/x?y=1".to_string())
    );
    assert_eq!(
        HtmlAnalyzer::classify_link("http://example.com/insecure", ORIGIN),
        LinkKind::External("http://example.com/insecure".to_string())
    );
    assert_eq!(
        HtmlAnalyzer::classify_link("https://cdn.example.org/lib.js", ORIGIN),
        LinkKind::External("https://cdn.example.org/lib.js".to_string())
    );
    assert_eq!(HtmlAnalyzer::classify_link("#section", ORIGIN), LinkKind::Ignored);
    assert_eq!(
        HtmlAnalyzer::classify_link("mailto:me@example.com", ORIGIN),
        LinkKind::Ignored
    );
    assert_eq!(HtmlAnalyzer::classify_link("tel:+15550100", ORIGIN), LinkKind::Ignored);
    assert_eq!(HtmlAnalyzer::classify_link("   ", ORIGIN), LinkKind::Ignored);
}

#[test]
fn test_is_social_link() {
    assert!(is_social_link("https://www.LinkedIn.com/company/example"));
    assert!(is_social_link("https://youtube.com/@example"));
    assert!(is_social_link("https://www.tiktok.com/@example"));
    assert!(!is_social_link("https://example.com/blog"));
}
