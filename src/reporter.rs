use crate::models::{AnalysisContext, Impact, ReportStatus, SeoReport};
use crate::rules::Evaluation;
use crate::scoring::compute_scores;
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use colored::*;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    /// Scores the evaluation and packages everything into the final report.
    pub fn assemble(ctx: &AnalysisContext, evaluation: Evaluation) -> SeoReport {
        let (scores, top_fixes) = compute_scores(&evaluation.issues);
        let analyzed_at = chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        SeoReport {
            url: ctx.url.clone(),
            analyzed_at,
            status: ReportStatus::Ok,
            scores,
            summary: Self::build_summary(ctx),
            top_fixes,
            checks: evaluation.checks,
        }
    }

    /// Remote crawl fields at the top level, then the local diagnostics.
    pub fn build_summary(ctx: &AnalysisContext) -> Map<String, Value> {
        let mut summary = match ctx.remote.summary().map(serde_json::to_value) {
            Some(Ok(Value::Object(map))) => map,
            Some(Ok(_)) | None => Map::new(),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Failed to serialize remote crawl summary");
                Map::new()
            }
        };

        let html = ctx
            .html
            .as_ref()
            .and_then(|facts| serde_json::to_value(facts).ok())
            .unwrap_or(Value::Null);

        summary.insert("html".to_string(), html);
        summary.insert(
            "robotsTxtFound".to_string(),
            Value::Bool(ctx.robots_txt_found),
        );
        summary.insert("sitemapFound".to_string(), Value::Bool(ctx.sitemap_found));
        summary.insert("https".to_string(), Value::Bool(ctx.https));
        summary
    }

    pub fn print_text_report(report: &SeoReport) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "Sitegrade - SEO Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "URL".bright_white().bold(), report.url);
        println!(
            "{}: {}",
            "Analyzed at".bright_white().bold(),
            report.analyzed_at
        );
        println!();

        println!("{}", "Scores".bright_yellow().bold().underline());
        let scores = &report.scores;
        for (label, value) in [
            ("Overall", scores.overall),
            ("Technical", scores.technical),
            ("Content & Tags", scores.content_tags),
            ("Performance", scores.performance),
            ("Mobile", scores.mobile),
            ("Navigability", scores.navigability),
            ("Social", scores.social),
        ] {
            println!("  {:<16} {}", format!("{}:", label), colorize_score(value));
        }
        println!();

        if !report.top_fixes.is_empty() {
            println!("{}", "Top Fixes".bright_yellow().bold().underline());
            for (index, fix) in report.top_fixes.iter().enumerate() {
                let impact = match fix.impact {
                    Impact::High => "HIGH  ".bright_red(),
                    Impact::Medium => "MEDIUM".yellow(),
                    Impact::Low => "LOW   ".bright_cyan(),
                };
                println!();
                println!("  {}. [{}] {}", index + 1, impact, fix.title.bright_white());
                println!("     Why: {}", fix.why);
                println!("     Fix: {}", fix.how_to_fix);
            }
            println!();
        }

        println!("{}", "Checks".bright_yellow().bold().underline());
        for check in &report.checks {
            let mark = if check.passed {
                "PASS".bright_green()
            } else {
                "FAIL".bright_red()
            };
            match &check.details {
                Some(details) => println!(
                    "  [{}] {:<13} {} {}",
                    mark,
                    check.category,
                    check.item,
                    format!("({})", details).dimmed()
                ),
                None => println!("  [{}] {:<13} {}", mark, check.category, check.item),
            }
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn save_json_report(report: &SeoReport, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}

fn colorize_score(score: u8) -> ColoredString {
    let text = score.to_string();
    if score >= 80 {
        text.bright_green()
    } else if score >= 50 {
        text.yellow()
    } else {
        text.bright_red()
    }
}
