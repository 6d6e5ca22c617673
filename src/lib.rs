pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod html_analyzer;
pub mod http_client;
pub mod models;
pub mod prober;
pub mod remote_crawl;
pub mod reporter;
pub mod rules;
pub mod scoring;
pub mod server;

use analyzer::SeoAnalyzer;
use anyhow::Result;
use cli::Cli;
use colored::*;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use reporter::Reporter;
use std::time::Duration;

/// Loads the config file and merges it under the command-line values.
pub fn resolve_args(args: &Cli) -> Result<(Config, Cli)> {
    let config = Config::load(args.config.as_deref())?;
    let merged = config.merge_with_cli(args);
    Ok((config, merged))
}

pub async fn run(args: Cli) -> Result<()> {
    let (config, args) = resolve_args(&args)?;
    run_resolved(&config, args).await
}

/// Runs with arguments already merged by [`resolve_args`].
pub async fn run_resolved(config: &Config, args: Cli) -> Result<()> {
    let analyzer = SeoAnalyzer::new(config.analyzer_settings(&args))?;

    if let Some(addr) = args.serve.as_deref() {
        println!("{}", "Sitegrade - SEO Analyzer API".bright_cyan().bold());
        println!("{} http://{}/api", "Listening on".bright_white().bold(), addr);
        return server::serve(addr, analyzer).await;
    }

    let Some(url) = args.url.as_deref() else {
        anyhow::bail!("A URL is required unless --serve is given");
    };

    let text_output = args.output != "json";
    if text_output {
        println!("{}", "Sitegrade - SEO Analyzer".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!("{} {}", "Analyzing:".bright_white().bold(), url);
        if args.no_remote {
            println!("{}", "Remote crawl disabled".dimmed());
        }
        println!();
    }

    let spinner = text_output.then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Fetching page, probing resources and waiting for the remote crawl...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    });

    let result = analyzer.analyze(url).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = result?;

    if args.verbose && text_output {
        println!(
            "{} {} checks, {} failed",
            "Done:".bright_green().bold(),
            report.checks.len(),
            report.checks.iter().filter(|c| !c.passed).count()
        );
    }

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => {
            Reporter::print_text_report(&report);
        }
    }

    if let Some(filename) = args.save.as_deref() {
        Reporter::save_json_report(&report, filename)?;
    }

    Ok(())
}
