use clap::Parser;

pub const DEFAULT_OUTPUT: &str = "text";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_MAX_CRAWL_PAGES: u32 = 1;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 120;

#[derive(Parser, Debug, Clone)]
#[command(name = "sitegrade")]
#[command(about = "A single-page SEO analyzer with weighted category scores", long_about = None)]
pub struct Cli {
    /// The URL (or bare host) to analyze
    #[arg(value_name = "URL", required_unless_present = "serve")]
    pub url: Option<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Save the JSON report to a file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Timeout in seconds for fetching the page and probing resources (default: 20)
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Skip the remote on-page crawl
    #[arg(long)]
    pub no_remote: bool,

    /// Pages the remote crawl may visit, between 1 and 5 (default: 1)
    #[arg(long, default_value_t = DEFAULT_MAX_CRAWL_PAGES)]
    pub max_crawl_pages: u32,

    /// Execute JavaScript during the remote crawl (default: true)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub enable_javascript: bool,

    /// Seconds between remote task status checks (default: 5)
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval: u64,

    /// Seconds to wait for the remote task before giving up (default: 120)
    #[arg(long, default_value_t = DEFAULT_POLL_TIMEOUT_SECS)]
    pub poll_timeout: u64,

    /// Serve the HTTP API on this address instead of analyzing a single URL
    #[arg(long, value_name = "ADDR")]
    pub serve: Option<String>,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
