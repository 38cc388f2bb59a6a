use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use threadgrab::config::{load_crawl_config, CrawlConfig};

#[derive(Debug, Parser)]
#[command(
    name = "threadgrab",
    about = "Download the images posted in a paginated forum thread"
)]
pub struct Cli {
    /// URL of the first page of the thread
    pub url: String,

    /// Folder under which `<thread>/<page>/` directories are created
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Verbose output, including HTTP client debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON crawl config; missing keys keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Attempts per page or image before giving up
    #[arg(long)]
    pub retries: Option<u32>,

    /// Seconds to wait between attempts
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// Extra image host domain to accept (repeatable)
    #[arg(long = "provider")]
    pub providers: Vec<String>,

    /// Print the walk summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> Result<CrawlConfig> {
        let mut config = load_crawl_config(self.config.as_deref())?;
        if let Some(retries) = self.retries {
            config.retry_attempts = retries;
        }
        if let Some(delay) = self.retry_delay {
            config.retry_delay_secs = delay;
        }
        config.add_providers(self.providers.iter().cloned());
        config.validate()?;
        Ok(config)
    }
}
