use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    MirrorConfig, DEFAULT_MAX_PAGES, DEFAULT_NAV_ID, DEFAULT_NAV_TAG, DEFAULT_OUTPUT_DIR,
    DEFAULT_PATH_PREFIX, DEFAULT_START_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::error::{Error, Result};

#[derive(Parser, Debug)]
#[command(
    name = "docs-mirror",
    about = "Mirror a documentation site's navigation pages for offline reading",
    version,
    long_about = "Fetches a documentation entry page, follows the links in its navigation sidebar and saves each page with its stylesheets and scripts. Asset references are rewritten to the shared css/ and js/ directories so the copy works from disk."
)]
pub struct MirrorCommand {
    /// Documentation entry page containing the navigation region
    #[arg(default_value = DEFAULT_START_URL)]
    pub url: String,

    /// Output directory for the mirrored pages
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// URL path prefix stripped from page paths (the versioned docs root)
    #[arg(short, long, default_value = DEFAULT_PATH_PREFIX)]
    pub prefix: String,

    /// Element name of the navigation region
    #[arg(long, default_value = DEFAULT_NAV_TAG)]
    pub nav_tag: String,

    /// Element id of the navigation region
    #[arg(long, default_value = DEFAULT_NAV_ID)]
    pub nav_id: String,

    /// Number of navigation links to mirror (0 = all)
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// User agent string to use for requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Extra request header, as NAME:VALUE (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Timeout for requests in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Write mirror-summary.json into the output directory
    #[arg(long)]
    pub summary: bool,
}

impl MirrorCommand {
    pub fn into_config(self) -> Result<MirrorConfig> {
        let mut headers = vec![("User-Agent".to_string(), self.user_agent)];
        for header in &self.headers {
            let (name, value) = header
                .split_once(':')
                .ok_or_else(|| Error::InvalidHeader(header.clone()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidHeader(header.clone()));
            }
            headers.push((name.to_string(), value.trim().to_string()));
        }

        let mut config = MirrorConfig::new(&self.url, self.output_dir)?
            .with_path_prefix(self.prefix)
            .with_navigation(self.nav_tag, self.nav_id)
            .with_max_pages(self.max_pages);
        config.headers = headers;
        config.timeout = Duration::from_secs(self.timeout);
        config.write_summary = self.summary;

        Ok(config)
    }
}
