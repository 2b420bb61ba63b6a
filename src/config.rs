use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_START_URL: &str =
    "https://docs.cangjie-lang.cn/docs/0.53.13/user_manual/source_zh_cn/first_understanding/basic.html";
pub const DEFAULT_OUTPUT_DIR: &str = "scraped_site";
pub const DEFAULT_PATH_PREFIX: &str = "/docs/0.53.13";
pub const DEFAULT_NAV_TAG: &str = "nav";
pub const DEFAULT_NAV_ID: &str = "sidebar";
pub const DEFAULT_MAX_PAGES: usize = 4;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything a mirror run needs to know, handed to [`crate::WebsiteMirror`] up front.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Documentation entry page holding the navigation region
    pub start_url: Url,
    /// Root of the mirrored tree; `css/` and `js/` live directly under it
    pub output_dir: PathBuf,
    /// Version-root segment stripped from page paths
    pub path_prefix: String,
    pub nav_tag: String,
    pub nav_id: String,
    /// Number of navigation links to process (0 = all of them)
    pub max_pages: usize,
    /// Header set sent with every request
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    /// Write `mirror-summary.json` into the output root when done
    pub write_summary: bool,
}

impl MirrorConfig {
    pub fn new(start_url: &str, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let start_url = Url::parse(start_url).map_err(|source| Error::Url {
            url: start_url.to_string(),
            source,
        })?;

        Ok(Self {
            start_url,
            output_dir: output_dir.into(),
            ..Self::default()
        })
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_navigation(mut self, tag: impl Into<String>, id: impl Into<String>) -> Self {
        self.nav_tag = tag.into();
        self.nav_id = id.into();
        self
    }

    /// Apply the batch cap to the extracted navigation links.
    pub fn batch<T>(&self, mut links: Vec<T>) -> Vec<T> {
        if self.max_pages > 0 {
            links.truncate(self.max_pages);
        }
        links
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            start_url: Url::parse(DEFAULT_START_URL).expect("default start URL is valid"),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            nav_tag: DEFAULT_NAV_TAG.to_string(),
            nav_id: DEFAULT_NAV_ID.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            headers: vec![("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string())],
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            write_summary: false,
        }
    }
}
