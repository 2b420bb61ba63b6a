use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

use crate::assets::AssetLocalizer;
use crate::config::MirrorConfig;
use crate::downloader::Downloader;
use crate::error::{Error, Result};
use crate::file_manager::FileManager;
use crate::html_parser::HtmlParser;
use crate::rewriter::PageRewriter;

pub const SUMMARY_FILE: &str = "mirror-summary.json";

/// What a finished run did.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub start_url: String,
    pub output_dir: PathBuf,
    pub pages_total: usize,
    pub pages_saved: usize,
    pub pages_failed: usize,
    pub stylesheets: usize,
    pub scripts: usize,
    pub assets_failed: usize,
    pub saved: Vec<PathBuf>,
}

/// Fetches the start page, follows its navigation links and saves each page with its assets.
///
/// Runs strictly one page at a time. Only a start-page failure or a missing navigation
/// region stops the run; anything that goes wrong on a single page or asset is logged
/// and skipped.
pub struct WebsiteMirror {
    config: MirrorConfig,
    downloader: Downloader,
    file_manager: FileManager,
}

impl WebsiteMirror {
    pub fn new(config: MirrorConfig) -> Result<Self> {
        let downloader = Downloader::new(&config)?;
        let file_manager = FileManager::new(&config.output_dir, &config.path_prefix);

        Ok(Self {
            config,
            downloader,
            file_manager,
        })
    }

    pub async fn mirror_website(&self) -> Result<RunSummary> {
        let start_url = &self.config.start_url;
        println!("🚀 Starting mirror of: {}", start_url.as_str().blue());
        println!("📁 Output directory: {:?}", self.config.output_dir);

        let links = self.navigation_links().await?;
        let links = self.config.batch(links);

        let mut summary = RunSummary {
            start_url: start_url.to_string(),
            output_dir: self.config.output_dir.clone(),
            pages_total: links.len(),
            ..RunSummary::default()
        };

        let progress_bar = ProgressBar::new(links.len() as u64);
        progress_bar.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for (idx, link) in links.iter().enumerate() {
            progress_bar.suspend(|| {
                println!(
                    "{} {}/{}: {}",
                    "Scraping page".cyan(),
                    idx + 1,
                    links.len(),
                    link
                )
            });
            progress_bar.set_message(link.to_string());

            match self.mirror_page(link, &mut summary).await {
                Ok(saved) => {
                    progress_bar.suspend(|| println!("{} {}", "Saved HTML:".green(), saved.display()));
                    summary.pages_saved += 1;
                    summary.saved.push(saved);
                }
                Err(e) => {
                    warn!("Failed to mirror page {}: {}", link, e);
                    summary.pages_failed += 1;
                }
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        if self.config.write_summary {
            let json = serde_json::to_vec_pretty(&summary)?;
            let path = self.file_manager.write_file(SUMMARY_FILE, &json)?;
            info!(path = ?path, "summary written");
        }

        println!(
            "\n{} Check the '{}' folder.",
            "Scraping complete!".green().bold(),
            self.config.output_dir.display()
        );
        println!(
            "📊 Pages saved: {}/{}, stylesheets: {}, scripts: {}, failed assets: {}",
            summary.pages_saved,
            summary.pages_total,
            summary.stylesheets,
            summary.scripts,
            summary.assets_failed
        );

        Ok(summary)
    }

    /// Fetch the start page and pull the links out of its navigation region.
    async fn navigation_links(&self) -> Result<Vec<Url>> {
        let start_url = &self.config.start_url;
        let html = self
            .downloader
            .fetch_text(start_url)
            .await
            .map_err(|e| Error::StartPage {
                url: start_url.to_string(),
                source: Box::new(e),
            })?;

        let parser = HtmlParser::new(start_url, &self.config.nav_tag, &self.config.nav_id);
        parser.extract_nav_links(&html)
    }

    /// Asset counters only move once the page referencing them is on disk.
    async fn mirror_page(&self, link: &Url, summary: &mut RunSummary) -> Result<PathBuf> {
        let html = self.downloader.fetch_text(link).await?;
        let page = self.file_manager.map_page(link)?;

        let localizer = AssetLocalizer::new(&self.downloader, &self.file_manager);
        let rewritten = PageRewriter::new(link, &page.root_offset, &localizer)
            .rewrite(&html)
            .await;

        let saved = self.file_manager.save_page(&page, &rewritten.html)?;
        summary.stylesheets += rewritten.stylesheets;
        summary.scripts += rewritten.scripts;
        summary.assets_failed += rewritten.failed;

        Ok(saved)
    }
}
