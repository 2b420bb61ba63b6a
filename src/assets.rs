use std::path::PathBuf;
use tracing::{debug, warn};
use url::Url;

use crate::downloader::Downloader;
use crate::file_manager::{asset_file_name, FileManager};
use crate::html_parser::ResourceType;

/// Turns a remote asset URL into a local file.
#[allow(async_fn_in_trait)]
pub trait Localize {
    /// Path of the local copy, or `None` when the asset could not be stored.
    async fn localize(&self, url: &Url, kind: ResourceType) -> Option<PathBuf>;
}

/// Downloads assets into the shared `css/` and `js/` directories, named by URL basename.
pub struct AssetLocalizer<'a> {
    downloader: &'a Downloader,
    file_manager: &'a FileManager,
}

impl<'a> AssetLocalizer<'a> {
    pub fn new(downloader: &'a Downloader, file_manager: &'a FileManager) -> Self {
        Self {
            downloader,
            file_manager,
        }
    }
}

impl Localize for AssetLocalizer<'_> {
    async fn localize(&self, url: &Url, kind: ResourceType) -> Option<PathBuf> {
        let file_name = match asset_file_name(url) {
            Ok(name) => name,
            Err(e) => {
                warn!("Failed to download resource: {}", e);
                return None;
            }
        };

        let content = match self.downloader.fetch_bytes(url).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to download resource: {}", e);
                return None;
            }
        };

        match self.file_manager.save_asset(kind, &file_name, &content) {
            Ok(path) => {
                debug!(%url, path = ?path, "asset saved");
                Some(path)
            }
            Err(e) => {
                warn!("Error saving resource {}: {}", url, e);
                None
            }
        }
    }
}
