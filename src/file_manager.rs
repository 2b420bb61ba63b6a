use std::fs;
use std::path::{Component, Path, PathBuf};
use url::Url;

use crate::error::{Error, Result};
use crate::html_parser::ResourceType;

/// Where a page lands on disk and how to climb back to the output root from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePath {
    /// Path relative to the output root, prefix removed
    pub relative: PathBuf,
    /// `relative` joined onto the output root
    pub local: PathBuf,
    /// Forward-slash path from the page's directory back to the output root (`.` at the top)
    pub root_offset: String,
}

/// Maps URLs onto the output tree and writes files into it.
///
/// Nothing is created on disk until the first write, so an aborted run leaves no trace.
#[derive(Clone)]
pub struct FileManager {
    base_dir: PathBuf,
    path_prefix: String,
}

impl FileManager {
    pub fn new(base_dir: &Path, path_prefix: &str) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            path_prefix: normalize_prefix(path_prefix),
        }
    }

    pub fn asset_dir(&self, kind: ResourceType) -> PathBuf {
        self.base_dir.join(kind.dir_name())
    }

    /// Strip the version prefix from the page's URL path and root the rest under the output dir.
    ///
    /// Paths that don't live under the prefix would climb out of the output root and are
    /// rejected with [`Error::OutsidePrefix`].
    pub fn map_page(&self, url: &Url) -> Result<PagePath> {
        let url_path = url.path();
        let outside = || Error::OutsidePrefix {
            path: url_path.to_string(),
            prefix: self.path_prefix.clone(),
        };

        let mut relative = pathdiff::diff_paths(Path::new(url_path), Path::new(&self.path_prefix))
            .ok_or_else(outside)?;

        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(outside());
        }

        // Directory URLs get an index file
        if url_path.ends_with('/') || relative.as_os_str().is_empty() {
            relative.push("index.html");
        }

        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        let offset = pathdiff::diff_paths(Path::new(""), parent).unwrap_or_default();
        let root_offset = match to_forward_slashes(&offset) {
            s if s.is_empty() => ".".to_string(),
            s => s,
        };

        Ok(PagePath {
            local: self.base_dir.join(&relative),
            relative,
            root_offset,
        })
    }

    pub fn save_page(&self, page: &PagePath, html: &str) -> Result<PathBuf> {
        write_file(&page.local, html.as_bytes())?;
        Ok(page.local.clone())
    }

    /// Write an asset into its shared directory. Same file name, same file: last write wins.
    pub fn save_asset(&self, kind: ResourceType, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.asset_dir(kind).join(file_name);
        write_file(&path, content)?;
        Ok(path)
    }

    pub fn write_file(&self, relative: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.base_dir.join(relative);
        write_file(&path, content)?;
        Ok(path)
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| Error::io(path, e))
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Final path segment of the asset URL, query and fragment excluded.
pub fn asset_file_name(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .ok_or_else(|| Error::NoFileName(url.to_string()))
}

/// Reference written into the page for a localized asset.
pub fn asset_href(root_offset: &str, kind: ResourceType, file_name: &str) -> String {
    format!("{}/{}/{}", root_offset, kind.dir_name(), file_name)
}

fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
