pub mod assets;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod error;
pub mod file_manager;
pub mod html_parser;
pub mod logging;
pub mod mirror;
pub mod pretty;
pub mod rewriter;

// Re-export main types for convenience
pub use assets::{AssetLocalizer, Localize};
pub use cli::MirrorCommand;
pub use config::MirrorConfig;
pub use downloader::Downloader;
pub use error::{Error, Result};
pub use file_manager::{FileManager, PagePath};
pub use html_parser::{HtmlParser, ResourceType};
pub use mirror::{RunSummary, WebsiteMirror};
pub use rewriter::{PageRewriter, RewrittenPage};
