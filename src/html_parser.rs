use select::document::Document;
use select::predicate::{Attr, Name, Predicate};
use url::Url;

use crate::error::{Error, Result};

/// The two asset kinds a page can reference; each has its own shared directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    CSS,
    JavaScript,
}

impl ResourceType {
    /// Shared directory under the output root.
    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceType::CSS => "css",
            ResourceType::JavaScript => "js",
        }
    }
}

/// Finds the navigation region of a page and resolves its links.
#[derive(Clone)]
pub struct HtmlParser {
    base_url: Url,
    nav_tag: String,
    nav_id: String,
}

impl HtmlParser {
    pub fn new(base_url: &Url, nav_tag: &str, nav_id: &str) -> Self {
        Self {
            base_url: base_url.clone(),
            nav_tag: nav_tag.to_string(),
            nav_id: nav_id.to_string(),
        }
    }

    /// Every `<a href>` inside the navigation region, resolved and in document order.
    pub fn extract_nav_links(&self, html_content: &str) -> Result<Vec<Url>> {
        let document = Document::from(html_content);

        let nav = document
            .find(Name(self.nav_tag.as_str()).and(Attr("id", self.nav_id.as_str())))
            .next()
            .ok_or_else(|| Error::NavigationMissing {
                tag: self.nav_tag.clone(),
                id: self.nav_id.clone(),
                url: self.base_url.to_string(),
            })?;

        let mut links = Vec::new();
        for anchor in nav.find(Name("a")) {
            if let Some(href) = anchor.attr("href") {
                match self.resolve_url(href) {
                    Ok(url) => links.push(url),
                    Err(e) => tracing::warn!("skipping navigation link: {}", e),
                }
            }
        }

        Ok(links)
    }

    /// Resolve `href` against the page URL the way a browser would.
    pub fn resolve_url(&self, href: &str) -> Result<Url> {
        resolve_against(&self.base_url, href)
    }
}

pub fn resolve_against(base: &Url, href: &str) -> Result<Url> {
    base.join(href.trim()).map_err(|source| Error::Url {
        url: href.to_string(),
        source,
    })
}
