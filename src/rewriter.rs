use html5ever::tendril::StrTendril;
use markup5ever_rcdom::{Handle, NodeData};
use url::Url;

use crate::assets::Localize;
use crate::file_manager::asset_href;
use crate::html_parser::{resolve_against, ResourceType};
use crate::pretty::{child_nodes, parse_html, prettify};

/// Result of rewriting one page.
#[derive(Debug, Clone, Default)]
pub struct RewrittenPage {
    pub html: String,
    /// Stylesheet references now pointing into `css/`
    pub stylesheets: usize,
    /// Script references now pointing into `js/`
    pub scripts: usize,
    /// References left untouched because the asset could not be localized
    pub failed: usize,
}

/// Points a page's stylesheet and script references at the local asset directories.
pub struct PageRewriter<'a, L> {
    page_url: &'a Url,
    root_offset: &'a str,
    localizer: &'a L,
}

impl<'a, L: Localize> PageRewriter<'a, L> {
    pub fn new(page_url: &'a Url, root_offset: &'a str, localizer: &'a L) -> Self {
        Self {
            page_url,
            root_offset,
            localizer,
        }
    }

    pub async fn rewrite(&self, html_content: &str) -> RewrittenPage {
        let dom = parse_html(html_content);

        let mut stylesheets = Vec::new();
        let mut scripts = Vec::new();
        let mut metas = Vec::new();
        collect_elements(&dom.document, &mut stylesheets, &mut scripts, &mut metas);

        // The saved page is always UTF-8
        for meta in &metas {
            relabel_charset(meta);
        }

        let mut page = RewrittenPage::default();
        for (element, kind, attr) in stylesheets
            .iter()
            .map(|e| (e, ResourceType::CSS, "href"))
            .chain(scripts.iter().map(|e| (e, ResourceType::JavaScript, "src")))
        {
            if self.localize_element(element, kind, attr).await {
                match kind {
                    ResourceType::CSS => page.stylesheets += 1,
                    ResourceType::JavaScript => page.scripts += 1,
                }
            } else {
                page.failed += 1;
            }
        }

        page.html = prettify(&dom.document);
        page
    }

    async fn localize_element(&self, element: &Handle, kind: ResourceType, attr: &str) -> bool {
        let Some(reference) = get_attr(element, attr) else {
            return false;
        };

        let asset_url = match resolve_against(self.page_url, &reference) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Failed to download resource: {}", e);
                return false;
            }
        };

        let Some(local_path) = self.localizer.localize(&asset_url, kind).await else {
            return false;
        };
        let Some(file_name) = local_path.file_name() else {
            return false;
        };

        let href = asset_href(self.root_offset, kind, &file_name.to_string_lossy());
        set_attr(element, attr, &href);
        true
    }
}

/// Stylesheet `<link href>`, `<script src>` and `<meta>` elements in document order.
fn collect_elements(
    handle: &Handle,
    stylesheets: &mut Vec<Handle>,
    scripts: &mut Vec<Handle>,
    metas: &mut Vec<Handle>,
) {
    if let NodeData::Element { ref name, .. } = handle.data {
        match &*name.local {
            "link" if is_stylesheet(handle) && get_attr(handle, "href").is_some() => {
                stylesheets.push(handle.clone())
            }
            "script" if get_attr(handle, "src").is_some() => scripts.push(handle.clone()),
            "meta" => metas.push(handle.clone()),
            _ => {}
        }
    }

    for child in child_nodes(handle).iter() {
        collect_elements(child, stylesheets, scripts, metas);
    }
}

/// Point `<meta charset>` and `<meta http-equiv="Content-Type">` declarations at UTF-8.
fn relabel_charset(meta: &Handle) {
    if get_attr(meta, "charset").is_some() {
        set_attr(meta, "charset", "utf-8");
    }

    let is_content_type = get_attr(meta, "http-equiv")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("content-type"));
    if !is_content_type {
        return;
    }
    if let Some(content) = get_attr(meta, "content") {
        if let Some(relabeled) = replace_charset_param(&content) {
            set_attr(meta, "content", &relabeled);
        }
    }
}

/// `text/html; charset=gbk` becomes `text/html; charset=utf-8`.
fn replace_charset_param(content: &str) -> Option<String> {
    let start = content.to_ascii_lowercase().find("charset=")? + "charset=".len();
    let end = content[start..]
        .find(|c: char| c == ';' || c.is_whitespace())
        .map_or(content.len(), |i| start + i);
    Some(format!("{}utf-8{}", &content[..start], &content[end..]))
}

fn is_stylesheet(handle: &Handle) -> bool {
    get_attr(handle, "rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}

fn get_attr(handle: &Handle, name: &str) -> Option<String> {
    match handle.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn set_attr(handle: &Handle, name: &str, value: &str) {
    if let NodeData::Element { ref attrs, .. } = handle.data {
        for attr in attrs.borrow_mut().iter_mut() {
            if &*attr.name.local == name {
                attr.value = StrTendril::from_slice(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;

    /// Pretends every URL not in `failing` was downloaded.
    #[derive(Default)]
    struct StubLocalizer {
        failing: HashSet<String>,
        requested: RefCell<Vec<(String, ResourceType)>>,
    }

    impl Localize for StubLocalizer {
        async fn localize(&self, url: &Url, kind: ResourceType) -> Option<PathBuf> {
            self.requested.borrow_mut().push((url.to_string(), kind));
            if self.failing.contains(url.as_str()) {
                return None;
            }
            let name = url.path_segments()?.next_back()?.to_string();
            Some(PathBuf::from("site").join(kind.dir_name()).join(name))
        }
    }

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <link rel="stylesheet" href="../../static/theme.css?v=3">
    <link rel="Alternate Stylesheet" href="https://cdn.example.com/dark.css">
    <link rel="icon" href="/favicon.ico">
    <link rel="stylesheet">
    <script src="/static/book.js"></script>
    <script>var inline = 1;</script>
</head>
<body>
    <script src="highlight.js"></script>
</body>
</html>"#;

    fn page_url() -> Url {
        Url::parse("https://docs.example.com/docs/1.0/guide/intro/start.html").unwrap()
    }

    #[tokio::test]
    async fn test_rewrites_all_assets() {
        let url = page_url();
        let localizer = StubLocalizer::default();
        let page = PageRewriter::new(&url, "../..", &localizer).rewrite(PAGE).await;

        assert_eq!(page.stylesheets, 2);
        assert_eq!(page.scripts, 2);
        assert_eq!(page.failed, 0);
        assert!(page.html.contains(r#"href="../../css/theme.css""#));
        assert!(page.html.contains(r#"href="../../css/dark.css""#));
        assert!(page.html.contains(r#"src="../../js/book.js""#));
        assert!(page.html.contains(r#"src="../../js/highlight.js""#));
        assert!(page.html.contains(r#"href="/favicon.ico""#));
        assert!(page.html.contains("var inline = 1;"));

        let requested = localizer.requested.borrow();
        let urls: Vec<&str> = requested.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://docs.example.com/docs/1.0/static/theme.css?v=3",
                "https://cdn.example.com/dark.css",
                "https://docs.example.com/static/book.js",
                "https://docs.example.com/docs/1.0/guide/intro/highlight.js",
            ]
        );
        assert_eq!(requested[0].1, ResourceType::CSS);
        assert_eq!(requested[2].1, ResourceType::JavaScript);
    }

    #[tokio::test]
    async fn test_failed_asset_keeps_original_reference() {
        let url = page_url();
        let localizer = StubLocalizer {
            failing: ["https://docs.example.com/static/book.js".to_string()]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let page = PageRewriter::new(&url, "../..", &localizer).rewrite(PAGE).await;

        assert_eq!(page.scripts, 1);
        assert_eq!(page.failed, 1);
        assert!(page.html.contains(r#"src="/static/book.js""#));
        assert!(!page.html.contains("js/book.js"));
        assert!(page.html.contains(r#"src="../../js/highlight.js""#));
    }

    #[tokio::test]
    async fn test_top_level_page_uses_dot_offset() {
        let url = Url::parse("https://docs.example.com/docs/1.0/index.html").unwrap();
        let localizer = StubLocalizer::default();
        let page = PageRewriter::new(&url, ".", &localizer)
            .rewrite(r#"<html><head><link rel="stylesheet" href="a.css"><script src="b.js"></script></head></html>"#)
            .await;

        assert!(page.html.contains(r#"href="./css/a.css""#));
        assert!(page.html.contains(r#"src="./js/b.js""#));
    }

    #[tokio::test]
    async fn test_page_without_assets_is_only_reserialized() {
        let url = page_url();
        let localizer = StubLocalizer::default();
        let page = PageRewriter::new(&url, "..", &localizer)
            .rewrite("<html><body><p>plain</p></body></html>")
            .await;

        assert_eq!((page.stylesheets, page.scripts, page.failed), (0, 0, 0));
        assert!(localizer.requested.borrow().is_empty());
        assert!(page.html.contains("   plain\n"));
    }

    #[tokio::test]
    async fn test_noscript_stylesheet_is_localized() {
        let url = page_url();
        let localizer = StubLocalizer::default();
        let page = PageRewriter::new(&url, "../..", &localizer)
            .rewrite(r#"<html><head><noscript><link rel="stylesheet" href="/static/noscript.css"></noscript></head><body></body></html>"#)
            .await;

        assert_eq!(page.stylesheets, 1);
        assert!(page.html.contains(r#"<link rel="stylesheet" href="../../css/noscript.css">"#));
        assert!(!page.html.contains("&lt;link"));
    }

    #[tokio::test]
    async fn test_charset_declarations_become_utf8() {
        let url = page_url();
        let localizer = StubLocalizer::default();
        let page = PageRewriter::new(&url, "../..", &localizer)
            .rewrite(r#"<html><head><meta charset="gbk"><meta http-equiv="Content-Type" content="text/html; charset=GB2312"><meta name="viewport" content="width=device-width"></head></html>"#)
            .await;

        assert!(page.html.contains(r#"<meta charset="utf-8">"#));
        assert!(page.html.contains(r#"content="text/html; charset=utf-8""#));
        assert!(page.html.contains(r#"content="width=device-width""#));
        assert!(!page.html.to_ascii_lowercase().contains("gb"));
    }

    #[test]
    fn test_replace_charset_param() {
        assert_eq!(
            replace_charset_param("text/html; charset=gbk").as_deref(),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(
            replace_charset_param("text/html;CHARSET=Big5; x=y").as_deref(),
            Some("text/html;CHARSET=utf-8; x=y")
        );
        assert_eq!(replace_charset_param("text/html"), None);
    }
}
