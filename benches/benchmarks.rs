use criterion::{criterion_group, criterion_main, Criterion};
use docs_mirror::pretty::{parse_html, prettify};
use docs_mirror::{FileManager, HtmlParser};
use std::hint::black_box;
use std::path::Path;
use url::Url;

fn sidebar_html() -> String {
    let items: String = (0..200)
        .map(|i| format!(r#"<li><a href="chapter_{}/section_{}.html">Section {}</a></li>"#, i / 10, i, i))
        .collect();
    format!(
        r#"<html><head><link rel="stylesheet" href="/static/theme.css"><script src="/static/book.js"></script></head>
<body><nav id="sidebar"><ol>{}</ol></nav><main><p>Body text</p></main></body></html>"#,
        items
    )
}

fn bench_nav_extraction(c: &mut Criterion) {
    let html = sidebar_html();
    let base = Url::parse("https://docs.example.com/docs/0.53.13/index.html").unwrap();
    let parser = HtmlParser::new(&base, "nav", "sidebar");

    c.bench_function("extract_nav_links", |b| {
        b.iter(|| {
            let _links = parser.extract_nav_links(black_box(&html)).unwrap();
        });
    });
}

fn bench_page_mapping(c: &mut Criterion) {
    let file_manager = FileManager::new(Path::new("scraped_site"), "/docs/0.53.13");
    let urls: Vec<Url> = [
        "https://docs.example.com/docs/0.53.13/index.html",
        "https://docs.example.com/docs/0.53.13/user_manual/source_zh_cn/first_understanding/basic.html",
        "https://docs.example.com/docs/0.53.13/guide/",
        "https://docs.example.com/blog/outside.html",
    ]
    .iter()
    .map(|u| Url::parse(u).unwrap())
    .collect();

    c.bench_function("map_page", |b| {
        b.iter(|| {
            for url in &urls {
                let _page = file_manager.map_page(black_box(url));
            }
        });
    });
}

fn bench_prettify(c: &mut Criterion) {
    let html = sidebar_html();
    let dom = parse_html(&html);

    c.bench_function("prettify", |b| {
        b.iter(|| {
            let _out = prettify(black_box(&dom.document));
        });
    });
}

criterion_group!(benches, bench_nav_extraction, bench_page_mapping, bench_prettify);
criterion_main!(benches);
