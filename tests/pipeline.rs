use std::cell::Cell;
use std::fs;

use anyhow::Result;
use colourl::{ColourlConfig, Painter, RenderError, RenderRequest, Renderer, Scorer};
use colourl_io::{FetchError, File, MemoryCache, NoCache, Page, PageFetcher};
use url::Url;

/// Serves one in-memory page and counts fetches.
struct StaticFetcher {
    html: &'static str,
    css: Vec<&'static str>,
    fetches: Cell<usize>,
}

impl StaticFetcher {
    fn new(html: &'static str, css: Vec<&'static str>) -> Self {
        Self {
            html,
            css,
            fetches: Cell::new(0),
        }
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, location: &str) -> Result<Page, FetchError> {
        self.fetches.set(self.fetches.get() + 1);
        let url = Url::parse(location).map_err(|source| FetchError::InvalidUrl {
            input: location.to_string(),
            source,
        })?;
        let mut page = Page::new(File::new(url.clone(), self.html));
        for sheet in &self.css {
            page.css.push(File::new(url.clone(), *sheet));
        }
        Ok(page)
    }
}

#[test]
fn renders_local_page_end_to_end() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("index.html"),
        r#"<html><head><link rel="stylesheet" href="site.css"></head>
        <body style="background-color: #3366cc"><p style="color:#3366cc">hi</p></body></html>"#,
    )?;
    fs::write(dir.path().join("site.css"), "a { color: rgb(204, 51, 0) }")?;

    let renderer = Renderer::from_config(&ColourlConfig::default());
    let location = dir.path().join("index.html");
    let palette = renderer.palette(&location.to_string_lossy())?;
    assert_eq!(palette.to_string(), "1 #3366cc 2\n2 #cc3300 1\n");

    let request = RenderRequest::new(location.to_string_lossy()).with_size(90, 30);
    let svg = String::from_utf8(renderer.render(&request)?)?;
    assert!(svg.contains(r##"<rect x="0" y="0" width="60" height="30" fill="#3366cc"/>"##));
    assert!(svg.contains(r##"<rect x="60" y="0" width="30" height="30" fill="#cc3300"/>"##));
    Ok(())
}

#[test]
fn cached_renders_skip_fetching() -> Result<()> {
    let fetcher = StaticFetcher::new("<style>a{color:red}</style>", vec![]);
    let renderer = Renderer::new(
        &fetcher,
        MemoryCache::new(10, std::time::Duration::from_secs(60)),
    );
    let request = RenderRequest::from_query("url=https://example.com/&style=circle")?;

    let first = renderer.render(&request)?;
    let second = renderer.render(&request)?;
    assert_eq!(first, second);
    assert_eq!(fetcher.fetches.get(), 1);

    // A different style is a different cache key.
    renderer.render(&request.clone().with_painter(Painter::BandVertical))?;
    assert_eq!(fetcher.fetches.get(), 2);
    Ok(())
}

#[test]
fn uncached_renderer_fetches_every_time() -> Result<()> {
    let fetcher = StaticFetcher::new("<p style='color:teal'>", vec!["b{color:navy}"]);
    let renderer = Renderer::uncached(&fetcher);
    let request = RenderRequest::new("https://example.com/");
    renderer.render(&request)?;
    renderer.render(&request)?;
    assert_eq!(fetcher.fetches.get(), 2);
    Ok(())
}

#[test]
fn scorer_changes_ranking() -> Result<()> {
    let fetcher = StaticFetcher::new(
        "<style>a{color:#cc3300} b{color:#cc3300} body{background:#3366cc}</style>",
        vec![],
    );
    let by_sum = Renderer::new(&fetcher, NoCache).palette("https://example.com/")?;
    let by_property = Renderer::new(&fetcher, NoCache)
        .with_scorer(Scorer::Property)
        .palette("https://example.com/")?;
    assert_eq!(by_sum.as_slice()[0].color.hex(), "#cc3300");
    assert_eq!(by_property.as_slice()[0].color.hex(), "#cc3300");
    assert_eq!(by_property.as_slice()[0].score, 2);
    assert_eq!(by_property.as_slice()[1].score, 2);
    Ok(())
}

#[test]
fn empty_page_renders_empty_image() -> Result<()> {
    let fetcher = StaticFetcher::new("", vec![]);
    let renderer = Renderer::uncached(&fetcher);
    let svg = String::from_utf8(renderer.render(&RenderRequest::new("https://example.com/"))?)?;
    assert!(svg.contains("<svg"));
    assert!(!svg.contains("<rect"));
    Ok(())
}

#[test]
fn fetch_failures_surface_as_render_errors() {
    let renderer = Renderer::from_config(&ColourlConfig::default());
    let err = renderer
        .render(&RenderRequest::new("https://example.com/"))
        .unwrap_err();
    assert!(matches!(err, RenderError::Fetch(FetchError::UnsupportedScheme { .. })));
}
