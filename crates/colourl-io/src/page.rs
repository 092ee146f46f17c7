use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

use crate::error::FetchError;

/// Contents of one fetched file and the location it was requested from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub url: Url,
    pub body: String,
}

impl File {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }
}

/// An HTML document and the stylesheets it links to, in link order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub html: File,
    pub css: Vec<File>,
}

impl Page {
    pub fn new(html: File) -> Self {
        Self {
            html,
            css: Vec::new(),
        }
    }

    /// Number of files, HTML included.
    pub fn count(&self) -> usize {
        self.css.len() + 1
    }

    /// Combined body length of all files in bytes.
    pub fn size(&self) -> u64 {
        std::iter::once(&self.html)
            .chain(&self.css)
            .map(|file| file.body.len() as u64)
            .sum()
    }

    pub fn stylesheets(&self) -> Vec<&str> {
        self.css.iter().map(|file| file.body.as_str()).collect()
    }
}

/// Loads a page and its linked stylesheets.
pub trait PageFetcher {
    fn fetch(&self, location: &str) -> Result<Page, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, location: &str) -> Result<Page, FetchError> {
        (**self).fetch(location)
    }
}

/// Size limits applied while assembling a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Combined size of all files of a page.
    pub max_page_size: u64,
    /// Number of files per page, HTML included.
    pub max_file_count: usize,
    /// Size of any single file.
    pub max_file_size: u64,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_page_size: 10 * 1024 * 1024,
            max_file_count: 15,
            max_file_size: 5 * 1024 * 1024,
        }
    }
}

impl FetchLimits {
    /// Check whether a file of `length` bytes may be added to a page whose
    /// files already total `current` bytes.
    pub fn check_size(&self, current: u64, length: u64) -> Result<(), FetchError> {
        if length > self.max_file_size {
            return Err(FetchError::FileTooLarge {
                length,
                limit: self.max_file_size,
            });
        }
        if current.saturating_add(length) > self.max_page_size {
            return Err(FetchError::PageTooLarge {
                length,
                limit: self.max_page_size,
                current,
            });
        }
        Ok(())
    }
}

/// Targets of `<link rel="stylesheet" href="...">` elements, resolved
/// against `base`. Links that do not resolve are logged and skipped.
pub fn stylesheet_links(html: &str, base: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("link[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for link in document.select(&selector) {
        let element = link.value();
        let is_stylesheet = element.attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        });
        if !is_stylesheet {
            continue;
        }
        let Some(href) = element.attr("href") else {
            continue;
        };
        match base.join(href.trim()) {
            Ok(url) => links.push(url),
            Err(err) => warn!(href, error = %err, "could not resolve stylesheet link"),
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post.html").unwrap()
    }

    #[test]
    fn finds_stylesheet_links_in_order() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="/main.css">
            <link rel="icon" href="/favicon.ico">
            <link rel="alternate stylesheet" href="theme.css">
            <link href="print.css" rel="Stylesheet"/>
        </head></html>"#;
        let links: Vec<String> = stylesheet_links(html, &base())
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/main.css",
                "https://example.com/blog/theme.css",
                "https://example.com/blog/print.css",
            ]
        );
    }

    #[test]
    fn links_without_href_are_ignored() {
        let html = r#"<link rel="stylesheet"><link rel="stylesheet" href="">"#;
        let links = stylesheet_links(html, &base());
        assert_eq!(links, vec![base()]);
    }

    #[test]
    fn size_checks_file_then_page() {
        let limits = FetchLimits {
            max_page_size: 100,
            max_file_count: 3,
            max_file_size: 60,
        };
        assert!(limits.check_size(0, 60).is_ok());
        assert!(matches!(
            limits.check_size(0, 61),
            Err(FetchError::FileTooLarge { length: 61, limit: 60 })
        ));
        assert!(matches!(
            limits.check_size(50, 51),
            Err(FetchError::PageTooLarge { current: 50, .. })
        ));
        assert!(limits.check_size(50, 50).is_ok());
    }

    #[test]
    fn page_counts_html_and_css() {
        let mut page = Page::new(File::new(base(), "<p>"));
        assert_eq!(page.count(), 1);
        page.css.push(File::new(base(), "a{}"));
        assert_eq!(page.count(), 2);
        assert_eq!(page.size(), 6);
        assert_eq!(page.stylesheets(), vec!["a{}"]);
    }
}
