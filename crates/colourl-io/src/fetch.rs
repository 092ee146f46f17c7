use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;
use crate::page::{FetchLimits, File, Page, PageFetcher, stylesheet_links};

/// Reads pages from the local filesystem.
///
/// Accepts `file://` URLs and plain paths. Linked stylesheets are resolved
/// against the page location; only `file://` targets are read, others are
/// logged and skipped.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    limits: FetchLimits,
}

impl FileFetcher {
    pub fn new(limits: FetchLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &FetchLimits {
        &self.limits
    }

    /// Turn a location into a `file://` URL.
    pub fn resolve(&self, location: &str) -> Result<Url, FetchError> {
        match Url::parse(location) {
            Ok(url) if url.scheme() == "file" => Ok(url),
            // Single-letter schemes are Windows drive prefixes.
            Ok(url) if url.scheme().len() > 1 => Err(FetchError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
                url: location.to_string(),
            }),
            _ => {
                let path = Path::new(location);
                let absolute = path.canonicalize().map_err(|source| FetchError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Url::from_file_path(&absolute).map_err(|()| FetchError::UnsupportedScheme {
                    scheme: "file".to_string(),
                    url: location.to_string(),
                })
            }
        }
    }

    fn read(&self, url: &Url, current: u64) -> Result<File, FetchError> {
        let path = to_path(url)?;
        let io_err = |source| FetchError::Io {
            path: path.clone(),
            source,
        };
        // Reject early on the reported size, then again on what was read.
        let reported = std::fs::metadata(&path).map_err(io_err)?.len();
        self.limits.check_size(current, reported)?;
        let bytes = std::fs::read(&path).map_err(io_err)?;
        self.limits.check_size(current, bytes.len() as u64)?;
        let body = String::from_utf8(bytes).map_err(|_| FetchError::NotUtf8 {
            url: url.to_string(),
        })?;
        Ok(File::new(url.clone(), body))
    }
}

fn to_path(url: &Url) -> Result<PathBuf, FetchError> {
    if url.scheme() != "file" {
        return Err(FetchError::UnsupportedScheme {
            scheme: url.scheme().to_string(),
            url: url.to_string(),
        });
    }
    url.to_file_path()
        .map_err(|()| FetchError::UnsupportedScheme {
            scheme: url.scheme().to_string(),
            url: url.to_string(),
        })
}

impl PageFetcher for FileFetcher {
    fn fetch(&self, location: &str) -> Result<Page, FetchError> {
        let url = self.resolve(location)?;
        let mut page = Page::new(self.read(&url, 0)?);

        for link in stylesheet_links(&page.html.body, &page.html.url) {
            if page.count() >= self.limits.max_file_count {
                warn!(
                    page = %page.html.url,
                    limit = self.limits.max_file_count,
                    "file count limit reached, skipping remaining stylesheets"
                );
                break;
            }
            match self.read(&link, page.size()) {
                Ok(file) => page.css.push(file),
                Err(err) => warn!(
                    page = %page.html.url,
                    stylesheet = %link,
                    error = %err,
                    "could not read linked stylesheet"
                ),
            }
        }

        debug!(
            page = %page.html.url,
            files = page.count(),
            bytes = page.size(),
            "fetched page"
        );
        Ok(page)
    }
}
