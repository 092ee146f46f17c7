use std::time::Duration;

use colourl_config::ColourlConfig;
use colourl_css::{ExtractError, extract_from_page};
use colourl_io::{
    FetchError, FetchLimits, FileFetcher, MemoryCache, NoCache, PageFetcher, ResponseCache,
};
use colourl_palette::{PaintError, Palette, Scorer, group, paint};
use thiserror::Error;
use tracing::{debug, warn};

use crate::request::{RenderRequest, RequestError};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to extract colors: {0}")]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Paint(#[from] PaintError),
}

/// Runs fetch, extraction, grouping and painting for render requests, caching
/// the resulting images by request key.
#[derive(Debug)]
pub struct Renderer<F, C = NoCache> {
    fetcher: F,
    cache: C,
    scorer: Scorer,
}

impl<F: PageFetcher> Renderer<F, NoCache> {
    pub fn uncached(fetcher: F) -> Self {
        Self::new(fetcher, NoCache)
    }
}

impl Renderer<FileFetcher, MemoryCache> {
    /// Local-file renderer with limits, scorer and cache taken from `config`.
    pub fn from_config(config: &ColourlConfig) -> Self {
        let limits = FetchLimits {
            max_page_size: config.limits.max_page_size,
            max_file_count: config.limits.max_file_count,
            max_file_size: config.limits.max_file_size,
        };
        let cache = MemoryCache::new(
            config.cache.capacity,
            Duration::from_secs(config.cache.ttl_secs),
        );
        let scorer = Scorer::from_name(&config.render.scorer).unwrap_or_else(|| {
            warn!(scorer = %config.render.scorer, "unknown scorer, using sum");
            Scorer::Sum
        });
        Self::new(FileFetcher::new(limits), cache).with_scorer(scorer)
    }
}

impl<F: PageFetcher, C: ResponseCache> Renderer<F, C> {
    pub fn new(fetcher: F, cache: C) -> Self {
        Self {
            fetcher,
            cache,
            scorer: Scorer::default(),
        }
    }

    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn scorer(&self) -> Scorer {
        self.scorer
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Fetch `location` and build its full, untrimmed palette.
    pub fn palette(&self, location: &str) -> Result<Palette, RenderError> {
        let page = self.fetcher.fetch(location)?;
        let mentions = extract_from_page(&page.html.body, &page.stylesheets())?;
        Ok(group(&mentions, self.scorer))
    }

    /// Produce the SVG for `request`, serving it from the cache when present.
    pub fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let key = request.cache_key();
        if let Some(svg) = self.cache.get(&key) {
            debug!(key = %key, "render served from cache");
            return Ok(svg);
        }

        let job = request.job()?;
        let palette = self.palette(&request.url)?;
        let svg = paint(&palette, request.painter, &job);
        debug!(
            key = %key,
            colors = palette.len(),
            bytes = svg.len(),
            "rendered palette"
        );

        if let Err(err) = self.cache.set(&key, svg.clone()) {
            warn!(key = %key, error = %err, "could not cache rendered palette");
        }
        Ok(svg)
    }
}
