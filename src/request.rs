use std::borrow::Borrow;
use std::fmt;

use colourl_config::RenderConfig;
use colourl_palette::{PaintError, PaintJob, Painter};
use thiserror::Error;

pub const MIN_COLORS: usize = 1;
pub const MAX_COLORS: usize = 64;
pub const MIN_SIZE: u32 = 1;
pub const MAX_SIZE: u32 = 4096;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("missing required parameter 'url'")]
    MissingUrl,
}

/// Values used for parameters a request leaves out or gets wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDefaults {
    pub painter: Painter,
    pub max: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            painter: Painter::BandHorizontal,
            max: 5,
            width: 512,
            height: 512,
        }
    }
}

impl RequestDefaults {
    /// Defaults taken from the `[render]` config section. An unknown style
    /// name keeps the horizontal band painter.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            painter: Painter::from_name(&config.style).unwrap_or_default(),
            max: clamp_count(config.max as i64),
            width: clamp_size(i64::from(config.width)),
            height: clamp_size(i64::from(config.height)),
        }
    }
}

/// A palette image request: which page, how to paint it and at what size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub url: String,
    pub painter: Painter,
    pub max: usize,
    pub width: u32,
    pub height: u32,
}

impl RenderRequest {
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = RequestDefaults::default();
        Self {
            url: url.into(),
            painter: defaults.painter,
            max: defaults.max,
            width: defaults.width,
            height: defaults.height,
        }
    }

    /// Build a request from `key=value` pairs (`url`, `style`, `max`, `w`, `h`).
    ///
    /// Missing or unparseable numbers take their default, out-of-range numbers
    /// are clamped and unknown styles fall back to the default painter. Only a
    /// missing `url` is an error.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Borrow<str>,
        V: Borrow<str>,
    {
        Self::from_pairs_with(pairs, &RequestDefaults::default())
    }

    pub fn from_pairs_with<I, K, V>(pairs: I, defaults: &RequestDefaults) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Borrow<str>,
        V: Borrow<str>,
    {
        let mut url = None;
        let mut request = Self::new(String::new())
            .with_style(None, defaults)
            .with_max(defaults.max)
            .with_size(defaults.width, defaults.height);

        for (key, value) in pairs {
            let key: &str = key.borrow();
            let value: &str = value.borrow();
            let value = value.trim();
            match key {
                "url" if !value.is_empty() => url = Some(value.to_string()),
                "style" => request = request.with_style(Some(value), defaults),
                "max" => request.max = parse_number(value).map_or(defaults.max, clamp_count),
                "w" => request.width = parse_number(value).map_or(defaults.width, clamp_size),
                "h" => request.height = parse_number(value).map_or(defaults.height, clamp_size),
                _ => {}
            }
        }

        request.url = url.ok_or(RequestError::MissingUrl)?;
        Ok(request)
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    pub fn from_query(query: &str) -> Result<Self, RequestError> {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Look up a painter by name, falling back to the default painter.
    pub fn with_style(mut self, style: Option<&str>, defaults: &RequestDefaults) -> Self {
        self.painter = style
            .and_then(Painter::from_name)
            .unwrap_or(defaults.painter);
        self
    }

    pub fn with_painter(mut self, painter: Painter) -> Self {
        self.painter = painter;
        self
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = clamp_count(i64::try_from(max).unwrap_or(i64::MAX));
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = clamp_size(i64::from(width));
        self.height = clamp_size(i64::from(height));
        self
    }

    pub fn job(&self) -> Result<PaintJob, PaintError> {
        PaintJob::new(self.width, self.height, self.max)
    }

    /// Key identifying the rendered image: `{url}|{style}|{max}|{w}x{h}`.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}x{}",
            self.url,
            self.painter.name(),
            self.max,
            self.width,
            self.height
        )
    }
}

impl fmt::Display for RenderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

fn parse_number(value: &str) -> Option<i64> {
    value.parse().ok()
}

fn clamp_count(value: i64) -> usize {
    value.clamp(MIN_COLORS as i64, MAX_COLORS as i64) as usize
}

fn clamp_size(value: i64) -> u32 {
    value.clamp(i64::from(MIN_SIZE), i64::from(MAX_SIZE)) as u32
}
