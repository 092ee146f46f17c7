//! Page loading and response caching for colourl.
//!
//! A [`PageFetcher`] turns a location into a [`Page`]: the HTML document plus
//! the stylesheets it links to. A [`ResponseCache`] stores rendered output by
//! request key.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod page;

pub use cache::{MemoryCache, NoCache, ResponseCache};
pub use error::{CacheError, FetchError};
pub use fetch::FileFetcher;
pub use page::{FetchLimits, File, Page, PageFetcher, stylesheet_links};
