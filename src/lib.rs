//! colourl: summarize the colors of a web page as an SVG palette.
//!
//! The heavy lifting lives in the member crates; this crate frames render
//! requests and wires fetching, extraction, grouping and painting together.

pub mod pipeline;
pub mod request;

pub use colourl_config::ColourlConfig;
pub use colourl_css::{ColorMention, Rgb};
pub use colourl_palette::{PaintJob, Painter, Palette, Scorer};
pub use pipeline::{RenderError, Renderer};
pub use request::{RenderRequest, RequestDefaults, RequestError};
