//! Palette construction and rendering.
//!
//! Color mentions from `colourl-css` are grouped into a scored [`Palette`],
//! trimmed of boring colors, and painted as an SVG document.

pub mod group;
pub mod paint;
pub mod score;
pub mod svg;
pub mod trim;

pub use group::{ColorScore, Palette, group};
pub use paint::{PaintError, PaintJob, Painter, paint};
pub use score::Scorer;
pub use trim::{is_boring, trim};
