//! Color extraction from HTML documents and CSS stylesheets.
//!
//! The entry points are [`extract_from_document`] and [`extract_from_stylesheet`],
//! which produce [`ColorMention`]s in source order. Mentions are later grouped
//! into a palette by `colourl-palette`.

pub mod color;
pub mod context;
pub mod error;
pub mod extract;
pub mod grammar;

pub use color::{Rgb, recognize};
pub use context::Context;
pub use error::{ContextError, ExtractError};
pub use extract::{
    ColorMention, extract_from_declarations, extract_from_document, extract_from_document_bytes,
    extract_from_page, extract_from_stylesheet,
};
pub use grammar::{CssEvent, declaration_events, stylesheet_events};
