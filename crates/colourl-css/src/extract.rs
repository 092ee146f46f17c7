use ego_tree::iter::Edge;
use scraper::{Html, Node};
use tracing::{debug, warn};

use crate::color::{Rgb, recognize};
use crate::context::Context;
use crate::error::ExtractError;
use crate::grammar::{CssEvent, declaration_events, stylesheet_events};

/// One color-bearing declaration found in a document or stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMention {
    pub color: Rgb,
    pub property: String,
    pub selector: String,
}

impl ColorMention {
    pub fn new(color: Rgb, property: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            color,
            property: property.into(),
            selector: selector.into(),
        }
    }
}

/// Walk an HTML document and collect colors from `style` attributes and
/// `<style>` elements, in document order.
///
/// Inline declarations are attributed to the element's ancestor path
/// (`html > body > div#id.class`); `<style>` rules keep their own selectors.
/// Malformed markup never fails: the parser repairs it the way browsers do.
pub fn extract_from_document(html: &str) -> Result<Vec<ColorMention>, ExtractError> {
    let document = Html::parse_document(html);
    let mut context = Context::new();
    let mut mentions = Vec::new();

    for edge in document.tree.root().traverse() {
        match edge {
            Edge::Open(node) => {
                let Node::Element(element) = node.value() else {
                    continue;
                };
                context.push(Context::fragment_for(
                    element.name(),
                    element.attr("id"),
                    element.attr("class"),
                ));
                if let Some(style) = element.attr("style") {
                    mentions.extend(extract_from_declarations(style, &context.render()));
                }
                if element.name() == "style" {
                    let mut css = String::new();
                    for child in node.children() {
                        if let Some(text) = child.value().as_text() {
                            css.push_str(text);
                        }
                    }
                    mentions.extend(extract_from_stylesheet(&css));
                }
            }
            Edge::Close(node) => {
                if !node.value().is_element() {
                    continue;
                }
                if let Err(err) = context.pop() {
                    warn!(error = %err, "unbalanced element while walking document");
                }
            }
        }
    }

    debug!(mentions = mentions.len(), "extracted colors from document");
    Ok(mentions)
}

/// Like [`extract_from_document`] for raw bytes. Fails when the bytes are not
/// UTF-8.
pub fn extract_from_document_bytes(bytes: &[u8]) -> Result<Vec<ColorMention>, ExtractError> {
    let html = std::str::from_utf8(bytes).map_err(|err| ExtractError::Parse {
        reason: err.to_string(),
    })?;
    extract_from_document(html)
}

/// Collect colors from every ruleset of a stylesheet. Each mention carries the
/// selector of the ruleset it was declared in.
pub fn extract_from_stylesheet(css: &str) -> Vec<ColorMention> {
    let mut selector = String::new();
    let mut mentions = Vec::new();
    for event in stylesheet_events(css) {
        match event {
            CssEvent::BeginRuleset { selector: opened } => selector = opened,
            CssEvent::Declaration { property, value } => {
                if let Some(color) = recognize(&value) {
                    mentions.push(ColorMention::new(color, property, selector.clone()));
                }
            }
            CssEvent::End => break,
            CssEvent::EndRuleset | CssEvent::Ignored => {}
        }
    }
    mentions
}

/// Collect colors from a bare declaration list (a `style` attribute), all
/// attributed to `selector`.
pub fn extract_from_declarations(css: &str, selector: &str) -> Vec<ColorMention> {
    let mut mentions = Vec::new();
    for event in declaration_events(css) {
        match event {
            CssEvent::Declaration { property, value } => {
                if let Some(color) = recognize(&value) {
                    mentions.push(ColorMention::new(color, property, selector));
                }
            }
            CssEvent::End => break,
            _ => {}
        }
    }
    mentions
}

/// Document mentions followed by the mentions of each external stylesheet,
/// in the order given.
pub fn extract_from_page<S: AsRef<str>>(
    html: &str,
    stylesheets: &[S],
) -> Result<Vec<ColorMention>, ExtractError> {
    let mut mentions = extract_from_document(html)?;
    for sheet in stylesheets {
        mentions.extend(extract_from_stylesheet(sheet.as_ref()));
    }
    Ok(mentions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_style_uses_ancestor_path() {
        let mentions =
            extract_from_document(r#"<div id="x" class="a b" style="color: teal"></div>"#).unwrap();
        assert_eq!(
            mentions,
            vec![ColorMention::new(
                Rgb::new(0, 0x80, 0x80),
                "color",
                "html > body > div#x.a.b"
            )]
        );
    }

    #[test]
    fn declarations_without_colors_are_skipped() {
        let mentions = extract_from_declarations("margin: 0; color: #fff; width: 10px", "p");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].property, "color");
        assert_eq!(mentions[0].selector, "p");
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = extract_from_document_bytes(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }
}
