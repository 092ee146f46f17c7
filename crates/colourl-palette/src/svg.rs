//! Minimal SVG document writer for palette shapes.

use std::fmt::Write as _;

use colourl_css::Rgb;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// An SVG document under construction. Shapes are written in call order, so
/// later shapes paint over earlier ones.
#[derive(Debug)]
pub struct SvgDocument {
    buf: String,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        let mut buf = String::with_capacity(256);
        buf.push_str(XML_HEADER);
        buf.push('\n');
        let _ = writeln!(
            buf,
            r#"<svg xmlns="{SVG_NS}" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        Self { buf }
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Rgb) {
        let _ = writeln!(
            self.buf,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"/>"#,
            number(x),
            number(y),
            number(width),
            number(height),
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Rgb) {
        let _ = writeln!(
            self.buf,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{fill}"/>"#,
            number(cx),
            number(cy),
            number(r),
        );
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf.push_str("</svg>\n");
        self.buf.into_bytes()
    }
}

/// Format with at most two decimals and no trailing zeros.
fn number(value: f64) -> String {
    let mut text = format!("{value:.2}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(number(100.0), "100");
        assert_eq!(number(12.5), "12.5");
        assert_eq!(number(1.0 / 3.0), "0.33");
        assert_eq!(number(-0.001), "0");
    }

    #[test]
    fn document_wraps_shapes() {
        let mut doc = SvgDocument::new(10, 20);
        doc.rect(0.0, 0.0, 10.0, 20.0, Rgb::new(0xff, 0, 0));
        doc.circle(5.0, 10.0, 2.5, Rgb::BLACK);
        let text = String::from_utf8(doc.finish()).unwrap();
        assert!(text.starts_with(XML_HEADER));
        assert!(text.contains(r#"width="10" height="20" viewBox="0 0 10 20""#));
        assert!(text.contains(r##"<rect x="0" y="0" width="10" height="20" fill="#ff0000"/>"##));
        assert!(text.contains(r##"<circle cx="5" cy="10" r="2.5" fill="#000000"/>"##));
        assert!(text.ends_with("</svg>\n"));
    }
}
