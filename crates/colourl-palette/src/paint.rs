use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::group::Palette;
use crate::svg::SvgDocument;
use crate::trim::trim;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    #[error("invalid paint job: width={width} height={height} max={max}")]
    InvalidJob { width: u32, height: u32, max: usize },
}

/// Canvas size and number of colors to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaintJob {
    width: u32,
    height: u32,
    max: usize,
}

impl PaintJob {
    pub fn new(width: u32, height: u32, max: usize) -> Result<Self, PaintError> {
        if width == 0 || height == 0 || max == 0 {
            return Err(PaintError::InvalidJob { width, height, max });
        }
        Ok(Self { width, height, max })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

/// Ways of laying out a palette on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Painter {
    /// Side-by-side vertical stripes, left to right.
    #[default]
    BandHorizontal,
    /// Stacked horizontal stripes, top to bottom.
    BandVertical,
    /// Concentric circles, top-ranked color outermost.
    Circle,
    /// Concentric circles, top-ranked color innermost.
    CircleReverse,
}

impl Painter {
    pub const ALL: [Painter; 4] = [
        Painter::BandHorizontal,
        Painter::BandVertical,
        Painter::Circle,
        Painter::CircleReverse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Painter::BandHorizontal => "band",
            Painter::BandVertical => "band-vertical",
            Painter::Circle => "circle",
            Painter::CircleReverse => "circle-reverse",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|painter| painter.name() == name)
    }

    /// Trim `palette` to `job.max()` colors and draw it.
    pub fn paint(&self, palette: &Palette, job: &PaintJob) -> Vec<u8> {
        paint(palette, *self, job)
    }
}

impl fmt::Display for Painter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render `palette` as a complete SVG document of `job.width() x job.height()`.
pub fn paint(palette: &Palette, painter: Painter, job: &PaintJob) -> Vec<u8> {
    let trimmed = trim(palette, job.max);
    let mut doc = SvgDocument::new(job.width, job.height);
    match painter {
        Painter::BandHorizontal => paint_bands(&mut doc, &trimmed, job, Axis::X),
        Painter::BandVertical => paint_bands(&mut doc, &trimmed, job, Axis::Y),
        Painter::Circle => paint_circles(&mut doc, &trimmed, job, false),
        Painter::CircleReverse => paint_circles(&mut doc, &trimmed, job, true),
    }
    debug!(
        painter = painter.name(),
        colors = trimmed.len(),
        width = job.width,
        height = job.height,
        "painted palette"
    );
    doc.finish()
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Fraction of the total each entry receives. Negative scores count as zero;
/// when nothing is left every entry gets the same share.
fn shares(palette: &Palette) -> Vec<f64> {
    let weights: Vec<f64> = palette.iter().map(|c| c.score.max(0) as f64).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        let even = 1.0 / weights.len().max(1) as f64;
        return vec![even; weights.len()];
    }
    weights.into_iter().map(|w| w / total).collect()
}

fn paint_bands(doc: &mut SvgDocument, palette: &Palette, job: &PaintJob, axis: Axis) {
    let (extent, across) = match axis {
        Axis::X => (job.width, job.height),
        Axis::Y => (job.height, job.width),
    };
    let shares = shares(palette);
    let last = shares.len().saturating_sub(1);
    let mut cumulative = 0.0;
    let mut start = 0u32;
    for (i, (entry, share)) in palette.iter().zip(&shares).enumerate() {
        cumulative += share;
        let end = if i == last {
            extent
        } else {
            ((cumulative * f64::from(extent)).round() as u32).min(extent)
        };
        if end > start {
            let (offset, length) = (f64::from(start), f64::from(end - start));
            match axis {
                Axis::X => doc.rect(offset, 0.0, length, f64::from(across), entry.color),
                Axis::Y => doc.rect(0.0, offset, f64::from(across), length, entry.color),
            }
        }
        start = start.max(end);
    }
}

fn paint_circles(doc: &mut SvgDocument, palette: &Palette, job: &PaintJob, reverse: bool) {
    let half_width = f64::from(job.width) / 2.0;
    let (cx, cy) = (half_width, f64::from(job.height) / 2.0);
    let mut entries: Vec<_> = palette.iter().zip(shares(palette)).collect();
    if reverse {
        entries.reverse();
    }
    let mut radius = half_width;
    for (entry, share) in entries {
        doc.circle(cx, cy, radius.max(0.0), entry.color);
        radius -= share * half_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::ColorScore;
    use colourl_css::Rgb;

    fn palette(entries: &[(&str, i64)]) -> Palette {
        Palette::from_scores(
            entries
                .iter()
                .map(|(hex, score)| ColorScore::new(Rgb::from_hex(hex).unwrap(), *score))
                .collect(),
        )
    }

    fn svg(palette: &Palette, painter: Painter, w: u32, h: u32, max: usize) -> String {
        let job = PaintJob::new(w, h, max).unwrap();
        String::from_utf8(paint(palette, painter, &job)).unwrap()
    }

    #[test]
    fn job_rejects_zero_values() {
        assert!(PaintJob::new(0, 10, 1).is_err());
        assert!(PaintJob::new(10, 0, 1).is_err());
        assert_eq!(
            PaintJob::new(10, 10, 0),
            Err(PaintError::InvalidJob {
                width: 10,
                height: 10,
                max: 0
            })
        );
    }

    #[test]
    fn single_color_band_covers_canvas() {
        let out = svg(&palette(&[("#ff0000", 1)]), Painter::BandHorizontal, 100, 50, 1);
        assert_eq!(out.matches("<rect").count(), 1);
        assert!(out.contains(r##"<rect x="0" y="0" width="100" height="50" fill="#ff0000"/>"##));
    }

    #[test]
    fn band_edges_are_cumulative_and_end_at_width() {
        let p = palette(&[("#ff0000", 1), ("#00ff00", 1), ("#0000ff", 1)]);
        let out = svg(&p, Painter::BandHorizontal, 100, 10, 3);
        assert!(out.contains(r##"<rect x="0" y="0" width="33" height="10" fill="#ff0000"/>"##));
        assert!(out.contains(r##"<rect x="33" y="0" width="34" height="10" fill="#00ff00"/>"##));
        assert!(out.contains(r##"<rect x="67" y="0" width="33" height="10" fill="#0000ff"/>"##));
    }

    #[test]
    fn vertical_bands_split_height() {
        let p = palette(&[("#ff0000", 3), ("#0000ff", 1)]);
        let out = svg(&p, Painter::BandVertical, 10, 100, 2);
        assert!(out.contains(r##"<rect x="0" y="0" width="10" height="75" fill="#ff0000"/>"##));
        assert!(out.contains(r##"<rect x="0" y="75" width="10" height="25" fill="#0000ff"/>"##));
    }

    #[test]
    fn circles_shrink_by_share() {
        let p = palette(&[("#ff0000", 3), ("#0000ff", 1)]);
        let out = svg(&p, Painter::Circle, 100, 80, 2);
        assert!(out.contains(r##"<circle cx="50" cy="40" r="50" fill="#ff0000"/>"##));
        assert!(out.contains(r##"<circle cx="50" cy="40" r="12.5" fill="#0000ff"/>"##));
    }

    #[test]
    fn reverse_circles_put_top_color_inside() {
        let p = palette(&[("#ff0000", 3), ("#0000ff", 1)]);
        let out = svg(&p, Painter::CircleReverse, 100, 100, 2);
        assert!(out.contains(r##"<circle cx="50" cy="50" r="50" fill="#0000ff"/>"##));
        assert!(out.contains(r##"<circle cx="50" cy="50" r="37.5" fill="#ff0000"/>"##));
        let outer = out.find("#0000ff").unwrap();
        let inner = out.find("#ff0000").unwrap();
        assert!(outer < inner);
    }

    #[test]
    fn zero_scores_share_evenly() {
        let p = palette(&[("#ff0000", 0), ("#0000ff", 0)]);
        let out = svg(&p, Painter::BandHorizontal, 10, 10, 2);
        assert!(out.contains(r##"<rect x="0" y="0" width="5" height="10" fill="#ff0000"/>"##));
        assert!(out.contains(r##"<rect x="5" y="0" width="5" height="10" fill="#0000ff"/>"##));
    }

    #[test]
    fn empty_palette_is_an_empty_document() {
        let out = svg(&Palette::default(), Painter::Circle, 10, 10, 5);
        assert!(out.contains("<svg"));
        assert!(!out.contains("<circle"));
        assert!(out.ends_with("</svg>\n"));
    }

    #[test]
    fn painting_is_deterministic() {
        let p = palette(&[("#ff0000", 4), ("#00aa00", 2), ("#0000ff", 1)]);
        let job = PaintJob::new(320, 200, 3).unwrap();
        for painter in Painter::ALL {
            assert_eq!(paint(&p, painter, &job), paint(&p, painter, &job));
        }
    }

    #[test]
    fn registry_names_round_trip() {
        for painter in Painter::ALL {
            assert_eq!(Painter::from_name(painter.name()), Some(painter));
        }
        assert_eq!(Painter::from_name("square"), None);
    }
}
