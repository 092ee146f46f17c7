use ::palette::{FromColor, Hsv, Lab, Srgb};
use colourl_css::Rgb;

use crate::group::{ColorScore, Palette};

/// Below this HSV saturation a color reads as gray.
const MIN_SATURATION: f32 = 0.10;
/// CIE76 distance (L in 0..=1) under which a color counts as white or black.
const MAX_EXTREME_DISTANCE: f32 = 0.05;

/// Reduce `palette` to at most `max` colors, skipping boring colors while
/// there are enough candidates left to fill the remaining slots.
///
/// The result keeps palette order and has exactly `min(max, len)` entries.
/// Once the number of remaining candidates equals the number of open slots,
/// every remaining candidate is taken.
pub fn trim(palette: &Palette, max: usize) -> Palette {
    let count = palette.len();
    let budget = max.min(count);
    let mut selected: Vec<ColorScore> = Vec::with_capacity(budget);
    for (i, entry) in palette.iter().enumerate() {
        if selected.len() == budget {
            break;
        }
        let spare = count - i > budget - selected.len();
        if spare && is_boring(entry.color) {
            continue;
        }
        selected.push(*entry);
    }
    Palette::from_ordered(selected)
}

/// Low saturation, or close to pure white or pure black.
pub fn is_boring(color: Rgb) -> bool {
    let srgb = to_srgb(color);
    let hsv: Hsv = Hsv::from_color(srgb);
    if hsv.saturation < MIN_SATURATION {
        return true;
    }
    let lab: Lab = Lab::from_color(srgb);
    lab_distance(lab, to_lab(Rgb::WHITE)) <= MAX_EXTREME_DISTANCE
        || lab_distance(lab, to_lab(Rgb::BLACK)) <= MAX_EXTREME_DISTANCE
}

fn to_srgb(color: Rgb) -> Srgb {
    Srgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
    )
}

fn to_lab(color: Rgb) -> Lab {
    Lab::from_color(to_srgb(color))
}

// `palette` reports L in 0..=100; distances here use L in 0..=1.
fn lab_distance(a: Lab, b: Lab) -> f32 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt() / 100.0
}
