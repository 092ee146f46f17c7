use colourl_css::ColorMention;

/// Weighs a single mention when grouping colors into a palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scorer {
    /// Every mention counts once, so colors rank by frequency.
    #[default]
    Sum,
    /// Backgrounds count double: they cover more of the page than text or borders.
    Property,
}

impl Scorer {
    pub const ALL: [Scorer; 2] = [Scorer::Sum, Scorer::Property];

    pub fn score(&self, mention: &ColorMention) -> i64 {
        match self {
            Scorer::Sum => 1,
            Scorer::Property => match mention.property.as_str() {
                "background-color" | "background" => 2,
                _ => 1,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scorer::Sum => "sum",
            Scorer::Property => "property",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scorer| scorer.name().eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colourl_css::Rgb;

    fn mention(property: &str) -> ColorMention {
        ColorMention::new(Rgb::BLACK, property, "body")
    }

    #[test]
    fn sum_counts_every_mention_once() {
        assert_eq!(Scorer::Sum.score(&mention("color")), 1);
        assert_eq!(Scorer::Sum.score(&mention("background-color")), 1);
    }

    #[test]
    fn property_weights_backgrounds() {
        assert_eq!(Scorer::Property.score(&mention("background-color")), 2);
        assert_eq!(Scorer::Property.score(&mention("background")), 2);
        assert_eq!(Scorer::Property.score(&mention("border-color")), 1);
    }

    #[test]
    fn names_round_trip() {
        for scorer in Scorer::ALL {
            assert_eq!(Scorer::from_name(scorer.name()), Some(scorer));
        }
        assert_eq!(Scorer::from_name("Property"), Some(Scorer::Property));
        assert_eq!(Scorer::from_name("median"), None);
    }
}
