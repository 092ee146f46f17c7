use std::collections::HashMap;
use std::fmt;

use colourl_css::{ColorMention, Rgb};
use tracing::debug;

use crate::score::Scorer;

/// Accumulated score of one distinct color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorScore {
    pub color: Rgb,
    pub score: i64,
}

impl ColorScore {
    pub fn new(color: Rgb, score: i64) -> Self {
        Self { color, score }
    }
}

impl fmt::Display for ColorScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.score)
    }
}

/// Distinct colors ordered by descending score. Equal scores are ordered by
/// descending canonical hex so the result never depends on input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    scores: Vec<ColorScore>,
}

impl Palette {
    /// Sort `scores` into palette order. Callers must not pass duplicate colors.
    pub fn from_scores(mut scores: Vec<ColorScore>) -> Self {
        scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| b.color.cmp(&a.color)));
        Self { scores }
    }

    /// Wrap entries that are already in palette order.
    pub(crate) fn from_ordered(scores: Vec<ColorScore>) -> Self {
        Self { scores }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorScore> {
        self.scores.iter()
    }

    pub fn as_slice(&self) -> &[ColorScore] {
        &self.scores
    }

    pub fn score_sum(&self) -> i64 {
        self.scores.iter().map(|entry| entry.score).sum()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a ColorScore;
    type IntoIter = std::slice::Iter<'a, ColorScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.scores.iter()
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, entry) in self.scores.iter().enumerate() {
            writeln!(f, "{} {}", rank + 1, entry)?;
        }
        Ok(())
    }
}

/// Group mentions by color, summing each mention's score.
pub fn group(mentions: &[ColorMention], scorer: Scorer) -> Palette {
    let mut index: HashMap<Rgb, usize> = HashMap::new();
    let mut scores: Vec<ColorScore> = Vec::new();
    for mention in mentions {
        let score = scorer.score(mention);
        match index.get(&mention.color) {
            Some(&slot) => scores[slot].score += score,
            None => {
                index.insert(mention.color, scores.len());
                scores.push(ColorScore::new(mention.color, score));
            }
        }
    }
    debug!(
        mentions = mentions.len(),
        colors = scores.len(),
        scorer = scorer.name(),
        "grouped color mentions"
    );
    Palette::from_scores(scores)
}
