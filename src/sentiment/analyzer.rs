//! Lexicon-based polarity analyzers

use std::collections::HashMap;

/// Produces a compound polarity in [-1, 1] for a piece of text
pub trait PolarityAnalyzer {
    fn compound(&self, text: &str) -> f64;
}

/// VADER (Valence Aware Dictionary and sEntiment Reasoner) analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderAnalyzer;

impl VaderAnalyzer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PolarityAnalyzer for VaderAnalyzer {
    fn compound(&self, text: &str) -> f64 {
        // The analyzer only borrows the crate's static lexicons
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

/// Fixed polarities keyed by exact text, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct StaticAnalyzer {
    scores: HashMap<String, f64>,
    fallback: f64,
}

impl StaticAnalyzer {
    #[must_use]
    pub fn new(fallback: f64) -> Self {
        Self {
            scores: HashMap::new(),
            fallback,
        }
    }

    #[must_use]
    pub fn with(mut self, text: impl Into<String>, polarity: f64) -> Self {
        self.scores.insert(text.into(), polarity);
        self
    }
}

impl PolarityAnalyzer for StaticAnalyzer {
    fn compound(&self, text: &str) -> f64 {
        self.scores.get(text).copied().unwrap_or(self.fallback)
    }
}
