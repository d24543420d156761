//! Records exchanged between pipeline stages

use serde::Deserialize;
use serde::Serialize;

/// Lowest and highest star a reviewer can give
pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// One review as collected from a shop's review feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub category: String,
    pub brand: String,
    pub text: String,
    pub star_rating: u8,
}

impl ReviewRecord {
    pub fn new(
        category: impl Into<String>,
        brand: impl Into<String>,
        text: impl Into<String>,
        star_rating: u8,
    ) -> Self {
        Self {
            category: category.into(),
            brand: brand.into(),
            text: text.into(),
            star_rating,
        }
    }

    /// Whether the star value is within 1–5
    #[must_use]
    pub fn has_valid_rating(&self) -> bool {
        (MIN_STARS..=MAX_STARS).contains(&self.star_rating)
    }
}

/// A review plus its sentiment-derived scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub review: ReviewRecord,
    /// Compound lexicon polarity in [-1, 1], rounded to 4 places
    pub sentiment_polarity: f64,
    /// Polarity remapped onto 1–5, rounded to 2 places
    pub implied_rating: f64,
    /// Blend of the star rating and the implied rating, rounded to 2 places
    pub weighted_score: f64,
}

/// All reviews gathered for one category in a collection run
#[derive(Debug, Clone, Default)]
pub struct CategoryReviews {
    pub category: String,
    pub records: Vec<ReviewRecord>,
}

/// Scored records together with the file name they are stored under
#[derive(Debug, Clone, Default)]
pub struct ScoredFile {
    pub source: String,
    pub records: Vec<ScoredRecord>,
}

/// Metadata attached to every indexed review block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// File the record was read from
    pub source: String,
    pub brand: String,
    pub score: f64,
}

/// Rendered text block ready for embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}
