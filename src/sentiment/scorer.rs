//! Blending star ratings with text polarity

use super::analyzer::PolarityAnalyzer;
use crate::models::ReviewRecord;
use crate::models::ScoredRecord;

pub const WEIGHT_USER_RATING: f64 = 0.5;
pub const WEIGHT_TEXT_SENTIMENT: f64 = 0.5;

const POLARITY_DECIMALS: i32 = 4;
const RATING_DECIMALS: i32 = 2;

/// Map a polarity in [-1, 1] onto the 1–5 star scale: -1 → 1, 0 → 3, +1 → 5
#[must_use]
pub fn implied_rating(polarity: f64) -> f64 {
    2.0f64.mul_add(polarity, 3.0).clamp(1.0, 5.0)
}

/// Convex combination of the reviewer's stars and the text-implied rating
#[must_use]
pub fn weighted_score(star_rating: u8, implied_rating: f64) -> f64 {
    f64::from(star_rating) * WEIGHT_USER_RATING + implied_rating * WEIGHT_TEXT_SENTIMENT
}

/// Round half away from zero to `decimals` places
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Scores review records with a polarity analyzer
pub struct Scorer<A> {
    analyzer: A,
}

impl<A: PolarityAnalyzer> Scorer<A> {
    pub const fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    /// Compound polarity of `text`; exactly 0.0 for empty or whitespace-only text
    pub fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let polarity = self.analyzer.compound(text);
        if polarity.is_finite() {
            polarity
        } else {
            tracing::warn!("Analyzer returned non-finite polarity, treating as neutral");
            0.0
        }
    }

    pub fn score(&self, review: ReviewRecord) -> ScoredRecord {
        let polarity = self.polarity(&review.text);
        let implied = implied_rating(polarity);
        let weighted = weighted_score(review.star_rating, implied);

        ScoredRecord {
            review,
            sentiment_polarity: round_to(polarity, POLARITY_DECIMALS),
            implied_rating: round_to(implied, RATING_DECIMALS),
            weighted_score: round_to(weighted, RATING_DECIMALS),
        }
    }

    /// One scored record per input, in input order
    pub fn score_all(&self, reviews: Vec<ReviewRecord>) -> Vec<ScoredRecord> {
        reviews.into_iter().map(|review| self.score(review)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::StaticAnalyzer;
    use crate::sentiment::VaderAnalyzer;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_implied_rating_anchors() {
        assert!(approx(implied_rating(-1.0), 1.0));
        assert!(approx(implied_rating(0.0), 3.0));
        assert!(approx(implied_rating(1.0), 5.0));
        assert!(approx(implied_rating(0.25), 3.5));
    }

    #[test]
    fn test_implied_rating_clamps() {
        assert!(approx(implied_rating(-3.0), 1.0));
        assert!(approx(implied_rating(7.5), 5.0));
    }

    #[test]
    fn test_weighted_score() {
        assert!(approx(weighted_score(2, 4.0), 3.0));
        assert!(approx(weighted_score(1, 1.0), 1.0));
        assert!(approx(weighted_score(5, 5.0), 5.0));
    }

    #[test]
    fn test_weighted_score_bounds() {
        for stars in 1..=5u8 {
            for step in 0..=40 {
                let implied = 1.0 + f64::from(step) * 0.1;
                let score = weighted_score(stars, implied);
                assert!((1.0..=5.0).contains(&score), "{stars} {implied} -> {score}");
            }
        }
    }

    #[test]
    fn test_round_to() {
        assert!(approx(round_to(0.66963, 4), 0.6696));
        assert!(approx(round_to(4.33926, 2), 4.34));
        assert!(approx(round_to(-0.123_456, 4), -0.1235));
    }

    #[test]
    fn test_empty_and_whitespace_text_is_neutral() {
        // Fallback would make any analyzed text strongly negative
        let scorer = Scorer::new(StaticAnalyzer::new(-0.9));
        for text in ["", "   ", "\n\t "] {
            let scored = scorer.score(ReviewRecord::new("pets", "acme", text, 4));
            assert!(approx(scored.sentiment_polarity, 0.0));
            assert!(approx(scored.implied_rating, 3.0));
            assert!(approx(scored.weighted_score, 3.5));
        }
    }

    #[test]
    fn test_empty_review_with_one_star() {
        let scorer = Scorer::new(VaderAnalyzer::new());
        let scored = scorer.score(ReviewRecord::new("pets", "acme", "", 1));
        assert!(approx(scored.sentiment_polarity, 0.0));
        assert!(approx(scored.implied_rating, 3.0));
        assert!(approx(scored.weighted_score, 2.0));
    }

    #[test]
    fn test_positive_review_scores_near_five() {
        let scorer = Scorer::new(VaderAnalyzer::new());
        let scored = scorer.score(ReviewRecord::new("pets", "acme", "I love this product!", 5));

        assert!(scored.sentiment_polarity > 0.5);
        assert!(scored.implied_rating > 4.0);
        assert!(scored.weighted_score > 4.5);
        assert_eq!(scored.review.brand, "acme");
        assert_eq!(scored.review.text, "I love this product!");
    }

    #[test]
    fn test_rounding_applied_to_stored_values() {
        let scorer = Scorer::new(StaticAnalyzer::new(0.123_456_789));
        let scored = scorer.score(ReviewRecord::new("pets", "acme", "fine", 3));

        assert!(approx(scored.sentiment_polarity, 0.1235));
        // 2 * 0.123456789 + 3 = 3.246913578
        assert!(approx(scored.implied_rating, 3.25));
        // 0.5 * 3 + 0.5 * 3.246913578 = 3.123456789
        assert!(approx(scored.weighted_score, 3.12));
    }

    #[test]
    fn test_non_finite_polarity_is_neutral() {
        let scorer = Scorer::new(StaticAnalyzer::new(f64::NAN));
        let scored = scorer.score(ReviewRecord::new("pets", "acme", "???", 5));
        assert!(approx(scored.implied_rating, 3.0));
        assert!(approx(scored.weighted_score, 4.0));
    }

    #[test]
    fn test_score_all_preserves_order_and_count() {
        let scorer = Scorer::new(
            StaticAnalyzer::new(0.0)
                .with("great", 0.8)
                .with("awful", -0.8),
        );
        let reviews = vec![
            ReviewRecord::new("pets", "a", "great", 5),
            ReviewRecord::new("pets", "b", "", 2),
            ReviewRecord::new("pets", "c", "awful", 1),
        ];

        let scored = scorer.score_all(reviews.clone());

        assert_eq!(scored.len(), reviews.len());
        for (out, input) in scored.iter().zip(&reviews) {
            assert_eq!(&out.review, input);
        }
        assert!(approx(scored[0].implied_rating, 4.6));
        assert!(approx(scored[2].implied_rating, 1.4));
    }
}
