//! Sentiment scoring stage
//!
//! Every review gets a lexicon polarity for its text, which is remapped onto
//! the 1–5 star scale and blended with the reviewer's own stars:
//!
//! ```text
//! implied  = clamp(2 * polarity + 3, 1, 5)
//! weighted = 0.5 * star_rating + 0.5 * implied
//! ```
//!
//! # Examples
//!
//! ```rust
//! use reviewrag::models::ReviewRecord;
//! use reviewrag::sentiment::Scorer;
//! use reviewrag::sentiment::VaderAnalyzer;
//!
//! let scorer = Scorer::new(VaderAnalyzer::new());
//! let scored = scorer.score(ReviewRecord::new("pets", "acme", "", 1));
//! assert_eq!(scored.weighted_score, 2.0);
//! ```

pub mod analyzer;
pub mod scorer;

use std::path::Path;

pub use analyzer::PolarityAnalyzer;
pub use analyzer::StaticAnalyzer;
pub use analyzer::VaderAnalyzer;
pub use scorer::implied_rating;
pub use scorer::weighted_score;
pub use scorer::Scorer;
use tracing::info;
use tracing::warn;

use crate::dataset;
use crate::dataset::StageReport;
use crate::models::CategoryReviews;
use crate::models::ScoredFile;
use crate::Result;

/// Prefix for scored output files
pub const OUTPUT_PREFIX: &str = "analyzed_";

/// Score every CSV in `input_dir` into `analyzed_<file>` under `output_dir`.
///
/// A file that fails to read or parse is logged and skipped as a whole; no
/// output is written for it and the remaining files are still processed.
pub fn score_directory<A: PolarityAnalyzer>(
    scorer: &Scorer<A>,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<StageReport> {
    let files = dataset::list_csv_files(input_dir)?;
    std::fs::create_dir_all(output_dir)?;
    info!(
        "Scoring {} file(s) from {} into {}",
        files.len(),
        input_dir.display(),
        output_dir.display()
    );

    let mut report = StageReport::default();
    for path in files {
        let name = dataset::file_name(&path);
        let output_path = output_dir.join(format!("{OUTPUT_PREFIX}{name}"));

        let result = dataset::read_reviews(&path)
            .map(|reviews| scorer.score_all(reviews))
            .and_then(|scored| {
                dataset::write_scored(&output_path, &scored)?;
                Ok(scored.len())
            });

        match result {
            Ok(count) => {
                info!("Scored {} reviews from {} -> {}", count, name, output_path.display());
                report.record_success(name, count);
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                report.record_skip(name, e);
            }
        }
    }

    Ok(report)
}

/// Score in-memory category record sets, writing each to
/// `analyzed_reviews_<category>.csv` and returning the scored sets.
///
/// A category whose file cannot be written is logged and left out of the
/// result; the others are still scored.
pub fn score_categories<A: PolarityAnalyzer>(
    scorer: &Scorer<A>,
    categories: Vec<CategoryReviews>,
    output_dir: &Path,
) -> Result<(Vec<ScoredFile>, StageReport)> {
    std::fs::create_dir_all(output_dir)?;
    let mut report = StageReport::default();
    let mut scored_files = Vec::new();

    for reviews in categories {
        if reviews.records.is_empty() {
            continue;
        }
        let source = format!("{OUTPUT_PREFIX}reviews_{}.csv", reviews.category);
        let scored = scorer.score_all(reviews.records);
        if let Err(e) = dataset::write_scored(&output_dir.join(&source), &scored) {
            warn!("Skipping {}: {}", source, e);
            report.record_skip(source, e);
            continue;
        }
        info!("Scored {} reviews for '{}'", scored.len(), reviews.category);
        report.record_success(source.clone(), scored.len());
        scored_files.push(ScoredFile {
            source,
            records: scored,
        });
    }

    Ok((scored_files, report))
}
