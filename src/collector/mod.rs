//! Review collection stage
//!
//! Two traversal levels: a category listing yields up to
//! `max_shops_per_category` shop links, and each shop's review feed is paged
//! until `target_reviews_per_shop` reviews are gathered. Requests are strictly
//! sequential with a random pause between pages and between shops; there is
//! no retry, and a failed fetch ends that shop early while keeping what was
//! already collected.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reviewrag::collector::ReviewCollector;
//! use reviewrag::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let collector = ReviewCollector::new(config.collector.clone())?;
//!     let report = reviewrag::collector::collect_directory(&collector, &config.collector.output_dir).await?;
//!     println!("Collected {} reviews", report.total_records());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod extract;

use std::path::Path;
use std::path::PathBuf;

pub use client::ReviewCollector;
pub use extract::PageParser;
use tracing::info;
use tracing::warn;

use crate::dataset;
use crate::dataset::StageReport;
use crate::models::CategoryReviews;
use crate::Result;

/// Output file for one category, e.g. `reviews_animals_pets.csv`
#[must_use]
pub fn category_file(output_dir: &Path, category: &str) -> PathBuf {
    output_dir.join(format!("reviews_{category}.csv"))
}

/// Write each non-empty category to its own review file
pub fn write_categories(categories: &[CategoryReviews], output_dir: &Path) -> Result<StageReport> {
    std::fs::create_dir_all(output_dir)?;
    let mut report = StageReport::default();

    for reviews in categories {
        let path = category_file(output_dir, &reviews.category);
        let name = dataset::file_name(&path);
        if reviews.records.is_empty() {
            warn!("Category '{}' produced no reviews", reviews.category);
            report.record_skip(name, "no reviews collected");
            continue;
        }

        dataset::write_reviews(&path, &reviews.records)?;
        info!(
            "Saved {} review(s) for '{}' to {}",
            reviews.records.len(),
            reviews.category,
            path.display()
        );
        report.record_success(name, reviews.records.len());
    }

    Ok(report)
}

/// Collect every configured category and write one CSV per category
pub async fn collect_directory(collector: &ReviewCollector, output_dir: &Path) -> Result<StageReport> {
    let categories = collector.collect_all().await;
    write_categories(&categories, output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReviewRecord;

    #[test]
    fn test_write_categories_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let categories = vec![
            CategoryReviews {
                category: "animals_pets".to_string(),
                records: vec![ReviewRecord::new("animals_pets", "acme.com", "Nice", 5)],
            },
            CategoryReviews {
                category: "sports".to_string(),
                records: Vec::new(),
            },
        ];

        let report = write_categories(&categories, dir.path()).unwrap();

        assert_eq!(report.processed, vec![("reviews_animals_pets.csv".to_string(), 1)]);
        assert_eq!(report.skipped[0].0, "reviews_sports.csv");
        assert!(!dir.path().join("reviews_sports.csv").exists());

        let written = dataset::read_reviews(&category_file(dir.path(), "animals_pets")).unwrap();
        assert_eq!(written, categories[0].records);
    }
}
