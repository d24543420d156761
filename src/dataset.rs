//! CSV directory adapter between pipeline stages
//!
//! Each stage reads a directory of CSV files and writes another one. This
//! module owns the column layout so the stages only see typed records:
//! - review files: `Category, Brand, Review, Star_Rating`
//! - scored files: the above plus `Sentiment_Raw_Score,
//!   Sentiment_Implied_Rating, Final_Weighted_Score`

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::ReviewRagError;
use crate::models::ReviewRecord;
use crate::models::ScoredRecord;
use crate::Result;

#[derive(Debug, Serialize, Deserialize)]
struct ReviewRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Brand")]
    brand: String,
    #[serde(rename = "Review", default)]
    review: String,
    #[serde(rename = "Star_Rating")]
    star_rating: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct ScoredRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Brand")]
    brand: String,
    #[serde(rename = "Review", default)]
    review: String,
    #[serde(rename = "Star_Rating")]
    star_rating: u8,
    #[serde(rename = "Sentiment_Raw_Score")]
    sentiment_raw_score: f64,
    #[serde(rename = "Sentiment_Implied_Rating")]
    sentiment_implied_rating: f64,
    #[serde(rename = "Final_Weighted_Score")]
    final_weighted_score: f64,
}

impl From<ReviewRow> for ReviewRecord {
    fn from(row: ReviewRow) -> Self {
        Self::new(row.category, row.brand, row.review, row.star_rating)
    }
}

impl From<&ReviewRecord> for ReviewRow {
    fn from(record: &ReviewRecord) -> Self {
        Self {
            category: record.category.clone(),
            brand: record.brand.clone(),
            review: record.text.clone(),
            star_rating: record.star_rating,
        }
    }
}

impl From<ScoredRow> for ScoredRecord {
    fn from(row: ScoredRow) -> Self {
        Self {
            review: ReviewRecord::new(row.category, row.brand, row.review, row.star_rating),
            sentiment_polarity: row.sentiment_raw_score,
            implied_rating: row.sentiment_implied_rating,
            weighted_score: row.final_weighted_score,
        }
    }
}

impl From<&ScoredRecord> for ScoredRow {
    fn from(record: &ScoredRecord) -> Self {
        Self {
            category: record.review.category.clone(),
            brand: record.review.brand.clone(),
            review: record.review.text.clone(),
            star_rating: record.review.star_rating,
            sentiment_raw_score: record.sentiment_polarity,
            sentiment_implied_rating: record.implied_rating,
            final_weighted_score: record.weighted_score,
        }
    }
}

/// Outcome of one stage over a directory
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    /// Files handled successfully, with their record counts
    pub processed: Vec<(String, usize)>,
    /// Files skipped, with the reason
    pub skipped: Vec<(String, String)>,
}

impl StageReport {
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.processed.iter().map(|(_, count)| count).sum()
    }

    pub fn record_success(&mut self, file: impl Into<String>, count: usize) {
        self.processed.push((file.into(), count));
    }

    pub fn record_skip(&mut self, file: impl Into<String>, reason: impl ToString) {
        self.skipped.push((file.into(), reason.to_string()));
    }
}

/// All `*.csv` files directly under `dir`, sorted by file name
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ReviewRagError::NoInputFiles(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ReviewRagError::NoInputFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// File name component as a display string
#[must_use]
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn check_ratings<'a>(
    path: &Path,
    records: impl Iterator<Item = &'a ReviewRecord>,
) -> Result<()> {
    for (idx, record) in records.enumerate() {
        if !record.has_valid_rating() {
            return Err(ReviewRagError::MalformedRecord {
                file: file_name(path),
                row: idx + 1,
                reason: format!(
                    "Star_Rating must be between 1 and 5, got {}",
                    record.star_rating
                ),
            });
        }
    }
    Ok(())
}

/// Write rows to `path` through a sibling temp file so readers never see a
/// half-written file
fn write_rows<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ReviewRagError::Custom(format!("Failed to flush CSV buffer: {e}")))?;

    let tmp_path = path.with_extension("csv.tmp");
    fs::write(&tmp_path, bytes)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Read a review file; any malformed row fails the whole file
pub fn read_reviews(path: &Path) -> Result<Vec<ReviewRecord>> {
    let records: Vec<ReviewRecord> = read_rows::<ReviewRow>(path)?
        .into_iter()
        .map(ReviewRecord::from)
        .collect();
    check_ratings(path, records.iter())?;
    Ok(records)
}

pub fn write_reviews(path: &Path, records: &[ReviewRecord]) -> Result<()> {
    write_rows(path, records.iter().map(ReviewRow::from))
}

/// Read a scored file; any malformed row fails the whole file
pub fn read_scored(path: &Path) -> Result<Vec<ScoredRecord>> {
    let records: Vec<ScoredRecord> = read_rows::<ScoredRow>(path)?
        .into_iter()
        .map(ScoredRecord::from)
        .collect();
    check_ratings(path, records.iter().map(|r| &r.review))?;
    Ok(records)
}

pub fn write_scored(path: &Path, records: &[ScoredRecord]) -> Result<()> {
    write_rows(path, records.iter().map(ScoredRow::from))
}
