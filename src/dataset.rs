//! Daily dataset persistence.
//!
//! One CSV file per calendar day, `articles_<YYYY-MM-DD>.csv`, with header
//! `timestamp, source, title, link, published, content`. The file is never
//! appended to in place: the collector loads the existing rows, merges the
//! new ones behind them, and atomically replaces the file, so a failed run
//! cannot leave a half-written dataset.

use crate::models::ArticleRecord;
use crate::utils::write_atomic;
use chrono::{Days, NaiveDate};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

/// Path of the dataset for `date` under `data_dir`.
pub fn dataset_path(data_dir: &str, date: NaiveDate) -> PathBuf {
    Path::new(data_dir).join(format!("articles_{date}.csv"))
}

/// A dataset chosen by [`resolve_latest`]: its path and the calendar date
/// it covers, which names any summary derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDataset {
    pub path: PathBuf,
    pub date: NaiveDate,
}

/// Pick the dataset to summarize: today's file if present, else
/// yesterday's, else none.
///
/// The existence probe is passed in so the two-step fallback stays a pure
/// function of the current date.
pub fn resolve_latest(
    data_dir: &str,
    today: NaiveDate,
    exists: impl Fn(&Path) -> bool,
) -> Option<ResolvedDataset> {
    let yesterday = today.checked_sub_days(Days::new(1))?;
    [today, yesterday].into_iter().find_map(|date| {
        let path = dataset_path(data_dir, date);
        exists(&path).then_some(ResolvedDataset { path, date })
    })
}

/// Read every row of a dataset file, in file order.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn load(path: &Path) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    let bytes = fs::read(path).await?;
    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    debug!(rows = records.len(), "Loaded dataset");
    Ok(records)
}

/// Like [`load`], but a missing file is an empty dataset, not an error.
pub async fn load_if_exists(path: &Path) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    if !fs::try_exists(path).await? {
        return Ok(Vec::new());
    }
    load(path).await
}

/// Serialize `records` and atomically replace the dataset file.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), rows = records.len()))]
pub async fn write(path: &Path, records: &[ArticleRecord]) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    write_atomic(path, &bytes).await
}
