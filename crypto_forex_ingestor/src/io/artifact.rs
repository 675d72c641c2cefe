//! Persisted fetch artifacts: one JSON object per instrument-span.
//!
//! An artifact is the durability checkpoint between the fetch and load
//! phases: `{"<stem>": [ <raw bars> ]}` where the stem encodes instrument,
//! span, multiplier, and bar unit. Re-running an identical fetch truncates
//! and rewrites the same path.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::models::{bar::RawBar, instrument::Market, instrument::Ticker, timespan::Timespan};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact")]
    Io(#[from] std::io::Error),

    #[error("artifact is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("artifact {path:?} has no dataset key")]
    MissingKey { path: PathBuf },
}

/// Deterministic artifact name for an instrument-span, e.g.
/// `X_BTCUSD_2021-01-01_2021-06-01_1_minute`.
pub fn artifact_stem(
    ticker: &Ticker,
    start: NaiveDate,
    end: NaiveDate,
    multiplier: u32,
    timespan: Timespan,
) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}",
        ticker.market().letter(),
        ticker.pair(),
        start,
        end,
        multiplier,
        timespan
    )
}

/// Streams raw bars into `{"<stem>": [ ... ]}`.
///
/// The file is removed on drop unless [`commit`](ArtifactWriter::commit)
/// ran, so a failed or all-empty fetch leaves nothing behind.
#[derive(Debug)]
pub struct ArtifactWriter {
    path: PathBuf,
    file: Option<BufWriter<File>>,
    wrote_any: bool,
}

impl ArtifactWriter {
    /// Open (truncating) `<dir>/<stem>.json` and write the object header.
    pub fn create(dir: &Path, stem: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{stem}.json"));
        let mut file = BufWriter::new(File::create(&path)?);
        write!(file, "{{\"{stem}\": [")?;
        Ok(Self {
            path,
            file: Some(file),
            wrote_any: false,
        })
    }

    /// Append one window's bars to the dataset array.
    pub fn append_bars(&mut self, bars: &[RawBar]) -> io::Result<()> {
        let file = self.file.as_mut().expect("artifact already committed");
        for bar in bars {
            if self.wrote_any {
                write!(file, ", ")?;
            }
            serde_json::to_writer(&mut *file, bar)?;
            self.wrote_any = true;
        }
        Ok(())
    }

    /// True once at least one bar has been appended.
    pub fn wrote_any(&self) -> bool {
        self.wrote_any
    }

    /// Close the JSON object and keep the file. A failed close removes the
    /// truncated file instead of leaving an unparseable artifact behind.
    pub fn commit(mut self) -> io::Result<PathBuf> {
        let mut file = self.file.take().expect("artifact already committed");
        if let Err(e) = write!(file, "]}}").and_then(|_| file.flush()) {
            drop(file);
            let _ = fs::remove_file(&self.path);
            return Err(e);
        }
        Ok(self.path.clone())
    }
}

impl Drop for ArtifactWriter {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Read one artifact back as its dataset name plus raw bar values.
///
/// Elements stay untyped so the normalizer can skip a malformed bar
/// instead of failing the whole file.
pub fn read_artifact(path: &Path) -> Result<(String, Vec<Value>), ArtifactError> {
    let file = File::open(path)?;
    let map: IndexMap<String, Vec<Value>> = serde_json::from_reader(BufReader::new(file))?;
    map.into_iter()
        .next()
        .ok_or_else(|| ArtifactError::MissingKey {
            path: path.to_path_buf(),
        })
}

/// Persist a grouped-daily snapshot as `<market>_<date>.json`.
pub fn write_snapshot(
    dir: &Path,
    market: Market,
    date: NaiveDate,
    body: &Value,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}.json", market.as_str(), date));
    let mut file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(&mut file, body)?;
    file.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(t: i64) -> RawBar {
        RawBar {
            timestamp: t,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
            trade_count: Some(3),
            vwap: Some(1.2),
        }
    }

    #[test]
    fn stem_encodes_instrument_span_and_bar_size() {
        let stem = artifact_stem(
            &Ticker::crypto("BTCUSD"),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            1,
            Timespan::Minute,
        );
        assert_eq!(stem, "X_BTCUSD_2021-01-01_2021-06-01_1_minute");
    }

    #[test]
    fn committed_artifact_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ArtifactWriter::create(dir.path(), "X_BTCUSD_span").unwrap();
        writer.append_bars(&[bar(1), bar(2)]).unwrap();
        writer.append_bars(&[bar(3)]).unwrap();
        let path = writer.commit().unwrap();

        let (name, bars) = read_artifact(&path).unwrap();
        assert_eq!(name, "X_BTCUSD_span");
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[2]["t"], 3);
    }

    #[test]
    fn dropped_writer_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let mut writer = ArtifactWriter::create(dir.path(), "X_BTCUSD_span").unwrap();
            writer.append_bars(&[bar(1)]).unwrap();
            dir.path().join("X_BTCUSD_span.json")
        };
        assert!(!path.exists(), "uncommitted artifact must be cleaned up");
    }

    #[cfg(unix)]
    #[test]
    fn failed_commit_removes_the_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("X_BTCUSD_span.json");
        // route the artifact's writes to a device that rejects them on flush
        std::os::unix::fs::symlink("/dev/full", &path).unwrap();

        let mut writer = ArtifactWriter::create(dir.path(), "X_BTCUSD_span").unwrap();
        writer.append_bars(&[bar(1)]).unwrap();
        assert!(writer.commit().is_err());
        assert!(!path.exists(), "failed commit must not leave an artifact");
    }

    #[test]
    fn snapshot_persists_under_market_and_date() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({"status": "OK", "resultsCount": 0, "results": []});
        let path = write_snapshot(
            dir.path(),
            Market::Crypto,
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            &body,
        )
        .unwrap();

        assert_eq!(path.file_name().unwrap(), "crypto_2021-06-01.json");
        let read: Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(read, body);
    }

    #[test]
    fn recreating_an_artifact_truncates_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ArtifactWriter::create(dir.path(), "stale").unwrap();
        writer.append_bars(&[bar(1), bar(2)]).unwrap();
        writer.commit().unwrap();

        let mut writer = ArtifactWriter::create(dir.path(), "stale").unwrap();
        writer.append_bars(&[bar(9)]).unwrap();
        let path = writer.commit().unwrap();

        let (_, bars) = read_artifact(&path).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0]["t"], 9);
    }
}
