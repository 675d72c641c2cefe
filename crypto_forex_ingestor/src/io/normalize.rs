//! Flattens fetch artifacts into line-delimited records.
//!
//! One artifact in, one `.ndjson` file out: each raw bar becomes a flat
//! `{p,t,v,o,c,h,l,n}` record on its own line, in input order. `vw` and any
//! other extraneous fields are dropped; a bar missing a required field is
//! skipped with a warning and never aborts the rest of the file.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::io::artifact::{ArtifactError, read_artifact};
use crate::models::bar::FlatBar;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("artifact name {0:?} does not start with <market>_<pair>")]
    BadArtifactName(String),

    #[error("failed to write records")]
    Io(#[from] std::io::Error),
}

/// Recover the market-prefixed pair code from an artifact name
/// (`X_BTCUSD_2021-01-01_...` → `X:BTCUSD`).
pub fn pair_from_artifact_name(name: &str) -> Option<String> {
    let mut parts = name.split('_');
    let market = parts.next()?;
    let pair = parts.next()?;
    if market.is_empty() || pair.is_empty() {
        return None;
    }
    Some(format!("{market}:{pair}"))
}

/// Lazily flatten raw bar values for one pair, in input order.
pub fn normalize<'a>(pair: &'a str, bars: &'a [Value]) -> impl Iterator<Item = FlatBar> + 'a {
    bars.iter().filter_map(move |value| match flatten(pair, value) {
        Some(record) => Some(record),
        None => {
            warn!(%pair, %value, "skipping malformed bar");
            None
        }
    })
}

fn flatten(pair: &str, value: &Value) -> Option<FlatBar> {
    Some(FlatBar {
        p: pair.to_string(),
        t: value.get("t")?.as_i64()?,
        v: value.get("v")?.as_f64()?,
        o: value.get("o")?.as_f64()?,
        c: value.get("c")?.as_f64()?,
        h: value.get("h")?.as_f64()?,
        l: value.get("l")?.as_f64()?,
        n: value.get("n")?.as_u64()?,
    })
}

/// Convert one artifact to a line-delimited record file under `out_dir`.
///
/// Returns the output path and the number of records written.
pub fn convert_artifact(
    artifact_path: &Path,
    out_dir: &Path,
) -> Result<(PathBuf, u64), NormalizeError> {
    let (name, bars) = read_artifact(artifact_path)?;
    let pair =
        pair_from_artifact_name(&name).ok_or_else(|| NormalizeError::BadArtifactName(name.clone()))?;

    fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join(format!("{name}.ndjson"));
    let mut out = BufWriter::new(File::create(&out_path)?);

    let mut written = 0u64;
    for record in normalize(&pair, &bars) {
        serde_json::to_writer(&mut out, &record).map_err(io::Error::from)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;

    info!(pair, records = written, path = %out_path.display(), "artifact normalized");
    Ok((out_path, written))
}

/// Convert every `.json` artifact in `artifact_dir`. Returns the number of
/// files converted; a file that fails is logged and skipped.
pub fn convert_dir(artifact_dir: &Path, out_dir: &Path) -> Result<u64, NormalizeError> {
    let mut converted = 0u64;
    for entry in fs::read_dir(artifact_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match convert_artifact(&path, out_dir) {
            Ok(_) => converted += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "skipping artifact"),
        }
    }
    Ok(converted)
}
