//! Persistent artifacts: command scripts, expected listings, the run
//! manifest, and the append-only verdict record.
//!
//! Artifacts are keyed by case index: `<idx>.in` for the command script,
//! `<idx>.out` for the expected (and captured) listing. The manifest
//! fingerprints every script with SHA-256 so a run can be traced back to its
//! exact inputs.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use qcir_error::{HarnessError, Result};

/// Path of the command script for a case.
#[must_use]
pub fn script_path(dir: &Path, case_index: u64) -> PathBuf {
    dir.join(format!("{case_index}.in"))
}

/// Path of the expected or captured listing for a case.
#[must_use]
pub fn listing_path(dir: &Path, case_index: u64) -> PathBuf {
    dir.join(format!("{case_index}.out"))
}

/// Write a text artifact, creating parent directories as needed.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| artifact_error(path, &err))?;
    }
    fs::write(path, text).map_err(|err| artifact_error(path, &err))?;
    debug!(path = %path.display(), bytes = text.len(), "wrote artifact");
    Ok(())
}

/// Append one verdict line to the cumulative record.
///
/// The full line is written with a single `write_all` so that per-case
/// appends stay intact when cases run in parallel and serialize here.
pub fn append_verdict(record_path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = record_path.parent() {
        fs::create_dir_all(parent).map_err(|err| artifact_error(record_path, &err))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(record_path)
        .map_err(|err| artifact_error(record_path, &err))?;
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes())
        .map_err(|err| artifact_error(record_path, &err))?;
    Ok(())
}

/// SHA-256 of a text artifact, lowercase hex.
#[must_use]
pub fn sha256_hex(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = String::with_capacity(64);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

// ===========================================================================
// Run manifest
// ===========================================================================

/// Per-case summary recorded in the run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseManifest {
    pub index: u64,
    pub seed: u64,
    pub command_count: usize,
    pub live_qubits: usize,
    pub live_gates: usize,
    pub script_sha256: String,
}

/// Summary of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub base_seed: u64,
    pub iterations: usize,
    pub cases: Vec<CaseManifest>,
    /// Indices of cases whose artifacts could not be written.
    pub failed_cases: Vec<u64>,
}

/// Serialize the manifest as pretty JSON next to the other artifacts.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).map_err(|err| HarnessError::Artifact {
        path: path.to_path_buf(),
        detail: format!("failed to serialize manifest: {err}"),
    })?;
    write_text(path, &json)
}

// ===========================================================================
// Case discovery
// ===========================================================================

/// Collect `<idx>.out` files under `dir`, sorted by case index.
///
/// Non-listing files and files without a numeric stem are ignored. The
/// ordering is deterministic regardless of directory iteration order.
pub fn collect_listings(dir: &Path) -> Result<Vec<(u64, PathBuf)>> {
    let mut found = Vec::new();
    let entries = fs::read_dir(dir).map_err(|err| artifact_error(dir, &err))?;
    for entry in entries {
        let path = entry.map_err(|err| artifact_error(dir, &err))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("out") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Ok(index) = stem.parse::<u64>() {
            found.push((index, path));
        }
    }
    found.sort_by_key(|(index, _)| *index);
    Ok(found)
}

fn artifact_error(path: &Path, err: &std::io::Error) -> HarnessError {
    HarnessError::Artifact {
        path: path.to_path_buf(),
        detail: err.to_string(),
    }
}
