//! Output comparator: structural diff between the tool's captured listing
//! and the oracle's expected listing.
//!
//! The captured output is noisy — prompts, banners, and shutdown chatter
//! surround the listing — so the comparator first extracts the span between
//! the header line and the last gate line, then compares token-by-token.
//! Malformed output is a divergence, never a crash.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use qcir_error::{HarnessError, Result};
use qcir_types::LISTING_HEADER;

use crate::artifacts::{append_verdict, collect_listings};

/// Outcome for one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseVerdict {
    Correct,
    /// Zero-based index (within the compared span) of the first mismatched
    /// line. Comparison stops there; later lines are not examined.
    Divergent { line: usize },
    /// The captured output never printed the listing header, so no line
    /// comparison took place. Recorded as a bug like [`Self::Divergent`].
    Malformed,
}

impl CaseVerdict {
    /// Render the verdict record line for this case.
    #[must_use]
    pub fn record_line(&self, source: &str) -> String {
        match self {
            CaseVerdict::Correct => format!("{source}: is correct"),
            CaseVerdict::Divergent { .. } | CaseVerdict::Malformed => {
                format!("{source}: has bug")
            }
        }
    }
}

/// Extract the listing span from raw captured output.
///
/// The span starts at the header line and ends at the last line containing
/// `Gate`, or at the header itself when no gate line exists.
///
/// # Errors
///
/// [`HarnessError::MissingHeader`] when the header line is absent.
pub fn extract_listing<'a>(source: &str, raw: &'a str) -> Result<Vec<&'a str>> {
    let lines: Vec<&str> = raw.lines().collect();
    let first = lines
        .iter()
        .position(|line| line.trim_end() == LISTING_HEADER)
        .ok_or_else(|| HarnessError::MissingHeader {
            case: source.to_owned(),
        })?;
    let last = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains("Gate"))
        .map(|(idx, _)| idx)
        .next_back()
        .map_or(first, |idx| idx.max(first));
    Ok(lines[first..=last].to_vec())
}

/// Normalize one line into comparison tokens: whitespace-split, empty
/// tokens dropped, trailing line-terminator and tab artifacts stripped.
#[must_use]
pub fn normalize_line(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|token| token.trim_end_matches(['\n', '\r', '\t']).to_owned())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Compare two listings positionally.
///
/// Lines are paired by position; unpaired trailing lines on either side are
/// not compared (preserving the historical harness behavior). A pair
/// matches iff both normalize to identical token vectors; comparison stops
/// at the first mismatch.
#[must_use]
pub fn compare_listing(expected: &[&str], actual: &[&str]) -> CaseVerdict {
    for (index, (exp, act)) in expected.iter().zip(actual.iter()).enumerate() {
        let exp_tokens = normalize_line(exp);
        let act_tokens = normalize_line(act);
        if exp_tokens != act_tokens {
            debug!(line = index, ?exp_tokens, ?act_tokens, "listing mismatch");
            return CaseVerdict::Divergent { line: index };
        }
    }
    CaseVerdict::Correct
}

/// Compare one case: expected listing artifact vs raw captured output.
///
/// A missing header in the captured output is a format mismatch and yields
/// a malformed verdict.
#[must_use]
pub fn compare_case(source: &str, expected_text: &str, actual_raw: &str) -> CaseVerdict {
    let expected: Vec<&str> = expected_text.lines().collect();
    match extract_listing(source, actual_raw) {
        Ok(actual) => compare_listing(&expected, &actual),
        Err(err) => {
            warn!(source, error = %err, "captured output is malformed");
            CaseVerdict::Malformed
        }
    }
}

// ===========================================================================
// Run driver
// ===========================================================================

/// Configuration for a comparison run.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub expected_dir: PathBuf,
    pub actual_dir: PathBuf,
    pub record_path: PathBuf,
}

/// Totals for one comparison run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonSummary {
    pub compared: usize,
    pub correct: usize,
    pub divergent: usize,
    /// Cases skipped because a counterpart artifact was missing or
    /// unreadable.
    pub skipped: usize,
}

/// Compare every captured listing against its expected counterpart and
/// append one verdict per case to the record.
///
/// Cases are paired by numeric file stem and processed in ascending order.
/// An unreadable case is skipped with a warning; the run always continues
/// to the next case.
///
/// # Errors
///
/// Fails when a directory cannot be listed or the verdict record cannot be
/// appended — the record is the product of the run.
pub fn run_comparison(config: &CompareConfig) -> Result<ComparisonSummary> {
    let expected: BTreeMap<u64, PathBuf> = collect_listings(&config.expected_dir)?
        .into_iter()
        .collect();
    let captured = collect_listings(&config.actual_dir)?;

    let mut summary = ComparisonSummary::default();
    for (index, actual_path) in captured {
        let Some(expected_path) = expected.get(&index) else {
            warn!(case = index, "no expected listing for captured output");
            summary.skipped += 1;
            continue;
        };

        let source = actual_path.display().to_string();
        let pair = fs::read_to_string(expected_path)
            .and_then(|exp| fs::read_to_string(&actual_path).map(|act| (exp, act)));
        let (expected_text, actual_text) = match pair {
            Ok(pair) => pair,
            Err(err) => {
                warn!(case = index, error = %err, "skipping unreadable case");
                summary.skipped += 1;
                continue;
            }
        };

        let verdict = compare_case(&source, &expected_text, &actual_text);
        append_verdict(&config.record_path, &verdict.record_line(&source))?;
        summary.compared += 1;
        match verdict {
            CaseVerdict::Correct => summary.correct += 1,
            CaseVerdict::Divergent { .. } | CaseVerdict::Malformed => summary.divergent += 1,
        }
    }

    info!(
        compared = summary.compared,
        correct = summary.correct,
        divergent = summary.divergent,
        skipped = summary.skipped,
        "comparison run complete"
    );
    Ok(summary)
}
