//! Differential test-oracle harness for the qcir circuit editor.
//!
//! Three components composed per test case:
//!
//! 1. [`generator`] — a seeded, invariant-preserving random walk over the
//!    editor's command set, producing one command script and the
//!    ground-truth entity state per case.
//! 2. [`schedule`] + [`session`] — the ASAP scheduling oracle, fused into
//!    the session's bookkeeping so execution times freeze at gate creation.
//! 3. [`comparator`] — structural diff between the tool's captured output
//!    and the oracle's expected listing, appending one verdict per case.
//!
//! Data flows generator → (tool, replayed externally) and generator →
//! expected listing → comparator; the tool's captured output re-enters at
//! the comparator. Everything is deterministic given `(seed, case index)`.

pub mod artifacts;
pub mod comparator;
pub mod generator;
pub mod rng;
pub mod schedule;
pub mod session;

pub use comparator::{CaseVerdict, CompareConfig, ComparisonSummary, run_comparison};
pub use generator::{GeneratorConfig, RunConfig, generate_case, run_generation};
pub use session::EditSession;
