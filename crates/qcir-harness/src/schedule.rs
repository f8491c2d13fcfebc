//! ASAP list-scheduling rule over per-qubit clocks.
//!
//! Kept as a pure function so the session can apply it at the moment a gate
//! is accepted. Applying it incrementally (rather than in a final pass) is
//! what preserves the frozen-time semantics: a later deletion must not
//! retroactively change times already assigned.

use std::collections::BTreeMap;

use qcir_types::QubitId;

/// Per-qubit execution clocks, keyed by live qubit id.
pub type ClockTable = BTreeMap<QubitId, u64>;

/// Result of scheduling one gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    /// Execution slot assigned to the gate.
    pub exec_time: u64,
    /// Clock values to store back, one entry per operand.
    pub advanced: Vec<(QubitId, u64)>,
}

/// Compute the ASAP slot for a gate over `operands`.
///
/// A single-operand gate executes at its operand's clock and advances that
/// clock by one. A two-operand gate executes at the maximum of both clocks
/// and sets both to max+1 — the synchronization point that couples the two
/// timelines from then on.
///
/// Operands absent from the table schedule as if their clock were zero;
/// the session guarantees liveness before calling, so that path only
/// matters for direct unit-level use.
#[must_use]
pub fn asap_schedule(clocks: &ClockTable, operands: &[QubitId]) -> ScheduleOutcome {
    let slot = operands
        .iter()
        .map(|q| clocks.get(q).copied().unwrap_or(0))
        .max()
        .unwrap_or(0);

    ScheduleOutcome {
        exec_time: slot,
        advanced: operands.iter().map(|&q| (q, slot + 1)).collect(),
    }
}
