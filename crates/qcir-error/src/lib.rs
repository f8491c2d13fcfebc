use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for the qcir test-oracle harness.
///
/// The first four variants form the "invalid operation" class: an edit was
/// sampled that cannot legally apply in the current session state. The
/// generator swallows these and skips the iteration; they are never fatal.
#[derive(Error, Debug)]
pub enum HarnessError {
    // === Invalid operations (skippable) ===
    /// An add-gate was requested before any qubit exists.
    #[error("cannot add a gate: no live qubit")]
    NoLiveQubit,

    /// A two-qubit gate was requested with fewer than two live qubits.
    #[error("cannot add a two-qubit gate: fewer than two live qubits")]
    NeedTwoQubits,

    /// A delete-gate was requested while no gate is live.
    #[error("cannot delete a gate: no live gate")]
    NoLiveGate,

    /// A delete-qubit was requested while every live qubit is referenced
    /// by at least one live gate.
    #[error("cannot delete a qubit: no unreferenced qubit")]
    NoDeletableQubit,

    // === Session misuse ===
    /// A command referenced a qubit id that is not live.
    #[error("no such qubit: {id}")]
    UnknownQubit { id: u32 },

    /// A command referenced a gate id that is not live.
    #[error("no such gate: {id}")]
    UnknownGate { id: u64 },

    /// A delete-qubit targeted a qubit still referenced by a live gate.
    #[error("qubit {id} is referenced by a live gate")]
    QubitInUse { id: u32 },

    /// A gate was built with the wrong operand count for its kind.
    #[error("gate kind {kind} takes {expected} operand(s), got {actual}")]
    ArityMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A two-qubit gate was built with control == target.
    #[error("two-qubit gate operands must be distinct (got qubit {id} twice)")]
    DuplicateOperand { id: u32 },

    /// A rotation gate was built without an angle, or a non-rotation gate
    /// was built with one.
    #[error("gate kind {kind} and phase argument disagree")]
    PhaseMismatch { kind: &'static str },

    // === Comparator ===
    /// Captured tool output does not contain the listing header line.
    #[error("listing header not found in '{case}'")]
    MissingHeader { case: String },

    // === I/O ===
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact could not be written or read.
    #[error("artifact error at '{path}': {detail}")]
    Artifact { path: PathBuf, detail: String },
}

impl HarnessError {
    /// Whether this error is an invalid-operation skip, handled by the
    /// generator as a no-op iteration.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            HarnessError::NoLiveQubit
                | HarnessError::NeedTwoQubits
                | HarnessError::NoLiveGate
                | HarnessError::NoDeletableQubit
        )
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, HarnessError>;
