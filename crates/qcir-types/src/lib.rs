//! Shared vocabulary for the qcir test-oracle harness.
//!
//! Defines the entity model (qubits, gates, gate kinds) and the two textual
//! formats spoken at the boundary with the system under test: the editor
//! command script and the gate listing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Qubit identifier. Unique while live; never reused within a test case.
pub type QubitId = u32;

/// Gate identifier. Strictly increasing; never reused even after deletion.
pub type GateId = u64;

/// Header line printed by the tool before its gate listing.
pub const LISTING_HEADER: &str = "Listed by gate ID";

// ===========================================================================
// Gate kinds
// ===========================================================================

/// The supported gate kinds.
///
/// `Rz` carries one rotation angle; `Cx` takes two operands (control then
/// target); all others are single-qubit gates with no parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    H,
    X,
    Z,
    T,
    Tdg,
    S,
    Rz,
    Cx,
}

impl GateKind {
    /// Every kind, in the order the generator samples them.
    pub const ALL: [GateKind; 8] = [
        GateKind::H,
        GateKind::X,
        GateKind::Z,
        GateKind::T,
        GateKind::Tdg,
        GateKind::S,
        GateKind::Rz,
        GateKind::Cx,
    ];

    /// Command-line flag used in the add-gate command.
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            GateKind::H => "-h",
            GateKind::X => "-x",
            GateKind::Z => "-z",
            GateKind::T => "-t",
            GateKind::Tdg => "-tdg",
            GateKind::S => "-s",
            GateKind::Rz => "-rz",
            GateKind::Cx => "-cx",
        }
    }

    /// Label the tool prints in its listing. `Tdg` lists as `td`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GateKind::H => "h",
            GateKind::X => "x",
            GateKind::Z => "z",
            GateKind::T => "t",
            GateKind::Tdg => "td",
            GateKind::S => "s",
            GateKind::Rz => "rz",
            GateKind::Cx => "cx",
        }
    }

    /// Whether this kind takes two operands (control, target).
    #[must_use]
    pub fn is_two_qubit(self) -> bool {
        matches!(self, GateKind::Cx)
    }

    /// Whether this kind carries a rotation angle.
    #[must_use]
    pub fn has_phase(self) -> bool {
        matches!(self, GateKind::Rz)
    }

    /// Operand count for this kind.
    #[must_use]
    pub fn arity(self) -> usize {
        if self.is_two_qubit() { 2 } else { 1 }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===========================================================================
// Gates
// ===========================================================================

/// A live gate record.
///
/// `exec_time` is frozen when the gate is accepted: the scheduling rule runs
/// once, at creation, against the then-current qubit clocks. Deleting earlier
/// gates never recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,
    pub kind: GateKind,
    /// One operand, or two for `Cx` (control first, target second).
    pub operands: Vec<QubitId>,
    /// Rotation angle, present iff `kind.has_phase()`.
    pub phase: Option<f64>,
    /// Execution slot assigned by the ASAP rule at creation.
    pub exec_time: u64,
}

impl Gate {
    /// Render the listing line the tool is expected to print for this gate.
    #[must_use]
    pub fn listing_line(&self) -> String {
        let operands = self
            .operands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "Gate {}: {} Exec Time: {} Qubit: {}",
            self.id,
            self.kind.label(),
            self.exec_time,
            operands
        )
    }
}

// ===========================================================================
// Editor commands
// ===========================================================================

/// One line of the editor command script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditCommand {
    /// `qcba` — add a qubit.
    AddQubit,
    /// `qcbd <id>` — delete an (unreferenced) qubit.
    DeleteQubit(QubitId),
    /// `qcga <flag> [...]` — add a gate.
    AddGate {
        kind: GateKind,
        operands: Vec<QubitId>,
        phase: Option<f64>,
    },
    /// `qcgd <id>` — delete a live gate.
    DeleteGate(GateId),
    /// `qccp` — print the gate listing ordered by gate id.
    PrintByGateId,
    /// `qq -f` — terminate the tool.
    Quit,
}

impl fmt::Display for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditCommand::AddQubit => f.write_str("qcba"),
            EditCommand::DeleteQubit(id) => write!(f, "qcbd {id}"),
            EditCommand::AddGate {
                kind,
                operands,
                phase,
            } => {
                write!(f, "qcga {}", kind.flag())?;
                if let Some(angle) = phase {
                    write!(f, " -ph {angle}")?;
                }
                for id in operands {
                    write!(f, " {id}")?;
                }
                Ok(())
            }
            EditCommand::DeleteGate(id) => write!(f, "qcgd {id}"),
            EditCommand::PrintByGateId => f.write_str("qccp"),
            EditCommand::Quit => f.write_str("qq -f"),
        }
    }
}
