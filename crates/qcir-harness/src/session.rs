//! The in-memory edit session: command log plus ground-truth entity state.
//!
//! The session owns every qubit and gate record produced while a command
//! sequence is generated. Liveness is membership in the owning tables, both
//! keyed by stable ids that are never reused. Scheduling bookkeeping is
//! fused in: every accepted add-gate immediately freezes that gate's
//! execution time via [`crate::schedule::asap_schedule`] and advances the
//! operand clocks. Deletions leave the clocks untouched.

use std::collections::{BTreeMap, BTreeSet};

use qcir_error::{HarnessError, Result};
use qcir_types::{EditCommand, Gate, GateId, GateKind, LISTING_HEADER, QubitId};

use crate::schedule::{ClockTable, asap_schedule};

/// Ordered command log plus the live entity state that results from it.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    commands: Vec<EditCommand>,
    /// Live qubits and their ASAP clocks.
    clocks: ClockTable,
    /// Live gates, ascending by id (which is also creation order).
    gates: BTreeMap<GateId, Gate>,
    next_qubit: QubitId,
    next_gate: GateId,
    finalized: bool,
}

impl EditSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new qubit id (highest-ever-allocated + 1), clock at zero.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.next_qubit;
        self.next_qubit += 1;
        self.clocks.insert(id, 0);
        self.commands.push(EditCommand::AddQubit);
        id
    }

    /// Add a gate over live operands, freezing its execution time.
    ///
    /// # Errors
    ///
    /// Fails when the operand list does not fit the kind (arity, duplicate
    /// operands on a two-qubit gate, phase presence) or references a qubit
    /// that is not live.
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        operands: &[QubitId],
        phase: Option<f64>,
    ) -> Result<GateId> {
        if operands.len() != kind.arity() {
            return Err(HarnessError::ArityMismatch {
                kind: kind.label(),
                expected: kind.arity(),
                actual: operands.len(),
            });
        }
        if phase.is_some() != kind.has_phase() {
            return Err(HarnessError::PhaseMismatch { kind: kind.label() });
        }
        if kind.is_two_qubit() && operands[0] == operands[1] {
            return Err(HarnessError::DuplicateOperand { id: operands[0] });
        }
        for &q in operands {
            if !self.clocks.contains_key(&q) {
                return Err(HarnessError::UnknownQubit { id: q });
            }
        }

        let outcome = asap_schedule(&self.clocks, operands);
        for (q, clock) in outcome.advanced {
            self.clocks.insert(q, clock);
        }

        let id = self.next_gate;
        self.next_gate += 1;
        self.gates.insert(
            id,
            Gate {
                id,
                kind,
                operands: operands.to_vec(),
                phase,
                exec_time: outcome.exec_time,
            },
        );
        self.commands.push(EditCommand::AddGate {
            kind,
            operands: operands.to_vec(),
            phase,
        });
        Ok(id)
    }

    /// Remove a live gate. Operand clocks are deliberately not rolled back.
    ///
    /// # Errors
    ///
    /// Fails when no gate with this id is live.
    pub fn delete_gate(&mut self, id: GateId) -> Result<()> {
        if self.gates.remove(&id).is_none() {
            return Err(HarnessError::UnknownGate { id });
        }
        self.commands.push(EditCommand::DeleteGate(id));
        Ok(())
    }

    /// Remove a live qubit that no live gate references.
    ///
    /// # Errors
    ///
    /// Fails when the qubit is not live or is still referenced.
    pub fn delete_qubit(&mut self, id: QubitId) -> Result<()> {
        if !self.clocks.contains_key(&id) {
            return Err(HarnessError::UnknownQubit { id });
        }
        if self.referenced_qubits().contains(&id) {
            return Err(HarnessError::QubitInUse { id });
        }
        self.clocks.remove(&id);
        self.commands.push(EditCommand::DeleteQubit(id));
        Ok(())
    }

    /// Append the trailer pair (print listing, terminate). Idempotent.
    pub fn finalize(&mut self) {
        if !self.finalized {
            self.commands.push(EditCommand::PrintByGateId);
            self.commands.push(EditCommand::Quit);
            self.finalized = true;
        }
    }

    // === Queries ===

    /// Qubit ids referenced by any currently-live gate.
    #[must_use]
    pub fn referenced_qubits(&self) -> BTreeSet<QubitId> {
        self.gates
            .values()
            .flat_map(|g| g.operands.iter().copied())
            .collect()
    }

    /// Live qubit ids, ascending.
    #[must_use]
    pub fn live_qubits(&self) -> Vec<QubitId> {
        self.clocks.keys().copied().collect()
    }

    /// Live qubits not referenced by any live gate, ascending.
    #[must_use]
    pub fn deletable_qubits(&self) -> Vec<QubitId> {
        let referenced = self.referenced_qubits();
        self.clocks
            .keys()
            .copied()
            .filter(|q| !referenced.contains(q))
            .collect()
    }

    /// Live gate ids, ascending.
    #[must_use]
    pub fn live_gates(&self) -> Vec<GateId> {
        self.gates.keys().copied().collect()
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.clocks.len()
    }

    #[must_use]
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Current clock of a live qubit.
    #[must_use]
    pub fn clock(&self, id: QubitId) -> Option<u64> {
        self.clocks.get(&id).copied()
    }

    /// A live gate record by id.
    #[must_use]
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(&id)
    }

    /// The emitted command log so far (trailer included once finalized).
    #[must_use]
    pub fn commands(&self) -> &[EditCommand] {
        &self.commands
    }

    // === Rendering ===

    /// The command script, one command per line, trailing newline.
    #[must_use]
    pub fn script_text(&self) -> String {
        let mut out = String::new();
        for cmd in &self.commands {
            out.push_str(&cmd.to_string());
            out.push('\n');
        }
        out
    }

    /// The expected listing: header plus one line per live gate, ascending
    /// by gate id, with the frozen execution times.
    #[must_use]
    pub fn expected_listing(&self) -> String {
        let mut out = String::from(LISTING_HEADER);
        out.push('\n');
        for gate in self.gates.values() {
            out.push_str(&gate.listing_line());
            out.push('\n');
        }
        out
    }
}
