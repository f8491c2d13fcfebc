//! Edit-sequence generator: a seeded, invariant-preserving random walk over
//! the four edit operation classes.
//!
//! Each iteration draws one operation class uniformly and attempts it. A
//! draw that cannot legally apply in the current state surfaces as a
//! skippable [`HarnessError`]; the walk swallows it and counts the
//! iteration as skipped — no command is emitted and no state changes.
//! Scheduling bookkeeping happens inside [`EditSession::add_gate`], so
//! every accepted gate carries its frozen execution time from the moment
//! it exists.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use qcir_error::{HarnessError, Result};
use qcir_types::GateKind;

use crate::artifacts::{
    CaseManifest, RunManifest, listing_path, script_path, sha256_hex, write_manifest, write_text,
};
use crate::rng::{SplitMix64, case_seed};
use crate::session::EditSession;

/// Default iteration count per case, matching the original campaign length.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Default base seed for a run.
pub const DEFAULT_BASE_SEED: u64 = u64::from_be_bytes(*b"QCIRDIFF");

/// Knobs for a single generated case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of operation draws per case.
    pub iterations: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// How the operation draws of one case resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpMix {
    pub gates_added: usize,
    pub gates_deleted: usize,
    pub qubits_added: usize,
    pub qubits_deleted: usize,
    pub skipped: usize,
}

impl OpMix {
    #[must_use]
    pub fn total(&self) -> usize {
        self.gates_added + self.gates_deleted + self.qubits_added + self.qubits_deleted
            + self.skipped
    }
}

/// One generated case: the finalized session plus its draw statistics.
#[derive(Debug, Clone)]
pub struct GeneratedCase {
    pub session: EditSession,
    pub mix: OpMix,
}

/// The four operation classes, in the order they are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpClass {
    AddGate,
    DeleteGate,
    DeleteQubit,
    AddQubit,
}

const OP_CLASSES: [OpClass; 4] = [
    OpClass::AddGate,
    OpClass::DeleteGate,
    OpClass::DeleteQubit,
    OpClass::AddQubit,
];

/// Generate one case from an explicit seed.
///
/// The walk is a pure function of the seed and config: the same inputs
/// always reproduce the same command script and entity state.
///
/// # Errors
///
/// Skippable errors are swallowed by the walk itself, so a returned error
/// means session misuse — a harness bug rather than bad input.
pub fn generate_case(seed: u64, config: &GeneratorConfig) -> Result<GeneratedCase> {
    let mut rng = SplitMix64::new(seed);
    let mut session = EditSession::new();
    let mut mix = OpMix::default();

    for _ in 0..config.iterations {
        let outcome = match *rng.choose(&OP_CLASSES) {
            OpClass::AddGate => {
                let kind = *rng.choose(&GateKind::ALL);
                try_add_gate(&mut rng, &mut session, kind).map(|()| mix.gates_added += 1)
            }
            OpClass::DeleteGate => {
                try_delete_gate(&mut rng, &mut session).map(|()| mix.gates_deleted += 1)
            }
            OpClass::DeleteQubit => {
                try_delete_qubit(&mut rng, &mut session).map(|()| mix.qubits_deleted += 1)
            }
            OpClass::AddQubit => {
                session.add_qubit();
                mix.qubits_added += 1;
                Ok(())
            }
        };
        if let Err(err) = outcome {
            if err.is_skippable() {
                mix.skipped += 1;
            } else {
                return Err(err);
            }
        }
    }

    session.finalize();
    debug!(
        seed,
        gates = session.gate_count(),
        qubits = session.qubit_count(),
        skipped = mix.skipped,
        "generated case"
    );
    Ok(GeneratedCase { session, mix })
}

/// Attempt an add-gate draw for an already-drawn kind.
///
/// # Errors
///
/// Skippable [`HarnessError::NoLiveQubit`] or
/// [`HarnessError::NeedTwoQubits`] when the draw cannot apply.
fn try_add_gate(rng: &mut SplitMix64, session: &mut EditSession, kind: GateKind) -> Result<()> {
    let qubits = session.live_qubits();
    if qubits.is_empty() {
        return Err(HarnessError::NoLiveQubit);
    }

    if kind.is_two_qubit() {
        if qubits.len() < 2 {
            return Err(HarnessError::NeedTwoQubits);
        }
        let (control, target) = rng.choose_two_distinct(&qubits);
        session.add_gate(kind, &[control, target], None)?;
    } else {
        let operand = *rng.choose(&qubits);
        let phase = kind.has_phase().then(|| rng.next_f64() * PI);
        session.add_gate(kind, &[operand], phase)?;
    }
    Ok(())
}

/// Attempt a delete-gate draw over the live gates.
///
/// # Errors
///
/// Skippable [`HarnessError::NoLiveGate`] when no gate is live.
fn try_delete_gate(rng: &mut SplitMix64, session: &mut EditSession) -> Result<()> {
    let gates = session.live_gates();
    if gates.is_empty() {
        return Err(HarnessError::NoLiveGate);
    }
    session.delete_gate(*rng.choose(&gates))
}

/// Attempt a delete-qubit draw over the unreferenced live qubits.
///
/// # Errors
///
/// Skippable [`HarnessError::NoDeletableQubit`] when every live qubit is
/// referenced (or none is live).
fn try_delete_qubit(rng: &mut SplitMix64, session: &mut EditSession) -> Result<()> {
    let eligible = session.deletable_qubits();
    if eligible.is_empty() {
        return Err(HarnessError::NoDeletableQubit);
    }
    session.delete_qubit(*rng.choose(&eligible))
}

// ===========================================================================
// Run driver
// ===========================================================================

/// Configuration for a full generation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub cases: usize,
    pub generator: GeneratorConfig,
    pub base_seed: u64,
    pub script_dir: std::path::PathBuf,
    pub expected_dir: std::path::PathBuf,
}

/// Generate every case of a run and write its artifacts.
///
/// A case whose artifacts cannot be written is recorded in
/// `failed_cases` and the run continues; nothing else is shared between
/// cases.
///
/// # Errors
///
/// Fails only on generator-internal errors (see [`generate_case`]).
pub fn run_generation(config: &RunConfig) -> Result<RunManifest> {
    let mut manifest = RunManifest {
        base_seed: config.base_seed,
        iterations: config.generator.iterations,
        cases: Vec::with_capacity(config.cases),
        failed_cases: Vec::new(),
    };

    for index in 0..config.cases as u64 {
        let seed = case_seed(config.base_seed, index);
        let case = generate_case(seed, &config.generator)?;
        let script = case.session.script_text();
        let expected = case.session.expected_listing();

        let written = write_text(&script_path(&config.script_dir, index), &script)
            .and_then(|()| write_text(&listing_path(&config.expected_dir, index), &expected));
        if let Err(err) = written {
            warn!(case = index, error = %err, "skipping case: artifact write failed");
            manifest.failed_cases.push(index);
            continue;
        }

        manifest.cases.push(CaseManifest {
            index,
            seed,
            command_count: case.session.commands().len(),
            live_qubits: case.session.qubit_count(),
            live_gates: case.session.gate_count(),
            script_sha256: sha256_hex(&script),
        });
    }

    info!(
        cases = manifest.cases.len(),
        failed = manifest.failed_cases.len(),
        base_seed = config.base_seed,
        "generation run complete"
    );
    Ok(manifest)
}

/// Write the manifest produced by [`run_generation`].
///
/// # Errors
///
/// Fails when the manifest cannot be serialized or written.
pub fn write_run_manifest(path: &std::path::Path, manifest: &RunManifest) -> Result<()> {
    write_manifest(path, manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_same_script() {
        let config = GeneratorConfig { iterations: 200 };
        let a = generate_case(2022, &config).unwrap();
        let b = generate_case(2022, &config).unwrap();
        assert_eq!(a.session.script_text(), b.session.script_text());
        assert_eq!(a.session.expected_listing(), b.session.expected_listing());
        assert_eq!(a.mix, b.mix);
    }

    #[test]
    fn different_seeds_diverge() {
        let config = GeneratorConfig { iterations: 200 };
        let a = generate_case(1, &config).unwrap();
        let b = generate_case(2, &config).unwrap();
        assert_ne!(a.session.script_text(), b.session.script_text());
    }

    #[test]
    fn every_iteration_is_accounted_for() {
        let config = GeneratorConfig { iterations: 500 };
        let case = generate_case(77, &config).unwrap();
        assert_eq!(case.mix.total(), 500);
    }

    #[test]
    fn first_emitted_command_is_add_qubit() {
        // Until a qubit exists, only add-qubit can apply, so any script
        // longer than the bare trailer must open with `qcba`.
        let config = GeneratorConfig { iterations: 50 };
        for seed in 0..16 {
            let case = generate_case(seed, &config).unwrap();
            let script = case.session.script_text();
            let first = script.lines().next().unwrap();
            if first != "qccp" {
                assert_eq!(first, "qcba", "seed {seed}");
            }
        }
    }

    #[test]
    fn inapplicable_draws_surface_as_skippable_errors() {
        let mut rng = SplitMix64::new(3);
        let mut session = EditSession::new();

        let err = try_add_gate(&mut rng, &mut session, GateKind::H).unwrap_err();
        assert!(matches!(err, HarnessError::NoLiveQubit));
        assert!(err.is_skippable());
        let err = try_delete_gate(&mut rng, &mut session).unwrap_err();
        assert!(matches!(err, HarnessError::NoLiveGate));
        assert!(err.is_skippable());

        session.add_qubit();
        let err = try_add_gate(&mut rng, &mut session, GateKind::Cx).unwrap_err();
        assert!(matches!(err, HarnessError::NeedTwoQubits));
        assert!(err.is_skippable());

        // The sole qubit becomes referenced, so nothing is deletable.
        try_add_gate(&mut rng, &mut session, GateKind::X).unwrap();
        let err = try_delete_qubit(&mut rng, &mut session).unwrap_err();
        assert!(matches!(err, HarnessError::NoDeletableQubit));
        assert!(err.is_skippable());
    }

    #[test]
    fn zero_iterations_still_emits_the_trailer() {
        let config = GeneratorConfig { iterations: 0 };
        let case = generate_case(9, &config).unwrap();
        assert_eq!(case.session.script_text(), "qccp\nqq -f\n");
        assert_eq!(case.session.expected_listing(), "Listed by gate ID\n");
    }

    #[test]
    fn rotation_angles_stay_in_half_open_pi_range() {
        let config = GeneratorConfig { iterations: 2000 };
        let case = generate_case(31, &config).unwrap();
        for id in case.session.live_gates() {
            let gate = case.session.gate(id).unwrap();
            if let Some(angle) = gate.phase {
                assert!((0.0..PI).contains(&angle), "angle {angle} out of range");
            }
        }
    }
}
