//! End-to-end run: generate cases into a temp tree, simulate the tool's
//! captured output (one case deliberately corrupted), compare, and check
//! the verdict record.

use std::fs;

use tempfile::tempdir;

use qcir_harness::artifacts::{collect_listings, sha256_hex};
use qcir_harness::comparator::{CompareConfig, run_comparison};
use qcir_harness::generator::{GeneratorConfig, RunConfig, run_generation, write_run_manifest};

const CASES: usize = 4;

fn generation_config(root: &std::path::Path) -> RunConfig {
    RunConfig {
        cases: CASES,
        generator: GeneratorConfig { iterations: 120 },
        base_seed: 2022,
        script_dir: root.join("in"),
        expected_dir: root.join("out"),
    }
}

/// Wrap an expected listing in the chatter a real capture carries.
fn simulate_capture(expected: &str) -> String {
    format!("qsyn v0.5.0\nqsyn> qccp\n{expected}qsyn> qq -f\nquitting.\n")
}

#[test]
fn full_pipeline_flags_exactly_the_corrupted_case() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let config = generation_config(root);

    let manifest = run_generation(&config).unwrap();
    assert_eq!(manifest.cases.len(), CASES);
    assert!(manifest.failed_cases.is_empty());

    let manifest_path = root.join("manifest.json");
    write_run_manifest(&manifest_path, &manifest).unwrap();
    let json = fs::read_to_string(&manifest_path).unwrap();
    assert!(json.contains("\"base_seed\": 2022"));

    // Scripts on disk match the manifest fingerprints.
    for case in &manifest.cases {
        let script = fs::read_to_string(config.script_dir.join(format!("{}.in", case.index)))
            .unwrap();
        assert_eq!(sha256_hex(&script), case.script_sha256);
        assert_eq!(script.lines().count(), case.command_count);
    }

    let expected_files = collect_listings(&config.expected_dir).unwrap();
    assert_eq!(expected_files.len(), CASES);

    // Corrupt one case, preferring one that actually lists gates (appending
    // a digit to its last qubit id); a header-only case corrupted the same
    // way loses its header line, which is also a divergence.
    let corrupt_index = expected_files
        .iter()
        .find(|(_, path)| fs::read_to_string(path).unwrap().lines().count() >= 2)
        .map_or(0, |(index, _)| *index);

    let actual_dir = root.join("qsyn_out");
    fs::create_dir_all(&actual_dir).unwrap();
    for (index, path) in &expected_files {
        let expected = fs::read_to_string(path).unwrap();
        let text = if *index == corrupt_index {
            let mut corrupted = expected.trim_end().to_owned();
            corrupted.push_str("9\n");
            corrupted
        } else {
            expected
        };
        fs::write(actual_dir.join(format!("{index}.out")), simulate_capture(&text)).unwrap();
    }

    let compare = CompareConfig {
        expected_dir: config.expected_dir.clone(),
        actual_dir,
        record_path: root.join("record.txt"),
    };
    let summary = run_comparison(&compare).unwrap();
    assert_eq!(summary.compared, CASES);
    assert_eq!(summary.divergent, 1);
    assert_eq!(summary.correct, CASES - 1);
    assert_eq!(summary.skipped, 0);

    let record = fs::read_to_string(&compare.record_path).unwrap();
    let lines: Vec<&str> = record.lines().collect();
    assert_eq!(lines.len(), CASES);
    for line in &lines {
        if line.contains(&format!("{corrupt_index}.out")) {
            assert!(line.ends_with(": has bug"), "unexpected line: {line}");
        } else {
            assert!(line.ends_with(": is correct"), "unexpected line: {line}");
        }
    }

    // Re-running over unchanged artifacts appends identical verdicts.
    let summary_again = run_comparison(&compare).unwrap();
    assert_eq!(summary_again, summary);
    let record_again = fs::read_to_string(&compare.record_path).unwrap();
    let lines_again: Vec<&str> = record_again.lines().collect();
    assert_eq!(lines_again.len(), 2 * CASES);
    assert_eq!(&lines_again[..CASES], &lines_again[CASES..]);
}

#[test]
fn artifact_write_failure_fails_only_that_case() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let config = generation_config(root);

    // A directory squatting on case 0's script path makes its write fail.
    fs::create_dir_all(config.script_dir.join("0.in")).unwrap();

    let manifest = run_generation(&config).unwrap();
    assert_eq!(manifest.failed_cases, vec![0]);
    assert_eq!(manifest.cases.len(), CASES - 1);
    assert!(manifest.cases.iter().all(|case| case.index != 0));

    // The failed case wrote no expected listing; the rest are intact.
    assert!(!config.expected_dir.join("0.out").exists());
    for case in &manifest.cases {
        assert!(config.script_dir.join(format!("{}.in", case.index)).is_file());
        assert!(config.expected_dir.join(format!("{}.out", case.index)).is_file());
    }
}

#[test]
fn unreadable_cases_are_skipped_without_stopping_the_run() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let config = generation_config(root);
    run_generation(&config).unwrap();

    // Captured output exists only for case 0; the others must be skipped
    // on the capture side without affecting case 0's verdict.
    let actual_dir = root.join("qsyn_out");
    fs::create_dir_all(&actual_dir).unwrap();
    let expected0 = fs::read_to_string(config.expected_dir.join("0.out")).unwrap();
    fs::write(actual_dir.join("0.out"), simulate_capture(&expected0)).unwrap();
    // A capture with no expected counterpart is skipped too.
    fs::write(actual_dir.join("99.out"), "orphan\n").unwrap();

    let compare = CompareConfig {
        expected_dir: config.expected_dir.clone(),
        actual_dir,
        record_path: root.join("record.txt"),
    };
    let summary = run_comparison(&compare).unwrap();
    assert_eq!(summary.compared, 1);
    assert_eq!(summary.correct, 1);
    assert_eq!(summary.skipped, 1);

    let record = fs::read_to_string(&compare.record_path).unwrap();
    assert_eq!(record.lines().count(), 1);
    assert!(record.trim_end().ends_with("0.out: is correct"));
}

#[test]
fn truncated_capture_is_recorded_as_divergent() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let mut config = generation_config(root);
    config.cases = 1;
    run_generation(&config).unwrap();

    let actual_dir = root.join("qsyn_out");
    fs::create_dir_all(&actual_dir).unwrap();
    // The tool died before printing the listing header.
    fs::write(actual_dir.join("0.out"), "qsyn v0.5.0\nsegmentation fault\n").unwrap();

    let compare = CompareConfig {
        expected_dir: config.expected_dir.clone(),
        actual_dir,
        record_path: root.join("record.txt"),
    };
    let summary = run_comparison(&compare).unwrap();
    assert_eq!(summary.compared, 1);
    assert_eq!(summary.divergent, 1);

    let record = fs::read_to_string(&compare.record_path).unwrap();
    assert!(record.trim_end().ends_with("0.out: has bug"));
}
