//! Generate differential test cases for the qcir circuit editor.
//!
//! Writes one command script (`<idx>.in`) and one expected listing
//! (`<idx>.out`) per case, plus a JSON run manifest fingerprinting every
//! script. Replay the scripts against the tool, capture its output, then
//! run `qcir-compare` on the results.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use qcir_harness::generator::{
    DEFAULT_BASE_SEED, DEFAULT_ITERATIONS, GeneratorConfig, RunConfig, run_generation,
    write_run_manifest,
};

const USAGE: &str = "\
usage: qcir-generate [options]

options:
  --cases N           number of independent cases to generate (default 5)
  --iterations N      operation draws per case (default 1000)
  --seed S            base seed for the run (u64)
  --script-dir DIR    output directory for command scripts (default test_case/in)
  --expected-dir DIR  output directory for expected listings (default test_case/out)
  --manifest PATH     run manifest path (default <expected-dir>/manifest.json)
  --help              show this message
";

#[derive(Debug, Clone)]
struct CliConfig {
    run: RunConfig,
    manifest_path: PathBuf,
    show_help: bool,
}

impl CliConfig {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut cases = 5usize;
        let mut iterations = DEFAULT_ITERATIONS;
        let mut base_seed = DEFAULT_BASE_SEED;
        let mut script_dir = PathBuf::from("test_case/in");
        let mut expected_dir = PathBuf::from("test_case/out");
        let mut manifest_path: Option<PathBuf> = None;
        let mut show_help = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--cases" => cases = parse_value(&arg, args.next())?,
                "--iterations" => iterations = parse_value(&arg, args.next())?,
                "--seed" => base_seed = parse_value(&arg, args.next())?,
                "--script-dir" => script_dir = required(&arg, args.next())?.into(),
                "--expected-dir" => expected_dir = required(&arg, args.next())?.into(),
                "--manifest" => manifest_path = Some(required(&arg, args.next())?.into()),
                "--help" | "-h" => show_help = true,
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        let manifest_path =
            manifest_path.unwrap_or_else(|| expected_dir.join("manifest.json"));
        Ok(Self {
            run: RunConfig {
                cases,
                generator: GeneratorConfig { iterations },
                base_seed,
                script_dir,
                expected_dir,
            },
            manifest_path,
            show_help,
        })
    }
}

fn required(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let raw = required(flag, value)?;
    raw.parse()
        .map_err(|_| format!("{flag}: cannot parse '{raw}'"))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let config = match CliConfig::parse(env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("qcir-generate: {err}");
            eprint!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if config.show_help {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let manifest = match run_generation(&config.run) {
        Ok(manifest) => manifest,
        Err(err) => {
            eprintln!("qcir-generate: generation failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = write_run_manifest(&config.manifest_path, &manifest) {
        eprintln!("qcir-generate: cannot write manifest: {err}");
        return ExitCode::FAILURE;
    }

    println!(
        "generated {} case(s) ({} failed), manifest at {}",
        manifest.cases.len(),
        manifest.failed_cases.len(),
        config.manifest_path.display()
    );
    ExitCode::SUCCESS
}
