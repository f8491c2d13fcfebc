//! Compare captured qcir tool output against the oracle's expected
//! listings and append one verdict per case to the record file.
//!
//! Divergences are findings, not failures: the process exits zero as long
//! as the record was written. Only usage errors and record I/O failures
//! exit nonzero.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use qcir_harness::comparator::{CompareConfig, run_comparison};

const USAGE: &str = "\
usage: qcir-compare [options]

options:
  --expected-dir DIR  oracle listings (default test_case/out)
  --actual-dir DIR    captured tool output (default test_case/qsyn_out)
  --record PATH       cumulative verdict record (default test_case/record.txt)
  --help              show this message
";

#[derive(Debug, Clone)]
struct CliConfig {
    compare: CompareConfig,
    show_help: bool,
}

impl CliConfig {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut expected_dir = PathBuf::from("test_case/out");
        let mut actual_dir = PathBuf::from("test_case/qsyn_out");
        let mut record_path = PathBuf::from("test_case/record.txt");
        let mut show_help = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--expected-dir" => expected_dir = required(&arg, args.next())?.into(),
                "--actual-dir" => actual_dir = required(&arg, args.next())?.into(),
                "--record" => record_path = required(&arg, args.next())?.into(),
                "--help" | "-h" => show_help = true,
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        Ok(Self {
            compare: CompareConfig {
                expected_dir,
                actual_dir,
                record_path,
            },
            show_help,
        })
    }
}

fn required(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{flag} requires a value"))
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
            eprintln!("qcir-compare: {err}");
            eprint!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if config.show_help {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run_comparison(&config.compare) {
        Ok(summary) => {
            println!(
                "compared {} case(s): {} correct, {} divergent, {} skipped",
                summary.compared, summary.correct, summary.divergent, summary.skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("qcir-compare: {err}");
            ExitCode::FAILURE
        }
    }
}
