//! Command-line runner for the division oracle.
//!
//! Checks the generated `calculate_div_p2`, `calculate_div_ext` and
//! `calculate_fdiv_p2` functions against the reference and maps the verdict to the
//! process exit code.
//!
//! # Usage
//!
//! ```bash
//! # Link the generated library and run the full fixture
//! DIVISION_TARGET_LIB_DIR=target/generated \
//!     cargo run -p oracle-runner --features native --release
//!
//! # Quick self-check of the harness, no native library needed
//! cargo run -p oracle-runner -- --target reference --preset smoke
//!
//! # Reproduce a failure in the random phase with another seed
//! cargo run -p oracle-runner --features native -- --operation div-ext --seed 7
//! ```
//!
//! # Exit codes
//!
//! - `0`: every selected operation passed
//! - `1`: a mismatch was found; the diagnostic line is printed to stdout
//! - `2`: usage or configuration error

#[cfg(feature = "native")]
mod native;

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use division_oracle::{
    run_float_suite, run_integer_suite, FixtureConfig, Operation, OracleError, RunSummary,
};
use tracing::{info, warn, Level};

const EXIT_MISMATCH: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetKind {
    /// The linked `libdivision_target`
    Native,
    /// The reference itself
    Reference,
}

impl Default for TargetKind {
    fn default() -> Self {
        if cfg!(feature = "native") {
            Self::Native
        } else {
            Self::Reference
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum Preset {
    #[default]
    Full,
    Smoke,
    Stress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OperationChoice {
    #[default]
    All,
    DivP2,
    DivExt,
    FdivP2,
}

#[derive(Debug, Parser)]
#[command(name = "oracle-runner", version, about)]
struct Opt {
    /// Function set to check
    #[arg(long, value_enum, default_value_t = TargetKind::default())]
    target: TargetKind,
    /// Fixture size
    #[arg(long, value_enum, default_value_t = Preset::Full)]
    preset: Preset,
    /// Seed of the integer uniform random phase
    #[arg(long)]
    seed: Option<u64>,
    /// Samples per log-magnitude sweep direction
    #[arg(long)]
    log_count: Option<usize>,
    /// Radius of the dense scan around zero
    #[arg(long, allow_negative_numbers = true)]
    dense_radius: Option<i64>,
    /// Number of integer uniform random draws
    #[arg(long)]
    random_count: Option<usize>,
    /// Number of random doubles
    #[arg(long)]
    float_count: Option<usize>,
    /// Operations to check
    #[arg(long, value_enum, default_value_t = OperationChoice::All)]
    operation: OperationChoice,
    /// Print each passing run summary as a JSON line
    #[arg(long)]
    json: bool,
    /// Log phase progress (-v) or every phase event (-vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Opt {
    fn fixture(&self) -> FixtureConfig {
        let mut config = match self.preset {
            Preset::Full => FixtureConfig::full(),
            Preset::Smoke => FixtureConfig::smoke(),
            Preset::Stress => FixtureConfig::stress(),
        };
        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        if let Some(count) = self.log_count {
            config.log_sweep_count = count;
        }
        if let Some(radius) = self.dense_radius {
            config.dense_radius = radius;
        }
        if let Some(count) = self.random_count {
            config.random_count = count;
        }
        if let Some(count) = self.float_count {
            config.float_random_count = count;
        }
        config
    }

    fn integer_operations(&self) -> Vec<Operation<i64>> {
        match self.operation {
            OperationChoice::All => Operation::INTEGER.to_vec(),
            OperationChoice::DivP2 => vec![Operation::DIV_P2],
            OperationChoice::DivExt => vec![Operation::DIV_EXT],
            OperationChoice::FdivP2 => Vec::new(),
        }
    }

    fn checks_float(&self) -> bool {
        matches!(
            self.operation,
            OperationChoice::All | OperationChoice::FdivP2
        )
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

#[cfg(feature = "native")]
fn integer_target(kind: TargetKind, operation: Operation<i64>) -> fn(i64) -> i64 {
    match kind {
        TargetKind::Reference => operation.reference,
        TargetKind::Native if operation.name == Operation::DIV_EXT.name => {
            native::calculate_div_ext
        }
        TargetKind::Native => native::calculate_div_p2,
    }
}

#[cfg(not(feature = "native"))]
fn integer_target(_kind: TargetKind, operation: Operation<i64>) -> fn(i64) -> i64 {
    operation.reference
}

#[cfg(feature = "native")]
fn float_target(kind: TargetKind) -> fn(f64) -> f64 {
    match kind {
        TargetKind::Reference => Operation::FDIV_P2.reference,
        TargetKind::Native => native::calculate_fdiv_p2,
    }
}

#[cfg(not(feature = "native"))]
fn float_target(_kind: TargetKind) -> fn(f64) -> f64 {
    Operation::FDIV_P2.reference
}

/// Runs every selected operation, stopping at the first failure.
fn run(opt: &Opt) -> Result<Vec<RunSummary>, OracleError> {
    let config = opt.fixture();
    config.validate()?;

    let mut summaries = Vec::new();
    for operation in opt.integer_operations() {
        let target = integer_target(opt.target, operation);
        summaries.push(run_integer_suite(operation, target, &config)?);
    }
    if opt.checks_float() {
        summaries.push(run_float_suite(float_target(opt.target), &config)?);
    }
    Ok(summaries)
}

/// Exit code for a failed parse. Help and version requests exit cleanly.
fn parse_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_USAGE
    } else {
        0
    }
}

fn main() -> ExitCode {
    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(err) => {
            // No subscriber is installed yet and stderr is the only channel left, so a
            // failed write has nowhere to go; the exit code still carries the outcome.
            if err.print().is_err() {
                return ExitCode::from(EXIT_USAGE);
            }
            return ExitCode::from(parse_exit_code(&err));
        }
    };

    if let Err(err) = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opt.log_level())
            .with_writer(std::io::stderr)
            .finish(),
    ) {
        eprintln!("could not install log subscriber: {err}");
    }

    if opt.target == TargetKind::Native && !cfg!(feature = "native") {
        eprintln!("error: --target native requires building with `--features native`");
        return ExitCode::from(EXIT_USAGE);
    }

    match run(&opt) {
        Ok(summaries) => {
            for summary in &summaries {
                info!(
                    operation = summary.operation,
                    total_inputs = summary.total_inputs,
                    elapsed_ms = summary.elapsed.as_millis() as u64,
                    "operation passed"
                );
                if opt.json {
                    match summary.to_json() {
                        Some(line) => println!("{line}"),
                        None => warn!(operation = summary.operation, "summary not serializable"),
                    }
                } else {
                    println!(
                        "{}: {} inputs passed in {:.2?}",
                        summary.operation, summary.total_inputs, summary.elapsed
                    );
                }
            }
            ExitCode::SUCCESS
        }
        Err(OracleError::Mismatch(report)) => {
            println!("{report}");
            ExitCode::from(EXIT_MISMATCH)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Opt {
        Opt::try_parse_from(std::iter::once("oracle-runner").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_run_the_full_fixture_for_every_operation() {
        let opt = parse(&[]);
        assert_eq!(opt.fixture(), FixtureConfig::full());
        assert_eq!(opt.integer_operations().len(), 2);
        assert!(opt.checks_float());
        assert_eq!(opt.log_level(), Level::WARN);
    }

    #[test]
    fn overrides_apply_on_top_of_the_preset() {
        let opt = parse(&[
            "--preset",
            "smoke",
            "--seed",
            "7",
            "--dense-radius",
            "12",
            "--float-count",
            "3",
        ]);
        let config = opt.fixture();
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.dense_radius, 12);
        assert_eq!(config.float_random_count, 3);
        assert_eq!(config.log_sweep_count, FixtureConfig::smoke().log_sweep_count);
    }

    #[test]
    fn single_operation_selection() {
        let opt = parse(&["--operation", "div-ext"]);
        let names: Vec<&str> = opt.integer_operations().iter().map(|op| op.name).collect();
        assert_eq!(names, ["calculate_div_ext"]);
        assert!(!opt.checks_float());

        let opt = parse(&["--operation", "fdiv-p2"]);
        assert!(opt.integer_operations().is_empty());
        assert!(opt.checks_float());
    }

    #[test]
    fn verbosity_raises_the_log_level() {
        assert_eq!(parse(&["-v"]).log_level(), Level::INFO);
        assert_eq!(parse(&["-vv"]).log_level(), Level::DEBUG);
    }

    #[test]
    fn unknown_values_are_usage_errors() {
        let err = Opt::try_parse_from(["oracle-runner", "--preset", "huge"]).unwrap_err();
        assert!(err.use_stderr());
        assert_eq!(parse_exit_code(&err), EXIT_USAGE);
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        for flag in ["--help", "--version"] {
            let err = Opt::try_parse_from(["oracle-runner", flag]).unwrap_err();
            assert!(!err.use_stderr(), "{flag}");
            assert_eq!(parse_exit_code(&err), 0, "{flag}");
        }
    }

    #[test]
    fn reference_target_passes_a_small_fixture() {
        let opt = parse(&[
            "--target",
            "reference",
            "--preset",
            "smoke",
            "--log-count",
            "50",
            "--dense-radius",
            "50",
            "--random-count",
            "50",
            "--float-count",
            "50",
        ]);
        let summaries = run(&opt).unwrap();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[2].operation, "calculate_fdiv_p2");
    }

    #[test]
    fn invalid_override_is_a_configuration_error() {
        let opt = parse(&["--target", "reference", "--dense-radius", "-1"]);
        let err = run(&opt).unwrap_err();
        assert!(matches!(err, OracleError::InvalidConfig { .. }));
    }
}
