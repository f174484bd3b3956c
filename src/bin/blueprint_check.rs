//! Validates service descriptor files from the command line.
//!
//! Usage:
//!
//! ```text
//! blueprint_check [--profile default|lenient|strict] [--format yaml|json]
//!                 [--blueprint] [--emit yaml|json] [--fingerprint] <FILE>...
//! ```
//!
//! Each file is read through a capability scoped to its parent directory,
//! decoded, and validated. Valid files print `<file>: ok`, optionally followed
//! by the canonical form (`--emit`) or the SHA-256 fingerprint
//! (`--fingerprint`). Invalid files print one line per violation as
//! `<file>: <field>: <message>`. The exit status is 1 when any file fails.
//!
//! The profile may also be set through `BLUEPRINT_PROFILE`, and log verbosity
//! through `RUST_LOG` (default `warn`).

use blueprint::descriptor::{
    adapters::{
        codec::{self, CodecError, Format},
        filesystem::FileSystemDescriptorSource,
    },
    domain::{Blueprint, Fingerprint, ServiceDescriptor},
    error::SchemaViolation,
    ports::validator::ValidationConfig,
    services::{DescriptorError, DescriptorLoader},
    validation::DefaultDescriptorValidator,
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "blueprint_check", version, about = "Validate service descriptor files")]
struct Cli {
    /// Validation profile.
    #[arg(long, value_enum, env = "BLUEPRINT_PROFILE", default_value_t = Profile::Default)]
    profile: Profile,

    /// Input format; inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    format: Option<TextFormat>,

    /// Treat each file as a blueprint holding `services` and `databases`.
    #[arg(long)]
    blueprint: bool,

    /// Print the canonical form of each valid file.
    #[arg(long, value_enum)]
    emit: Option<TextFormat>,

    /// Print the SHA-256 fingerprint of each valid file.
    #[arg(long)]
    fingerprint: bool,

    /// Files to validate.
    #[arg(required = true)]
    files: Vec<Utf8PathBuf>,
}

/// Named validation presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Profile {
    Default,
    Lenient,
    Strict,
}

impl Profile {
    fn config(self) -> ValidationConfig {
        match self {
            Self::Default => ValidationConfig::default(),
            Self::Lenient => ValidationConfig::lenient(),
            Self::Strict => ValidationConfig::strict(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TextFormat {
    Yaml,
    Json,
}

impl From<TextFormat> for Format {
    fn from(format: TextFormat) -> Self {
        match format {
            TextFormat::Yaml => Self::Yaml,
            TextFormat::Json => Self::Json,
        }
    }
}

/// Errors that stop the run rather than fail a single file.
#[derive(Debug, Error)]
enum CheckError {
    #[error("invalid path '{0}', expected a file name")]
    InvalidPath(Utf8PathBuf),
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

/// Outcome of checking one file.
enum Report {
    Valid { canonical: Option<String>, fingerprint: Option<String> },
    Invalid(DescriptorError),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let _ignored = writeln!(io::stderr().lock(), "blueprint_check: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Checks every file and returns whether all of them are valid.
fn run(cli: &Cli) -> Result<bool, CheckError> {
    let mut stdout = io::stdout().lock();
    let mut all_valid = true;
    for path in &cli.files {
        let report = check_file(cli, path)?;
        all_valid &= matches!(report, Report::Valid { .. });
        write_report(&mut stdout, path, &report)?;
    }
    info!(files = cli.files.len(), all_valid, "check finished");
    Ok(all_valid)
}

fn check_file(cli: &Cli, path: &Utf8Path) -> Result<Report, CheckError> {
    let (directory, name) = split_path(path)?;
    let source = match FileSystemDescriptorSource::open_ambient(directory) {
        Ok(source) => source,
        Err(err) => return Ok(Report::Invalid(err.into())),
    };

    let validator = DefaultDescriptorValidator::with_config(cli.profile.config());
    let mut loader = DescriptorLoader::with_validator(Arc::new(source), validator);
    if let Some(format) = cli.format {
        loader = loader.with_format(format.into());
    }

    let outcome = if cli.blueprint {
        loader
            .load_blueprint(name)
            .and_then(|blueprint| summarise(cli, &blueprint))
    } else {
        loader
            .load_service(name)
            .and_then(|descriptor| summarise(cli, &descriptor))
    };

    Ok(match outcome {
        Ok((canonical, fingerprint)) => Report::Valid {
            canonical,
            fingerprint,
        },
        Err(err) => Report::Invalid(err),
    })
}

/// A validated document the report can emit and fingerprint.
trait Checked {
    fn encode(&self, format: Format) -> Result<String, CodecError>;
    fn fingerprint(&self) -> Result<Fingerprint, serde_json::Error>;
}

impl Checked for ServiceDescriptor {
    fn encode(&self, format: Format) -> Result<String, CodecError> {
        codec::encode_service(self, format)
    }

    fn fingerprint(&self) -> Result<Fingerprint, serde_json::Error> {
        Self::fingerprint(self)
    }
}

impl Checked for Blueprint {
    fn encode(&self, format: Format) -> Result<String, CodecError> {
        codec::encode_blueprint(self, format)
    }

    fn fingerprint(&self) -> Result<Fingerprint, serde_json::Error> {
        Self::fingerprint(self)
    }
}

fn summarise(
    cli: &Cli,
    checked: &impl Checked,
) -> Result<(Option<String>, Option<String>), DescriptorError> {
    let canonical = cli
        .emit
        .map(|format| checked.encode(format.into()))
        .transpose()?;
    let fingerprint = if cli.fingerprint {
        let digest = checked.fingerprint().map_err(CodecError::from)?;
        Some(digest.to_string())
    } else {
        None
    };
    Ok((canonical, fingerprint))
}

fn split_path(path: &Utf8Path) -> Result<(&Utf8Path, &str), CheckError> {
    let name = path
        .file_name()
        .ok_or_else(|| CheckError::InvalidPath(path.to_owned()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    Ok((directory, name))
}

fn write_report(out: &mut impl Write, path: &Utf8Path, report: &Report) -> io::Result<()> {
    match report {
        Report::Valid {
            canonical,
            fingerprint,
        } => {
            writeln!(out, "{path}: ok")?;
            if let Some(fingerprint) = fingerprint {
                writeln!(out, "{path}: fingerprint {fingerprint}")?;
            }
            if let Some(canonical) = canonical {
                out.write_all(canonical.as_bytes())?;
            }
        }
        Report::Invalid(DescriptorError::Schema(violation)) => {
            write_violations(out, path, violation)?;
        }
        Report::Invalid(err) => writeln!(out, "{path}: {err}")?,
    }
    Ok(())
}

fn write_violations(
    out: &mut impl Write,
    path: &Utf8Path,
    violation: &SchemaViolation,
) -> io::Result<()> {
    for single in violation.violations() {
        writeln!(out, "{path}: {single}")?;
    }
    Ok(())
}
