// crates/approval-gate-cli/src/main.rs
// ============================================================================
// Module: Approval Gate CLI Entry Point
// Description: Command dispatcher for gate evaluation and hashing workflows.
// Purpose: Run the approval gate against resource files from a shell or CI job.
// Dependencies: clap, approval-gate-core, approval-gate-config, serde_jcs, thiserror.
// ============================================================================

//! ## Overview
//! `approval-gate` evaluates an observed/desired resource pair, prints the
//! gate response, and maps the decision onto the exit code (0 continue,
//! 2 halt, 1 error). Inputs are untrusted: every file read is size-limited
//! and parsed strictly.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use approval_gate_config::ApprovalGateConfig;
use approval_gate_config::AuditConfig;
use approval_gate_config::ConfigError;
use approval_gate_core::ApprovalGate;
use approval_gate_core::Document;
use approval_gate_core::FieldPath;
use approval_gate_core::GateConfig;
use approval_gate_core::GateDecision;
use approval_gate_core::GateRequest;
use approval_gate_core::GateResponse;
use approval_gate_core::HashAlgorithm;
use approval_gate_core::RawGateConfig;
use approval_gate_core::Severity;
use approval_gate_core::get_path;
use approval_gate_core::hashing::DEFAULT_HASH_ALGORITHM;
use approval_gate_core::hashing::hash_value;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an observed or desired resource document.
const MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;
/// Maximum size of a JSON gate input file.
const MAX_GATE_INPUT_BYTES: usize = 1024 * 1024;
/// Exit status for a continue decision.
const EXIT_CONTINUE: u8 = 0;
/// Exit status for an evaluation error.
const EXIT_ERROR: u8 = 1;
/// Exit status for a halt decision.
const EXIT_HALT: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "approval-gate", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a resource pair and print the gate response.
    Evaluate(EvaluateCommand),
    /// Print the content hash of a document subtree.
    Hash(HashCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `evaluate`.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Proposed resource (JSON).
    #[arg(long, value_name = "FILE")]
    desired: PathBuf,
    /// Last known good resource (JSON); defaults to the desired resource.
    #[arg(long, value_name = "FILE")]
    observed: Option<PathBuf>,
    /// Config file (`approval-gate.toml`).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Gate input object (JSON, camelCase keys); overrides the `[gate]` section.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

/// Arguments for `hash`.
#[derive(Args, Debug)]
struct HashCommand {
    /// Resource document (JSON).
    #[arg(long, value_name = "FILE")]
    document: PathBuf,
    /// Dot path of the subtree to hash.
    #[arg(long, value_name = "PATH")]
    path: String,
    /// Hash algorithm.
    #[arg(long, value_enum)]
    algorithm: Option<HashAlgorithmArg>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate an approval gate configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config file path (defaults to `APPROVAL_GATE_CONFIG` or `approval-gate.toml`).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Output formats for `evaluate`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Canonical JSON gate response.
    Json,
    /// Human-readable summary.
    Text,
}

/// Hash algorithm selection.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum HashAlgorithmArg {
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
}

impl From<HashAlgorithmArg> for HashAlgorithm {
    fn from(value: HashAlgorithmArg) -> Self {
        match value {
            HashAlgorithmArg::Sha256 => Self::Sha256,
            HashAlgorithmArg::Sha512 => Self::Sha512,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate(command) => command_evaluate(&command),
        Commands::Hash(command) => command_hash(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Evaluate Command
// ============================================================================

/// Executes the `evaluate` command.
fn command_evaluate(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let gate = build_gate(command)?;
    let desired = read_document(&command.desired, "desired")?;
    let observed = match &command.observed {
        Some(path) => read_document(path, "observed")?,
        None => desired.clone(),
    };
    let response = gate.run(GateRequest {
        observed,
        desired,
        context: None,
    });
    match command.format {
        OutputFormat::Json => write_canonical_json(&response)?,
        OutputFormat::Text => write_stdout_line(&render_text(&response))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
    }
    Ok(ExitCode::from(exit_status(&response)))
}

/// Builds the gate from `--input`, `--config`, or the default config file.
fn build_gate(command: &EvaluateCommand) -> CliResult<ApprovalGate> {
    let (gate_config, audit) = match &command.input {
        Some(input) => {
            let gate_config = read_gate_input(input)?;
            let audit = match &command.config {
                Some(path) => load_config(Some(path))?.audit,
                None => AuditConfig::default(),
            };
            (gate_config, audit)
        }
        None => {
            let config = load_config(command.config.as_deref())?;
            let gate_config = config.gate_config().map_err(config_error)?;
            (gate_config, config.audit)
        }
    };
    let sink = audit.build_sink().map_err(config_error)?;
    Ok(ApprovalGate::with_audit(gate_config, sink))
}

/// Reads and resolves a camelCase gate input object.
fn read_gate_input(path: &Path) -> CliResult<GateConfig> {
    let bytes = read_input(path, "gate input", MAX_GATE_INPUT_BYTES)?;
    let raw: RawGateConfig = serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(format!("failed to parse gate input {}: {err}", path.display()))
    })?;
    raw.resolve().map_err(|err| CliError::new(err.to_string()))
}

/// Maps a gate response onto the process exit status.
fn exit_status(response: &GateResponse) -> u8 {
    match response.decision() {
        Some(GateDecision::Continue) => EXIT_CONTINUE,
        Some(GateDecision::Halt) => EXIT_HALT,
        None => EXIT_ERROR,
    }
}

/// Renders a human-readable summary of a gate response.
fn render_text(response: &GateResponse) -> String {
    let mut lines = Vec::new();
    match &response.outcome {
        Some(outcome) => {
            lines.push(format!("decision: {}", outcome.decision.as_str()));
            lines.push(format!("current hash: {}", outcome.current_hash));
            lines.push(format!("approved hash: {}", outcome.stored_hash));
            lines.push(format!("approved: {}", outcome.approved));
        }
        None => lines.push("decision: error".to_string()),
    }
    for condition in &response.conditions {
        lines.push(format!(
            "condition: {} ({}): {}",
            condition.condition_type, condition.reason, condition.message
        ));
    }
    for result in &response.results {
        let label = match result.severity {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Fatal => "fatal",
        };
        lines.push(format!("{label}: {}", result.message));
    }
    lines.join("\n")
}

// ============================================================================
// SECTION: Hash Command
// ============================================================================

/// Executes the `hash` command.
fn command_hash(command: &HashCommand) -> CliResult<ExitCode> {
    let document = read_document(&command.document, "document")?;
    let algorithm = command.algorithm.map_or(DEFAULT_HASH_ALGORITHM, HashAlgorithm::from);
    let digest = subtree_hash(&document, &command.path, algorithm)?;
    write_stdout_line(&digest).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Hashes the subtree at `path` within `document`.
fn subtree_hash(document: &Document, path: &str, algorithm: HashAlgorithm) -> CliResult<String> {
    let path = FieldPath::parse(path)
        .map_err(|err| CliError::new(format!("invalid path \"{path}\": {err}")))?;
    let value = get_path(document, &path)
        .ok_or_else(|| CliError::new(format!("field {path} not found in document")))?;
    hash_value(algorithm, value).map_err(|err| CliError::new(err.to_string()))
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes the `config` command family.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads the file configuration.
fn load_config(path: Option<&Path>) -> CliResult<ApprovalGateConfig> {
    ApprovalGateConfig::load(path).map_err(config_error)
}

/// Formats a config error.
fn config_error(err: ConfigError) -> CliError {
    CliError::new(format!("failed to load config: {err}"))
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads an input file, mapping limit errors to CLI errors.
fn read_input(path: &Path, kind: &str, max_bytes: usize) -> CliResult<Vec<u8>> {
    read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read {kind} {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "{kind} {} exceeds size limit ({size} > {limit} bytes)",
            path.display()
        )),
    })
}

/// Reads a JSON resource document; the top level must be an object.
fn read_document(path: &Path, kind: &str) -> CliResult<Document> {
    let bytes = read_input(path, kind, MAX_DOCUMENT_BYTES)?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(format!("failed to parse {kind} document {}: {err}", path.display()))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a gate response to stdout as canonical JSON.
fn write_canonical_json(response: &GateResponse) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(response)
        .map_err(|err| CliError::new(format!("failed to serialize response: {err}")))?;
    bytes.push(b'\n');
    std::io::stdout()
        .write_all(&bytes)
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
