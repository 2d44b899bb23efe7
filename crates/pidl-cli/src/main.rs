// crates/pidl-cli/src/main.rs
// ============================================================================
// Module: PIDL CLI Entry Point
// Description: Command dispatcher for descriptor resolution and table lookups.
// Purpose: Provide a safe, localized CLI over the built-in PIDL catalog.
// Dependencies: clap, pidl-catalog, pidl-config, pidl-core, serde_json, thiserror, time.
// ============================================================================

//! ## Overview
//! The `pidl` binary resolves descriptor documents from the built-in catalog,
//! prints dictionaries, runs phone validation and submit transformations, and
//! verifies that a documents file survives an encode and decode. All
//! user-facing strings are routed through the i18n catalog. Inputs are
//! untrusted: files are read with hard size limits before parsing.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use pidl_catalog::builtin_tables;
use pidl_cli::i18n::Locale;
use pidl_cli::i18n::set_locale;
use pidl_cli::t;
use pidl_config::AuditTarget;
use pidl_config::PidlConfig;
use pidl_core::EngineTables;
use pidl_core::ExecutionStatus;
use pidl_core::FileAuditSink;
use pidl_core::FlightSet;
use pidl_core::NoopAuditSink;
use pidl_core::OrderedMap;
use pidl_core::PaymentExperienceSetting;
use pidl_core::ResolutionAuditSink;
use pidl_core::ResolutionEngine;
use pidl_core::ResolutionKey;
use pidl_core::StderrAuditSink;
use pidl_core::deserialize_documents;
use pidl_core::round_trips;
use pidl_core::serialize_documents;
use pidl_core::serialize_documents_pretty;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "PIDL_LANG";
/// Default transformation target.
const DEFAULT_TRANSFORM_TARGET: &str = "forSubmit";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "pidl", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `PIDL_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve descriptor documents for a key.
    Resolve(ResolveCommand),
    /// Print a named or inline dictionary.
    Dictionary(DictionaryCommand),
    /// Validate a phone number for a market.
    ValidatePhone(ValidatePhoneCommand),
    /// Apply the submit transformation configured for a property.
    Transform(TransformCommand),
    /// Verify a documents file survives an encode and decode unchanged.
    Roundtrip(RoundtripCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a PIDL configuration file.
    Validate(ConfigArgs),
}

/// Shared config file selection.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to pidl.toml or `PIDL_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `resolve`.
#[derive(Args, Debug)]
struct ResolveCommand {
    /// Descriptor family, e.g. `payment-method` or `tax_id`.
    #[arg(value_name = "DESCRIPTOR")]
    descriptor: String,
    /// Market code.
    #[arg(long)]
    country: String,
    /// Operation, e.g. `add` or `update`.
    #[arg(long)]
    operation: String,
    /// Calling partner.
    #[arg(long)]
    partner: String,
    /// Payment method family, e.g. `credit_card`.
    #[arg(long)]
    family: Option<String>,
    /// Descriptor type, e.g. `visa` or `billing`.
    #[arg(long = "type", value_name = "TYPE")]
    type_name: Option<String>,
    /// Display language.
    #[arg(long)]
    language: Option<String>,
    /// Scenario.
    #[arg(long)]
    scenario: Option<String>,
    /// Profile type, e.g. `consumer` or `organization`.
    #[arg(long)]
    profile_type: Option<String>,
    /// Classic product forwarded to data sources.
    #[arg(long)]
    classic_product: Option<String>,
    /// Billable account id forwarded to data sources.
    #[arg(long)]
    billable_account_id: Option<String>,
    /// Request the standalone tax-id flow.
    #[arg(long, action = ArgAction::SetTrue)]
    standalone: bool,
    /// Comma-separated active flights.
    #[arg(long, value_name = "LIST")]
    flights: Option<String>,
    /// Path to a payment experience setting JSON file.
    #[arg(long, value_name = "PATH")]
    setting: Option<PathBuf>,
    /// Pretty-print the output.
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Arguments for `dictionary`.
#[derive(Args, Debug)]
struct DictionaryCommand {
    /// Dictionary name or inline `{}name=value;...` token.
    #[arg(value_name = "TOKEN")]
    token: String,
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Arguments for `validate-phone`.
#[derive(Args, Debug)]
struct ValidatePhoneCommand {
    /// Market code.
    #[arg(long)]
    country: String,
    /// Phone number as entered.
    #[arg(value_name = "NUMBER")]
    value: String,
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Arguments for `transform`.
#[derive(Args, Debug)]
struct TransformCommand {
    /// Property name, e.g. `phone_number` or `region`.
    #[arg(long)]
    property: String,
    /// Raw value.
    #[arg(long)]
    value: String,
    /// Transformation target.
    #[arg(long, default_value = DEFAULT_TRANSFORM_TARGET)]
    target: String,
    /// Market code of the owning document.
    #[arg(long)]
    country: String,
    /// Description type of the owning document.
    #[arg(long)]
    description_type: String,
    /// Operation of the owning document.
    #[arg(long, default_value = "add")]
    operation: String,
    /// Descriptor type of the owning document.
    #[arg(long = "type", value_name = "TYPE", default_value = "")]
    type_name: String,
    /// Comma-separated active flights.
    #[arg(long, value_name = "LIST")]
    flights: Option<String>,
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Arguments for `roundtrip`.
#[derive(Args, Debug)]
struct RoundtripCommand {
    /// Path to a documents JSON file.
    #[arg(value_name = "PATH")]
    path: PathBuf,
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

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
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Resolve(command) => command_resolve(&command),
        Commands::Dictionary(command) => command_dictionary(&command),
        Commands::ValidatePhone(command) => command_validate_phone(&command),
        Commands::Transform(command) => command_transform(&command),
        Commands::Roundtrip(command) => command_roundtrip(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Resolve Command
// ============================================================================

/// Executes the `resolve` command.
fn command_resolve(command: &ResolveCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let tables = build_tables(&config)?;
    let engine_config = config.engine_config().map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let setting = command
        .setting
        .as_deref()
        .map(|path| load_setting(path, config.limits.max_document_bytes))
        .transpose()?;
    let key = build_key(command)?;
    let engine = ResolutionEngine::new(&tables, audit_sink(&config)?).with_config(engine_config);
    let documents = engine
        .resolve_named(&command.descriptor, &key, setting.as_ref())
        .map_err(|err| CliError::new(t!("resolve.failed", error = err)))?;
    let bytes = if command.pretty {
        serialize_documents_pretty(&documents)
    } else {
        serialize_documents(&documents)
    }
    .map_err(|err| CliError::new(t!("output.encode_failed", error = err)))?;
    write_stdout_bytes_with_newline(&bytes)?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the resolution key from command arguments.
fn build_key(command: &ResolveCommand) -> CliResult<ResolutionKey> {
    let mut builder = ResolutionKey::builder(&command.country, &command.operation, &command.partner)
        .standalone(command.standalone)
        .flights(parse_flights(command.flights.as_deref())?);
    if let Some(family) = &command.family {
        builder = builder.family(family);
    }
    if let Some(type_name) = &command.type_name {
        builder = builder.type_name(type_name);
    }
    if let Some(language) = &command.language {
        builder = builder.language(language);
    }
    if let Some(scenario) = &command.scenario {
        builder = builder.scenario(scenario);
    }
    if let Some(profile_type) = &command.profile_type {
        builder = builder.profile_type(profile_type);
    }
    if let Some(product) = &command.classic_product {
        builder = builder.classic_product(product);
    }
    if let Some(account) = &command.billable_account_id {
        builder = builder.billable_account_id(account);
    }
    Ok(builder.build())
}

/// Reads and parses a payment experience setting file.
fn load_setting(path: &Path, max_bytes: usize) -> CliResult<PaymentExperienceSetting> {
    let text = read_text_input(path, max_bytes, &t!("input.kind.setting"))?;
    PaymentExperienceSetting::from_json(&text)
        .map_err(|err| CliError::new(t!("resolve.setting.parse_failed", path = path.display(), error = err)))
}

/// Selects the audit sink configured in `[audit]`.
fn audit_sink(config: &PidlConfig) -> CliResult<Box<dyn ResolutionAuditSink>> {
    match config.audit_target() {
        AuditTarget::Disabled => Ok(Box::new(NoopAuditSink)),
        AuditTarget::Stderr => Ok(Box::new(StderrAuditSink)),
        AuditTarget::File(path) => {
            let sink = FileAuditSink::new(&path)
                .map_err(|err| CliError::new(t!("audit.open_failed", path = path.display(), error = err)))?;
            Ok(Box::new(sink))
        }
    }
}

// ============================================================================
// SECTION: Table Commands
// ============================================================================

/// Executes the `dictionary` command.
fn command_dictionary(command: &DictionaryCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let tables = build_tables(&config)?;
    let dictionary = tables
        .dictionaries
        .get_dictionary(&command.token)
        .map_err(|err| CliError::new(t!("dictionary.failed", error = err)))?;
    write_ordered_json(&*dictionary)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `validate-phone` command. A rejected number exits with failure.
fn command_validate_phone(command: &ValidatePhoneCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let tables = build_tables(&config)?;
    let validation_type = format!("phonenumber.{}", command.country.trim().to_ascii_lowercase());
    let result = tables.validate_phone(&validation_type, &command.value);
    write_canonical_json(&result)?;
    Ok(status_exit_code(result.status))
}

/// Executes the `transform` command. A failed transformation exits with failure.
fn command_transform(command: &TransformCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let tables = build_tables(&config)?;
    let flights = parse_flights(command.flights.as_deref())?;
    let identity: OrderedMap<String> = [
        ("country", command.country.clone()),
        ("description_type", command.description_type.clone()),
        ("operation", command.operation.clone()),
        ("type", command.type_name.clone()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();
    let result = tables.transform(&command.property, &command.value, &identity, &command.target, &flights);
    write_canonical_json(&result)?;
    Ok(status_exit_code(result.status))
}

/// Maps a validation status to the process exit code.
const fn status_exit_code(status: ExecutionStatus) -> ExitCode {
    match status {
        ExecutionStatus::Passed => ExitCode::SUCCESS,
        ExecutionStatus::Failed => ExitCode::FAILURE,
    }
}

// ============================================================================
// SECTION: Roundtrip Command
// ============================================================================

/// Executes the `roundtrip` command.
fn command_roundtrip(command: &RoundtripCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let path = &command.path;
    let bytes = read_bytes_input(path, config.limits.max_document_bytes, &t!("input.kind.documents"))?;
    let documents = deserialize_documents(&bytes)
        .map_err(|err| CliError::new(t!("roundtrip.decode_failed", path = path.display(), error = err)))?;
    let stable = round_trips(&documents)
        .map_err(|err| CliError::new(t!("roundtrip.decode_failed", path = path.display(), error = err)))?;
    if !stable {
        return Err(CliError::new(t!("roundtrip.mismatch", path = path.display())));
    }
    write_stdout_line(&t!("roundtrip.ok", count = documents.len()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigArgs) -> CliResult<ExitCode> {
    let _config = PidlConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok")).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Loads the config, falling back to defaults when none is present.
fn load_config(args: &ConfigArgs) -> CliResult<PidlConfig> {
    PidlConfig::load_or_default(args.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds the built-in tables anchored on today's date.
fn build_tables(config: &PidlConfig) -> CliResult<EngineTables> {
    let options = config
        .catalog_options(OffsetDateTime::now_utc().date())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    builtin_tables(&options).map_err(|err| CliError::new(t!("catalog.build_failed", error = err)))
}

/// Parses an optional comma-separated flight list.
fn parse_flights(list: Option<&str>) -> CliResult<FlightSet> {
    list.map_or_else(|| Ok(FlightSet::new()), FlightSet::parse_list)
        .map_err(|err| CliError::new(t!("flights.invalid", error = err)))
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value)
            .ok_or_else(|| CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value)));
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
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
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a bounded input file, mapping failures to localized messages.
fn read_bytes_input(path: &Path, max_bytes: usize, kind: &str) -> CliResult<Vec<u8>> {
    read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", kind = kind, path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!("input.read_too_large", kind = kind, path = path.display(), size = size, limit = limit)),
    })
}

/// Reads a bounded UTF-8 input file.
fn read_text_input(path: &Path, max_bytes: usize, kind: &str) -> CliResult<String> {
    let bytes = read_bytes_input(path, max_bytes, kind)?;
    String::from_utf8(bytes)
        .map_err(|err| CliError::new(t!("input.read_failed", kind = kind, path = path.display(), error = err)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout with a trailing newline.
fn write_stdout_bytes_with_newline(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(bytes)
        .and_then(|()| stdout.write_all(b"\n"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes canonical JSON for a result value.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let bytes = serde_jcs::to_vec(value).map_err(|err| CliError::new(t!("output.encode_failed", error = err)))?;
    write_stdout_bytes_with_newline(&bytes)
}

/// Writes JSON that keeps map insertion order.
fn write_ordered_json<T: Serialize>(value: &T) -> CliResult<()> {
    let bytes = serde_json::to_vec(value).map_err(|err| CliError::new(t!("output.encode_failed", error = err)))?;
    write_stdout_bytes_with_newline(&bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
