//! Purpose: `recsearch` CLI entry point.
//! Role: Binary crate root; parses args, builds the dataset config, runs one command.
//! Invariants: Results go to stdout (human text on a terminal, JSON otherwise or with `--json`).
//! Invariants: Errors go to stderr (human text on a terminal, one JSON line otherwise).
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Logs are written to stderr and filtered by `RUST_LOG` (default `warn`).
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind as ClapErrorKind};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;
mod render;
mod shell;

use recsearch::api::{
    Catalog, CollectionKind, DatasetConfig, Error, ErrorKind, ScalarValue, default_data_dir,
    to_exit_code,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint(clap_error_hint(&err)),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let config = dataset_config(&cli.data);
    tracing::debug!(?config, "dataset config");

    command_dispatch::dispatch_command(cli.command, &config, color_mode)
        .map_err(add_default_hint)
        .map_err(|err| (err, color_mode))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "recsearch",
    version,
    about = "Exact-match search over the users, tickets and organizations datasets",
    long_about = None,
    after_help = r#"EXAMPLES
  $ recsearch search users _id 71
  $ recsearch search tickets tags Ohio
  $ recsearch search organizations name "Enthaze" --first
  $ recsearch fields tickets
  $ recsearch shell

Values that look like integers or booleans are matched as such; pass --string
to match the literal text instead.

Datasets are read from ./data (or $RECSEARCH_DATA_DIR, or --data-dir)."#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize human output and diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Default)]
struct DataArgs {
    #[arg(
        long,
        global = true,
        help = "Directory holding users.json, tickets.json and organizations.json",
        value_hint = ValueHint::DirPath
    )]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Users dataset path", value_hint = ValueHint::FilePath)]
    users: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Tickets dataset path", value_hint = ValueHint::FilePath)]
    tickets: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Organizations dataset path", value_hint = ValueHint::FilePath)]
    organizations: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum CollectionArg {
    Users,
    Tickets,
    Organizations,
}

impl From<CollectionArg> for CollectionKind {
    fn from(value: CollectionArg) -> Self {
        match value {
            CollectionArg::Users => CollectionKind::Users,
            CollectionArg::Tickets => CollectionKind::Tickets,
            CollectionArg::Organizations => CollectionKind::Organizations,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Find records whose FIELD equals (or, for list fields, contains) VALUE")]
    Search {
        #[arg(value_enum, help = "Collection to search")]
        collection: CollectionArg,
        #[arg(help = "Field name (see `recsearch fields`)")]
        field: String,
        #[arg(allow_hyphen_values = true, help = "Value to match exactly")]
        value: String,
        #[arg(long, help = "Return only the first matching record")]
        first: bool,
        #[arg(long, help = "Match VALUE as text, without integer/boolean coercion")]
        string: bool,
        #[arg(long, help = "Emit JSON even on a terminal")]
        json: bool,
    },
    #[command(about = "List searchable fields of one collection, or of all three")]
    Fields {
        #[arg(value_enum, help = "Collection (default: all)")]
        collection: Option<CollectionArg>,
        #[arg(long, help = "Emit JSON even on a terminal")]
        json: bool,
    },
    #[command(about = "Interactive search menu")]
    Shell,
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    #[command(about = "Print version information")]
    Version,
}

fn dataset_config(args: &DataArgs) -> DatasetConfig {
    let dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    let mut config = DatasetConfig::from_dir(&dir);
    let overrides = [
        (CollectionKind::Users, &args.users),
        (CollectionKind::Tickets, &args.tickets),
        (CollectionKind::Organizations, &args.organizations),
    ];
    for (kind, path) in overrides {
        if let Some(path) = path {
            config = config.with_path(kind, path);
        }
    }
    config
}

fn query_value(raw: &str, literal: bool) -> ScalarValue {
    if literal {
        ScalarValue::from(raw)
    } else {
        shell::coerce_input(raw)
    }
}

fn add_default_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::DataFormat => err.with_hint(
            "Check the dataset path (--data-dir, or --users/--tickets/--organizations).",
        ),
        ErrorKind::DataInvalid => {
            err.with_hint("Every element of the dataset array must be a JSON object.")
        }
        ErrorKind::FieldNotFound => {
            let collection = err.collection().unwrap_or("<collection>").to_string();
            err.with_hint(format!(
                "List searchable fields with `recsearch fields {collection}`."
            ))
        }
        ErrorKind::Io => err.with_hint("I/O error. Check that stdin/stdout are usable."),
        ErrorKind::Internal => err.with_hint(
            "Unexpected internal failure. Retry with RUST_LOG=debug and share the command if it persists.",
        ),
        _ => err,
    }
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_version_output() {
    if io::stdout().is_terminal() {
        println!("recsearch {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(json!({
            "name": "recsearch",
            "version": env!("CARGO_PKG_VERSION"),
        }));
    }
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error",
        ErrorKind::Usage => "usage error",
        ErrorKind::NotConnected => "not connected",
        ErrorKind::AlreadyConnected => "already connected",
        ErrorKind::DataFormat => "unreadable data source",
        ErrorKind::DataInvalid => "invalid data",
        ErrorKind::FieldNotFound => "field not found",
        ErrorKind::InvalidValue => "invalid query value",
        ErrorKind::Io => "i/o error",
    }
    .to_string()
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(collection) = err.collection() {
        inner.insert("collection".to_string(), json!(collection));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(index) = err.index() {
        inner.insert("index".to_string(), json!(index));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = vec![format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    )];
    let label = |name: &str| colorize_label(name, use_color, AnsiColor::Yellow);

    if let Some(hint) = err.hint() {
        lines.push(format!("{} {hint}", label("hint:")));
    }
    if let Some(collection) = err.collection() {
        lines.push(format!("{} {collection}", label("collection:")));
    }
    if let Some(field) = err.field() {
        lines.push(format!("{} {field}", label("field:")));
    }
    if let Some(path) = err.path() {
        lines.push(format!("{} {}", label("path:"), path.display()));
    }
    if let Some(index) = err.index() {
        lines.push(format!("{} {index}", label("index:")));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!("{} {cause}", label("caused by:")));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    err.render()
        .to_string()
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error:").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

/// Hint built from clap's error context: accepted values, a suggested command, or missing args.
fn clap_error_hint(err: &clap::Error) -> String {
    let context = |kind: ContextKind| match err.get(kind) {
        Some(ContextValue::Strings(values)) => values.clone(),
        Some(ContextValue::String(value)) => vec![value.clone()],
        _ => Vec::new(),
    };

    let valid = context(ContextKind::ValidValue);
    if !valid.is_empty() {
        return format!("Expected one of: {}.", valid.join(", "));
    }
    if let Some(suggested) = context(ContextKind::SuggestedSubcommand).first() {
        return format!("Did you mean `recsearch {suggested}`?");
    }
    match err.kind() {
        ClapErrorKind::MissingRequiredArgument => {
            let missing = context(ContextKind::InvalidArg);
            if missing.is_empty() {
                return "A required argument is missing; see `recsearch help`.".to_string();
            }
            format!("Provide {}.", missing.join(" and "))
        }
        ClapErrorKind::InvalidSubcommand => {
            "Commands: search, fields, shell, completion, version.".to_string()
        }
        _ => "Run `recsearch help` for commands and flags.".to_string(),
    }
}
