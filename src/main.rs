//! Purpose: `figtree` CLI entry point: parse args, run one command, emit JSON.
//! Role: Binary crate root; thin layer over `figtree::api` and the tree decoder.
//! Invariants: Stdout carries only JSON (one document, or JSON lines for streaming commands).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Logs go to stderr via `tracing`; `RUST_LOG` overrides the `warn` default.
#![allow(clippy::result_large_err)]

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use figtree::api::{AccessToken, Client, Error, ErrorKind, to_exit_code};
use figtree::core::value::ExportFormat;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod color_json;
mod command_dispatch;
mod outline;
mod swatches;

use color_json::colorize_json;

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
                        .with_hint("Try `figtree --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let connection = Connection {
        token: cli.token,
        oauth: cli.oauth,
        base_url: cli.base_url,
        tls_ca_file: cli.tls_ca_file,
    };

    command_dispatch::dispatch_command(cli.command, &connection, color_mode)
        .map_err(add_decode_hint)
        .map_err(add_internal_hint)
        .map_err(|err| (err, color_mode))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "figtree",
    version,
    about = "Inspect Figma files from the command line",
    long_about = None,
    after_help = r#"EXAMPLES
  $ export FIGMA_TOKEN=figd_...
  $ figtree outline FILE_KEY                 # one JSON line per node
  $ figtree outline --input file.json        # same, from a saved response
  $ figtree swatches FILE_KEY                # solid colors by usage
  $ figtree export FILE_KEY --ids 1:2,3:4 --format svg
  $ figtree comment FILE_KEY "Looks good" --node-id 1:2 --offset-x 10 --offset-y 4

NOTES
  - Output is JSON; errors are JSON on stderr when stderr is not a terminal
  - RUST_LOG=debug shows requests and decode summaries on stderr"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        env = "FIGMA_TOKEN",
        hide_env_values = true,
        global = true,
        help = "Access token (personal access token unless --oauth)"
    )]
    token: Option<String>,
    #[arg(long, global = true, help = "Send the token as an OAuth2 bearer credential")]
    oauth: bool,
    #[arg(
        long,
        env = "FIGMA_BASE_URL",
        global = true,
        help = "API origin (default: https://api.figma.com)"
    )]
    base_url: Option<String>,
    #[arg(
        long,
        global = true,
        help = "PEM bundle of extra CA certificates",
        value_hint = ValueHint::FilePath
    )]
    tls_ca_file: Option<PathBuf>,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        global = true,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
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
enum ImageFormatArg {
    Png,
    Jpg,
    Svg,
    Pdf,
}

impl From<ImageFormatArg> for ExportFormat {
    fn from(format: ImageFormatArg) -> Self {
        match format {
            ImageFormatArg::Png => ExportFormat::Png,
            ImageFormatArg::Jpg => ExportFormat::Jpg,
            ImageFormatArg::Svg => ExportFormat::Svg,
            ImageFormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

/// Where a document comes from: a remote file key or a saved JSON response.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
struct DocumentSource {
    #[arg(help = "File key (the id in the file URL)", required_unless_present = "input")]
    key: Option<String>,
    #[arg(
        long,
        conflicts_with = "key",
        help = "Read a saved file response (or bare DOCUMENT node) instead of fetching",
        value_hint = ValueHint::FilePath
    )]
    input: Option<PathBuf>,
    #[arg(long, help = "Fetch a specific version id", requires = "key")]
    version: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Print the node tree as JSON lines in pre-order")]
    Outline {
        #[command(flatten)]
        source: DocumentSource,
        #[arg(long, help = "Only print nodes up to this depth (root is 0)")]
        max_depth: Option<usize>,
        #[arg(long, help = "Skip hidden nodes and everything beneath them")]
        visible_only: bool,
    },
    #[command(about = "Summarize visible solid colors by usage count")]
    Swatches {
        #[command(flatten)]
        source: DocumentSource,
    },
    #[command(about = "Request rendered images for nodes")]
    Export {
        #[arg(help = "File key")]
        key: String,
        #[arg(long, value_delimiter = ',', required = true, help = "Node ids (comma separated)")]
        ids: Vec<String>,
        #[arg(long, value_enum, default_value = "png", help = "Image format")]
        format: ImageFormatArg,
        #[arg(long, help = "Scale factor between 0.01 and 4")]
        scale: Option<f64>,
    },
    #[command(about = "List comments on a file")]
    Comments {
        #[arg(help = "File key")]
        key: String,
    },
    #[command(about = "Post a comment on a file")]
    Comment {
        #[arg(help = "File key")]
        key: String,
        #[arg(help = "Comment text")]
        message: String,
        #[arg(long, requires = "y", conflicts_with = "node_id", help = "Canvas x position")]
        x: Option<f64>,
        #[arg(long, requires = "x", help = "Canvas y position")]
        y: Option<f64>,
        #[arg(long, help = "Pin the comment to this node")]
        node_id: Option<String>,
        #[arg(long, requires = "node_id", default_value_t = 0.0, help = "Offset from the node origin")]
        offset_x: f64,
        #[arg(long, requires = "node_id", default_value_t = 0.0, help = "Offset from the node origin")]
        offset_y: f64,
    },
    #[command(about = "List the version history of a file")]
    Versions {
        #[arg(help = "File key")]
        key: String,
    },
    #[command(about = "List projects of a team")]
    Projects {
        #[arg(help = "Team id")]
        team_id: String,
    },
    #[command(about = "List files of a project")]
    Files {
        #[arg(help = "Project id")]
        project_id: String,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Transport settings gathered from global flags; the client is built only when needed.
#[derive(Debug, Clone, Default)]
struct Connection {
    token: Option<String>,
    oauth: bool,
    base_url: Option<String>,
    tls_ca_file: Option<PathBuf>,
}

impl Connection {
    fn client(&self) -> Result<Client, Error> {
        let token = self
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                Error::new(ErrorKind::Usage)
                    .with_message("an access token is required for this command")
                    .with_hint("Pass --token or set FIGMA_TOKEN.")
            })?;
        let token = if self.oauth {
            AccessToken::oauth(token)
        } else {
            AccessToken::personal(token)
        };
        let mut client = Client::new(token)?;
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url)?;
        }
        if let Some(path) = &self.tls_ca_file {
            client = client.with_tls_ca_file(path)?;
        }
        Ok(client)
    }
}

fn emit_json(value: Value, color_mode: ColorMode) {
    let is_tty = io::stdout().is_terminal();
    let use_color = color_mode.use_color(is_tty);
    let json = if is_tty || use_color {
        colorize_json(&value, use_color)
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

fn emit_json_line(value: &Value) {
    let json = serde_json::to_string(value)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
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
        ErrorKind::MissingField => "missing required field".to_string(),
        ErrorKind::WrongType => "field has the wrong type".to_string(),
        ErrorKind::UnrecognizedValue => "unrecognized value".to_string(),
        ErrorKind::UnsupportedNodeType => "unsupported node type".to_string(),
        ErrorKind::Malformed => "malformed payload".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::RateLimited => "rate limited".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::Internal => "internal error".to_string(),
    }
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
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(node_id) = err.node_id() {
        inner.insert("node".to_string(), json!(node_id));
    }
    if let Some(status) = err.status() {
        inner.insert("status".to_string(), json!(status));
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
    let details = [
        ("hint:", err.hint().map(str::to_string)),
        ("field:", err.field().map(str::to_string)),
        ("node:", err.node_id().map(str::to_string)),
        ("status:", err.status().map(|status| status.to_string())),
        ("caused by:", error_causes(err).into_iter().next()),
    ];
    for (label, detail) in details {
        if let Some(detail) = detail {
            lines.push(format!(
                "{} {detail}",
                colorize_label(label, use_color, AnsiColor::Yellow)
            ));
        }
    }
    lines.join("\n")
}

fn add_decode_hint(err: Error) -> Error {
    if !err.kind().is_decode() || err.hint().is_some() {
        return err;
    }
    err.with_hint("The payload did not match the expected document shape; `field` and `node` locate the failure.")
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint(
        "Unexpected internal failure. Retry with RUST_LOG=debug and share command/context if it persists.",
    )
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
