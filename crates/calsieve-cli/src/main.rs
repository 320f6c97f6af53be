//! `calsieve` CLI: build filtered calendars from a JSON rule file.
//!
//! ## Usage
//!
//! ```sh
//! # Build the calendar described by rules.json as ICS on stdout
//! calsieve build -c rules.json
//!
//! # Build to a file, as JSON
//! calsieve build -c rules.json -o out.json --format json
//!
//! # Week view starting on 8 January 2024, as HTML
//! calsieve build -c rules.json --format week --week-start 20240108T000000Z
//!
//! # Validate a rule file
//! calsieve check -c rules.json
//!
//! # Rewrite a rule file in canonical form
//! calsieve fmt -c rules.json -o rules.json
//!
//! # Parse a token list from the command line and print it canonically
//! calsieve tokens pattern not has_text Lab /has_text /not
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`)
//! or `-v` (debug).

use anyhow::{Context, Result};
use calsieve_core::{dsl, Calendar, Config, Time, WeekView};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "calsieve",
    version,
    about = "Filter and rewrite calendar events with token-based rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch sources, apply filters and write the resulting calendar
    Build {
        /// Rule file (JSON)
        #[arg(short, long)]
        config: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Ics)]
        format: Format,
        /// First day of the week view (YYYYMMDDThhmmssZ)
        #[arg(long, required_if_eq("format", "week"))]
        week_start: Option<Time>,
    },
    /// Validate a rule file without fetching any source
    Check {
        /// Rule file (JSON)
        #[arg(short, long)]
        config: String,
    },
    /// Write a rule file back in canonical form
    Fmt {
        /// Rule file (JSON)
        #[arg(short, long)]
        config: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Parse a pattern or action token list and print it canonically
    Tokens {
        /// Which kind of rule the tokens describe
        #[arg(value_enum)]
        kind: RuleKind,
        /// The tokens
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Ics,
    Json,
    Text,
    /// Seven-day HTML schedule
    Week,
}

#[derive(Clone, Copy, ValueEnum)]
enum RuleKind {
    Pattern,
    Action,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            config,
            output,
            format,
            week_start,
        } => {
            let loaded = load_config(&config)?;
            let base_dir = Path::new(&config).parent();
            let calendar = loaded
                .pipeline(base_dir)
                .build()
                .context("Failed to build calendar")?;
            debug!(events = calendar.len(), "calendar built");
            write_output(output.as_deref(), &render(&calendar, format, week_start)?)?;
        }
        Commands::Check { config } => {
            let loaded = load_config(&config)?;
            println!(
                "{} source(s), {} filter(s) OK",
                loaded.sources.len(),
                loaded.filters.len()
            );
        }
        Commands::Fmt { config, output } => {
            let loaded = load_config(&config)?;
            let mut json = loaded.to_json()?;
            json.push('\n');
            write_output(output.as_deref(), &json)?;
        }
        Commands::Tokens { kind, tokens } => {
            let canonical = match kind {
                RuleKind::Pattern => dsl::parse_pattern(&tokens)
                    .context("Failed to parse pattern")?
                    .to_tokens(),
                RuleKind::Action => dsl::parse_action(&tokens)
                    .context("Failed to parse action")?
                    .to_tokens(),
            };
            println!("{}", serde_json::to_string(&canonical)?);
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: &str) -> Result<Config> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    Config::from_json(&json).with_context(|| format!("Invalid config file: {}", path))
}

fn render(calendar: &Calendar, format: Format, week_start: Option<Time>) -> Result<String> {
    Ok(match format {
        Format::Ics => calendar.to_ics(),
        Format::Json => {
            let mut json = calendar.to_json()?;
            json.push('\n');
            json
        }
        Format::Text => format!("{}\n", calendar),
        Format::Week => {
            let start = week_start.context("--week-start is required for the week format")?;
            WeekView::new(calendar, start)?.to_html()
        }
    })
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
