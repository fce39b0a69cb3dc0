// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use playmark::app_config::{Config, LogLevel};
use playmark::app_controller::{Controller, HighlightMode};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a marked-up script to a styled document
    #[command(alias = "format")]
    Apply(ApplyArgs),

    /// Convert a styled document back to marked-up text
    #[command(alias = "unformat")]
    Strip(ConvertArgs),

    /// Split long speeches at page boundaries
    Split(ConvertArgs),

    /// Highlight stage directions or one character's speeches
    Highlight(HighlightArgs),

    /// List or edit the tag registry
    Tags(TagsArgs),

    /// Generate shell completions for playmark
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input marked-up text file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file (defaults to INPUT with a .play.json extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip interactive registration of unknown tags
    #[arg(short, long)]
    non_interactive: bool,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input styled document file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct HighlightArgs {
    /// Input styled document file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file (defaults to rewriting INPUT in place)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Remove all highlighting
    #[arg(long, conflicts_with_all = ["stage_directions", "character"])]
    clear: bool,

    /// Highlight block stage directions only
    #[arg(long, conflicts_with = "character")]
    stage_directions: bool,

    /// Highlight one character's speeches
    #[arg(long, value_name = "NAME")]
    character: Option<String>,
}

#[derive(Parser, Debug)]
struct TagsArgs {
    /// Open the registry file in $EDITOR instead of listing it
    #[arg(short, long)]
    edit: bool,
}

/// Playmark - Stage-Play Markup Converter
///
/// Converts stage-play scripts between lightweight plain-text markup
/// and a styled document representation, and automates the page-layout
/// chores of rehearsal scripts.
#[derive(Parser, Debug)]
#[command(name = "playmark")]
#[command(version = "0.1.0")]
#[command(about = "Stage-play markup conversion tool")]
#[command(long_about = "Playmark converts stage-play scripts between plain-text markup and styled documents.

EXAMPLES:
    playmark apply draft.txt                    # Format a marked-up script
    playmark apply -n draft.txt                 # Skip unknown-tag prompts
    playmark strip draft.play.json              # Back to plain markup
    playmark split draft.play.json              # Split page-crossing speeches
    playmark highlight --character JOHN draft.play.json
    playmark tags                               # List registered tags
    playmark tags --edit                        # Edit the registry file
    playmark completions bash > playmark.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "playmark", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::from_file_or_create(&cli.config_path)?;
    if let Some(cmd_log_level) = &cli.log_level {
        config.log_level = cmd_log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::new(config);

    match cli.command {
        Commands::Apply(args) => {
            controller.run_apply(&args.input_path, args.output, !args.non_interactive)?;
        }
        Commands::Strip(args) => {
            controller.run_strip(&args.input_path, args.output)?;
        }
        Commands::Split(args) => {
            controller.run_split(&args.input_path, args.output)?;
        }
        Commands::Highlight(args) => {
            let mode = resolve_highlight_mode(&args, &controller)?;
            controller.run_highlight(&args.input_path, args.output, &mode)?;
        }
        Commands::Tags(args) => {
            if args.edit {
                controller.run_edit_registry()?;
            } else {
                print!("{}", controller.run_list_registry()?);
            }
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}

/// Pick the highlight mode from the flags, falling back to an
/// interactive chooser that lists the registered characters.
fn resolve_highlight_mode(args: &HighlightArgs, controller: &Controller) -> Result<HighlightMode> {
    if args.clear {
        return Ok(HighlightMode::Clear);
    }
    if args.stage_directions {
        return Ok(HighlightMode::StageDirections);
    }
    if let Some(name) = &args.character {
        return Ok(HighlightMode::Character(name.clone()));
    }

    println!("Highlight options:");
    println!("  0) Remove all highlights");
    println!("  1) Highlight stage directions");
    let slugs = controller.registry_slugs();
    for (i, slug) in slugs.iter().enumerate() {
        println!("  {}) Highlight {}", i + 2, slug);
    }
    print!("Choice: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let choice: usize = line
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid choice: {}", line.trim()))?;

    match choice {
        0 => Ok(HighlightMode::Clear),
        1 => Ok(HighlightMode::StageDirections),
        n if n - 2 < slugs.len() => Ok(HighlightMode::Character(slugs[n - 2].clone())),
        n => Err(anyhow!("Choice out of range: {}", n)),
    }
}
