// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use page_translate::app_config::{self, Config};
use page_translate::app_controller::{Controller, TranslateOptions};
use page_translate::language_utils;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an extracted page (JSON array of arrays of strings)
    Translate(TranslateArgs),

    /// List the supported target languages
    Languages,

    /// Generate shell completions for page-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Page text file to translate
    #[arg(value_name = "INPUT_JSON")]
    input_path: PathBuf,

    /// Provider id from the configuration (defaults to the first enabled one)
    #[arg(long)]
    source_id: Option<String>,

    /// Source language code; auto-detected when omitted
    #[arg(short, long)]
    from: Option<String>,

    /// Target language code; the preferred language when omitted
    #[arg(short, long)]
    to: Option<String>,

    /// Content identity used for caching (selector, page address)
    #[arg(long)]
    content_id: Option<String>,

    /// Output file (defaults to <stem>.<target>.json next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// page-translate - translate extracted page text through a batch endpoint
#[derive(Parser, Debug)]
#[command(name = "page-translate")]
#[command(version)]
#[command(about = "Batch page text translation")]
#[command(long_about = "Translates page text extracted into groups of fragments, keeping its structure.

EXAMPLES:
    page-translate translate page.json                  # Translate to the preferred language
    page-translate translate -t fr page.json            # Translate to French
    page-translate translate --source-id deepl page.json
    page-translate languages                            # List supported languages
    page-translate completions bash > page-translate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
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
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "page-translate", &mut std::io::stdout());
            Ok(())
        }
        Commands::Languages => {
            for (code, name) in language_utils::supported_languages() {
                println!("{:<6} {}", code, name);
            }
            Ok(())
        }
        Commands::Translate(args) => run_translate(&cli.config_path, cli.log_level.is_some(), args).await,
    }
}

async fn run_translate(config_path: &str, log_level_overridden: bool, args: TranslateArgs) -> Result<()> {
    let config = Config::load_or_create(config_path)?;

    config.validate()
        .context("Configuration validation failed")?;

    if !log_level_overridden {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    let options = TranslateOptions {
        source_id: args.source_id,
        from: args.from,
        to: args.to,
        content_id: args.content_id,
        output: args.output,
    };

    let (output_path, translation) = controller.run(&args.input_path, &options).await?;
    info!(
        "Wrote {} groups to {:?}",
        translation.page.groups().len(),
        output_path
    );

    Ok(())
}
