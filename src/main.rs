// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::Path;

use stutter::app_config::{self, Config};
use stutter::app_controller::Controller;
use stutter::file_utils::{FileManager, InputKind};
use stutter::source::{self, ReadingInput};

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

/// Options shared by every reading command
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Reading speed in words per minute
    #[arg(short, long)]
    wpm: Option<u32>,

    /// Language of the text (e.g. 'en', 'de-AT', 'ja'); defaults to the system locale
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Longest word shown in one piece, in letters and digits
    #[arg(short, long)]
    max_word_length: Option<usize>,
}

#[derive(Parser, Debug)]
struct ReadArgs {
    /// Text file to read, '-' or nothing for standard input
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct TokensArgs {
    /// Text file to tokenize, '-' or nothing for standard input
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Print JSON instead of a table
    #[arg(short, long)]
    json: bool,

    /// Write the listing to a file instead of standard output
    #[arg(short, long)]
    output: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read text one word at a time (default command)
    Read(ReadArgs),

    /// Print the display tokens with their flags and timing
    Tokens(TokensArgs),

    /// Generate shell completions for stutter
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// stutter - a speed reader for the terminal
///
/// Shows text one word at a time at a steady, adjustable pace.
#[derive(Parser, Debug)]
#[command(name = "stutter")]
#[command(version)]
#[command(about = "Rapid serial visual presentation reader")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "stutter shows text one word at a time at a controllable pace.

EXAMPLES:
    stutter article.txt                      # Read a file with the default config
    cat notes.txt | stutter                  # Read from standard input
    stutter read -w 500 article.txt          # Read at 500 words per minute
    stutter read -L de -m 10 bericht.txt     # German text, split words over 10 letters
    stutter tokens --json article.txt        # Show tokens and their timing as JSON
    stutter tokens -o tokens.txt article.txt # Save the token listing to a file
    stutter completions bash > stutter.bash  # Generate bash completions

CONTROLS (type a letter and press Enter while reading a file):
    p pause   r resume   s restart   f/b skip forward/back
    +/- faster/slower    q quit

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text file to read, '-' or nothing for standard input
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\u{274c} ",
            Level::Warn => "\u{1f6a7} ",
            Level::Info => " ",
            Level::Debug => "\u{1f50d} ",
            Level::Trace => "\u{1f4cb} ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        // the max level set at runtime may be raised above the initial one
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
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
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "stutter", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Read(args)) => run_read(args).await,
        Some(Commands::Tokens(args)) => run_tokens(args).await,
        None => {
            // Default behavior - read the top-level input
            run_read(ReadArgs {
                input: cli.input,
                common: cli.common,
            })
            .await
        }
    }
}

async fn run_read(args: ReadArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    let controller = Controller::with_config(config)?;

    let input = load_input(args.input.as_deref()).await?;
    let tokens = controller.prepare_tokens(&input);

    // Controls come from stdin, which is only free when the text did not
    let interactive = FileManager::detect_input_kind(args.input.as_deref()) != InputKind::Stdin;
    controller.run_reading(tokens, interactive).await
}

async fn run_tokens(args: TokensArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    let controller = Controller::with_config(config)?;

    let input = load_input(args.input.as_deref()).await?;
    let tokens = controller.prepare_tokens(&input);

    let output = if args.json {
        controller.format_token_json(&tokens)?
    } else {
        controller.format_token_table(&tokens)
    };
    match args.output {
        Some(path) => {
            FileManager::write_to_file(&path, &output)?;
            info!("Wrote {} tokens to {}", tokens.len(), path);
        }
        None => println!("{}", output),
    }
    Ok(())
}

// Turn the input argument into text; URLs degrade to a status message
async fn load_input(input: Option<&str>) -> Result<ReadingInput> {
    let text = FileManager::read_input(input)?;
    Ok(source::resolve_input(&text, None, None).await)
}

fn load_config(options: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        config
            .save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(wpm) = options.wpm {
        config.playback.wpm = wpm;
    }
    if let Some(language) = &options.language {
        config.language.default_language_tag = Some(language.clone());
    }
    if let Some(max_word_length) = options.max_word_length {
        config.text_handling.max_word_length = max_word_length;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    let config = config.clamped();
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    info!(
        "{} wpm, words split above {} letters",
        config.playback.wpm, config.text_handling.max_word_length
    );
    Ok(config)
}
