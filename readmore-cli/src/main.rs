//! Readmore CLI - collapsible "see more / see less" text in the terminal.

mod oracle;
mod output;
mod viewer;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::prelude::*;

use readmore_core::config::{LoggingConfig, Rotation};
use readmore_core::{Callbacks, Config, LinePolicy, ReadMore, TruncationStrategy, WidgetConfig};

/// Width used when neither `--width` nor the terminal provides one.
const DEFAULT_WIDTH: u16 = 80;

/// Default tracing directives enabling info-level logs for this crate and readmore-core.
const DEFAULT_DIRECTIVES: &[&str] = &["readmore=info", "readmore_core=info"];

/// Truncation strategy selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Binary search for the longest fitting prefix
    Precision,
    /// Single hit-test at the bottom corner
    FastCorner,
}

impl From<StrategyArg> for TruncationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Precision => TruncationStrategy::Precision,
            StrategyArg::FastCorner => TruncationStrategy::FastCorner,
        }
    }
}

/// Readmore - show long text collapsed with a "See more" affordance
#[derive(Parser)]
#[command(name = "readmore")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to display (reads from --file or stdin if not provided)
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Wrap width in terminal cells (defaults to the terminal width)
    #[arg(short, long)]
    width: Option<u16>,

    /// Line budget of the collapsed view
    #[arg(short = 'n', long)]
    max_lines: Option<usize>,

    /// Truncation strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Allow one extra line so the affordance always has room
    #[arg(long)]
    reserve_line: bool,

    /// Treat the input as HTML and convert it to plain text first
    #[arg(long)]
    html: bool,

    /// Start expanded
    #[arg(long)]
    expanded: bool,

    /// Print the presentation as JSON
    #[arg(long, conflicts_with = "interactive")]
    json: bool,

    /// Open the interactive viewer
    #[arg(short, long)]
    interactive: bool,

    /// Path to a custom config file (overrides default search locations)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

/// Build the default `EnvFilter`: RUST_LOG (if set) plus our default directives.
fn default_env_filter() -> Result<tracing_subscriber::EnvFilter> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in DEFAULT_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

/// Build a rolling file writer for `lc`, creating its directory.
fn file_writer(
    lc: &LoggingConfig,
) -> Result<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    std::fs::create_dir_all(&lc.directory)
        .with_context(|| format!("Failed to create log directory '{}'", lc.directory))?;

    // Map rotation enum to the tracing-appender rotation type.
    let rotation = match lc.rotation {
        Rotation::Daily => tracing_appender::rolling::Rotation::DAILY,
        Rotation::Hourly => tracing_appender::rolling::Rotation::HOURLY,
        Rotation::Never => tracing_appender::rolling::Rotation::NEVER,
    };

    let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix("readmore")
        .filename_suffix("log")
        .max_log_files(lc.max_files)
        .build(&lc.directory)
        .context("Failed to create rolling file appender")?;

    Ok(tracing_appender::non_blocking(file_appender))
}

/// Initialize the tracing subscriber.
///
/// Outside the viewer, logs go to stderr and, when `logging` is `Some`, also
/// to a rolling file. The viewer owns the terminal, so it only logs to the
/// file, and not at all without a `[logging]` section.
///
/// Returns the non-blocking writer guard that must be held for the process lifetime.
fn init_tracing(
    logging: Option<&LoggingConfig>,
    interactive: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let file = match logging.map(file_writer).transpose() {
        Ok(file) => file,
        Err(e) if !interactive => {
            eprintln!("Warning: {e:#}. Falling back to stderr-only logging.");
            None
        }
        Err(_) => None,
    };

    match (file, interactive) {
        (Some((writer, guard)), true) => {
            tracing_subscriber::registry()
                .with(default_env_filter()?)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Ok(Some(guard))
        }
        (Some((writer, guard)), false) => {
            let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(default_env_filter()?)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Ok(Some(guard))
        }
        (None, true) => Ok(None),
        (None, false) => {
            tracing_subscriber::fmt()
                .with_env_filter(default_env_filter()?)
                .with_writer(io::stderr)
                .init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let _guard = init_tracing(config.logging.as_ref(), args.interactive)?;

    // Get text or show help
    let text = match get_text(&args) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => {
            // No input provided, show help
            Args::parse_from(["readmore", "--help"]);
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to read input text"),
    };

    let widget_config = apply_overrides(config.widget, text, &args);
    widget_config
        .validate()
        .context("Invalid widget settings")?;

    if args.interactive {
        let widget = ReadMore::new(widget_config)
            .with_expanded(args.expanded)
            .with_callbacks(logging_callbacks())
            .with_toggle_observer(Box::new(|expanded| {
                tracing::info!(expanded, "toggled");
            }));
        return viewer::run_viewer(widget).await;
    }

    let width = args
        .width
        .or_else(terminal_width)
        .unwrap_or(DEFAULT_WIDTH);
    let mut widget = ReadMore::new(widget_config).with_expanded(args.expanded);
    let rendered = output::render(&mut widget, width);
    tracing::debug!(
        width,
        overflowing = rendered.styled.presentation.overflowing,
        "rendered"
    );

    if args.json {
        println!("{}", rendered.to_json().context("Failed to encode JSON")?);
    } else {
        println!("{}", rendered.to_text());
    }

    Ok(())
}

/// Terminal width when stdout is a terminal.
fn terminal_width() -> Option<u16> {
    if !io::stdout().is_terminal() {
        return None;
    }
    crossterm::terminal::size().ok().map(|(width, _)| width)
}

/// Callbacks that log tapped tokens.
fn logging_callbacks() -> Callbacks {
    Callbacks {
        on_url_tap: Some(Box::new(|url: &str| tracing::info!(url, "url tapped"))),
        on_hashtag_tap: Some(Box::new(|tag: &str| tracing::info!(tag, "hashtag tapped"))),
        on_mention_tap: Some(Box::new(|user: &str| tracing::info!(user, "mention tapped"))),
    }
}

/// Apply command-line overrides on top of the configured widget settings.
fn apply_overrides(base: WidgetConfig, text: String, args: &Args) -> WidgetConfig {
    let mut config = WidgetConfig { text, ..base };
    if args.html {
        config.text = readmore_core::html::clean(&config.text);
    }
    if let Some(max_lines) = args.max_lines {
        config.max_lines = max_lines;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if args.reserve_line {
        config.line_policy = LinePolicy::ReserveAffordanceLine;
    }
    config
}

/// Retrieves the text from arguments, a file, or stdin.
///
/// Priority: positional argument > --file > stdin > error (if TTY)
fn get_text(args: &Args) -> io::Result<String> {
    // Priority 1: Use positional argument if provided
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    // Priority 2: Read the named file
    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)?;
        return Ok(text.trim_end().to_string());
    }

    // Priority 3: Check if stdin has piped input
    if io::stdin().is_terminal() {
        // Interactive terminal with no argument - signal to show help
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "No text provided",
        ));
    }

    // Read from stdin (piped input)
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_args_parse() {
        // Test with text argument
        let args = Args::parse_from(["readmore", "Hello"]);
        assert_eq!(args.text, Some("Hello".to_string()));
        assert!(args.file.is_none());

        // Test without text argument
        let args = Args::parse_from(["readmore"]);
        assert!(args.text.is_none());
        assert!(!args.interactive);
        assert!(!args.json);
    }

    #[test]
    fn test_args_layout_flags() {
        let args = Args::parse_from(["readmore", "-w", "40", "-n", "2", "Hello"]);
        assert_eq!(args.width, Some(40));
        assert_eq!(args.max_lines, Some(2));

        let args = Args::parse_from(["readmore", "--width", "60", "--max-lines", "4", "Hi"]);
        assert_eq!(args.width, Some(60));
        assert_eq!(args.max_lines, Some(4));
    }

    #[test]
    fn test_args_strategy() {
        let args = Args::parse_from(["readmore", "--strategy", "fast-corner", "Hi"]);
        assert_eq!(args.strategy, Some(StrategyArg::FastCorner));
        let args = Args::parse_from(["readmore", "--strategy", "precision", "Hi"]);
        assert_eq!(args.strategy, Some(StrategyArg::Precision));
        assert!(Args::try_parse_from(["readmore", "--strategy", "fast", "Hi"]).is_err());
    }

    #[test]
    fn test_args_interactive_short_flag() {
        let args = Args::parse_from(["readmore", "-i", "Hello"]);
        assert!(args.interactive);
    }

    #[test]
    fn test_args_json_conflicts_with_interactive() {
        assert!(Args::try_parse_from(["readmore", "--json", "-i", "Hello"]).is_err());
    }

    #[test]
    fn test_args_file_conflicts_with_text() {
        assert!(Args::try_parse_from(["readmore", "-f", "a.txt", "Hello"]).is_err());
        let args = Args::parse_from(["readmore", "-f", "a.txt"]);
        assert_eq!(args.file, Some(PathBuf::from("a.txt")));
    }

    #[test]
    fn test_args_config_flag() {
        let args = Args::parse_from(["readmore", "-c", "/tmp/readmore.toml", "Hi"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/readmore.toml")));
    }

    #[test]
    fn test_apply_overrides_replaces_flagged_fields() {
        let args = Args::parse_from([
            "readmore",
            "-n",
            "5",
            "--strategy",
            "fast-corner",
            "--reserve-line",
            "x",
        ]);
        let base = WidgetConfig {
            see_more_label: "More".to_string(),
            ..WidgetConfig::default()
        };
        let config = apply_overrides(base, "body".to_string(), &args);
        assert_eq!(config.text, "body");
        assert_eq!(config.max_lines, 5);
        assert_eq!(config.strategy, TruncationStrategy::FastCorner);
        assert_eq!(config.line_policy, LinePolicy::ReserveAffordanceLine);
        assert_eq!(config.see_more_label, "More");
    }

    #[test]
    fn test_apply_overrides_keeps_base_without_flags() {
        let args = Args::parse_from(["readmore", "x"]);
        let base = WidgetConfig {
            max_lines: 7,
            ..WidgetConfig::default()
        };
        let config = apply_overrides(base, "body".to_string(), &args);
        assert_eq!(config.max_lines, 7);
        assert_eq!(config.strategy, TruncationStrategy::Precision);
        assert_eq!(config.line_policy, LinePolicy::Exact);
    }

    #[test]
    fn test_apply_overrides_cleans_html() {
        let args = Args::parse_from(["readmore", "--html", "x"]);
        let config = apply_overrides(
            WidgetConfig::default(),
            "<p>Fish &amp; chips</p>".to_string(),
            &args,
        );
        assert_eq!(config.text, "Fish & chips");
    }

    #[test]
    fn test_get_text_prefers_argument() {
        let args = Args::parse_from(["readmore", "Hello"]);
        assert_eq!(get_text(&args).unwrap(), "Hello");
    }

    #[test]
    fn test_get_text_reads_file() {
        let path = std::env::temp_dir().join("readmore_cli_input.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "from a file").unwrap();

        let args = Args::parse_from(["readmore", "-f", path.to_str().unwrap()]);
        assert_eq!(get_text(&args).unwrap(), "from a file");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_get_text_missing_file_errors() {
        let args = Args::parse_from(["readmore", "-f", "/nonexistent/readmore.txt"]);
        assert!(get_text(&args).is_err());
    }

    #[test]
    fn test_strategy_arg_conversion() {
        assert_eq!(
            TruncationStrategy::from(StrategyArg::Precision),
            TruncationStrategy::Precision
        );
        assert_eq!(
            TruncationStrategy::from(StrategyArg::FastCorner),
            TruncationStrategy::FastCorner
        );
    }
}
