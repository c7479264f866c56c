use burrow::BrowseMode;
use burrow::browse::fs::{FsBrowser, StdFs};
use burrow::browse::inspect::Inspector;
use burrow::core::config::{self, CliOverrides, ResolvedConfig};
use burrow::core::error::BrowseError;
use burrow::core::listing::TextList;
use burrow::core::navigator::Navigator;
use burrow::core::selector::Selector;
use burrow::tui::CrosstermTerminal;
use clap::{Parser, Subcommand};
use glob::Pattern;
use simplelog::{ConfigBuilder, WriteLogger};
use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "burrow", about = "Interactive terminal picker and browser")]
struct Args {
    /// Height of the entry window, capped to the terminal height
    #[arg(long, global = true)]
    max_rows: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the filesystem and print the chosen path
    Browse {
        /// Directory to start from (a file opens its directory in file mode)
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(short, long, default_value_t, value_enum)]
        mode: BrowseMode,
        /// Glob matched against file names in file mode
        #[arg(short, long)]
        pattern: Option<String>,
    },
    /// Browse a JSON or TOML document
    Inspect { file: PathBuf },
    /// Choose one of the given items and print it
    Pick {
        #[arg(required = true)]
        items: Vec<String>,
    },
}

enum Document {
    Json(serde_json::Value),
    Toml(toml::Value),
}

fn load_document(path: &Path) -> Result<Document, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(Document::Toml(toml::from_str(&text)?)),
        _ => Ok(Document::Json(serde_json::from_str(&text)?)),
    }
}

/// Initialize the file logger. The terminal belongs to the UI, so logs never
/// go to stdout or stderr.
fn init_logging(config: &ResolvedConfig) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    let file = config
        .log_file
        .as_ref()
        .and_then(|path| {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            File::create(path).ok()
        })
        .or_else(|| File::create("burrow.log").ok());

    if let Some(log_file) = file {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

/// Configured rows, leaving the search line on screen.
fn window_rows(terminal: &CrosstermTerminal, configured: u16) -> io::Result<u16> {
    let available = terminal.window_height()?.saturating_sub(1).max(1);
    Ok(configured.min(available))
}

/// Ctrl+C ends the session without a choice.
fn interrupted_is_none<T>(
    result: Result<Option<T>, BrowseError>,
) -> Result<Option<T>, BrowseError> {
    match result {
        Err(BrowseError::Terminal(e)) if e.kind() == io::ErrorKind::Interrupted => {
            log::info!("Interrupted by user");
            Ok(None)
        }
        other => other,
    }
}

/// Run the chosen command on the real terminal. The screen is restored
/// before this returns.
async fn run(command: Command, config: &ResolvedConfig) -> Result<Option<String>, Box<dyn Error>> {
    let selector = Selector::new(config.highlight);

    match command {
        Command::Browse { path, mode, .. } => {
            let pattern = Pattern::new(&config.file_pattern)?;
            let browser = FsBrowser::with_mode(StdFs, mode, pattern);
            let mut terminal = CrosstermTerminal::open()?;
            let rows = window_rows(&terminal, config.browse_max_visible_rows)?;
            let navigator = Navigator::new(selector, rows);

            let chosen = browser.browse(&mut terminal, &navigator, &path).await;
            Ok(interrupted_is_none(chosen)?.map(|p| p.display().to_string()))
        }
        Command::Inspect { file } => {
            let document = load_document(&file)?;
            let mut terminal = CrosstermTerminal::open()?;
            let rows = window_rows(&terminal, config.max_visible_rows)?;
            let navigator = Navigator::new(selector, rows);

            let done = match &document {
                Document::Json(value) => {
                    Inspector::new(config.max_depth)
                        .inspect(&mut terminal, &navigator, value)
                        .await
                }
                Document::Toml(value) => {
                    Inspector::new(config.max_depth)
                        .inspect(&mut terminal, &navigator, value)
                        .await
                }
            };
            interrupted_is_none(done.map(|()| None::<String>))?;
            Ok(None)
        }
        Command::Pick { items } => {
            let mut terminal = CrosstermTerminal::open()?;
            let rows = window_rows(&terminal, config.max_visible_rows)?;
            let chosen = selector.select(&mut terminal, &TextList, items, rows).await;
            Ok(interrupted_is_none(chosen)?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let file_config = config::load_config()?;
    let pattern = match &args.command {
        Command::Browse { pattern, .. } => pattern.clone(),
        _ => None,
    };
    let cli = CliOverrides {
        max_rows: args.max_rows,
        pattern,
    };
    let resolved = config::resolve(&file_config, &cli);

    init_logging(&resolved);
    log::info!("Burrow starting up");
    log::debug!("Resolved config: {:?}", resolved);

    if let Some(choice) = run(args.command, &resolved).await? {
        println!("{choice}");
    }
    Ok(())
}
