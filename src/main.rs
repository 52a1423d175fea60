mod app;
mod help;
mod theme;
mod widget;
use crate::app::App;
use anyhow::Context;
use datepick::calendar::to_iso;
use datepick::{parse_date, Config, DatePicker, SystemClock};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::{Path, PathBuf};
use time::Date;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        config: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        date: Option<Date>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = None;
        let mut log_dir = None;
        let mut date = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('l') | Arg::Long("log-dir") => {
                    log_dir = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match parse_date(&value) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            config,
            log_dir,
            date,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                config,
                log_dir,
                date,
            } => {
                let _guard = log_dir.as_deref().map(init_logging).transpose()?;
                let mut config = match config {
                    Some(path) => Config::load(&path).with_context(|| {
                        format!("failed to load configuration from {}", path.display())
                    })?,
                    None => Config::default(),
                };
                if date.is_some() {
                    config = config.with_value(date);
                }
                let rules = config.disabled_rules().clone();
                let picker = DatePicker::new(&config, rules, SystemClock);
                tracing::info!(value = ?picker.value(), "starting picker");
                let value = with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    Ok(App::new(picker).run(&mut terminal)?)
                })?;
                if let Some(value) = value {
                    println!("{}", to_iso(value));
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: datepick [-c FILE] [-l DIR] [YYYY-MM-DD]");
                println!();
                println!("Pick a date from a month grid in the terminal.  The committed date is");
                println!("printed as an ISO 8601 timestamp on exit.");
                println!();
                println!("Options:");
                println!("  -c, --config FILE   Read settings from the given TOML file");
                println!("  -l, --log-dir DIR   Write daily log files to the given directory");
                println!("  -h, --help          Display this help message and exit");
                println!("  -V, --version       Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

/// Sends tracing output to a daily log file in `dir`.  The returned guard
/// must be kept alive for buffered lines to be flushed.
fn init_logging(dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, "datepick.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("datepick=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(guard)
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
