use super::print::{
    print_error, print_history, print_info, print_result, print_success, TerminalView, TimeStyle,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use reckon::api::Calculator;
use reckon::config::{ReckonConfig, CONFIG_KEYS};
use reckon::error::{ReckonError, Result};
use reckon::history::{HistoryStore, SystemClock};
use reckon::keys::KeyEvent;
use reckon::render::{NullView, View};
use reckon::store::fs_backend::FsBackend;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const HOME_ENV: &str = "RECKON_HOME";
const LOG_ENV: &str = "RECKON_LOG";

const REPL_HELP: &str = "\
Type an expression and press Enter to evaluate it.
The expression is kept after evaluation; the next line continues it.
  :back           delete the last character
  :clear          clear the expression
  :history        list history
  :rm N           delete history entry N
  :clear-history  delete all history
  :quit           leave";

struct AppContext {
    data_dir: PathBuf,
    config: ReckonConfig,
}

impl AppContext {
    fn calculator<V: View>(&self, view: V) -> Calculator<FsBackend, V> {
        let clock = SystemClock::new(self.config.timestamp_format.clone());
        let history = HistoryStore::new(FsBackend::new(self.data_dir.clone())).with_clock(clock);
        Calculator::new(history, view)
    }

    /// Build a calculator and restore its history. A history that cannot
    /// be read is reported and treated as empty.
    fn loaded_calculator<V: View>(&self, view: V) -> Calculator<FsBackend, V> {
        let mut calc = self.calculator(view);
        if let Err(e) = calc.load() {
            warn!(error = %e, "could not read history, starting empty");
        }
        calc
    }

    fn time_style(&self) -> TimeStyle<'_> {
        if self.config.relative_time {
            TimeStyle::Relative(&self.config.timestamp_format)
        } else {
            TimeStyle::Stored
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Eval { expression }) => handle_eval(&ctx, &expression.concat()),
        Some(Commands::Repl) => handle_repl(&ctx),
        Some(Commands::History { limit }) => handle_history(&ctx, limit),
        Some(Commands::Delete { indexes }) => handle_delete(&ctx, indexes),
        Some(Commands::Clear) => handle_clear(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_history(&ctx, None),
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "reckon=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match (&cli.data_dir, std::env::var_os(HOME_ENV)) {
        (Some(dir), _) => dir.clone(),
        (None, Some(home)) => PathBuf::from(home),
        (None, None) => ProjectDirs::from("com", "reckon", "reckon")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                ReckonError::Config("Could not determine a data directory".to_string())
            })?,
    };
    debug!(data_dir = %data_dir.display(), "using data directory");

    let config = match ReckonConfig::load(&FsBackend::new(data_dir.clone())) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "could not read config, using defaults");
            ReckonConfig::default()
        }
    };

    Ok(AppContext { data_dir, config })
}

fn handle_eval(ctx: &AppContext, expression: &str) -> Result<()> {
    let mut calc = ctx.loaded_calculator(NullView);
    calc.type_text(expression)?;
    if calc.expression() != expression {
        debug!(typed = expression, buffer = calc.expression(), "input was adjusted");
    }
    let display = calc.evaluate()?;
    print_result(&display);
    Ok(())
}

fn handle_repl(ctx: &AppContext) -> Result<()> {
    let mut calc = ctx.loaded_calculator(TerminalView::new());
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();

    if interactive {
        print_info(REPL_HELP);
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush().map_err(ReckonError::Io)?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(ReckonError::Io)?;
        let line = line.trim();

        if let Some(command) = line.strip_prefix(':') {
            if !repl_command(ctx, &mut calc, command)? {
                break;
            }
            continue;
        }

        for c in line.chars().filter(|c| !c.is_whitespace()) {
            if calc.press(&KeyEvent::named(c.to_string()))?.is_none() {
                print_error(&format!("Ignoring key '{}'", c));
            }
        }
        calc.press(&KeyEvent::new("Enter", 13))?;
    }

    Ok(())
}

/// Run one `:command`. Returns `false` when the session should end.
fn repl_command(
    ctx: &AppContext,
    calc: &mut Calculator<FsBackend, TerminalView>,
    command: &str,
) -> Result<bool> {
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("q" | "quit" | "exit"), _) => return Ok(false),
        (Some("back"), _) => {
            calc.press(&KeyEvent::new("Backspace", 8))?;
            print_info(calc.expression());
        }
        (Some("clear"), _) => {
            calc.press(&KeyEvent::new("Escape", 27))?;
        }
        (Some("history" | "ls"), _) => print_history(calc.history(), &ctx.time_style()),
        (Some("rm"), Some(n)) => match n.parse::<usize>() {
            Ok(index) if index >= 1 => match calc.delete_history_at(index - 1)? {
                Some(record) => print_success(&format!(
                    "Deleted {}: {} = {}",
                    index, record.expression, record.result
                )),
                None => print_error(&format!("No history entry {}", index)),
            },
            _ => print_error(&format!("Invalid index: {}", n)),
        },
        (Some("rm"), None) => print_error("Usage: :rm N"),
        (Some("clear-history"), _) => {
            calc.clear_history()?;
            print_success("History cleared.");
        }
        (Some("help"), _) | (None, _) => print_info(REPL_HELP),
        (Some(other), _) => print_error(&format!("Unknown command: :{}", other)),
    }
    Ok(true)
}

fn handle_history(ctx: &AppContext, limit: Option<usize>) -> Result<()> {
    let calc = ctx.loaded_calculator(NullView);
    let records = calc.history();
    let shown = limit.map_or(records, |n| &records[..n.min(records.len())]);
    print_history(shown, &ctx.time_style());
    Ok(())
}

fn handle_delete(ctx: &AppContext, mut indexes: Vec<usize>) -> Result<()> {
    let mut calc = ctx.loaded_calculator(NullView);

    // Highest first so earlier removals don't shift later indexes.
    indexes.sort_unstable_by(|a, b| b.cmp(a));
    indexes.dedup();

    for index in indexes {
        let removed = match index.checked_sub(1) {
            Some(i) => calc.delete_history_at(i)?,
            None => None,
        };
        match removed {
            Some(record) => print_success(&format!(
                "Deleted {}: {} = {}",
                index, record.expression, record.result
            )),
            None => print_error(&format!("No history entry {}", index)),
        }
    }
    Ok(())
}

fn handle_clear(ctx: &AppContext) -> Result<()> {
    let mut calc = ctx.calculator(NullView);
    calc.clear_history()?;
    print_success("History cleared.");
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for key in CONFIG_KEYS {
                if let Some(value) = ctx.config.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
        (Some(key), None) => match ctx.config.get(&key) {
            Some(value) => println!("{}", value),
            None => print_error(&format!("Unknown config key: {}", key)),
        },
        (Some(key), Some(value)) => {
            let mut config = ctx.config.clone();
            config.set(&key, &value)?;
            config.save(&FsBackend::new(ctx.data_dir.clone()))?;
            let shown = config.get(&key).unwrap_or(value);
            print_success(&format!("{} set to {}", key, shown));
        }
    }
    Ok(())
}
