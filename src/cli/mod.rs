mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::Config;
use crate::logging;
use crate::services::checkbox_store::CheckboxStore;
use crate::services::dashboard::DEFAULT_THRESHOLD;
use crate::services::fetcher::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::services::JsonFileStore;
use crate::types::CheckboxState;

pub use check::CheckArgs;

/// Token price dashboard across game servers
#[derive(Parser)]
#[command(name = "undermine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Quote backend endpoint
    #[arg(long, global = true, env = "UNDERMINE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Directory for marks and logs (default: ~/.undermine)
    #[arg(long, global = true, env = "UNDERMINE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Initial % PROF threshold
    #[arg(long, global = true, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Fetch one item and print its quote table
    Check(CheckArgs),

    /// Show persisted bought / on-sale marks
    Marks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::resolve(self.endpoint, self.data_dir, self.threshold, self.timeout)?;

        match self.command {
            None | Some(Commands::Tui) => {
                logging::init_file(&config.data_dir)?;
                crate::tui::run(&config)
            }
            Some(Commands::Check(args)) => {
                logging::init_stderr()?;
                args.run(&config)?;
                Ok(())
            }
            Some(Commands::Marks { json }) => {
                logging::init_stderr()?;
                print!("{}", marks_output(&JsonFileStore::new(&config.data_dir), json)?);
                Ok(())
            }
        }
    }
}

/// Format persisted marks, one `key  bought  on_sale` line per entry
fn marks_output(store: &dyn CheckboxStore, json: bool) -> anyhow::Result<String> {
    let state = match store.load() {
        Ok(state) => state,
        Err(warning) => {
            warn!(warning = warning.message(), "checkbox store unreadable, showing no marks");
            CheckboxState::new()
        }
    };

    if json {
        let mut out = serde_json::to_string_pretty(&state)?;
        out.push('\n');
        return Ok(out);
    }

    if state.is_empty() {
        return Ok("No marks saved.\n".to_string());
    }

    let mut out = String::new();
    for (key, flags) in &state {
        out.push_str(&format!(
            "{:<40} bought={:<5} on_sale={}\n",
            key, flags.bought, flags.on_sale
        ));
    }
    Ok(out)
}
