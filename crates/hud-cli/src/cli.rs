use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hud")]
#[command(about = "Read-only inspector for agent gateway state", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Gateway state directory (default: ~/.gateway)
    #[arg(long, global = true, env = "HUD_GATEWAY_BASE")]
    pub base: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List agents with status, capabilities and token usage
    Agents,

    /// Show one agent in detail
    Agent {
        /// Agent identifier
        id: String,
    },

    /// List an agent's sessions
    Sessions {
        /// Agent identifier
        id: String,
    },

    /// Show the tail of an agent's main-session transcript
    Activity {
        /// Agent identifier
        id: String,

        /// Number of entries to show (default from config: 20, capped at 50)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Inspect cron jobs
    #[command(subcommand)]
    Cron(CronCommands),

    /// Summarize activity across the whole gateway
    Stats,

    /// Print the gateway configuration with secrets redacted
    Config,
}

#[derive(Subcommand)]
pub enum CronCommands {
    /// List all cron jobs
    List,

    /// Show a single cron job
    Show {
        /// Job id or name
        job: String,
    },
}
