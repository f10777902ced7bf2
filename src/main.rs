mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Context;
use crate::commands::edit::EditArgs;

#[derive(Parser)]
#[command(name = "confedit")]
#[command(about = "Edit the video-conference details attached to calendar events")]
struct Cli {
    /// Log provider calls and writes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect your calendar account
    Auth,
    /// List calendars you can edit events in
    Calendars,
    /// List upcoming events
    Events {
        /// Calendar ID (defaults to `default_calendar` from the config)
        #[arg(short, long)]
        calendar: Option<String>,

        /// Show events from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only show events matching this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show an event's conference data
    Show {
        event_id: String,

        #[arg(short, long)]
        calendar: Option<String>,

        /// Print only the conference data as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add or change an event's conference data
    Edit {
        event_id: String,

        #[arg(short, long)]
        calendar: Option<String>,

        #[command(flatten)]
        args: EditArgs,
    },
    /// Remove an event's conference data (the event itself is kept)
    Clear {
        event_id: String,

        #[arg(short, long)]
        calendar: Option<String>,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Auth => commands::auth::run().await,
        Commands::Calendars => commands::calendars::run(&Context::load()?).await,
        Commands::Events {
            calendar,
            from,
            to,
            query,
        } => {
            let ctx = Context::load()?;
            let window = ctx.window(from.as_deref(), to.as_deref())?;
            let calendar_id = ctx.calendar_id(calendar.as_deref());
            commands::events::run(&ctx, calendar_id, &window, query.as_deref()).await
        }
        Commands::Show {
            event_id,
            calendar,
            json,
        } => {
            let ctx = Context::load()?;
            let calendar_id = ctx.calendar_id(calendar.as_deref());
            commands::show::run(&ctx, calendar_id, &event_id, json).await
        }
        Commands::Edit {
            event_id,
            calendar,
            args,
        } => {
            let ctx = Context::load()?;
            let calendar_id = ctx.calendar_id(calendar.as_deref());
            commands::edit::run(&ctx, calendar_id, &event_id, args).await
        }
        Commands::Clear {
            event_id,
            calendar,
            yes,
        } => {
            let ctx = Context::load()?;
            let calendar_id = ctx.calendar_id(calendar.as_deref());
            commands::clear::run(&ctx, calendar_id, &event_id, yes).await
        }
    }
}

/// `CONFEDIT_LOG` wins over `--verbose`. Logs never go to stdout.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "confedit=debug,confedit_core=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("CONFEDIT_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
