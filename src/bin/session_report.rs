use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use poker_session::report::{JsonLinesSummarySink, SessionReport};
use poker_session::{SessionConfig, SessionError};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "session_report",
    about = "Summarize a poker hand-history log",
    long_about = "Parses a hand-history log (or the newest log in a directory) into per-player\n\
                  chip, outcome and all-in statistics and prints a Markdown summary."
)]
struct Args {
    /// Hand-history file, or a directory whose newest file is used
    path: PathBuf,

    /// JSON session config (starting stack, blinds, dialect, aliases)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Override the starting stack
    #[arg(long = "starting-stack")]
    starting_stack: Option<u64>,

    /// Override the big blind
    #[arg(long = "big-blind")]
    big_blind: Option<u64>,

    /// Append one JSON line per identity (buy-ins, final chips) to this file
    #[arg(short = 'o', long = "summary-out")]
    summary_out: Option<PathBuf>,

    /// Print the summary as JSON instead of Markdown
    #[arg(long = "json")]
    json: bool,
}

fn init_tracing_from_env() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<SessionConfig, SessionError> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(stack) = args.starting_stack {
        config.starting_stack = stack;
    }
    if let Some(big_blind) = args.big_blind {
        config.big_blind = big_blind;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), SessionError> {
    let config = load_config(&args)?;
    let report = SessionReport::from_path(&args.path, &config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report.summary)
            .map_err(poker_session::SinkError::from)?;
        println!("{json}");
    } else {
        println!("{}", report.markdown());
    }

    if let Some(out) = args.summary_out {
        let mut sink = JsonLinesSummarySink::new(out);
        let written = report.export(&mut sink)?;
        info!(written, path = ?sink.path(), "Wrote summary rows");
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing_from_env();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_parse_error() => {
            error!(%err, "Hand history could not be parsed");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
        Err(err) => {
            error!(%err, "Session run failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
