//! CLI entry point for the maze verifier.
//!
//! Usage:
//!   maze-verifier search [options]
//!
//! Options:
//!   --p0 <box>                 Start box of pencil 0 (default: 1)
//!   --p1 <box>                 Start box of pencil 1 (default: 7)
//!   --moved0, --moved1         Mark a pencil as moved in the previous round
//!   --red-text                 Start with the box 60 rule in force
//!   --trace-capacity <n>       Path depths kept for goal traces (default: 300)
//!   --trace-print-limit <n>    Only print traces of goals up to this depth (default: 37)
//!   --dump                     List every visited transition
//!   --json                     Print the report as JSON

use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use maze_verifier::solver::DEFAULT_TRACE_CAPACITY;
use maze_verifier::{
    traverse, Configuration, DomainViolation, MazePoint, Position, SearchConfig, SearchReport,
    TransitionRecord, TransitionTable,
};

#[derive(Parser)]
#[command(name = "maze-verifier")]
#[command(about = "Exhaustive state-space search for the self-referential cows maze")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a path from the start boxes to the goal
    Search {
        /// Start box of pencil 0
        #[arg(long, default_value = "1")]
        p0: u8,

        /// Start box of pencil 1
        #[arg(long, default_value = "7")]
        p1: u8,

        /// Pencil 0 moved in the previous round
        #[arg(long)]
        moved0: bool,

        /// Pencil 1 moved in the previous round
        #[arg(long)]
        moved1: bool,

        /// Start with the box 60 rule (ignore red text) in force
        #[arg(long)]
        red_text: bool,

        /// Path depths kept for goal traces
        #[arg(long, default_value_t = DEFAULT_TRACE_CAPACITY)]
        trace_capacity: usize,

        /// Only print traces of goals found up to this depth
        #[arg(long, default_value = "37")]
        trace_print_limit: u32,

        /// List every visited transition after the search
        #[arg(long)]
        dump: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Output format for --json
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOutput<'a> {
    start: Configuration,
    visited_states: usize,
    #[serde(flatten)]
    report: &'a SearchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    transitions: Option<Vec<&'a TransitionRecord>>,
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn start_configuration(
    p0: u8,
    p1: u8,
    moved: [bool; 2],
    red_text_override: bool,
) -> Result<Configuration, DomainViolation> {
    Ok(Configuration {
        tokens: [
            Position::At(MazePoint::new(p0)?),
            Position::At(MazePoint::new(p1)?),
        ],
        moved,
        red_text_override,
    })
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Search {
            p0,
            p1,
            moved0,
            moved1,
            red_text,
            trace_capacity,
            trace_print_limit,
            dump,
            json,
        } => {
            let start = match start_configuration(p0, p1, [moved0, moved1], red_text) {
                Ok(start) => start,
                Err(e) => {
                    eprintln!("Error: invalid start position: {}", e);
                    process::exit(1);
                }
            };

            let config = SearchConfig {
                start,
                trace_capacity,
            };

            let mut table = TransitionTable::build();
            let report = traverse(&mut table, &config);

            if json {
                let transitions = dump.then(|| table.visited().collect());
                let output = SearchOutput {
                    start,
                    visited_states: table.visited_count(),
                    report: &report,
                    transitions,
                };
                match serde_json::to_string_pretty(&output) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error serializing report: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                print_report(&report, trace_print_limit);
                if dump {
                    table.for_each_visited(|record| println!("{}", record));
                }
            }
        }
    }
}

fn print_report(report: &SearchReport, trace_print_limit: u32) {
    for event in &report.goal_events {
        if event.depth > trace_print_limit {
            continue;
        }
        println!("---- Stack trace, depth {}", event.depth);
        for configuration in &event.trace {
            println!("{}", configuration);
        }
    }
    println!(
        "The maximal search depth encountered is {}",
        report.max_depth
    );
    println!(
        "Goal states encountered: {}, illegal states encountered: {}, states expanded: {}",
        report.goal_events.len(),
        report.illegal_events.len(),
        report.states_expanded
    );
}
