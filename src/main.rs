//! ctxpack - task-scoped repository context bundler
//!
//! Scans a repository, ranks every file against a free-text task description,
//! and packs the top-ranked files into a token-budgeted Markdown/JSON bundle
//! suitable for feeding to an AI coding agent.

use clap::Parser;

mod bundle;
mod cli;
mod commands;
mod error;
mod graph;
mod history;
mod progress;
mod ranker;
mod report;
mod rules;
mod scanner;
mod tokens;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Bundle(args) => commands::bundle::run(args, cli.verbose),
        Commands::Scan(args) => commands::scan::run(args, cli.verbose),
        Commands::Explain(args) => commands::explain::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
