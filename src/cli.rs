//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ctxpack - task-scoped repository context bundler
///
/// Rank a repository's files against a task description and pack the most
/// relevant ones into a token-budgeted bundle.
#[derive(Parser, Debug)]
#[command(
    name = "ctxpack",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Generate task-specific context bundles for AI coding agents",
    long_about = "ctxpack scans a repository, scores every file against a free-text task \
                  description (filename/path/content matches, git history, import graph \
                  proximity, structural role), and packs the top-ranked files into a \
                  Markdown + JSON bundle that fits a token budget.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  ctxpack bundle --task \"fix auth token refresh\"\n    \
                  ctxpack scan --task \"migrate user ids\" --limit 20\n    \
                  ctxpack explain\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/ctxpack/ctxpack"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a token-budgeted context bundle for a task
    Bundle(BundleArgs),

    /// List the top-ranked files for a task without building a bundle
    Scan(ScanArgs),

    /// Re-render the explain report from an existing bundle JSON
    Explain(ExplainArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the bundle command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Bundle for a task in the current repo:\n    ctxpack bundle --task \"fix auth token refresh\"\n\n\
                  Bundle another repository:\n    ctxpack bundle --task \"add retry logic\" --repo ../service\n\n\
                  Tighter budget:\n    ctxpack bundle --task \"rename config keys\" --budget 6000\n\n\
                  Custom rules:\n    ctxpack bundle --task \"...\" --rules ./team.rules.json\n\n\
                  Include test files:\n    ctxpack bundle --task \"...\" --include-tests")]
pub struct BundleArgs {
    /// Task description to rank files against
    #[arg(long)]
    pub task: String,

    /// Repository path (defaults to current directory)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Token budget (defaults to the rules' defaultTokens)
    #[arg(long)]
    pub budget: Option<u64>,

    /// Rules JSON file overriding the built-in defaults
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Include test files in the scan
    #[arg(long)]
    pub include_tests: bool,
}

/// Arguments for the scan command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show the 50 most relevant files:\n    ctxpack scan --task \"fix auth token refresh\"\n\n\
                  Shorter listing:\n    ctxpack scan --task \"...\" --limit 10\n\n\
                  Another repository:\n    ctxpack scan --task \"...\" --repo ../service")]
pub struct ScanArgs {
    /// Task description to rank files against
    #[arg(long)]
    pub task: String,

    /// Repository path (defaults to current directory)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Rules JSON file overriding the built-in defaults
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Number of files to list
    #[arg(long, default_value_t = 50)]
    pub limit: usize,

    /// Include test files in the scan
    #[arg(long)]
    pub include_tests: bool,
}

/// Arguments for the explain command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Explain the last bundle in this repo:\n    ctxpack explain\n\n\
                  Explain a specific bundle JSON:\n    ctxpack explain --bundle ./out/bundle.json")]
pub struct ExplainArgs {
    /// Repository path (defaults to current directory)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Bundle JSON path (defaults to <repo>/.ctxpack/bundle.json)
    #[arg(long)]
    pub bundle: Option<PathBuf>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    ctxpack completions --shell bash > ~/.bash_completion.d/ctxpack\n\n\
                  Generate zsh completions:\n    ctxpack completions --shell zsh > ~/.zfunc/_ctxpack\n\n\
                  Generate fish completions:\n    ctxpack completions --shell fish > ~/.config/fish/completions/ctxpack.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
