//! Scan command implementation

use std::path::PathBuf;

use console::style;

use crate::cli::ScanArgs;
use crate::error::{CtxpackError, Result};
use crate::history::mine_history;
use crate::progress::StageProgress;
use crate::ranker::rank_files;
use crate::rules::load_rules;
use crate::scanner::scan_repo;

/// Run scan command
pub fn run(args: ScanArgs, verbose: bool) -> Result<()> {
    let repo_path = args.repo.clone().unwrap_or_else(|| PathBuf::from("."));
    let root = dunce::canonicalize(&repo_path)
        .map_err(|_| CtxpackError::RepoNotFound {
            path: repo_path.display().to_string(),
        })?;

    let rules = load_rules(args.rules.as_deref())?;

    let progress = StageProgress::start("Scanning repository...");
    let entries = match scan_repo(&root, &rules, args.include_tests) {
        Ok(entries) => entries,
        Err(e) => {
            progress.clear();
            return Err(e);
        }
    };
    progress.update("Ranking files...");
    let history = mine_history(&root, &rules);
    let ranked = rank_files(&root, &args.task, &entries, &rules, &history);
    progress.clear();

    if verbose {
        println!("Scanned {} files", entries.len());
    }

    let limit = args.limit.min(ranked.len());
    println!("Top {limit} files:");
    for file in ranked.iter().take(args.limit) {
        let reasons = if file.reasons.is_empty() {
            "no signals".to_string()
        } else {
            file.reasons.join(", ")
        };
        println!(
            "- {} | score={} | {}",
            style(&file.rel_path).cyan(),
            style(file.score).bold(),
            style(reasons).dim()
        );
    }

    Ok(())
}
