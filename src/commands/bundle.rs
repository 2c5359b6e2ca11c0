//! Bundle command implementation

use std::path::PathBuf;

use crate::bundle::build_bundle;
use crate::cli::BundleArgs;
use crate::error::{CtxpackError, Result};
use crate::history::mine_history;
use crate::progress::StageProgress;
use crate::ranker::rank_files;
use crate::report::{default_explain_path, write_bundle_json, write_bundle_markdown, write_explain_markdown};
use crate::rules::load_rules;
use crate::scanner::scan_repo;

/// Output directory name inside the target repository
pub const OUTPUT_DIR: &str = ".ctxpack";

/// Run bundle command
pub fn run(args: BundleArgs, verbose: bool) -> Result<()> {
    let repo_path = args.repo.clone().unwrap_or_else(|| PathBuf::from("."));
    let root = dunce::canonicalize(&repo_path)
        .map_err(|_| CtxpackError::RepoNotFound {
            path: repo_path.display().to_string(),
        })?;

    let rules = load_rules(args.rules.as_deref())?;
    let budget = args.budget.unwrap_or(rules.budget.default_tokens);

    let progress = StageProgress::start("Scanning repository...");
    let entries = match scan_repo(&root, &rules, args.include_tests) {
        Ok(entries) => entries,
        Err(e) => {
            progress.clear();
            return Err(e);
        }
    };
    if verbose {
        progress.update(&format!("Scanned {} files", entries.len()));
    }

    progress.update("Mining git history...");
    let history = mine_history(&root, &rules);

    progress.update("Ranking files...");
    let ranked = rank_files(&root, &args.task, &entries, &rules, &history);
    progress.clear();

    let bundle = build_bundle(&args.task, &ranked, budget, &rules);

    let out_dir = root.join(OUTPUT_DIR);
    std::fs::create_dir_all(&out_dir).map_err(|e| CtxpackError::FileWriteFailed {
        path: out_dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let md_path = out_dir.join("bundle.md");
    let json_path = out_dir.join("bundle.json");
    write_bundle_markdown(&bundle, &md_path)?;
    write_bundle_json(&bundle, &json_path)?;
    write_explain_markdown(&json_path, &default_explain_path(&json_path))?;

    println!(
        "Wrote bundle to {} ({} files, ~{} tokens, {} skipped)",
        out_dir.display(),
        bundle.files.len(),
        bundle.estimated_tokens,
        bundle.skipped_files
    );

    if verbose {
        for file in &bundle.files {
            println!("  {} [{}] {} tokens", file.path, file.mode, file.estimated_tokens);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(root: &std::path::Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_bundle_writes_outputs() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "auth.py", "def refresh_token():\n    pass\n");
        write_file(temp.path(), "readme.md", "# project\n");

        let args = BundleArgs {
            task: "fix auth token refresh".to_string(),
            repo: Some(temp.path().to_path_buf()),
            budget: None,
            rules: None,
            include_tests: false,
        };
        run(args, false).unwrap();

        let out_dir = temp.path().join(OUTPUT_DIR);
        assert!(out_dir.join("bundle.md").exists());
        assert!(out_dir.join("bundle.json").exists());
        assert!(out_dir.join("explain.md").exists());
    }

    #[test]
    fn test_bundle_missing_repo_fails() {
        let args = BundleArgs {
            task: "anything".to_string(),
            repo: Some(PathBuf::from("/nonexistent/repo/path")),
            budget: None,
            rules: None,
            include_tests: false,
        };
        let result = run(args, false);
        assert!(matches!(
            result.unwrap_err(),
            CtxpackError::RepoNotFound { .. }
        ));
    }

    #[test]
    fn test_bundle_missing_rules_fails() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "main.go", "package main\n");

        let args = BundleArgs {
            task: "anything".to_string(),
            repo: Some(temp.path().to_path_buf()),
            budget: None,
            rules: Some(temp.path().join("missing.rules.json")),
            include_tests: false,
        };
        let result = run(args, false);
        assert!(matches!(
            result.unwrap_err(),
            CtxpackError::RulesNotFound { .. }
        ));
    }
}
