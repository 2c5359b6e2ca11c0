//! Explain command implementation

use std::path::PathBuf;

use crate::cli::ExplainArgs;
use crate::commands::bundle::OUTPUT_DIR;
use crate::error::{CtxpackError, Result};
use crate::report::{default_explain_path, write_explain_markdown};

/// Run explain command
pub fn run(args: ExplainArgs) -> Result<()> {
    let bundle_path = match args.bundle {
        Some(path) => path,
        None => {
            let repo_path = args.repo.unwrap_or_else(|| PathBuf::from("."));
            let root = dunce::canonicalize(&repo_path)
                .map_err(|_| CtxpackError::RepoNotFound {
                    path: repo_path.display().to_string(),
                })?;
            root.join(OUTPUT_DIR).join("bundle.json")
        }
    };

    let out_path = default_explain_path(&bundle_path);
    write_explain_markdown(&bundle_path, &out_path)?;

    println!("Wrote explain report to {}", out_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explain_missing_bundle_fails() {
        let temp = TempDir::new().unwrap();
        let args = ExplainArgs {
            repo: Some(temp.path().to_path_buf()),
            bundle: None,
        };
        let result = run(args);
        assert!(matches!(
            result.unwrap_err(),
            CtxpackError::BundleNotFound { .. }
        ));
    }

    #[test]
    fn test_explain_missing_repo_fails() {
        let args = ExplainArgs {
            repo: Some(PathBuf::from("/nonexistent/repo/path")),
            bundle: None,
        };
        assert!(matches!(
            run(args).unwrap_err(),
            CtxpackError::RepoNotFound { .. }
        ));
    }
}
