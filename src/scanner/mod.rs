//! Repository file discovery
//!
//! Produces the candidate file list for ranking. Git-backed repositories are
//! queried through the index plus untracked-file status (fast path, already
//! respects .gitignore); everything else gets a manual walk that layers
//! nested .gitignore files by hand. The result is sorted, capped at
//! `limits.maxFiles`, and carries byte sizes.

pub mod ignore_rules;

use std::path::{Path, PathBuf};

use git2::{Repository, StatusOptions};

use crate::error::{CtxpackError, Result};
use crate::rules::RulesConfig;
use ignore_rules::{IgnoreSet, has_negated_descendant, to_root_relative_pattern};

const GIT_DIR: &str = ".git";

/// A discovered candidate file
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute path; unique key for the run
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Whether the path is inside a git work tree
pub fn is_git_repo(repo_path: &Path) -> bool {
    if repo_path.join(GIT_DIR).exists() {
        return true;
    }
    Repository::discover(repo_path)
        .ok()
        .is_some_and(|repo| repo.workdir().is_some())
}

/// Repo-relative path with forward slashes
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Scan the repository for candidate files.
///
/// Git fast path: union of tracked (index) and untracked-but-not-ignored
/// (status) paths. Fallback: manual traversal with layered ignore rules.
/// Both paths then apply the non-overridable default/test ignore sets.
pub fn scan_repo(repo_path: &Path, rules: &RulesConfig, include_tests: bool) -> Result<Vec<FileEntry>> {
    let resolved = dunce::canonicalize(repo_path).map_err(|_| CtxpackError::RepoNotFound {
        path: repo_path.display().to_string(),
    })?;

    let default_ignore = IgnoreSet::from_rules(&resolved, &rules.ignore.default)?;
    let test_ignore = if include_tests {
        IgnoreSet::empty()
    } else {
        IgnoreSet::from_rules(&resolved, &rules.ignore.tests)?
    };

    let mut files = if is_git_repo(&resolved) {
        let mut listed = git_listed_files(&resolved)?;
        listed.retain(|path| {
            let rel = relative_path(&resolved, path);
            !default_ignore.is_ignored(&rel, false) && !test_ignore.is_ignored(&rel, false)
        });
        listed
    } else {
        walk_files(&resolved, &default_ignore, &test_ignore)?
    };

    files.sort();

    let mut entries = Vec::new();
    for path in files.into_iter().take(rules.limits.max_files) {
        match std::fs::metadata(&path) {
            Ok(meta) => entries.push(FileEntry {
                size_bytes: meta.len(),
                path,
            }),
            // Listed but gone by the time we stat it: drop silently
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(CtxpackError::TraversalFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(entries)
}

/// Tracked plus untracked-but-not-ignored paths from git, absolute.
fn git_listed_files(root: &Path) -> Result<Vec<PathBuf>> {
    let repo = Repository::discover(root).map_err(|e| CtxpackError::GitListingFailed {
        reason: e.to_string(),
    })?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| CtxpackError::GitListingFailed {
            reason: "repository has no work tree".to_string(),
        })?
        .to_path_buf();
    let workdir = dunce::canonicalize(&workdir).unwrap_or(workdir);

    let mut files = Vec::new();

    let index = repo.index().map_err(|e| CtxpackError::GitListingFailed {
        reason: e.to_string(),
    })?;
    for entry in index.iter() {
        let rel = String::from_utf8_lossy(&entry.path).to_string();
        let abs = workdir.join(&rel);
        if abs.starts_with(root) {
            files.push(abs);
        }
    }

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .exclude_submodules(true);
    let statuses = repo
        .statuses(Some(&mut opts))
        .map_err(|e| CtxpackError::GitListingFailed {
            reason: e.to_string(),
        })?;
    for status in statuses.iter() {
        if !status.status().contains(git2::Status::WT_NEW) {
            continue;
        }
        if let Some(rel) = status.path() {
            let abs = workdir.join(rel);
            if abs.starts_with(root) {
                files.push(abs);
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Read and split a directory's .gitignore, if present
fn load_gitignore_lines(dir: &Path) -> Vec<String> {
    let gitignore = dir.join(".gitignore");
    match std::fs::read_to_string(&gitignore) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

/// Manual traversal with layered, directory-scoped ignore rules.
///
/// Explicit work stack of (directory, inherited root-relative patterns); each
/// directory appends its own converted .gitignore lines before descending.
/// An excluded directory is still entered when a negation pattern targets a
/// descendant, so "ignore dir, keep one file" layouts work.
fn walk_files(
    root: &Path,
    default_ignore: &IgnoreSet,
    test_ignore: &IgnoreSet,
) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    let mut stack: Vec<(PathBuf, Vec<String>)> = vec![(root.to_path_buf(), Vec::new())];

    while let Some((dir, inherited)) = stack.pop() {
        if dir.file_name().is_some_and(|name| name == GIT_DIR) {
            continue;
        }

        let base_rel = relative_path(root, &dir);
        let mut patterns = inherited;
        for line in load_gitignore_lines(&dir) {
            if let Some(converted) = to_root_relative_pattern(line.trim(), &base_rel) {
                patterns.push(converted);
            }
        }
        let matcher = IgnoreSet::from_local(root, &patterns);

        let read_dir = std::fs::read_dir(&dir).map_err(|e| CtxpackError::TraversalFailed {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        for entry in read_dir {
            let entry = entry.map_err(|e| CtxpackError::TraversalFailed {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;
            let full_path = entry.path();
            let rel = relative_path(root, &full_path);

            let meta = match std::fs::metadata(&full_path) {
                Ok(meta) => meta,
                // Broken symlink or a file deleted mid-walk
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(CtxpackError::TraversalFailed {
                        path: full_path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            };

            if default_ignore.is_ignored(&rel, meta.is_dir())
                || test_ignore.is_ignored(&rel, meta.is_dir())
            {
                continue;
            }

            if meta.is_dir() {
                if matcher.is_ignored(&rel, true) && !has_negated_descendant(&rel, &patterns) {
                    continue;
                }
                stack.push((full_path, patterns.clone()));
            } else if meta.is_file() {
                if matcher.is_ignored(&rel, false) {
                    continue;
                }
                results.push(full_path);
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_plain_directory_sorted() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.txt", "b");
        write(temp.path(), "a.txt", "a");
        write(temp.path(), "src/c.rs", "fn main() {}");

        let rules = RulesConfig::default();
        let entries = scan_repo(temp.path(), &rules, false).unwrap();
        let rels: Vec<String> = entries
            .iter()
            .map(|e| relative_path(&dunce::canonicalize(temp.path()).unwrap(), &e.path))
            .collect();
        assert_eq!(rels, vec!["a.txt", "b.txt", "src/c.rs"]);
        assert_eq!(entries[0].size_bytes, 1);
    }

    #[test]
    fn test_scan_respects_local_gitignore() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".gitignore", "*.log\n");
        write(temp.path(), "app.log", "noise");
        write(temp.path(), "app.rs", "fn main() {}");

        let rules = RulesConfig::default();
        let entries = scan_repo(temp.path(), &rules, false).unwrap();
        let names: Vec<String> = entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"app.rs".to_string()));
        assert!(!names.contains(&"app.log".to_string()));
    }

    #[test]
    fn test_nested_negation_reincludes_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".gitignore", "*.log\n");
        write(temp.path(), "logs/.gitignore", "!keep.log\n");
        write(temp.path(), "logs/keep.log", "kept");
        write(temp.path(), "logs/drop.log", "dropped");

        let rules = RulesConfig::default();
        let entries = scan_repo(temp.path(), &rules, false).unwrap();
        let names: Vec<String> = entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"keep.log".to_string()));
        assert!(!names.contains(&"drop.log".to_string()));
    }

    #[test]
    fn test_default_ignore_overrides_local_negation() {
        let temp = TempDir::new().unwrap();
        // Local negation cannot rescue a path in the global default set
        write(temp.path(), ".gitignore", "!node_modules/pkg/index.js\n");
        write(temp.path(), "node_modules/pkg/index.js", "x");
        write(temp.path(), "src/main.rs", "fn main() {}");

        let rules = RulesConfig::default();
        let entries = scan_repo(temp.path(), &rules, false).unwrap();
        assert!(
            entries
                .iter()
                .all(|e| !e.path.to_string_lossy().contains("node_modules"))
        );
    }

    #[test]
    fn test_test_files_excluded_by_default() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/app.ts", "export const x = 1;");
        write(temp.path(), "src/app.test.ts", "test stuff");

        let rules = RulesConfig::default();

        let without = scan_repo(temp.path(), &rules, false).unwrap();
        assert!(
            without
                .iter()
                .all(|e| !e.path.to_string_lossy().contains("app.test.ts"))
        );

        let with = scan_repo(temp.path(), &rules, true).unwrap();
        assert!(
            with.iter()
                .any(|e| e.path.to_string_lossy().contains("app.test.ts"))
        );
    }

    #[test]
    fn test_max_files_cap() {
        let temp = TempDir::new().unwrap();
        for i in 0..10 {
            write(temp.path(), &format!("f{i}.txt"), "x");
        }

        let mut rules = RulesConfig::default();
        rules.limits.max_files = 3;
        let entries = scan_repo(temp.path(), &rules, false).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_git_fast_path_lists_tracked_and_untracked() {
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();
        write(temp.path(), "tracked.rs", "fn main() {}");
        write(temp.path(), "untracked.rs", "fn other() {}");

        let mut index = repo.index().unwrap();
        index.add_path(Path::new("tracked.rs")).unwrap();
        index.write().unwrap();

        let rules = RulesConfig::default();
        let entries = scan_repo(temp.path(), &rules, false).unwrap();
        let names: Vec<String> = entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"tracked.rs".to_string()));
        assert!(names.contains(&"untracked.rs".to_string()));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let rules = RulesConfig::default();
        let result = scan_repo(Path::new("/definitely/not/here"), &rules, false);
        assert!(matches!(result, Err(CtxpackError::RepoNotFound { .. })));
    }
}
