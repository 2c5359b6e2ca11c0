//! Git history mining
//!
//! Walks a bounded window of commits once and derives everything ranking
//! needs: per-file touch counts, the recently-changed set, and the raw
//! commit list for co-change lookups. History is a bonus signal; any
//! failure here (no repo, no HEAD, unreadable odb) degrades to empty
//! results instead of failing the run.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use git2::{Delta, Repository};

use crate::rules::RulesConfig;

/// One mined commit: id plus repo-relative changed paths
#[derive(Debug, Clone)]
pub struct Commit {
    pub id: String,
    pub files: Vec<String>,
}

/// Everything ranking consumes from version history
#[derive(Debug, Default)]
pub struct RepoHistory {
    /// Newest first, capped at `limits.maxCommits`
    pub commits: Vec<Commit>,
    /// Commits-touching-path counts within the window
    pub touch_counts: HashMap<String, u32>,
    /// Paths changed in the most recent `limits.recentCommits` commits
    pub recent_files: HashSet<String>,
}

impl RepoHistory {
    pub fn touch_count(&self, rel_path: &str) -> u32 {
        self.touch_counts.get(rel_path).copied().unwrap_or(0)
    }

    pub fn is_recent(&self, rel_path: &str) -> bool {
        self.recent_files.contains(rel_path)
    }
}

/// Mine the repository's recent history.
///
/// Returns empty history for non-git directories and on any git failure.
pub fn mine_history(repo_path: &Path, rules: &RulesConfig) -> RepoHistory {
    let commits = match load_commits(repo_path, rules.limits.max_commits) {
        Ok(commits) => commits,
        Err(_) => return RepoHistory::default(),
    };

    let mut touch_counts: HashMap<String, u32> = HashMap::new();
    for commit in &commits {
        for file in &commit.files {
            *touch_counts.entry(file.clone()).or_insert(0) += 1;
        }
    }

    let mut recent_files = HashSet::new();
    for commit in commits.iter().take(rules.limits.recent_commits) {
        for file in &commit.files {
            recent_files.insert(file.clone());
        }
    }

    RepoHistory {
        commits,
        touch_counts,
        recent_files,
    }
}

/// Newest-first commit window with per-commit changed-file lists.
///
/// Merge commits carry an empty file list, matching what
/// `git log --name-only` prints for them.
fn load_commits(repo_path: &Path, max_commits: usize) -> Result<Vec<Commit>, git2::Error> {
    let repo = Repository::discover(repo_path)?;
    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;

    let mut commits = Vec::new();
    for oid in revwalk {
        if commits.len() >= max_commits {
            break;
        }
        let oid = oid?;
        let commit = repo.find_commit(oid)?;

        let files = if commit.parent_count() > 1 {
            Vec::new()
        } else {
            changed_files(&repo, &commit)?
        };

        commits.push(Commit {
            id: oid.to_string(),
            files,
        });
    }

    Ok(commits)
}

fn changed_files(repo: &Repository, commit: &git2::Commit) -> Result<Vec<String>, git2::Error> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parent(0) {
        Ok(parent) => Some(parent.tree()?),
        Err(_) => None,
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

    let mut files = Vec::new();
    for delta in diff.deltas() {
        let path = match delta.status() {
            Delta::Deleted => delta.old_file().path(),
            _ => delta.new_file().path().or_else(|| delta.old_file().path()),
        };
        if let Some(path) = path {
            files.push(path.to_string_lossy().replace('\\', "/"));
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn commit_file(repo: &Repository, rel: &str, content: &str, message: &str) {
        let workdir = repo.workdir().unwrap();
        let path = workdir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(rel)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("tester", "tester@example.com").unwrap();

        let parent = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_non_git_directory_yields_empty_history() {
        let temp = TempDir::new().unwrap();
        let history = mine_history(temp.path(), &RulesConfig::default());
        assert!(history.commits.is_empty());
        assert!(history.touch_counts.is_empty());
        assert!(history.recent_files.is_empty());
    }

    #[test]
    fn test_repo_without_commits_yields_empty_history() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let history = mine_history(temp.path(), &RulesConfig::default());
        assert!(history.commits.is_empty());
    }

    #[test]
    fn test_touch_counts_and_recency() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        commit_file(&repo, "a.txt", "one", "first");
        commit_file(&repo, "a.txt", "two", "second");
        commit_file(&repo, "b.txt", "b", "third");

        let history = mine_history(temp.path(), &RulesConfig::default());
        assert_eq!(history.commits.len(), 3);
        assert_eq!(history.touch_count("a.txt"), 2);
        assert_eq!(history.touch_count("b.txt"), 1);
        assert_eq!(history.touch_count("missing.txt"), 0);
        assert!(history.is_recent("a.txt"));
        assert!(history.is_recent("b.txt"));
    }

    #[test]
    fn test_commit_window_is_capped() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        for i in 0..5 {
            commit_file(&repo, "a.txt", &format!("rev {i}"), &format!("commit {i}"));
        }

        let mut rules = RulesConfig::default();
        rules.limits.max_commits = 2;
        let history = mine_history(temp.path(), &rules);
        assert_eq!(history.commits.len(), 2);
        assert_eq!(history.touch_count("a.txt"), 2);
    }

    #[test]
    fn test_recent_window_is_narrower_than_full_window() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        commit_file(&repo, "old.txt", "old", "old change");
        commit_file(&repo, "new.txt", "new", "new change");

        let mut rules = RulesConfig::default();
        rules.limits.recent_commits = 1;
        let history = mine_history(temp.path(), &rules);
        assert!(history.is_recent("new.txt"));
        assert!(!history.is_recent("old.txt"));
        // Still counted in the wider touch window
        assert_eq!(history.touch_count("old.txt"), 1);
    }

    #[test]
    fn test_commits_are_newest_first() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        commit_file(&repo, "first.txt", "1", "first");
        commit_file(&repo, "second.txt", "2", "second");

        let history = mine_history(temp.path(), &RulesConfig::default());
        assert_eq!(history.commits[0].files, vec!["second.txt".to_string()]);
        assert_eq!(history.commits[1].files, vec!["first.txt".to_string()]);
    }
}
