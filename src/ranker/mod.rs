//! Multi-factor relevance ranking
//!
//! Combines lexical, structural, historical and graph-proximity signals
//! into one additive per-file score with a complete audit trail: every
//! point of score has a labeled breakdown entry and a human-readable
//! reason, and the breakdown always sums to the score.
//!
//! Files that match the task lexically (filename, path, or content) become
//! *seeds*; the second-pass signals (directory proximity, dependency
//! proximity, co-change) spread relevance outward from them.

pub mod tokenize;

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::graph::ImportGraph;
use crate::history::RepoHistory;
use crate::rules::RulesConfig;
use crate::scanner::{FileEntry, relative_path};
use tokenize::tokenize_task;

/// One labeled score contribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub label: String,
    pub score: u32,
}

/// A file with its relevance score and full audit trail
#[derive(Debug, Clone)]
pub struct RankedFile {
    /// Absolute path
    pub path: PathBuf,
    /// Repo-relative path with forward slashes
    pub rel_path: String,
    pub size_bytes: u64,
    pub score: u32,
    pub reasons: Vec<String>,
    pub score_breakdown: Vec<ScoreDelta>,
}

impl RankedFile {
    fn new(entry: &FileEntry, rel_path: String) -> Self {
        Self {
            path: entry.path.clone(),
            rel_path,
            size_bytes: entry.size_bytes,
            score: 0,
            reasons: Vec::new(),
            score_breakdown: Vec::new(),
        }
    }

    /// Fold one signal into the running score, keeping breakdown-sum == score
    fn boost(&mut self, label: impl Into<String>, delta: u32, reason: impl Into<String>) {
        self.score += delta;
        self.score_breakdown.push(ScoreDelta {
            label: label.into(),
            score: delta,
        });
        self.reasons.push(reason.into());
    }

    fn filename_matched(&self) -> bool {
        self.reasons.iter().any(|r| r.starts_with("filename"))
    }
}

/// Text-or-binary classification used by both ranking and assembly.
///
/// Allow-listed extensions are trusted; everything else gets a bounded
/// byte-prefix sample checked for null bytes. Unreadable counts as binary.
pub fn is_probably_text(path: &Path, rules: &RulesConfig) -> bool {
    let ext = extension_of(path);
    if rules.is_text_extension(&ext) {
        return true;
    }

    let Ok(file) = std::fs::File::open(path) else {
        return false;
    };
    // read_to_end loops until the cap or EOF; the sample window is never short
    let mut sample = Vec::with_capacity(rules.limits.binary_sample_bytes);
    let mut handle = file.take(rules.limits.binary_sample_bytes as u64);
    if handle.read_to_end(&mut sample).is_err() {
        return false;
    }
    !sample.contains(&0)
}

/// Rank all files by relevance to the task.
///
/// Runs the seed pass (lexical + history + structural), builds the import
/// graph from the contents read along the way, then applies the proximity,
/// recency and co-change passes. Returns files sorted by descending score,
/// ties broken by ascending size.
pub fn rank_files(
    root: &Path,
    task: &str,
    entries: &[FileEntry],
    rules: &RulesConfig,
    history: &RepoHistory,
) -> Vec<RankedFile> {
    let tokens = tokenize_task(task);
    let word_matchers: Vec<(String, Regex)> = tokens
        .iter()
        .filter_map(|token| {
            // Tokens are word characters only, safe to embed
            Regex::new(&format!(r"\b{token}\b"))
                .ok()
                .map(|re| (token.clone(), re))
        })
        .collect();

    let mut content_cache: HashMap<PathBuf, String> = HashMap::new();
    let mut seed_files: HashSet<String> = HashSet::new();
    let mut dir_seed_counts: HashMap<String, u32> = HashMap::new();
    let mut ranks: Vec<RankedFile> = Vec::with_capacity(entries.len());

    for entry in entries {
        let rel = relative_path(root, &entry.path);
        let lower_path = rel.to_lowercase();
        let base_name = file_name(&lower_path);
        let mut rank = RankedFile::new(entry, rel.clone());

        for token in &tokens {
            if base_name.contains(token.as_str()) {
                rank.boost(
                    format!("filename:{token}"),
                    rules.weights.filename_match,
                    format!("filename matches '{token}'"),
                );
                seed_files.insert(rel.clone());
            } else if lower_path.contains(token.as_str()) {
                rank.boost(
                    format!("path:{token}"),
                    rules.weights.path_match,
                    format!("path matches '{token}'"),
                );
                seed_files.insert(rel.clone());
            }
        }

        let touch_count = history.touch_count(&rel);
        if touch_count > 0 {
            rank.boost(
                "git-history",
                touch_count.min(rules.weights.git_history_max),
                format!("touched in git history ({touch_count})"),
            );
        }

        if is_probably_text(&entry.path, rules) {
            // Unreadable files just lose the content signal
            if let Ok(content) = std::fs::read_to_string(&entry.path) {
                let lower_content = content.to_lowercase();
                let hits = word_matchers
                    .iter()
                    .filter(|(_, re)| re.is_match(&lower_content))
                    .count() as u32;
                if hits > 0 {
                    rank.boost(
                        "content-match",
                        (hits * rules.weights.content_match_per_token)
                            .min(rules.weights.content_match_max),
                        format!("content matches {hits} task tokens"),
                    );
                    seed_files.insert(rel.clone());
                }
                content_cache.insert(entry.path.clone(), content);
            }
        }

        if rules.structural.entrypoints.iter().any(|p| p == &rel) {
            rank.boost(
                "entrypoint",
                rules.weights.structural_entrypoint,
                "entrypoint file",
            );
        }
        if rules.structural.config_files.iter().any(|p| p == &rel) {
            rank.boost("config", rules.weights.structural_config, "config file");
        }
        if rules.structural.manifests.iter().any(|p| p == &rel) {
            rank.boost(
                "manifest",
                rules.weights.structural_manifest,
                "manifest file",
            );
        }

        if seed_files.contains(&rel) {
            *dir_seed_counts.entry(parent_of(&rel).to_string()).or_insert(0) += 1;
        }

        ranks.push(rank);
    }

    let graph = ImportGraph::build(root, entries, &content_cache, rules);

    for rank in &mut ranks {
        let dir_seeds = dir_seed_counts
            .get(parent_of(&rank.rel_path))
            .copied()
            .unwrap_or(0);
        if dir_seeds > 0 && !rank.filename_matched() {
            rank.boost(
                "dir-proximity",
                dir_seeds.min(rules.weights.dir_proximity_max),
                format!("same directory as {dir_seeds} matched file(s)"),
            );
        }

        if let Some(neighbors) = graph.neighbors(&rank.rel_path) {
            if let Some(linked) = neighbors.iter().find(|n| seed_files.contains(*n)) {
                rank.boost(
                    "dependency-proximity",
                    rules.weights.dependency_proximity,
                    format!("imports/used by matched file ({linked})"),
                );
            }
        }
    }

    if !history.recent_files.is_empty() {
        for rank in &mut ranks {
            if history.is_recent(&rank.rel_path) {
                rank.boost(
                    "git-recent",
                    rules.weights.git_recent_boost,
                    "recently changed",
                );
            }
        }
    }

    if !seed_files.is_empty() {
        let index_by_rel: HashMap<String, usize> = ranks
            .iter()
            .enumerate()
            .map(|(i, rank)| (rank.rel_path.clone(), i))
            .collect();

        for commit in &history.commits {
            if !commit.files.iter().any(|f| seed_files.contains(f)) {
                continue;
            }
            for file in &commit.files {
                if seed_files.contains(file) {
                    continue;
                }
                if let Some(&i) = index_by_rel.get(file) {
                    // Stacks across commits: frequent co-change, bigger boost
                    ranks[i].boost(
                        "co-change",
                        rules.weights.cochange_boost,
                        "changed in same commit as matched file",
                    );
                }
            }
        }
    }

    ranks.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.size_bytes.cmp(&b.size_bytes))
    });
    ranks
}

fn parent_of(rel: &str) -> &str {
    rel.rsplit_once('/').map_or("", |(head, _)| head)
}

fn file_name(rel: &str) -> &str {
    rel.rsplit_once('/').map_or(rel, |(_, tail)| tail)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
