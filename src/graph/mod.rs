//! Cross-language import graph
//!
//! A symmetric adjacency relation between repo-relative paths, built once
//! per run from the files whose extension is in the dependency set. Sorted
//! containers keep neighbor iteration deterministic.

pub mod lang;
pub mod resolve;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::rules::RulesConfig;
use crate::scanner::{FileEntry, relative_path};
use lang::Language;
use resolve::{ModuleIndex, ResolveContext, resolve_import};

/// Symmetric import adjacency keyed by repo-relative path
#[derive(Debug, Default)]
pub struct ImportGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl ImportGraph {
    /// Build the graph from already-read file contents.
    ///
    /// Files absent from `content_cache` (binary, unreadable) contribute no
    /// edges; unresolvable specifiers are dropped.
    pub fn build(
        root: &Path,
        entries: &[FileEntry],
        content_cache: &HashMap<PathBuf, String>,
        rules: &RulesConfig,
    ) -> Self {
        let files: Vec<PathBuf> = entries.iter().map(|e| e.path.clone()).collect();
        let python = ModuleIndex::python(root, &files);
        let rust = ModuleIndex::rust(root, &files);
        let ctx = ResolveContext {
            root,
            python: &python,
            rust: &rust,
        };

        let mut graph = Self::default();
        for entry in entries {
            let ext = extension_of(&entry.path);
            if !rules.is_dependency_extension(&ext) {
                continue;
            }
            let Some(language) = Language::from_extension(&ext) else {
                continue;
            };
            let Some(content) = content_cache.get(&entry.path) else {
                continue;
            };

            let rel = relative_path(root, &entry.path);
            for spec in language.parse_imports(content) {
                if let Some(resolved) = resolve_import(&entry.path, &spec, &ctx) {
                    graph.add_edge(&rel, &resolved);
                }
            }
        }
        graph
    }

    fn add_edge(&mut self, a: &str, b: &str) {
        self.edges
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.edges
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    /// Neighbors of a repo-relative path, in sorted order
    pub fn neighbors(&self, rel_path: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(rel_path)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
