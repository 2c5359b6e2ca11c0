//! Signature-tier content extraction
//!
//! Keeps only lines that look like declarations, per language group, capped
//! at `budget.signatureMaxLines`. With no configured patterns, or when
//! nothing matches, falls back to the leading lines of the file.

use std::path::Path;

use regex::Regex;

use crate::rules::RulesConfig;

/// Map an extension onto a signature-pattern group key
fn pattern_group(ext: &str) -> &'static str {
    match ext {
        ".ts" | ".tsx" | ".js" | ".jsx" | ".mjs" | ".cjs" => "ts",
        ".py" => "py",
        ".go" => "go",
        ".rs" => "rs",
        ".java" => "java",
        ".kt" => "kt",
        _ => "default",
    }
}

/// Extract the declaration skeleton of a file
pub fn extract_signature(path: &Path, content: &str, rules: &RulesConfig) -> String {
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    let group = pattern_group(&ext);

    let patterns: Vec<Regex> = rules
        .files
        .signature_patterns
        .get(group)
        .map(|raw| raw.iter().filter_map(|p| Regex::new(p).ok()).collect())
        .unwrap_or_default();

    let max_lines = rules.budget.signature_max_lines;
    let mut picked = Vec::new();
    for line in content.lines() {
        if patterns.is_empty() || patterns.iter().any(|p| p.is_match(line)) {
            picked.push(line.trim());
        }
        if picked.len() >= max_lines {
            break;
        }
    }

    if picked.is_empty() {
        return content.lines().take(max_lines).collect::<Vec<_>>().join("\n");
    }

    picked.join("\n")
}
