//! Budget-constrained bundle assembly
//!
//! Single-pass greedy packing over the ranked list: for each file pick the
//! highest fidelity tier (full, trimmed, signature) whose cost still fits
//! the remaining budget, or skip it. Deliberately not an optimal knapsack;
//! rank priority keeps the outcome explainable.

pub mod signature;

use serde::{Deserialize, Serialize};

use crate::ranker::{RankedFile, ScoreDelta, is_probably_text};
use crate::rules::RulesConfig;
use crate::tokens::estimate_tokens;
use signature::extract_signature;

/// Fidelity tier chosen for an included file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleMode {
    Full,
    Trimmed,
    Signature,
}

impl std::fmt::Display for BundleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Trimmed => write!(f, "trimmed"),
            Self::Signature => write!(f, "signature"),
        }
    }
}

/// One file included in the bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleFile {
    /// Repo-relative path
    pub path: String,
    pub score: u32,
    pub reasons: Vec<String>,
    pub score_breakdown: Vec<ScoreDelta>,
    pub estimated_tokens: u64,
    pub size_bytes: u64,
    pub mode: BundleMode,
    pub content: String,
}

/// Terminal artifact of the selection pipeline
#[derive(Debug, Clone)]
pub struct BundleResult {
    pub task: String,
    pub budget: u64,
    pub files: Vec<BundleFile>,
    pub estimated_tokens: u64,
    pub skipped_files: u32,
}

/// Markdown overhead a file section costs beyond its content: header line,
/// reason annotation and fence markup.
fn section_overhead(rel_path: &str, reasons: &[String], rules: &RulesConfig) -> u64 {
    let reason_text = if reasons.is_empty() {
        "selected by ranking".to_string()
    } else {
        reasons.join("; ")
    };
    let header = format!("## {rel_path}\nReason: {reason_text}\n");
    let fence = "```\n\n```\n";
    estimate_tokens(&format!("{header}{fence}"), rules)
}

/// Pack ranked files into a token budget.
///
/// Files are consumed in rank order until the running total reaches the
/// budget; binary or unreadable files and files whose cheapest tier does
/// not fit are counted as skipped.
pub fn build_bundle(
    task: &str,
    ranked: &[RankedFile],
    budget: u64,
    rules: &RulesConfig,
) -> BundleResult {
    let mut files = Vec::new();
    let mut total_tokens: u64 = 0;
    let mut skipped: u32 = 0;

    for file in ranked {
        if !is_probably_text(&file.path, rules) {
            skipped += 1;
            continue;
        }

        let content = match std::fs::read_to_string(&file.path) {
            Ok(content) => content,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        let overhead = section_overhead(&file.rel_path, &file.reasons, rules);

        let full_tokens = estimate_tokens(&content, rules) + overhead;
        let trimmed_content: String = content.chars().take(rules.budget.trim_chars).collect();
        let trimmed_tokens = estimate_tokens(&trimmed_content, rules) + overhead;
        let signature_content = extract_signature(&file.path, &content, rules);
        let signature_tokens = estimate_tokens(&signature_content, rules) + overhead;

        let remaining = budget.saturating_sub(total_tokens);
        let selected = if full_tokens <= remaining && full_tokens <= rules.budget.max_file_tokens {
            Some((BundleMode::Full, content, full_tokens))
        } else if trimmed_tokens <= remaining {
            Some((BundleMode::Trimmed, trimmed_content, trimmed_tokens))
        } else if signature_tokens <= remaining {
            Some((BundleMode::Signature, signature_content, signature_tokens))
        } else {
            None
        };

        let Some((mode, selected_content, selected_tokens)) = selected else {
            skipped += 1;
            continue;
        };

        files.push(BundleFile {
            path: file.rel_path.clone(),
            score: file.score,
            reasons: file.reasons.clone(),
            score_breakdown: file.score_breakdown.clone(),
            estimated_tokens: selected_tokens,
            size_bytes: file.size_bytes,
            mode,
            content: selected_content,
        });

        total_tokens += selected_tokens;
        if total_tokens >= budget {
            break;
        }
    }

    BundleResult {
        task: task.to_string(),
        budget,
        files,
        estimated_tokens: total_tokens,
        skipped_files: skipped,
    }
}
