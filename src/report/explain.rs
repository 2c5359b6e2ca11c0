//! Explain report
//!
//! Regenerated from the bundle JSON rather than the in-memory result, so
//! `ctxpack explain` can re-narrate any previously written bundle.

use std::path::{Path, PathBuf};

use crate::error::{CtxpackError, Result};
use crate::report::json::read_bundle_json;

/// `explain.md` sibling of a bundle JSON path
pub fn default_explain_path(bundle_json_path: &Path) -> PathBuf {
    bundle_json_path
        .parent()
        .map_or_else(|| PathBuf::from("explain.md"), |dir| dir.join("explain.md"))
}

/// Render the per-file explanation Markdown from a bundle JSON file
pub fn write_explain_markdown(bundle_path: &Path, out_path: &Path) -> Result<()> {
    let bundle = read_bundle_json(bundle_path)?;
    let total_included = bundle.files.len();
    let total_skipped = bundle.files_skipped;

    let mut lines: Vec<String> = Vec::new();
    lines.push("# ctxpack explain".to_string());
    lines.push(String::new());
    lines.push(format!("Task: {}", bundle.task));
    lines.push(format!("Budget: {}", bundle.budget));
    lines.push(format!("Estimated tokens: {}", bundle.estimated_tokens));
    lines.push(format!("Files included: {}", bundle.files_included));
    lines.push(format!("Files skipped: {total_skipped}"));
    lines.push(String::new());

    lines.push("## File explanations".to_string());
    for (index, file) in bundle.files.iter().enumerate() {
        lines.push(format!("### {}. {}", index + 1, file.path));
        lines.push(format!("Score: {}", file.score));
        lines.push(format!("Mode: {}", file.mode));
        if file.reasons.is_empty() {
            lines.push("Reasons: selected by ranking".to_string());
        } else {
            lines.push("Reasons:".to_string());
            for reason in &file.reasons {
                lines.push(format!("- {reason}"));
            }
        }
        if !file.score_breakdown.is_empty() {
            lines.push("Score breakdown:".to_string());
            for delta in &file.score_breakdown {
                lines.push(format!("- {}: +{}", delta.label, delta.score));
            }
        }
        let ranked_above = total_included - index - 1;
        lines.push(format!(
            "Ranked above {ranked_above} included files due to higher score order."
        ));
        lines.push(format!(
            "Selected before {total_skipped} skipped files because budget would have been exceeded."
        ));
        let heuristics = if file.reasons.is_empty() {
            "ranking only".to_string()
        } else {
            file.reasons.join(", ")
        };
        lines.push(format!("Heuristics triggered: {heuristics}"));
        lines.push(String::new());
    }

    std::fs::write(out_path, lines.join("\n")).map_err(|e| CtxpackError::FileWriteFailed {
        path: out_path.display().to_string(),
        reason: e.to_string(),
    })
}
