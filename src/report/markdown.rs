//! Markdown bundle artifact
//!
//! Header stats, an index of included files, then one fenced section per
//! file with its path, reason line and mode.

use std::path::Path;

use crate::bundle::BundleResult;
use crate::error::{CtxpackError, Result};

/// Fence language tag by extension
fn guess_language(rel_path: &str) -> &'static str {
    let ext = rel_path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "ts" => "ts",
        "tsx" => "tsx",
        "js" | "mjs" | "cjs" => "js",
        "jsx" => "jsx",
        "json" => "json",
        "md" => "md",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "py" => "py",
        "go" => "go",
        "rs" => "rs",
        "java" => "java",
        "kt" => "kt",
        "c" | "h" => "c",
        "cpp" | "hpp" => "cpp",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "sql" => "sql",
        "sh" => "bash",
        "rb" => "rb",
        "php" => "php",
        "swift" => "swift",
        _ => "text",
    }
}

fn reason_line(reasons: &[String]) -> String {
    if reasons.is_empty() {
        "selected by ranking".to_string()
    } else {
        reasons.join("; ")
    }
}

/// Write the bundle as Markdown
pub fn write_bundle_markdown(bundle: &BundleResult, out_path: &Path) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();
    lines.push("# ctxpack bundle".to_string());
    lines.push(String::new());
    lines.push(format!("Task: {}", bundle.task));
    lines.push(format!("Budget: {}", bundle.budget));
    lines.push(format!("Estimated tokens: {}", bundle.estimated_tokens));
    lines.push(format!("Files included: {}", bundle.files.len()));
    lines.push(format!("Files skipped: {}", bundle.skipped_files));
    lines.push(String::new());

    lines.push("## Index".to_string());
    for file in &bundle.files {
        lines.push(format!(
            "- {} ({} tokens, {}) - {}",
            file.path,
            file.estimated_tokens,
            file.mode,
            reason_line(&file.reasons)
        ));
    }
    lines.push(String::new());

    for file in &bundle.files {
        lines.push(format!("## {}", file.path));
        lines.push(format!("Reason: {}", reason_line(&file.reasons)));
        lines.push(format!("Mode: {}", file.mode));
        lines.push(format!("```{}", guess_language(&file.path)));
        lines.push(file.content.clone());
        lines.push("```".to_string());
        lines.push(String::new());
    }

    std::fs::write(out_path, lines.join("\n")).map_err(|e| CtxpackError::FileWriteFailed {
        path: out_path.display().to_string(),
        reason: e.to_string(),
    })
}
