//! Layered gitignore pattern handling
//!
//! Local `.gitignore` lines are converted to repo-root-relative patterns so a
//! single matcher per directory can hold the inherited chain. Conversion
//! rules: blank and `#` comment lines are dropped, `\#` and `\!` escapes are
//! honored, `!` negation survives conversion, `/`-anchored patterns are
//! rebased onto the loading directory, and bare names become `**/name`.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{CtxpackError, Result};

/// Convert one gitignore line from `base_rel` (repo-relative directory, ""
/// for the root, forward slashes) into a root-relative pattern.
pub fn to_root_relative_pattern(pattern: &str, base_rel: &str) -> Option<String> {
    if pattern.is_empty() || pattern == "/" {
        return None;
    }

    if let Some(rest) = pattern.strip_prefix("\\#") {
        // escaped leading '#': literal name, not a comment
        return finish_pattern(&format!("#{rest}"), base_rel, false);
    }
    if pattern.starts_with('#') {
        return None;
    }

    if let Some(rest) = pattern.strip_prefix("\\!") {
        // escaped leading '!': literal name, not a negation
        return finish_pattern(&format!("!{rest}"), base_rel, false);
    }
    if let Some(rest) = pattern.strip_prefix('!') {
        return finish_pattern(rest, base_rel, true);
    }

    finish_pattern(pattern, base_rel, false)
}

fn finish_pattern(raw: &str, base_rel: &str, negated: bool) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let prefix = if base_rel.is_empty() {
        String::new()
    } else {
        format!("{base_rel}/")
    };

    let normalized = if let Some(anchored) = raw.strip_prefix('/') {
        format!("{prefix}{anchored}")
    } else if raw.contains('/') {
        format!("{prefix}{raw}")
    } else {
        format!("{prefix}**/{raw}")
    };

    if negated {
        Some(format!("!{normalized}"))
    } else {
        Some(normalized)
    }
}

/// A matcher over a fixed list of root-relative gitignore patterns
pub struct IgnoreSet {
    matcher: Gitignore,
}

impl IgnoreSet {
    /// Build a matcher from configured patterns; invalid patterns are fatal
    pub fn from_rules(root: &Path, patterns: &[String]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder.add_line(None, pattern).map_err(|e| {
                CtxpackError::InvalidIgnorePattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        let matcher = builder
            .build()
            .map_err(|e| CtxpackError::InvalidIgnorePattern {
                pattern: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { matcher })
    }

    /// Build a matcher from converted .gitignore lines; bad lines are dropped
    pub fn from_local(root: &Path, patterns: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            // A malformed glob in a user's .gitignore is not our error to raise
            let _ = builder.add_line(None, pattern);
        }
        let matcher = builder.build().unwrap_or_else(|_| Gitignore::empty());
        Self { matcher }
    }

    /// Empty matcher that ignores nothing
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
        }
    }

    /// Whether `rel` (or one of its ancestors) hits an ignore pattern,
    /// after negations are applied
    pub fn is_ignored(&self, rel: &str, is_dir: bool) -> bool {
        self.matcher
            .matched_path_or_any_parents(rel, is_dir)
            .is_ignore()
    }
}

/// Whether an excluded directory must still be traversed because a negation
/// pattern re-includes a descendant of it.
pub fn has_negated_descendant(rel_dir: &str, patterns: &[String]) -> bool {
    let with_slash = if rel_dir.ends_with('/') {
        rel_dir.to_string()
    } else {
        format!("{rel_dir}/")
    };
    patterns.iter().any(|pattern| {
        pattern
            .strip_prefix('!')
            .is_some_and(|target| target.starts_with(&with_slash) || target.starts_with(rel_dir))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_and_blank_lines_dropped() {
        assert_eq!(to_root_relative_pattern("", "src"), None);
        assert_eq!(to_root_relative_pattern("# build junk", "src"), None);
        assert_eq!(to_root_relative_pattern("/", ""), None);
    }

    #[test]
    fn test_bare_name_becomes_recursive() {
        assert_eq!(
            to_root_relative_pattern("*.log", "src"),
            Some("src/**/*.log".to_string())
        );
        assert_eq!(
            to_root_relative_pattern("*.log", ""),
            Some("**/*.log".to_string())
        );
    }

    #[test]
    fn test_anchored_pattern_rebased() {
        assert_eq!(
            to_root_relative_pattern("/dist", "pkg"),
            Some("pkg/dist".to_string())
        );
    }

    #[test]
    fn test_slash_pattern_kept_relative_to_dir() {
        assert_eq!(
            to_root_relative_pattern("gen/out.txt", "pkg"),
            Some("pkg/gen/out.txt".to_string())
        );
    }

    #[test]
    fn test_negation_survives() {
        assert_eq!(
            to_root_relative_pattern("!keep.log", "src/logs"),
            Some("!src/logs/**/keep.log".to_string())
        );
    }

    #[test]
    fn test_ignore_set_matches_converted_patterns() {
        let set = IgnoreSet::from_local(
            Path::new("/repo"),
            &["src/**/*.log".to_string(), "!src/logs/**/keep.log".to_string()],
        );
        assert!(set.is_ignored("src/logs/debug.log", false));
        assert!(!set.is_ignored("src/logs/keep.log", false));
        assert!(!set.is_ignored("other/debug.log", false));
    }

    #[test]
    fn test_ignore_set_matches_parent_directory() {
        let set = IgnoreSet::from_local(Path::new("/repo"), &["**/node_modules/".to_string()]);
        assert!(set.is_ignored("a/node_modules/pkg/index.js", false));
    }

    #[test]
    fn test_from_rules_rejects_bad_glob() {
        let result = IgnoreSet::from_rules(Path::new("/repo"), &["{broken".to_string()]);
        assert!(matches!(
            result,
            Err(CtxpackError::InvalidIgnorePattern { .. })
        ));
    }

    #[test]
    fn test_negated_descendant_detection() {
        let patterns = vec!["logs/".to_string(), "!logs/audit/keep.log".to_string()];
        assert!(has_negated_descendant("logs", &patterns));
        assert!(!has_negated_descendant("src", &patterns));
    }
}
