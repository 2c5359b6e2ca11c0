//! Per-language import statement recognition
//!
//! Pattern-based, not a parser. Each language family gets a fixed regex set
//! over comment-stripped content; anything the patterns miss is simply not
//! an edge. The `Language` enum is the single dispatch point for both
//! parsing and (in `resolve`) specifier resolution.

use std::sync::LazyLock;

use regex::Regex;

/// Closed set of language families the resolver understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Relative-path imports probed on disk (.ts/.tsx/.js/.jsx/.mjs/.cjs)
    JavaScript,
    /// Dotted module paths resolved through an index (.py)
    Python,
    /// Relative-path imports probed on disk; package imports unresolved (.go)
    Go,
    /// Module paths with explicit roots (crate::/super::/self::) (.rs)
    Rust,
    /// Parsed but never resolved to files (.java/.kt)
    Jvm,
}

impl Language {
    /// Classify by lower-cased extension with leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".ts" | ".tsx" | ".js" | ".jsx" | ".mjs" | ".cjs" => Some(Self::JavaScript),
            ".py" => Some(Self::Python),
            ".go" => Some(Self::Go),
            ".rs" => Some(Self::Rust),
            ".java" | ".kt" => Some(Self::Jvm),
            _ => None,
        }
    }

    /// Extract import specifiers from file content
    pub fn parse_imports(self, content: &str) -> Vec<String> {
        let cleaned = self.strip_comments(content);
        match self {
            Self::JavaScript => collect_captures(&JS_PATTERNS, &cleaned),
            Self::Python => collect_captures(&PY_PATTERNS, &cleaned),
            Self::Go => parse_go_imports(&cleaned),
            Self::Rust => parse_rust_imports(&cleaned),
            Self::Jvm => collect_captures(&JVM_PATTERNS, &cleaned),
        }
    }

    /// Best-effort comment removal to cut false-positive matches
    fn strip_comments(self, content: &str) -> String {
        match self {
            Self::Python => PY_COMMENT.replace_all(content, "").into_owned(),
            Self::Go | Self::Rust | Self::Jvm => {
                let no_blocks = BLOCK_COMMENT.replace_all(content, "");
                LINE_COMMENT.replace_all(&no_blocks, "").into_owned()
            }
            // JS template literals make line-based stripping too lossy
            Self::JavaScript => content.to_string(),
        }
    }
}

static JS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"import\s+[^"']*?["']([^"']+)["']"#).expect("static regex"),
        Regex::new(r#"export\s+[^"']*?["']([^"']+)["']"#).expect("static regex"),
        Regex::new(r#"require\(\s*["']([^"']+)["']\s*\)"#).expect("static regex"),
        Regex::new(r#"import\(\s*["']([^"']+)["']\s*\)"#).expect("static regex"),
    ]
});

static PY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"from\s+([.\w]+)\s+import\s+").expect("static regex"),
        Regex::new(r"import\s+([a-zA-Z0-9_.]+)").expect("static regex"),
    ]
});

static JVM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![Regex::new(r"import\s+([a-zA-Z0-9_.]+)\s*;").expect("static regex")]
});

static GO_IMPORT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\s+(?:\([\s\S]*?\)|"[^"]+")"#).expect("static regex"));
static GO_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("static regex"));

static RUST_USE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"use\s+([a-zA-Z0-9_:.]+)\s*;").expect("static regex"));
static RUST_MOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"mod\s+([a-zA-Z0-9_]+)\s*;").expect("static regex"));

static PY_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)#.*$").expect("static regex"));
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").expect("static regex"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("static regex"));

fn collect_captures(patterns: &[Regex], content: &str) -> Vec<String> {
    let mut imports = Vec::new();
    for pattern in patterns {
        for capture in pattern.captures_iter(content) {
            if let Some(m) = capture.get(1) {
                imports.push(m.as_str().to_string());
            }
        }
    }
    imports
}

fn parse_go_imports(content: &str) -> Vec<String> {
    let mut imports = Vec::new();
    for block in GO_IMPORT_BLOCK.find_iter(content) {
        for quoted in GO_QUOTED.captures_iter(block.as_str()) {
            if let Some(m) = quoted.get(1) {
                imports.push(m.as_str().to_string());
            }
        }
    }
    imports
}

fn parse_rust_imports(content: &str) -> Vec<String> {
    let mut imports = collect_captures(std::slice::from_ref(&RUST_USE), content);
    for capture in RUST_MOD.captures_iter(content) {
        if let Some(m) = capture.get(1) {
            imports.push(format!("self::{}", m.as_str()));
        }
    }
    imports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_classification() {
        assert_eq!(Language::from_extension(".tsx"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension(".py"), Some(Language::Python));
        assert_eq!(Language::from_extension(".rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension(".kt"), Some(Language::Jvm));
        assert_eq!(Language::from_extension(".md"), None);
    }

    #[test]
    fn test_js_import_forms() {
        let content = r#"
            import { a } from "./a";
            import b from './b';
            export { c } from "./c";
            const d = require("./d");
            const e = await import("./e");
        "#;
        let imports = Language::JavaScript.parse_imports(content);
        assert!(imports.contains(&"./a".to_string()));
        assert!(imports.contains(&"./b".to_string()));
        assert!(imports.contains(&"./c".to_string()));
        assert!(imports.contains(&"./d".to_string()));
        assert!(imports.contains(&"./e".to_string()));
    }

    #[test]
    fn test_python_import_forms() {
        let content = "from pkg.sub import thing\nimport os.path\nfrom . import sibling\n";
        let imports = Language::Python.parse_imports(content);
        assert!(imports.contains(&"pkg.sub".to_string()));
        assert!(imports.contains(&"os.path".to_string()));
        assert!(imports.contains(&".".to_string()));
    }

    #[test]
    fn test_python_comment_stripped() {
        let content = "# import fake.module\nimport real.module\n";
        let imports = Language::Python.parse_imports(content);
        assert!(!imports.contains(&"fake.module".to_string()));
        assert!(imports.contains(&"real.module".to_string()));
    }

    #[test]
    fn test_go_import_block() {
        let content = "import (\n\t\"fmt\"\n\t\"example.com/pkg/util\"\n)\nimport \"os\"\n";
        let imports = Language::Go.parse_imports(content);
        assert!(imports.contains(&"fmt".to_string()));
        assert!(imports.contains(&"example.com/pkg/util".to_string()));
        assert!(imports.contains(&"os".to_string()));
    }

    #[test]
    fn test_rust_use_and_mod() {
        let content = "use crate::scanner::FileEntry;\nmod helpers;\n// use crate::not_this;\n";
        let imports = Language::Rust.parse_imports(content);
        assert!(imports.contains(&"crate::scanner::FileEntry".to_string()));
        assert!(imports.contains(&"self::helpers".to_string()));
        assert!(!imports.iter().any(|i| i.contains("not_this")));
    }

    #[test]
    fn test_jvm_imports() {
        let content = "import java.util.List;\nimport com.example.app.Service;\n";
        let imports = Language::Jvm.parse_imports(content);
        assert!(imports.contains(&"java.util.List".to_string()));
        assert!(imports.contains(&"com.example.app.Service".to_string()));
    }

    #[test]
    fn test_block_comment_stripped_for_rust() {
        let content = "/* use crate::hidden; */\nuse crate::visible;\n";
        let imports = Language::Rust.parse_imports(content);
        assert!(!imports.iter().any(|i| i.contains("hidden")));
        assert!(imports.contains(&"crate::visible".to_string()));
    }
}
