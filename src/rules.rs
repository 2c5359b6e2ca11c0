//! Ranking and packing rules
//!
//! All weights, caps, ignore sets, structural path lists and signature
//! patterns live in one `RulesConfig` value. The built-in defaults cover
//! common repository layouts; `--rules <file>` overrides any subset of
//! sections from a JSON file (missing sections keep their defaults).

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CtxpackError, Result};

/// Token budget parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetRules {
    /// Budget used when the CLI does not pass one
    pub default_tokens: u64,
    /// Characters per estimated token
    pub token_chars_per_token: u64,
    /// A file whose full-tier cost exceeds this is never included at full fidelity
    pub max_file_tokens: u64,
    /// Leading characters kept by the trimmed tier
    pub trim_chars: usize,
    /// Line cap for the signature tier
    pub signature_max_lines: usize,
}

impl Default for BudgetRules {
    fn default() -> Self {
        Self {
            default_tokens: 14_000,
            token_chars_per_token: 4,
            max_file_tokens: 4_000,
            trim_chars: 8_000,
            signature_max_lines: 200,
        }
    }
}

/// Additive score weights; all signals stack
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightRules {
    pub filename_match: u32,
    pub path_match: u32,
    pub content_match_per_token: u32,
    pub content_match_max: u32,
    pub git_history_max: u32,
    pub git_recent_boost: u32,
    pub cochange_boost: u32,
    pub dependency_proximity: u32,
    pub dir_proximity_max: u32,
    pub structural_entrypoint: u32,
    pub structural_config: u32,
    pub structural_manifest: u32,
}

impl Default for WeightRules {
    fn default() -> Self {
        Self {
            filename_match: 6,
            path_match: 3,
            content_match_per_token: 2,
            content_match_max: 12,
            git_history_max: 20,
            git_recent_boost: 8,
            cochange_boost: 4,
            dependency_proximity: 4,
            dir_proximity_max: 3,
            structural_entrypoint: 6,
            structural_config: 5,
            structural_manifest: 5,
        }
    }
}

/// Hard caps that bound work on pathological repositories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LimitRules {
    pub max_commits: usize,
    pub max_files: usize,
    pub recent_commits: usize,
    pub binary_sample_bytes: usize,
}

impl Default for LimitRules {
    fn default() -> Self {
        Self {
            max_commits: 200,
            max_files: 5_000,
            recent_commits: 20,
            binary_sample_bytes: 4_096,
        }
    }
}

/// Non-overridable ignore pattern sets (gitignore syntax, repo-root relative)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IgnoreRules {
    /// Always excluded, even if a local .gitignore negates them
    pub default: Vec<String>,
    /// Excluded unless --include-tests is passed
    pub tests: Vec<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            default: [
                ".git/",
                "node_modules/",
                "dist/",
                "build/",
                "target/",
                "out/",
                "coverage/",
                ".next/",
                ".venv/",
                "venv/",
                "__pycache__/",
                ".cache/",
                ".ctxpack/",
                "*.min.js",
                "*.map",
                "*.lock",
                "package-lock.json",
                "yarn.lock",
                "pnpm-lock.yaml",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            tests: [
                "**/*.test.*",
                "**/*.spec.*",
                "**/*_test.go",
                "**/*_test.py",
                "**/test_*.py",
                "tests/",
                "test/",
                "__tests__/",
                "spec/",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

/// Exact repo-relative paths that carry a structural role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuralRules {
    pub entrypoints: Vec<String>,
    pub config_files: Vec<String>,
    pub manifests: Vec<String>,
}

impl Default for StructuralRules {
    fn default() -> Self {
        Self {
            entrypoints: [
                "src/index.ts",
                "src/index.js",
                "src/main.ts",
                "src/main.rs",
                "src/lib.rs",
                "src/app.ts",
                "main.go",
                "cmd/main.go",
                "main.py",
                "app.py",
                "index.js",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            config_files: [
                "tsconfig.json",
                ".eslintrc.json",
                "vite.config.ts",
                "webpack.config.js",
                "Makefile",
                "Dockerfile",
                "docker-compose.yml",
                ".env.example",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            manifests: [
                "package.json",
                "Cargo.toml",
                "go.mod",
                "pyproject.toml",
                "setup.py",
                "pom.xml",
                "build.gradle",
                "Gemfile",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

/// Which extensions are parsed for import statements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyRules {
    pub extensions: Vec<String>,
}

impl Default for DependencyRules {
    fn default() -> Self {
        Self {
            extensions: [
                ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".py", ".go", ".rs", ".java", ".kt",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

/// Text detection and signature extraction rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileRules {
    /// Extensions trusted to be text without sampling bytes
    pub text_extensions: Vec<String>,
    /// Per-language-group declaration-line patterns for the signature tier
    pub signature_patterns: HashMap<String, Vec<String>>,
}

impl Default for FileRules {
    fn default() -> Self {
        let text_extensions = [
            ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json", ".md", ".txt", ".yml", ".yaml",
            ".toml", ".py", ".go", ".rs", ".java", ".kt", ".c", ".h", ".cpp", ".hpp", ".html",
            ".css", ".scss", ".sql", ".sh", ".rb", ".php", ".swift", ".xml", ".ini", ".cfg",
            ".env", ".gitignore", ".editorconfig",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();

        let mut signature_patterns = HashMap::new();
        signature_patterns.insert(
            "ts".to_string(),
            vec![
                r"^\s*(export\s+)?(async\s+)?function\s+\w+".to_string(),
                r"^\s*(export\s+)?(abstract\s+)?class\s+\w+".to_string(),
                r"^\s*(export\s+)?interface\s+\w+".to_string(),
                r"^\s*(export\s+)?type\s+\w+\s*=".to_string(),
                r"^\s*(export\s+)?(const|let)\s+\w+\s*=\s*(async\s*)?\(".to_string(),
                r"^\s*(export\s+)?enum\s+\w+".to_string(),
            ],
        );
        signature_patterns.insert(
            "py".to_string(),
            vec![
                r"^\s*def\s+\w+".to_string(),
                r"^\s*async\s+def\s+\w+".to_string(),
                r"^\s*class\s+\w+".to_string(),
            ],
        );
        signature_patterns.insert(
            "go".to_string(),
            vec![
                r"^\s*func\s+".to_string(),
                r"^\s*type\s+\w+\s+(struct|interface)".to_string(),
                r"^\s*var\s+\w+".to_string(),
                r"^\s*const\s+".to_string(),
            ],
        );
        signature_patterns.insert(
            "rs".to_string(),
            vec![
                r"^\s*(pub\s+)?(async\s+)?fn\s+\w+".to_string(),
                r"^\s*(pub\s+)?struct\s+\w+".to_string(),
                r"^\s*(pub\s+)?enum\s+\w+".to_string(),
                r"^\s*(pub\s+)?trait\s+\w+".to_string(),
                r"^\s*impl\b".to_string(),
                r"^\s*(pub\s+)?mod\s+\w+".to_string(),
            ],
        );
        signature_patterns.insert(
            "java".to_string(),
            vec![
                r"^\s*(public|protected|private)?\s*(static\s+)?(final\s+)?(class|interface|enum)\s+\w+".to_string(),
                r"^\s*(public|protected|private)\s+[\w<>\[\]]+\s+\w+\s*\(".to_string(),
            ],
        );
        signature_patterns.insert(
            "kt".to_string(),
            vec![
                r"^\s*(class|interface|object|enum class)\s+\w+".to_string(),
                r"^\s*(suspend\s+)?fun\s+\w+".to_string(),
                r"^\s*(val|var)\s+\w+".to_string(),
            ],
        );

        Self {
            text_extensions,
            signature_patterns,
        }
    }
}

/// Full rules configuration handed to the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfig {
    pub budget: BudgetRules,
    pub weights: WeightRules,
    pub limits: LimitRules,
    pub ignore: IgnoreRules,
    pub structural: StructuralRules,
    pub dependency: DependencyRules,
    pub files: FileRules,
}

impl RulesConfig {
    /// True if the extension (lower-cased, with leading dot) is on the text allow-list
    pub fn is_text_extension(&self, ext: &str) -> bool {
        self.files.text_extensions.iter().any(|e| e == ext)
    }

    /// True if the extension is parsed for import statements
    pub fn is_dependency_extension(&self, ext: &str) -> bool {
        self.dependency.extensions.iter().any(|e| e == ext)
    }
}

/// Load rules from an optional JSON file, falling back to built-in defaults
pub fn load_rules(rules_path: Option<&Path>) -> Result<RulesConfig> {
    let Some(path) = rules_path else {
        return Ok(RulesConfig::default());
    };

    if !path.exists() {
        return Err(CtxpackError::RulesNotFound {
            path: path.display().to_string(),
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|e| CtxpackError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|e| CtxpackError::RulesParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
