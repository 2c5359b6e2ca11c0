//! Heuristic import specifier resolution
//!
//! Relative-path languages probe the filesystem with a fixed candidate list;
//! module-path languages go through a forward index built once from the file
//! list. Anything that does not resolve is dropped without error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::lang::Language;

const JS_PROBE_EXTS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".json"];

/// Dotted-module-path to representative-file index for one language
#[derive(Debug, Default)]
pub struct ModuleIndex {
    by_module: HashMap<String, String>,
}

impl ModuleIndex {
    /// Python: `pkg/__init__.py` indexes `pkg`; `pkg/mod.py` indexes `pkg.mod`.
    /// First occurrence wins on collision.
    pub fn python(root: &Path, files: &[PathBuf]) -> Self {
        let mut index = Self::default();
        for file in files {
            let Some(rel) = rel_forward(root, file) else {
                continue;
            };
            if !rel.ends_with(".py") {
                continue;
            }
            let module = if file_name(&rel) == "__init__.py" {
                dotted(parent_of(&rel))
            } else {
                dotted(rel.trim_end_matches(".py"))
            };
            index.insert_first(module, rel);
        }
        index
    }

    /// Rust: `mod.rs`/`lib.rs`/`main.rs` index their containing directory;
    /// other files index their own path.
    pub fn rust(root: &Path, files: &[PathBuf]) -> Self {
        let mut index = Self::default();
        for file in files {
            let Some(rel) = rel_forward(root, file) else {
                continue;
            };
            if !rel.ends_with(".rs") {
                continue;
            }
            let base = file_name(&rel);
            let module = if base == "mod.rs" || base == "lib.rs" || base == "main.rs" {
                dotted(parent_of(&rel))
            } else {
                dotted(rel.trim_end_matches(".rs"))
            };
            index.insert_first(module, rel);
        }
        index
    }

    fn insert_first(&mut self, module: String, rel: String) {
        if !module.is_empty() {
            self.by_module.entry(module).or_insert(rel);
        }
    }

    pub fn get(&self, module: &str) -> Option<&str> {
        self.by_module.get(module).map(String::as_str)
    }
}

/// Indexes shared across all resolutions in one run
pub struct ResolveContext<'a> {
    pub root: &'a Path,
    pub python: &'a ModuleIndex,
    pub rust: &'a ModuleIndex,
}

/// Resolve one specifier from `from_file` to a repo-relative path, if the
/// target lives in the repository. Returns `None` for external modules,
/// unresolvable specifiers, and languages that never resolve.
pub fn resolve_import(from_file: &Path, spec: &str, ctx: &ResolveContext) -> Option<String> {
    let ext = extension_of(from_file);
    let language = Language::from_extension(&ext)?;
    match language {
        Language::JavaScript => resolve_relative(from_file, spec, ctx.root, |candidate| {
            let mut candidates = vec![candidate.clone()];
            if extension_of(&candidate).is_empty() {
                for probe in JS_PROBE_EXTS {
                    let mut with_ext = candidate.as_os_str().to_os_string();
                    with_ext.push(probe);
                    candidates.push(PathBuf::from(with_ext));
                }
                for probe in JS_PROBE_EXTS {
                    candidates.push(candidate.join(format!("index{probe}")));
                }
            }
            candidates
        }),
        Language::Go => resolve_relative(from_file, spec, ctx.root, |candidate| {
            let mut with_ext = candidate.as_os_str().to_os_string();
            with_ext.push(".go");
            vec![
                candidate.clone(),
                PathBuf::from(with_ext),
                candidate.join("main.go"),
            ]
        }),
        Language::Python => resolve_python(from_file, spec, ctx),
        Language::Rust => resolve_rust(from_file, spec, ctx),
        Language::Jvm => None,
    }
}

/// Probe fixed on-disk candidates for a `./`-style specifier
fn resolve_relative<F>(from_file: &Path, spec: &str, root: &Path, candidates: F) -> Option<String>
where
    F: Fn(PathBuf) -> Vec<PathBuf>,
{
    if !spec.starts_with('.') {
        return None;
    }
    let base_dir = from_file.parent()?;
    let candidate = base_dir.join(spec);

    for probe in candidates(candidate) {
        if probe.exists() && probe.is_file() {
            let canonical = dunce::canonicalize(&probe).ok()?;
            return rel_forward(root, &canonical);
        }
    }
    None
}

fn resolve_python(from_file: &Path, spec: &str, ctx: &ResolveContext) -> Option<String> {
    if let Some(remainder) = spec.strip_prefix('.') {
        // Leading-dot relative import: each extra dot walks one level up
        let dot_count = 1 + remainder.chars().take_while(|c| *c == '.').count();
        let remainder = remainder.trim_start_matches('.');

        let rel_from = rel_forward(ctx.root, from_file)?;
        let mut parts: Vec<&str> = parent_of(&rel_from)
            .split('/')
            .filter(|p| !p.is_empty())
            .collect();
        parts.truncate(parts.len().saturating_sub(dot_count - 1));
        let base = parts.join(".");

        let module = join_dotted(&base, remainder);
        return ctx.python.get(&module).map(str::to_string);
    }
    ctx.python.get(spec).map(str::to_string)
}

fn resolve_rust(from_file: &Path, spec: &str, ctx: &ResolveContext) -> Option<String> {
    let rel_from = rel_forward(ctx.root, from_file)?;
    let base = file_name(&rel_from);
    let from_module = if base == "mod.rs" || base == "lib.rs" || base == "main.rs" {
        dotted(parent_of(&rel_from))
    } else {
        dotted(rel_from.trim_end_matches(".rs"))
    };

    if let Some(remainder) = spec.strip_prefix("crate::") {
        let module = remainder.replace("::", ".");
        return ctx.rust.get(&module).map(str::to_string);
    }
    if let Some(remainder) = spec.strip_prefix("super::") {
        let parent = match from_module.rsplit_once('.') {
            Some((head, _)) => head.to_string(),
            None => String::new(),
        };
        let module = join_dotted(&parent, &remainder.replace("::", "."));
        return ctx.rust.get(&module).map(str::to_string);
    }
    if let Some(remainder) = spec.strip_prefix("self::") {
        let module = join_dotted(&from_module, &remainder.replace("::", "."));
        return ctx.rust.get(&module).map(str::to_string);
    }
    None
}

fn join_dotted(base: &str, remainder: &str) -> String {
    if remainder.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        remainder.to_string()
    } else {
        format!("{base}.{remainder}")
    }
}

fn rel_forward(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

fn dotted(path: &str) -> String {
    path.replace('/', ".")
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
