//! Task text tokenization
//!
//! Lower-cases the free-text task, then splits it into lookup tokens:
//! maximal word-character runs, length >= 2, deduplicated in first-seen
//! order so downstream iteration stays reproducible. Lowering happens
//! before the camelCase split, so mixed-case identifiers stay whole.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("static regex"));

const MIN_TOKEN_LEN: usize = 2;

/// Tokenize a task description into a deduplicated, ordered token list
pub fn tokenize_task(task: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    let mut push = |token: String| {
        if token.len() >= MIN_TOKEN_LEN && seen.insert(token.clone()) {
            tokens.push(token);
        }
    };

    let lowered = task.to_lowercase();
    for run in WORD_RUN.find_iter(&lowered) {
        push(run.as_str().to_string());
        for piece in split_camel_case(run.as_str()) {
            push(piece);
        }
    }
    tokens
}

/// Break a token at lower/digit -> upper transitions, lower-casing each piece
fn split_camel_case(token: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in token.chars() {
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            pieces.push(current.to_lowercase());
            current = String::new();
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        pieces.push(current.to_lowercase());
    }
    pieces
}
