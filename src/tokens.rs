//! Character-count token estimation
//!
//! Deliberately crude: tokens ~= chars / charsPerToken, rounded up. Good
//! enough to pack against a budget without shipping a tokenizer.

use crate::rules::RulesConfig;

/// Estimate the token cost of a piece of text
pub fn estimate_tokens(text: &str, rules: &RulesConfig) -> u64 {
    if text.is_empty() {
        return 0;
    }
    let chars = text.chars().count() as u64;
    chars.div_ceil(rules.budget.token_chars_per_token.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_zero() {
        let rules = RulesConfig::default();
        assert_eq!(estimate_tokens("", &rules), 0);
    }

    #[test]
    fn test_rounds_up() {
        let rules = RulesConfig::default();
        // 4 chars per token
        assert_eq!(estimate_tokens("abcd", &rules), 1);
        assert_eq!(estimate_tokens("abcde", &rules), 2);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let rules = RulesConfig::default();
        // four multi-byte chars, still one token
        assert_eq!(estimate_tokens("äöüß", &rules), 1);
    }
}
