//! Keyword matching.
//!
//! Whole-word mode treats only ASCII letters, digits and `_` as word
//! characters, so tokens such as `C++` or `#ml` still match when they sit
//! next to punctuation. Matching is case-insensitive in both modes.

use regex::{Regex, RegexBuilder};

use crate::domain::MatchMode;

/// Left/right guards: start or end of text, or a non-word character.
/// Case folding is switched off inside the class so it stays ASCII-only.
const LEFT_GUARD: &str = "(?:^|(?-i:[^0-9A-Za-z_]))";
const RIGHT_GUARD: &str = "(?:(?-i:[^0-9A-Za-z_])|$)";

#[derive(Debug, Clone)]
enum Pattern {
    Word(Regex),
    Plain(String),
}

#[derive(Debug, Clone)]
struct Keyword {
    text: String,
    pattern: Pattern,
}

/// A keyword list compiled once and evaluated against many texts.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
    mode: MatchMode,
}

impl KeywordSet {
    /// Keywords are trimmed; blank entries are dropped.
    pub fn new<S: AsRef<str>>(keywords: &[S], mode: MatchMode) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .filter_map(|k| compile(k, mode))
            .collect();

        Self { keywords, mode }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// First keyword, in configured order, found in `text`.
    pub fn find(&self, text: &str) -> Option<&str> {
        if self.keywords.is_empty() || text.is_empty() {
            return None;
        }

        let lowered = match self.mode {
            MatchMode::Substring => text.to_lowercase(),
            MatchMode::WholeWord => String::new(),
        };

        self.keywords
            .iter()
            .find(|k| match &k.pattern {
                Pattern::Word(re) => re.is_match(text),
                Pattern::Plain(needle) => lowered.contains(needle.as_str()),
            })
            .map(|k| k.text.as_str())
    }
}

fn compile(keyword: &str, mode: MatchMode) -> Option<Keyword> {
    let pattern = match mode {
        MatchMode::Substring => Pattern::Plain(keyword.to_lowercase()),
        MatchMode::WholeWord => {
            let source = format!("{}{}{}", LEFT_GUARD, regex::escape(keyword), RIGHT_GUARD);
            match RegexBuilder::new(&source).case_insensitive(true).build() {
                Ok(re) => Pattern::Word(re),
                Err(e) => {
                    tracing::warn!("Skipping keyword '{}': {}", keyword, e);
                    return None;
                }
            }
        }
    };

    Some(Keyword {
        text: keyword.to_string(),
        pattern,
    })
}

/// One-shot check of `text` against `keywords`.
pub fn contains_any_keyword<S: AsRef<str>>(text: &str, keywords: &[S], whole_word: bool) -> bool {
    if keywords.is_empty() || text.is_empty() {
        return false;
    }
    KeywordSet::new(keywords, MatchMode::from_whole_word(whole_word)).matches(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_empty_keywords_never_match() {
        assert!(!contains_any_keyword("anything at all", &NONE, true));
        assert!(!contains_any_keyword("anything at all", &NONE, false));
    }

    #[test]
    fn test_empty_text_never_matches() {
        assert!(!contains_any_keyword("", &["rust"], true));
        assert!(!contains_any_keyword("", &["rust"], false));
    }

    #[test]
    fn test_symbol_suffix_keyword() {
        assert!(contains_any_keyword("C++ is great", &["C++"], true));
        assert!(!contains_any_keyword("CC++", &["C++"], true));
    }

    #[test]
    fn test_symbol_prefix_counts_as_boundary() {
        assert!(contains_any_keyword("topic #ml is hot", &["ml"], true));
        assert!(contains_any_keyword("topic #ml is hot", &["#ml"], true));
    }

    #[test]
    fn test_embedded_word_rejected_in_whole_word_mode() {
        assert!(!contains_any_keyword("html", &["ml"], true));
        assert!(!contains_any_keyword("ml_ops", &["ml"], true));
        assert!(!contains_any_keyword("ml2", &["ml"], true));
    }

    #[test]
    fn test_substring_mode() {
        assert!(contains_any_keyword("html", &["ml"], false));
        assert!(contains_any_keyword("Learning RUST today", &["rust"], false));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(contains_any_keyword("PYTHON", &["python"], true));
        assert!(contains_any_keyword("python", &["PYTHON"], true));
        assert!(contains_any_keyword("PyThOn", &["pYtHoN"], false));
    }

    #[test]
    fn test_keywords_are_trimmed_and_blank_skipped() {
        assert!(contains_any_keyword("hiring rust devs", &["  rust  "], true));
        assert!(!contains_any_keyword("hiring rust devs", &["   ", ""], true));
        assert!(KeywordSet::new(&["", " "], MatchMode::WholeWord).is_empty());
    }

    #[test]
    fn test_regex_syntax_is_literal() {
        assert!(contains_any_keyword("price is $5 (approx)", &["(approx)"], true));
        assert!(!contains_any_keyword("aXb", &["a.b"], true));
        assert!(contains_any_keyword("a.b", &["a.b"], true));
    }

    #[test]
    fn test_boundaries_at_text_edges_and_lines() {
        assert!(contains_any_keyword("rust", &["rust"], true));
        assert!(contains_any_keyword("title\nrust", &["rust"], true));
        assert!(contains_any_keyword("rust\nbody", &["rust"], true));
    }

    #[test]
    fn test_non_ascii_neighbours_are_boundaries() {
        assert!(contains_any_keyword("éml", &["ml"], true));
    }

    #[test]
    fn test_find_reports_first_configured_match() {
        let set = KeywordSet::new(&["go", "rust"], MatchMode::WholeWord);
        assert_eq!(set.find("rust and go"), Some("go"));
        assert_eq!(set.find("only rust"), Some("rust"));
        assert_eq!(set.find("nothing here"), None);
    }
}
