//! Query compilation and matching for entry search.

use crate::envelope::Entry;
use crate::errors::{AppResult, NotebookError};
use regex::Regex;

/// A compiled search query.
#[derive(Debug)]
pub enum SearchQuery {
    /// Matches nothing.
    Empty,
    /// Case-insensitive substring; holds the lowercased needle.
    Substring(String),
    /// Case-sensitive regular expression.
    Pattern(Regex),
}

impl SearchQuery {
    /// Compiles `query`, failing with `InvalidQuery` for a bad pattern.
    pub fn compile(query: &str, regex_search: bool) -> AppResult<Self> {
        if query.is_empty() {
            return Ok(SearchQuery::Empty);
        }
        if regex_search {
            let pattern = Regex::new(query).map_err(NotebookError::InvalidQuery)?;
            return Ok(SearchQuery::Pattern(pattern));
        }
        Ok(SearchQuery::Substring(query.to_lowercase()))
    }

    /// Whether the entry's name or content matches.
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            SearchQuery::Empty => false,
            SearchQuery::Substring(needle) => {
                entry.name.to_lowercase().contains(needle.as_str())
                    || entry.content.to_lowercase().contains(needle.as_str())
            }
            SearchQuery::Pattern(pattern) => {
                pattern.is_match(&entry.name) || pattern.is_match(&entry.content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn entry(name: &str, content: &str) -> Entry {
        let mut entry = Entry::new(name);
        entry.content = content.to_string();
        entry
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let query = SearchQuery::compile("", false).unwrap();
        assert!(!query.matches(&entry("anything", "")));

        let query = SearchQuery::compile("", true).unwrap();
        assert!(!query.matches(&entry("", "")));
    }

    #[test]
    fn test_substring_is_case_insensitive_over_name_and_content() {
        let query = SearchQuery::compile("milk", false).unwrap();
        assert!(query.matches(&entry("Todo", "buy milk")));
        assert!(query.matches(&entry("Notes", "MILK is on sale")));
        assert!(query.matches(&entry("Milkshake recipes", "")));
        assert!(!query.matches(&entry("Groceries", "bread")));
    }

    #[test]
    fn test_substring_treats_regex_metacharacters_literally() {
        let query = SearchQuery::compile("a.c", false).unwrap();
        assert!(query.matches(&entry("x", "see a.c here")));
        assert!(!query.matches(&entry("x", "abc")));
    }

    #[test]
    fn test_regex_is_case_sensitive() {
        let query = SearchQuery::compile("^Mi.k$", true).unwrap();
        assert!(query.matches(&entry("Milk", "")));
        assert!(!query.matches(&entry("milk", "")));
    }

    #[test]
    fn test_regex_matches_name_or_content_independently() {
        let query = SearchQuery::compile(r"\d{4}-\d{2}", true).unwrap();
        assert!(query.matches(&entry("2024-03 plan", "")));
        assert!(query.matches(&entry("plan", "due 2024-03")));
        assert!(!query.matches(&entry("plan", "someday")));
    }

    #[test]
    fn test_invalid_pattern_is_invalid_query() {
        let error = SearchQuery::compile("([unclosed", true).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidQuery);
    }

    #[test]
    fn test_invalid_pattern_text_is_fine_as_plain_query() {
        let query = SearchQuery::compile("([unclosed", false).unwrap();
        assert!(query.matches(&entry("x", "oops ([unclosed bracket")));
    }
}
