use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::highlighter::SQL_KEYWORDS;

/// Autocomplete dictionary for the DDL editor: table name → column names.
///
/// The map is ordered so completion lists come out stable regardless of how
/// the dictionary was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHints {
    tables: BTreeMap<String, Vec<String>>,
}

impl TableHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: impl Into<String>, columns: Vec<String>) {
        self.tables.insert(table.into(), columns);
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.tables.values().any(|cols| cols.iter().any(|c| c == name))
    }

    /// Completion candidates for the word currently under the cursor.
    ///
    /// A word of the form `table.prefix` completes against the columns of
    /// that table; anything else completes against SQL keywords and table
    /// names. Matching is case-insensitive, the candidate's own casing is
    /// returned. The word itself is never suggested.
    pub fn completions(&self, word: &str) -> Vec<String> {
        if let Some((table, col_prefix)) = word.split_once('.') {
            let Some(columns) = self.columns(table) else {
                return Vec::new();
            };
            return columns
                .iter()
                .filter(|c| starts_with_ci(c, col_prefix) && *c != col_prefix)
                .map(|c| format!("{table}.{c}"))
                .collect();
        }

        let mut out: Vec<String> = SQL_KEYWORDS
            .iter()
            .filter(|k| starts_with_ci(k, word) && !k.eq_ignore_ascii_case(word))
            .map(|k| (*k).to_string())
            .collect();
        out.extend(
            self.tables()
                .filter(|t| starts_with_ci(t, word) && *t != word)
                .map(str::to_string),
        );
        out
    }
}

fn starts_with_ci(candidate: &str, prefix: &str) -> bool {
    candidate.len() >= prefix.len()
        && candidate
            .chars()
            .zip(prefix.chars())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
}

/// Dictionary used until the host supplies a real catalog.
pub static DEFAULT_HINTS: Lazy<TableHints> = Lazy::new(|| {
    let mut hints = TableHints::new();
    hints.insert(
        "users",
        vec!["name".into(), "score".into(), "birthDate".into()],
    );
    hints.insert(
        "countries",
        vec!["name".into(), "population".into(), "size".into()],
    );
    hints
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dictionary_has_demo_tables() {
        assert!(DEFAULT_HINTS.contains_table("users"));
        assert!(DEFAULT_HINTS.contains_table("countries"));
        assert_eq!(
            DEFAULT_HINTS.columns("users").unwrap(),
            &["name", "score", "birthDate"]
        );
    }

    #[test]
    fn completions_match_case_insensitively() {
        let hints = DEFAULT_HINTS.clone();
        let items = hints.completions("sel");
        assert!(items.contains(&"SELECT".to_string()));

        let items = hints.completions("US");
        assert!(items.contains(&"users".to_string()));
    }

    #[test]
    fn dotted_words_complete_columns_of_that_table() {
        let hints = DEFAULT_HINTS.clone();
        let items = hints.completions("users.n");
        assert_eq!(items, vec!["users.name".to_string()]);

        assert!(hints.completions("nosuch.n").is_empty());
    }

    #[test]
    fn exact_word_is_not_suggested() {
        let hints = DEFAULT_HINTS.clone();
        assert!(!hints.completions("users").contains(&"users".to_string()));
        assert!(!hints
            .completions("SELECT")
            .contains(&"SELECT".to_string()));
    }
}
