//! Author filter accumulated from the typeahead field.
//!
//! The backend takes the author filter as a single pipe-joined string
//! (`author=a|b|c`), so the filter knows how to render itself in that form
//! and how to parse it back, collapsing empty segments.

/// Ordered list of author names selected for the current search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    authors: Vec<String>,
}

impl AuthorFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a pipe-joined author string, dropping empty segments.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        Self {
            authors: query
                .split('|')
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Adds an author. Whitespace is trimmed; empty names are ignored.
    pub fn add(&mut self, author: &str) {
        let author = author.trim();
        if !author.is_empty() {
            self.authors.push(author.to_string());
        }
    }

    /// Removes the first entry equal to `author`. Returns whether an entry
    /// was removed.
    pub fn remove_first(&mut self, author: &str) -> bool {
        if let Some(pos) = self.authors.iter().position(|a| a == author) {
            self.authors.remove(pos);
            true
        } else {
            false
        }
    }

    /// Removes the entry at `index`, if in bounds.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.authors.len() {
            self.authors.remove(index);
        }
    }

    /// Renders the filter in the backend's pipe-joined query form.
    #[must_use]
    pub fn as_query(&self) -> String {
        self.authors.join("|")
    }

    /// Iterates over the author names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().map(String::as_str)
    }

    /// Number of authors in the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    /// Whether the filter is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_query() {
        let mut filter = AuthorFilter::new();
        filter.add("Sholem Aleichem");
        filter.add("  I. L. Peretz ");
        assert_eq!(filter.as_query(), "Sholem Aleichem|I. L. Peretz");
    }

    #[test]
    fn test_add_ignores_empty() {
        let mut filter = AuthorFilter::new();
        filter.add("   ");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_from_query_collapses_empty_segments() {
        let filter = AuthorFilter::from_query("|a||b|");
        assert_eq!(filter.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_first_only_removes_one() {
        let mut filter = AuthorFilter::from_query("a|b|a");
        assert!(filter.remove_first("a"));
        assert_eq!(filter.as_query(), "b|a");
        assert!(!filter.remove_first("missing"));
    }

    #[test]
    fn test_round_trip() {
        let filter = AuthorFilter::from_query("a|b|c");
        assert_eq!(AuthorFilter::from_query(&filter.as_query()), filter);
    }
}
