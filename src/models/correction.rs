//! OCR word correction types.
//!
//! A correction targets a word in a document by its character offset. The
//! backend may report a second word when the OCR'd word is hyphenated across
//! two lines; in that case the correction carries a second suggestion too.

use serde::{Deserialize, Serialize};

/// The OCR'd word(s) at a document offset, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordInfo {
    /// The word at the requested offset.
    pub word: String,
    /// Second half of a word hyphenated across lines, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word2: Option<String>,
}

/// A correction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Backend document identifier.
    pub doc_id: i64,
    /// Character offset of the word within the document.
    pub word_offset: u64,
    /// Suggested replacement for the word.
    pub suggestion: String,
    /// Suggested replacement for the second half of a hyphenated word.
    pub suggestion2: Option<String>,
    /// Font code describing the typeface of the scanned word.
    pub font_code: String,
    /// Language code of the corrected word.
    pub language_code: String,
}

impl Correction {
    /// Whether the correction has anything to submit.
    #[must_use]
    pub fn has_suggestion(&self) -> bool {
        !self.suggestion.trim().is_empty()
    }
}
