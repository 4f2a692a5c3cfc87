//! Keystroke transliteration core.
//!
//! [`transliterate`] is a pure function over the field value, the caret
//! selection, and the typed character. The widget layer decides what to do
//! with the result: apply the returned value and caret, or let the keystroke
//! insert itself as usual. Keeping the function pure means the whole contract
//! is unit-testable without a terminal.
//!
//! Offsets are character offsets, not byte offsets: replacement strings are
//! routinely outside ASCII, and the widgets track their carets in characters.

use crate::models::MappingState;

/// Highest character code treated as non-printable (covers space and enter).
const CONTROL_CHAR_MAX: u32 = 32;

/// Outcome of offering a keystroke to the transliterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDisposition {
    /// No transliteration applies; the default insertion should proceed.
    PassThrough,
    /// The keystroke was consumed; the field should take the new value and
    /// caret, and the default insertion must be suppressed.
    Replaced {
        /// The field value with the replacement spliced in.
        value: String,
        /// Caret position immediately after the inserted text, in characters.
        caret: usize,
    },
}

/// Offers a single keystroke to the transliterator.
///
/// `selection_start..selection_end` is the current selection in character
/// offsets (equal offsets mean a plain caret). Out-of-range offsets are
/// clamped to the value's length.
///
/// The keystroke passes through untouched when transliteration is disabled,
/// when the typed character is a control character or space, and when no
/// non-empty replacement is configured for it. An explicit empty-string
/// replacement is treated the same as no replacement at all.
#[must_use]
pub fn transliterate(
    value: &str,
    selection_start: usize,
    selection_end: usize,
    typed: char,
    state: &MappingState,
) -> KeyDisposition {
    if !state.enabled {
        return KeyDisposition::PassThrough;
    }
    if (typed as u32) <= CONTROL_CHAR_MAX {
        return KeyDisposition::PassThrough;
    }
    let replacement = match state.mapping.get(typed) {
        Some(r) if !r.is_empty() => r,
        _ => return KeyDisposition::PassThrough,
    };

    let chars: Vec<char> = value.chars().collect();
    let start = selection_start.min(chars.len());
    let end = selection_end.clamp(start, chars.len());

    let mut new_value: String = chars[..start].iter().collect();
    new_value.push_str(replacement);
    new_value.extend(&chars[end..]);

    KeyDisposition::Replaced {
        value: new_value,
        caret: start + replacement.chars().count(),
    }
}

/// Applies the mapping to a whole text, as if it were typed character by
/// character with the caret at the end.
///
/// This is the headless surface used by the `transliterate` CLI subcommand.
#[must_use]
pub fn transliterate_text(text: &str, state: &MappingState) -> String {
    let mut out = String::new();
    let mut len = 0;
    for ch in text.chars() {
        match transliterate(&out, len, len, ch, state) {
            KeyDisposition::Replaced { value, caret } => {
                out = value;
                len = caret;
            }
            KeyDisposition::PassThrough => {
                out.push(ch);
                len += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyboardMapping;

    fn hebrew_state() -> MappingState {
        MappingState::enabled(KeyboardMapping::from_entries([
            ('a', "א".to_string()),
            ('b', "בּ".to_string()),
            ('s', "ש".to_string()),
            ('t', "ט".to_string()),
        ]))
    }

    #[test]
    fn test_unmapped_char_passes_through() {
        let state = hebrew_state();
        assert_eq!(
            transliterate("bd", 1, 1, 'x', &state),
            KeyDisposition::PassThrough
        );
    }

    #[test]
    fn test_mapped_char_splices_at_caret() {
        let state = hebrew_state();
        assert_eq!(
            transliterate("bd", 1, 1, 'a', &state),
            KeyDisposition::Replaced {
                value: "bאd".to_string(),
                caret: 2,
            }
        );
    }

    #[test]
    fn test_selection_is_replaced() {
        let state = hebrew_state();
        assert_eq!(
            transliterate("hello", 1, 4, 'a', &state),
            KeyDisposition::Replaced {
                value: "hאo".to_string(),
                caret: 2,
            }
        );
    }

    #[test]
    fn test_multi_char_replacement_moves_caret_past_it() {
        let state = hebrew_state();
        assert_eq!(
            transliterate("", 0, 0, 'b', &state),
            KeyDisposition::Replaced {
                value: "בּ".to_string(),
                caret: 2,
            }
        );
    }

    #[test]
    fn test_disabled_state_never_handles() {
        let mut state = hebrew_state();
        state.enabled = false;
        assert_eq!(
            transliterate("bd", 1, 1, 'a', &state),
            KeyDisposition::PassThrough
        );
    }

    #[test]
    fn test_control_chars_and_space_pass_through() {
        let state = MappingState::enabled(KeyboardMapping::from_entries([
            (' ', "_".to_string()),
            ('\n', "x".to_string()),
        ]));
        assert_eq!(
            transliterate("", 0, 0, ' ', &state),
            KeyDisposition::PassThrough
        );
        assert_eq!(
            transliterate("", 0, 0, '\n', &state),
            KeyDisposition::PassThrough
        );
    }

    #[test]
    fn test_empty_replacement_treated_as_absent() {
        let state = MappingState::enabled(KeyboardMapping::from_entries([('a', String::new())]));
        assert_eq!(
            transliterate("bd", 1, 1, 'a', &state),
            KeyDisposition::PassThrough
        );
    }

    #[test]
    fn test_offsets_are_char_offsets() {
        let state = hebrew_state();
        // Value already contains non-ASCII characters; offsets still count
        // characters, not bytes.
        assert_eq!(
            transliterate("אב", 1, 1, 'a', &state),
            KeyDisposition::Replaced {
                value: "אאב".to_string(),
                caret: 2,
            }
        );
    }

    #[test]
    fn test_out_of_range_selection_is_clamped() {
        let state = hebrew_state();
        assert_eq!(
            transliterate("bd", 7, 9, 'a', &state),
            KeyDisposition::Replaced {
                value: "bdא".to_string(),
                caret: 3,
            }
        );
    }

    #[test]
    fn test_transliterate_text() {
        let state = hebrew_state();
        assert_eq!(transliterate_text("sabat x", &state), "שאבּאט x");
    }

    #[test]
    fn test_transliterate_text_disabled() {
        let mut state = hebrew_state();
        state.enabled = false;
        assert_eq!(transliterate_text("sabat", &state), "sabat");
    }
}
