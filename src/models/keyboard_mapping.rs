//! Keyboard mapping table and transliteration state.
//!
//! A [`KeyboardMapping`] maps a single typed character to a replacement
//! string, letting users type in a script their physical keyboard doesn't
//! carry. The table is loaded wholesale from the backend and never mutated in
//! place; reloads replace the whole [`MappingState`].

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Mapping from a single source character to a replacement string.
///
/// The single-character key invariant is enforced by the key type. When
/// deserializing from JSON (an object of string keys), entries whose key is
/// not exactly one character are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardMapping {
    entries: BTreeMap<char, String>,
}

impl KeyboardMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from `(char, String)` pairs.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (char, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Builds a mapping from string-keyed pairs, dropping entries whose key
    /// is not exactly one character.
    pub fn from_string_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries = entries.into_iter().filter_map(|(from, to)| {
            let mut chars = from.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some((c, to)),
                _ => None,
            }
        });
        Self {
            entries: entries.collect(),
        }
    }

    /// Looks up the replacement for a typed character.
    #[must_use]
    pub fn get(&self, from: char) -> Option<&str> {
        self.entries.get(&from).map(String::as_str)
    }

    /// Inserts or replaces a single entry.
    pub fn insert(&mut self, from: char, to: String) {
        self.entries.insert(from, to);
    }

    /// Removes an entry. Returns the previous replacement, if any.
    pub fn remove(&mut self, from: char) -> Option<String> {
        self.entries.remove(&from)
    }

    /// Number of entries in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in source-character order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.entries.iter().map(|(c, s)| (*c, s.as_str()))
    }
}

impl Serialize for KeyboardMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (from, to) in &self.entries {
            map.serialize_entry(&from.to_string(), to)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeyboardMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = KeyboardMapping;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of single-character keys to replacement strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut mapping = KeyboardMapping::new();
                while let Some((from, to)) = access.next_entry::<String, String>()? {
                    let mut chars = from.chars();
                    if let (Some(c), None) = (chars.next(), chars.next()) {
                        mapping.insert(c, to);
                    }
                    // Keys that are not exactly one character are dead
                    // entries: no keystroke can ever match them.
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// Transliteration state: the mapping table plus the enabled flag.
///
/// This is also the wire shape of the `GET /keyboard` response. The initial
/// state is empty and disabled, which makes every keystroke pass through
/// until the first fetch resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingState {
    /// The transliteration table.
    pub mapping: KeyboardMapping,
    /// Whether transliteration is active at all.
    pub enabled: bool,
}

impl MappingState {
    /// Creates the initial empty, disabled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enabled state over the given mapping.
    #[must_use]
    pub fn enabled(mapping: KeyboardMapping) -> Self {
        Self {
            mapping,
            enabled: true,
        }
    }
}

/// One editable row of the mapping editor, as sent to `POST /updateKeyboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Source character (a one-character string in the editor).
    pub from: String,
    /// Replacement string.
    pub to: String,
}

/// Action carried by a keyboard update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    /// Persist the submitted entries as the user's mapping.
    Save,
    /// Discard the user's mapping and fall back to the configured default.
    Default,
}

/// Body of a `POST /updateKeyboard` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardUpdate {
    /// Whether to save the entries or reset to the default mapping.
    pub action: UpdateAction,
    /// Submitted mapping rows. Ignored when `action` is `Default`.
    #[serde(default)]
    pub entries: Vec<MappingEntry>,
    /// Whether transliteration should be enabled.
    #[serde(default)]
    pub enabled: bool,
}

impl KeyboardUpdate {
    /// Builds a save request from editor rows.
    #[must_use]
    pub fn save(entries: Vec<MappingEntry>, enabled: bool) -> Self {
        Self {
            action: UpdateAction::Save,
            entries,
            enabled,
        }
    }

    /// Builds a reset-to-default request.
    #[must_use]
    pub fn reset() -> Self {
        Self {
            action: UpdateAction::Default,
            entries: Vec::new(),
            enabled: false,
        }
    }

    /// Converts the submitted rows into a mapping table.
    ///
    /// Rows with an empty source or an empty replacement are dropped, as are
    /// rows whose source is longer than one character.
    #[must_use]
    pub fn to_mapping(&self) -> KeyboardMapping {
        KeyboardMapping::from_string_entries(
            self.entries
                .iter()
                .filter(|e| !e.from.is_empty() && !e.to.is_empty())
                .map(|e| (e.from.clone(), e.to.clone())),
        )
    }
}
