//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and typeahead tuning values.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Foliosearch";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "foliosearch";

/// Maximum number of suggestions requested from the backend per typeahead query.
pub const TYPEAHEAD_MAX_RESULTS: usize = 8;

/// Minimum prefix length before a typeahead query is issued.
pub const TYPEAHEAD_MIN_PREFIX: usize = 1;

/// Backend field name used for author typeahead queries.
pub const AUTHOR_FIELD: &str = "author";
