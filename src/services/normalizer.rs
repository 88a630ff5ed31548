//! Entity identifier normalization
//!
//! Turns free-form user input into the identifier list consumed by
//! the comparison service.

/// Normalize a single entity identifier.
///
/// Trims surrounding whitespace; returns `None` when nothing is left.
pub fn normalize_entity_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a comma-separated identifier list.
///
/// Order and duplicates are preserved; blank entries are dropped.
///
/// # Examples
/// ```
/// use salesboard::services::normalizer::parse_entity_ids;
///
/// assert_eq!(parse_entity_ids("P1, P12 ,P15"), vec!["P1", "P12", "P15"]);
/// assert!(parse_entity_ids(" , ").is_empty());
/// ```
pub fn parse_entity_ids(input: &str) -> Vec<String> {
    input.split(',').filter_map(normalize_entity_id).collect()
}
