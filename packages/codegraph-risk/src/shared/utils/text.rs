//! Text helpers

/// Collapse runs of whitespace to a single space and trim both ends
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a path to forward slashes
pub fn to_posix_path(raw: &str) -> String {
    raw.replace('\\', "/")
}
