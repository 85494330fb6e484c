//! Identifier-boundary substring search
//!
//! Finds `name` as a whole identifier: the characters on either side of a
//! hit (or the window edge) must not be `[A-Za-z0-9_$]`. Plain substring
//! scanning, so there is no regex backtracking on hostile argument text.

#[inline]
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whole-identifier search over all of `text`
pub fn contains_identifier(text: &str, name: &str) -> bool {
    contains_identifier_in(text, name, 0, text.len())
}

/// Whole-identifier search inside the byte window `text[start..end)`
///
/// Window bounds are clamped to `text` and snapped inward to char
/// boundaries. Returns on the first valid hit.
pub fn contains_identifier_in(text: &str, name: &str, start: usize, end: usize) -> bool {
    if name.is_empty() {
        return false;
    }
    let mut start = start.min(text.len());
    let mut end = end.min(text.len());
    while start < end && !text.is_char_boundary(start) {
        start += 1;
    }
    while end > start && !text.is_char_boundary(end) {
        end -= 1;
    }
    if end - start < name.len() {
        return false;
    }
    let window = &text[start..end];

    let mut from = 0;
    while let Some(offset) = window[from..].find(name) {
        let hit = from + offset;
        let after = hit + name.len();
        let before_ok = window[..hit]
            .chars()
            .next_back()
            .map_or(true, |c| !is_identifier_char(c));
        let after_ok = window[after..]
            .chars()
            .next()
            .map_or(true, |c| !is_identifier_char(c));
        if before_ok && after_ok {
            return true;
        }
        // step one char so overlapping candidates are still considered
        let step = window[hit..].chars().next().map_or(1, char::len_utf8);
        from = hit + step;
        if from >= window.len() {
            break;
        }
    }
    false
}
