//! Call-site identity and per-edge sampling

use std::cmp::Ordering;

use crate::shared::models::CallDetail;
use crate::shared::utils::{sha1_tagged, to_posix_path};

/// Call site after id derivation, ready for ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledCallSite {
    pub file: String,
    pub start_line: Option<i64>,
    pub start_col: Option<i64>,
    pub end_line: Option<i64>,
    pub end_col: Option<i64>,
    pub callee_normalized: String,
    pub callee_raw: String,
    pub call_site_id: Option<String>,
}

/// Last segment of a callee expression split on `.`, `?.` and `::`
pub fn normalize_callee(raw: &str) -> String {
    raw.rsplit(['.', ':'])
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.trim_end_matches('?'))
        .unwrap_or(raw)
        .to_string()
}

/// `sha1(file:startLine:startCol:endLine:endCol:calleeRaw)`; needs every position
pub fn derive_call_site_id(file: &str, detail: &CallDetail) -> Option<String> {
    let (start_line, start_col) = (detail.start_line?, detail.start_col?);
    let (end_line, end_col) = (detail.end_line?, detail.end_col?);
    let callee = detail.callee_raw.as_deref().unwrap_or_default();
    Some(sha1_tagged(&format!(
        "{}:{}:{}:{}:{}:{}",
        file, start_line, start_col, end_line, end_col, callee
    )))
}

fn resolve(detail: &CallDetail, caller_file: &str) -> SampledCallSite {
    let callee_raw = detail.callee_raw.clone().unwrap_or_default();
    let callee_normalized = detail
        .callee_normalized
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| normalize_callee(&callee_raw));
    let call_site_id = detail
        .call_site_id
        .clone()
        .filter(|id| !id.is_empty())
        .or_else(|| derive_call_site_id(caller_file, detail));
    SampledCallSite {
        file: caller_file.to_string(),
        start_line: detail.start_line,
        start_col: detail.start_col,
        end_line: detail.end_line,
        end_col: detail.end_col,
        callee_normalized,
        callee_raw,
        call_site_id,
    }
}

/// Missing positions sort after present ones
fn cmp_position(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_sites(a: &SampledCallSite, b: &SampledCallSite) -> Ordering {
    a.file
        .cmp(&b.file)
        .then_with(|| cmp_position(a.start_line, b.start_line))
        .then_with(|| cmp_position(a.start_col, b.start_col))
        .then_with(|| cmp_position(a.end_line, b.end_line))
        .then_with(|| cmp_position(a.end_col, b.end_col))
        .then_with(|| a.callee_normalized.cmp(&b.callee_normalized))
        .then_with(|| a.callee_raw.cmp(&b.callee_raw))
        .then_with(|| a.call_site_id.cmp(&b.call_site_id))
}

/// First `max` call sites of one edge in canonical order
pub fn sample_call_sites(
    details: &[&CallDetail],
    caller_file: Option<&str>,
    max: Option<usize>,
) -> Vec<SampledCallSite> {
    let file = caller_file.map(to_posix_path).unwrap_or_default();
    let mut sites: Vec<SampledCallSite> = details.iter().map(|d| resolve(d, &file)).collect();
    sites.sort_by(cmp_sites);
    if let Some(max) = max {
        sites.truncate(max.max(1));
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_callee() {
        assert_eq!(normalize_callee("db.query"), "query");
        assert_eq!(normalize_callee("req?.body"), "body");
        assert_eq!(normalize_callee("std::fs::read"), "read");
        assert_eq!(normalize_callee("run"), "run");
        assert_eq!(normalize_callee(""), "");
    }

    #[test]
    fn test_derived_id_is_stable() {
        let detail = CallDetail::new("db.query", "ck:b", 4, 2);
        let id = derive_call_site_id("src/a.js", &detail).unwrap();
        assert_eq!(id, sha1_tagged("src/a.js:4:2:4:2:db.query"));

        let mut partial = detail.clone();
        partial.end_col = None;
        assert_eq!(derive_call_site_id("src/a.js", &partial), None);
    }

    #[test]
    fn test_explicit_id_kept() {
        let detail = CallDetail::new("exec", "ck:b", 1, 1).with_call_site_id("cs:fixed");
        let sites = sample_call_sites(&[&detail], Some("a.js"), None);
        assert_eq!(sites[0].call_site_id.as_deref(), Some("cs:fixed"));
        assert_eq!(sites[0].callee_normalized, "exec");
    }

    #[test]
    fn test_sampling_order_and_cap() {
        let late = CallDetail::new("run", "ck:b", 9, 1);
        let early = CallDetail::new("run", "ck:b", 2, 5);
        let same_line = CallDetail::new("run", "ck:b", 2, 1);
        let sites = sample_call_sites(&[&late, &early, &same_line], Some("src\\a.js"), Some(2));
        let positions: Vec<(Option<i64>, Option<i64>)> =
            sites.iter().map(|s| (s.start_line, s.start_col)).collect();
        assert_eq!(positions, vec![(Some(2), Some(1)), (Some(2), Some(5))]);
        assert_eq!(sites[0].file, "src/a.js");

        let all = sample_call_sites(&[&late, &early, &same_line], Some("a.js"), None);
        assert_eq!(all.len(), 3);
    }
}
