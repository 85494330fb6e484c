//! SHA-1 identities
//!
//! Every content-derived id in this crate has the form `sha1:<40 hex chars>`.

use sha1::{Digest, Sha1};

/// Hash `input` and return `"sha1:" + lowercase hex`
pub fn sha1_tagged(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    format!("sha1:{:x}", hasher.finalize())
}
