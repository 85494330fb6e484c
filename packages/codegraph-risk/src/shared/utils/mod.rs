//! Utility modules shared across features
//!
//! - `hash`: `"sha1:<hex>"` identities (flow ids, snippet hashes, call-site ids)
//! - `text`: whitespace collapsing and POSIX path normalization

pub mod hash;
pub mod text;

pub use hash::sha1_tagged;
pub use text::{collapse_whitespace, to_posix_path};
