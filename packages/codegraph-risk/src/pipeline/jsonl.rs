//! JSONL row streams
//!
//! One compact JSON object per line, `\n`-terminated. Sharding and
//! compression belong to the artifact writer that owns the files.

use std::io::Write;

use serde::Serialize;

use crate::errors::Result;

/// What a stream write produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonlSummary {
    pub rows: usize,
    pub bytes: usize,
}

/// Write `rows` to `writer`, one JSON object per line
pub fn write_jsonl<T, W>(rows: &[T], mut writer: W) -> Result<JsonlSummary>
where
    T: Serialize,
    W: Write,
{
    let mut summary = JsonlSummary::default();
    for row in rows {
        let mut line = serde_json::to_vec(row)?;
        line.push(b'\n');
        writer.write_all(&line)?;
        summary.rows += 1;
        summary.bytes += line.len();
    }
    writer.flush()?;
    Ok(summary)
}
