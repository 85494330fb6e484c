//! Function-level chunk as seen by risk analysis
//!
//! Only the fields risk analysis reads are modeled; the extraction pipeline
//! owns everything else about a chunk.

use serde::{Deserialize, Serialize};

use super::lenient::{
    default_on_invalid, opt_integer, opt_skip_invalid, opt_string, string_list, vec_skip_invalid,
};
use super::risk::RiskPayload;

/// A chunk with its risk signals and resolved call relations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskChunk {
    #[serde(deserialize_with = "opt_string")]
    pub chunk_uid: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub file: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "opt_integer")]
    pub start_line: Option<i64>,
    /// Language id (`languageId` on summary rows)
    #[serde(deserialize_with = "opt_string")]
    pub lang: Option<String>,
    #[serde(deserialize_with = "default_on_invalid")]
    pub docmeta: ChunkDocMeta,
    #[serde(deserialize_with = "default_on_invalid")]
    pub code_relations: CodeRelations,
}

impl RiskChunk {
    /// Create a chunk with identity, file and starting line
    pub fn new(chunk_uid: impl Into<String>, file: impl Into<String>, start_line: i64) -> Self {
        Self {
            chunk_uid: Some(chunk_uid.into()),
            file: Some(file.into()),
            start_line: Some(start_line),
            ..Default::default()
        }
    }

    pub fn with_symbol(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.kind = Some(kind.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_risk(mut self, risk: RiskPayload) -> Self {
        self.docmeta.risk = Some(risk);
        self
    }

    pub fn with_call(mut self, detail: CallDetail) -> Self {
        self.code_relations.call_details.push(detail);
        self
    }

    pub fn with_call_summary(mut self, summary: CallSummary) -> Self {
        self.code_relations.call_summaries.push(summary);
        self
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.docmeta.param_names = params.into_iter().map(Into::into).collect();
        self
    }

    /// Chunk uid, if present and non-empty
    pub fn uid(&self) -> Option<&str> {
        self.chunk_uid.as_deref().filter(|uid| !uid.is_empty())
    }
}

/// Documentation metadata extracted alongside the chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkDocMeta {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "opt_skip_invalid")]
    pub risk: Option<RiskPayload>,
    #[serde(deserialize_with = "opt_string")]
    pub signature: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub param_names: Vec<String>,
    /// Older extractors emit `params` instead of `paramNames`
    #[serde(deserialize_with = "string_list")]
    pub params: Vec<String>,
}

/// Call relations resolved by the relation-linking pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeRelations {
    #[serde(deserialize_with = "vec_skip_invalid")]
    pub call_details: Vec<CallDetail>,
    #[serde(deserialize_with = "vec_skip_invalid")]
    pub call_summaries: Vec<CallSummary>,
}

/// One call site inside a caller chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallDetail {
    pub call_site_id: Option<String>,
    pub callee_raw: Option<String>,
    pub callee_normalized: Option<String>,
    #[serde(deserialize_with = "opt_integer")]
    pub start_line: Option<i64>,
    #[serde(deserialize_with = "opt_integer")]
    pub start_col: Option<i64>,
    #[serde(deserialize_with = "opt_integer")]
    pub end_line: Option<i64>,
    #[serde(deserialize_with = "opt_integer")]
    pub end_col: Option<i64>,
    #[serde(deserialize_with = "string_list")]
    pub args: Vec<String>,
    pub target_chunk_uid: Option<String>,
}

impl CallDetail {
    /// Call to `target` at a single position
    pub fn new(callee_raw: impl Into<String>, target: impl Into<String>, line: i64, col: i64) -> Self {
        let callee_raw = callee_raw.into();
        Self {
            callee_normalized: None,
            callee_raw: Some(callee_raw),
            start_line: Some(line),
            start_col: Some(col),
            end_line: Some(line),
            end_col: Some(col),
            target_chunk_uid: Some(target.into()),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_call_site_id(mut self, id: impl Into<String>) -> Self {
        self.call_site_id = Some(id.into());
        self
    }
}

/// Resolved call summary carrying the callee's parameter names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallSummary {
    pub resolved_callee_chunk_uid: Option<String>,
    pub target_chunk_uid: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub params: Vec<String>,
}

impl CallSummary {
    pub fn new<I, S>(callee: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resolved_callee_chunk_uid: Some(callee.into()),
            target_chunk_uid: None,
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}
