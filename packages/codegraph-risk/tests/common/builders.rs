//! Test data builders

use codegraph_risk::shared::models::{CallDetail, RawRiskSignal, RiskChunk, RiskPayload};

/// Builder for a single chunk with risk signals and outgoing calls
#[derive(Debug)]
pub struct ChunkBuilder {
    chunk: RiskChunk,
    risk: RiskPayload,
    next_line: i64,
}

impl ChunkBuilder {
    pub fn new(uid: &str) -> Self {
        Self {
            chunk: RiskChunk::new(uid, format!("src/{uid}.js"), 1)
                .with_symbol(uid, "function")
                .with_lang("javascript"),
            risk: RiskPayload::default(),
            next_line: 2,
        }
    }

    pub fn source(mut self, rule_id: &str) -> Self {
        self.risk
            .sources
            .push(RawRiskSignal::new(rule_id, rule_id).with_category("input"));
        self
    }

    pub fn sink(mut self, rule_id: &str, severity: &str) -> Self {
        self.risk.sinks.push(
            RawRiskSignal::new(rule_id, rule_id)
                .with_category("injection")
                .with_severity(severity)
                .with_confidence(0.8),
        );
        self
    }

    pub fn sanitizer(mut self, rule_id: &str) -> Self {
        self.risk
            .sanitizers
            .push(RawRiskSignal::new(rule_id, rule_id).with_category("sanitizer"));
        self
    }

    pub fn params(mut self, params: &[&str]) -> Self {
        self.chunk = self.chunk.with_params(params.iter().copied());
        self
    }

    pub fn tainted(mut self, identifiers: &[&str]) -> Self {
        self.risk.taint_hints = Some(codegraph_risk::shared::models::TaintHints {
            tainted_identifiers: identifiers.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Call `target` from the next free line
    pub fn calls(self, target: &str) -> Self {
        self.calls_with(target, &[])
    }

    pub fn calls_with(mut self, target: &str, args: &[&str]) -> Self {
        let detail = CallDetail::new(target, target, self.next_line, 5).with_args(args.iter().copied());
        self.chunk = self.chunk.with_call(detail);
        self.next_line += 1;
        self
    }

    pub fn build(self) -> RiskChunk {
        if self.risk.is_empty() && self.risk.taint_hints.is_none() {
            self.chunk
        } else {
            self.chunk.with_risk(self.risk)
        }
    }
}

/// Builder for a whole call graph
#[derive(Debug, Default)]
pub struct GraphBuilder {
    chunks: Vec<ChunkBuilder>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk(mut self, chunk: ChunkBuilder) -> Self {
        self.chunks.push(chunk);
        self
    }

    /// `a → b → ... → last` with a source at the head and a sink at the tail
    pub fn chain(uids: &[&str]) -> Self {
        let mut graph = Self::new();
        for (i, uid) in uids.iter().enumerate() {
            let mut chunk = ChunkBuilder::new(uid);
            if i == 0 {
                chunk = chunk.source("source.request");
            }
            if let Some(next) = uids.get(i + 1) {
                chunk = chunk.calls(next);
            } else {
                chunk = chunk.sink("sink.exec", "high");
            }
            graph = graph.chunk(chunk);
        }
        graph
    }

    pub fn build(self) -> Vec<RiskChunk> {
        self.chunks.into_iter().map(ChunkBuilder::build).collect()
    }
}

/// Layered graph: `layers` layers of `width` chunks, each calling every chunk
/// of the next layer; sources in layer 0, sinks in the last layer
pub fn layered_graph(layers: usize, width: usize) -> Vec<RiskChunk> {
    let uid = |layer: usize, i: usize| format!("l{layer}_n{i}");
    let mut chunks = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for i in 0..width {
            let name = uid(layer, i);
            let mut chunk = ChunkBuilder::new(&name);
            if layer == 0 {
                chunk = chunk.source("source.request");
            }
            if layer + 1 == layers {
                chunk = chunk.sink("sink.sql", "critical");
            } else {
                for j in 0..width {
                    chunk = chunk.calls(&uid(layer + 1, j));
                }
            }
            chunks.push(chunk.build());
        }
    }
    chunks
}
