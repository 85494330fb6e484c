//! Worklist states
//!
//! States live in an append-only arena and the worklist is a cursor over it,
//! so the queue never reallocates entries and paths are rebuilt from parent
//! links only when a flow is emitted.

use crate::features::risk_summary::RiskSignal;

pub type StateId = usize;

/// A source signal that seeds traversal
#[derive(Debug, Clone, Copy)]
pub struct RootSource<'a> {
    pub chunk_uid: &'a str,
    pub source: &'a RiskSignal,
}

#[derive(Debug, Clone)]
pub struct TraversalState<'a> {
    pub chunk_uid: &'a str,
    pub root: RootSource<'a>,
    pub parent: Option<StateId>,
    /// Call sites sampled for the hop parent → this state
    pub step_call_sites: Vec<String>,
    pub depth: usize,
    pub sanitizer_barriers_hit: usize,
    pub taint_list: Vec<String>,
    pub taint_key: String,
}

/// Arena of states plus the FIFO cursor
#[derive(Debug, Default)]
pub struct TraversalArena<'a> {
    states: Vec<TraversalState<'a>>,
    cursor: usize,
}

impl<'a> TraversalArena<'a> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            cursor: 0,
        }
    }

    pub fn push(&mut self, state: TraversalState<'a>) -> StateId {
        self.states.push(state);
        self.states.len() - 1
    }

    /// Next unprocessed state in insertion order
    pub fn pop_front(&mut self) -> Option<StateId> {
        if self.cursor < self.states.len() {
            self.cursor += 1;
            Some(self.cursor - 1)
        } else {
            None
        }
    }

    pub fn get(&self, id: StateId) -> &TraversalState<'a> {
        &self.states[id]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Chunk uids from the root to `id`
    pub fn path_chunk_uids(&self, id: StateId) -> Vec<String> {
        let mut path = Vec::with_capacity(self.states[id].depth + 1);
        let mut current = Some(id);
        while let Some(index) = current {
            let state = &self.states[index];
            path.push(state.chunk_uid.to_string());
            current = state.parent;
        }
        path.reverse();
        path
    }

    /// Call-site ids per hop from the root to `id`
    pub fn call_sites_by_step(&self, id: StateId) -> Vec<Vec<String>> {
        let mut steps = Vec::with_capacity(self.states[id].depth);
        let mut current = Some(id);
        while let Some(index) = current {
            let state = &self.states[index];
            if state.parent.is_some() {
                steps.push(state.step_call_sites.clone());
            }
            current = state.parent;
        }
        steps.reverse();
        steps
    }
}
