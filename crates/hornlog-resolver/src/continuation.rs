//! Continuation stack: a linked list of goal sequences (spec.md §4.5),
//! implemented as an append-only cactus stack rather than a literal
//! pointer-chased linked list — grounded on
//! `plotnik-vm::engine::frame::FrameArena`'s append-only `Vec` + restorable
//! `current` pointer.
//!
//! A node is one cons cell: a goal plus the index of the node that becomes
//! current once this goal is consumed. Pushing a rule body `[g1, g2, g3]`
//! onto a continuation `rest` conses `g1` onto (`g2` onto (`g3` onto
//! `rest`)), so the node for `g1` is the new current continuation.

use crate::rule::Goal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContId(u32);

struct Node {
    goal: Goal,
    parent: Option<ContId>,
}

/// What remains to prove: either nothing (the environment is empty, a
/// solution is ready) or a goal plus the rest.
pub enum Cont {
    Empty,
    Goal(Goal, Option<ContId>),
}

#[derive(Default)]
pub struct ContArena {
    nodes: Vec<Node>,
}

impl ContArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cons `goal` onto `parent`, returning the new head.
    pub fn push(&mut self, goal: Goal, parent: Option<ContId>) -> ContId {
        let idx = self.nodes.len() as u32;
        self.nodes.push(Node { goal, parent });
        ContId(idx)
    }

    /// Push a whole body (in order) onto `parent`, returning the node for
    /// the first goal — or `parent` unchanged if the body is empty.
    pub fn push_body(&mut self, body: Vec<Goal>, parent: Option<ContId>) -> Option<ContId> {
        let mut current = parent;
        for goal in body.into_iter().rev() {
            current = Some(self.push(goal, current));
        }
        current
    }

    /// Inspect the current continuation: `Empty` if `id` is `None`,
    /// otherwise the goal at `id` plus the id that becomes current once it
    /// is consumed.
    pub fn peek(&self, id: Option<ContId>) -> Cont {
        match id {
            None => Cont::Empty,
            Some(id) => {
                let node = &self.nodes[id.0 as usize];
                Cont::Goal(node.goal.clone(), node.parent)
            }
        }
    }

    /// Drop arena entries above `keep` nodes. Safe to call once no
    /// checkpoint or live continuation id references anything past `keep`
    /// (mirrors `FrameArena::prune`).
    pub fn prune(&mut self, keep: usize) {
        self.nodes.truncate(keep);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
