//! Task link edges
//!
//! A link from A to B is stored once, as an edge. `A.linked_tasks` and
//! `B.tasks_linked_to_this` are both read off the same edge, so the two sides
//! can never disagree.

use super::ids::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One directed edge in the link table, keyed by `(from, to)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkEdge {
    pub from: TaskId,
    pub to: TaskId,
}

impl LinkEdge {
    pub fn new(from: TaskId, to: TaskId) -> Self {
        Self { from, to }
    }

    /// Whether either end is the given task
    pub fn touches(&self, id: &TaskId) -> bool {
        &self.from == id || &self.to == id
    }
}

impl fmt::Display for LinkEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}
