//! LIFO log of removed edges and a guard that undoes them.
//!
//! Pruning removes edges from a working graph and records each one here. A
//! *mark* is the stack length at some point in time; restoring to a mark
//! re-adds exactly the edges removed since then, newest first.
//!
//! # Example
//! ```
//! use hamcycle::graph::{EdgeStack, Graph};
//!
//! let mut g = Graph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
//! let mut stack = EdgeStack::new();
//! let mark = stack.mark();
//!
//! g.remove_edge(0, 1).unwrap();
//! stack.push(0, 1);
//! assert!(!g.has_edge(0, 1));
//!
//! stack.restore_to(&mut g, mark);
//! assert!(g.has_edge(0, 1));
//! assert!(stack.is_empty());
//! ```

use std::ops::{Deref, DerefMut};

use super::adjacency::Graph;

/// Stack of removed `(u, v)` edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeStack {
    edges: Vec<(usize, usize)>,
}

impl EdgeStack {
    pub fn new() -> Self {
        EdgeStack { edges: Vec::new() }
    }

    pub fn push(&mut self, u: usize, v: usize) {
        self.edges.push((u, v));
    }

    pub fn pop(&mut self) -> Option<(usize, usize)> {
        self.edges.pop()
    }

    /// Current stack pointer. Pass it to [`EdgeStack::restore_to`] later.
    pub fn mark(&self) -> usize {
        self.edges.len()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Pop and re-add edges until the stack is back at `mark`.
    ///
    /// Edges come back in exact reverse order of removal. Each popped edge
    /// must be absent from `graph`, which holds whenever the graph has only
    /// been changed through removals logged on this stack since `mark`.
    pub fn restore_to(&mut self, graph: &mut Graph, mark: usize) {
        while self.edges.len() > mark {
            if let Some((u, v)) = self.edges.pop() {
                graph.restore_edge(u, v);
            }
        }
    }
}

/// Access to a working graph together with the stack its removals go to.
///
/// Implemented by search states so an [`UndoScope`] can wrap the whole
/// state while the search keeps using every other field.
pub trait EdgeLog {
    fn graph_and_stack(&mut self) -> (&mut Graph, &mut EdgeStack);
}

/// Working graph paired with its removal log.
#[derive(Debug, Clone, Default)]
pub struct WorkingGraph {
    pub graph: Graph,
    pub stack: EdgeStack,
}

impl WorkingGraph {
    pub fn new(graph: Graph) -> Self {
        WorkingGraph {
            graph,
            stack: EdgeStack::new(),
        }
    }
}

impl EdgeLog for WorkingGraph {
    fn graph_and_stack(&mut self) -> (&mut Graph, &mut EdgeStack) {
        (&mut self.graph, &mut self.stack)
    }
}

/// Scoped pruning region.
///
/// Records the stack mark on entry and restores the graph to it when
/// dropped, so every exit path out of the scope (including `?` and early
/// returns out of a recursive search) undoes the removals made inside it.
pub struct UndoScope<'a, T: EdgeLog> {
    inner: &'a mut T,
    mark: usize,
}

impl<'a, T: EdgeLog> UndoScope<'a, T> {
    pub fn enter(inner: &'a mut T) -> Self {
        let mark = inner.graph_and_stack().1.mark();
        UndoScope { inner, mark }
    }

    pub fn mark(&self) -> usize {
        self.mark
    }
}

impl<T: EdgeLog> Deref for UndoScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.inner
    }
}

impl<T: EdgeLog> DerefMut for UndoScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.inner
    }
}

impl<T: EdgeLog> Drop for UndoScope<'_, T> {
    fn drop(&mut self) {
        let (graph, stack) = self.inner.graph_and_stack();
        stack.restore_to(graph, self.mark);
    }
}
