//! Simple path stored as a slot arena with forward links.
//!
//! Occupied slots are always `0..len`. Each slot holds a vertex and the slot
//! of its successor, so a rotation only rewires links and never moves a
//! vertex to another slot. `slot_of` is the reverse index from vertex to slot.
//!
//! # Example
//! ```
//! use hamcycle::graph::Graph;
//! use hamcycle::hamiltonian::Path;
//!
//! // 0-1-2-3 with the chord (3, 1)
//! let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 1)]).unwrap();
//! let mut path = Path::with_start(4, 0);
//! for v in 1..4 {
//!     path.push(v);
//! }
//! path.rotate(path.slot_of(1).unwrap());
//! assert_eq!(path.order(), vec![0, 1, 3, 2]);
//! assert!(path.validate(&g));
//! ```

use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    vertex: usize,
    next: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    slots: Vec<Slot>,
    slot_of: Vec<Option<usize>>,
    /// Path length at which each vertex last became the end.
    ended: Vec<usize>,
    start: usize,
    end: usize,
}

impl Path {
    /// Empty path over vertices `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Path {
            slots: Vec::with_capacity(capacity),
            slot_of: vec![None; capacity],
            ended: vec![0; capacity],
            start: 0,
            end: 0,
        }
    }

    /// Path holding the single vertex `vertex`.
    pub fn with_start(capacity: usize, vertex: usize) -> Self {
        let mut path = Path::new(capacity);
        path.push(vertex);
        path
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn start_vertex(&self) -> usize {
        self.slots[self.start].vertex
    }

    pub fn end_vertex(&self) -> usize {
        self.slots[self.end].vertex
    }

    pub fn end_slot(&self) -> usize {
        self.end
    }

    pub fn vertex_at(&self, slot: usize) -> usize {
        self.slots[slot].vertex
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.slot_of[vertex].is_some()
    }

    pub fn slot_of(&self, vertex: usize) -> Option<usize> {
        self.slot_of[vertex]
    }

    /// Vertex following `vertex` on the path, `None` for the end or for a
    /// vertex not on the path.
    pub fn successor(&self, vertex: usize) -> Option<usize> {
        let slot = self.slot_of[vertex]?;
        self.slots[slot].next.map(|s| self.slots[s].vertex)
    }

    pub fn ended(&self, vertex: usize) -> usize {
        self.ended[vertex]
    }

    /// Append `vertex` after the current end.
    pub fn push(&mut self, vertex: usize) {
        debug_assert!(!self.contains(vertex));
        let slot = self.slots.len();
        self.slots.push(Slot { vertex, next: None });
        if slot > 0 {
            self.slots[self.end].next = Some(slot);
        } else {
            self.start = 0;
        }
        self.end = slot;
        self.slot_of[vertex] = Some(slot);
        self.ended[vertex] = self.slots.len();
    }

    /// Drop the end vertex; `prev_end` becomes the end again.
    ///
    /// Only valid while the end sits in the highest slot, which holds for
    /// paths that have only been pushed to.
    pub fn pop_end(&mut self, prev_end: usize) {
        debug_assert_eq!(self.end + 1, self.slots.len());
        if let Some(slot) = self.slots.pop() {
            self.slot_of[slot.vertex] = None;
        }
        self.end = prev_end;
        if let Some(last) = self.slots.get_mut(prev_end) {
            last.next = None;
        }
    }

    /// Posa rotation at `pivot`, assuming the end is adjacent to it.
    ///
    /// `start .. pivot, succ .. end` becomes `start .. pivot, end .. succ`.
    /// Nothing changes when the pivot is the end or its successor already is.
    pub fn rotate(&mut self, pivot: usize) {
        let Some(new_end) = self.slots[pivot].next else {
            return;
        };
        if new_end == self.end {
            return;
        }

        self.slots[pivot].next = Some(self.end);
        let mut prev = new_end;
        let mut cur = self.slots[new_end].next;
        while let Some(slot) = cur {
            cur = self.slots[slot].next;
            self.slots[slot].next = Some(prev);
            prev = slot;
        }
        self.slots[new_end].next = None;
        self.end = new_end;
        self.ended[self.slots[new_end].vertex] = self.slots.len();
    }

    /// Make the end adjacent to the start, rotating once if needed.
    ///
    /// Returns false and leaves the path unchanged when neither the end
    /// itself nor a single rotation closes the cycle in `graph`.
    pub fn close_cycle(&mut self, graph: &Graph) -> bool {
        let start = self.start_vertex();
        let end = self.end_vertex();
        if graph.has_edge(end, start) {
            return true;
        }

        for &x in graph.neighbors(end) {
            let Some(y) = self.successor(x) else {
                continue;
            };
            if graph.has_edge(y, start) {
                if let Some(pivot) = self.slot_of[x] {
                    self.rotate(pivot);
                }
                return true;
            }
        }
        false
    }

    /// Break a closed path between positions `position - 1` and `position`.
    ///
    /// `order[..position]` and `order[position..]` are each reversed, so the
    /// vertex at `position % len` ends up as the new end. Slots are rebuilt
    /// in path order and every `ended` marker is reset except the new end's.
    pub fn break_cycle(&mut self, position: usize) {
        let len = self.slots.len();
        debug_assert!((1..=len).contains(&position));
        let mut order = self.order();
        order[..position].reverse();
        order[position..].reverse();

        self.slots.clear();
        self.slot_of.iter_mut().for_each(|s| *s = None);
        self.ended.iter_mut().for_each(|e| *e = 0);
        for (slot, &vertex) in order.iter().enumerate() {
            let next = (slot + 1 < len).then_some(slot + 1);
            self.slots.push(Slot { vertex, next });
            self.slot_of[vertex] = Some(slot);
        }
        self.start = 0;
        self.end = len - 1;
        self.ended[order[len - 1]] = len;
    }

    /// Vertices from start to end.
    pub fn order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut cur = (!self.slots.is_empty()).then_some(self.start);
        while let Some(slot) = cur {
            order.push(self.slots[slot].vertex);
            cur = self.slots[slot].next;
        }
        order
    }

    /// Check linkage, the reverse index, and that consecutive vertices are
    /// adjacent in `graph`.
    pub fn validate(&self, graph: &Graph) -> bool {
        let len = self.slots.len();
        if len == 0 {
            return self.slot_of.iter().all(Option::is_none);
        }
        if self.start >= len || self.end >= len || self.slots[self.end].next.is_some() {
            return false;
        }

        let mut seen = vec![false; len];
        let mut slot = self.start;
        for step in 0..len {
            if std::mem::replace(&mut seen[slot], true) {
                return false;
            }
            let vertex = self.slots[slot].vertex;
            if self.slot_of[vertex] != Some(slot) {
                return false;
            }
            match self.slots[slot].next {
                Some(next) if step + 1 < len => {
                    if next >= len || !graph.has_edge(vertex, self.slots[next].vertex) {
                        return false;
                    }
                    slot = next;
                }
                None if step + 1 == len => {}
                _ => return false,
            }
        }

        slot == self.end && self.slot_of.iter().filter(|s| s.is_some()).count() == len
    }
}
