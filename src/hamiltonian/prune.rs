//! Constraint propagation that removes edges no Hamiltonian cycle can use.
//!
//! Runs a fixed-point loop of local degree rules and forced-path closing,
//! then global connectivity and cutpoint checks. Each removed edge can be
//! logged to an [`EdgeStack`] so callers inside a search can undo it.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use bitvec::prelude::*;
use log::debug;

use crate::error::{Error, Result};
use crate::graph::{EdgeRemoval, EdgeStack, Graph};

/// Set of pruning rules to apply.
///
/// Combine with `|`. Parsed from and printed as letters: `B` basic,
/// `C` forced cycles, `O` connectivity, `A` articulation points, `N` none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PruneFlags(u8);

impl PruneFlags {
    pub const NONE: PruneFlags = PruneFlags(0);
    /// Degree below 2, too many degree-2 neighbors, forced vertex trimming.
    pub const BASIC: PruneFlags = PruneFlags(1);
    /// Close or shorten chains of degree-2 vertices.
    pub const FORCED_CYCLE: PruneFlags = PruneFlags(2);
    /// More than one connected component.
    pub const CONNECTIVITY: PruneFlags = PruneFlags(4);
    /// Any articulation point.
    pub const ARTICULATION: PruneFlags = PruneFlags(8);
    pub const ALL: PruneFlags = PruneFlags(15);

    const LETTERS: [(char, PruneFlags); 4] = [
        ('B', PruneFlags::BASIC),
        ('C', PruneFlags::FORCED_CYCLE),
        ('O', PruneFlags::CONNECTIVITY),
        ('A', PruneFlags::ARTICULATION),
    ];

    pub fn contains(self, other: PruneFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Parse letters such as `"BCOA"` or `"N"` (case-insensitive).
    pub fn from_letters(letters: &str) -> Result<Self> {
        let mut flags = PruneFlags::NONE;
        for c in letters.chars().map(|c| c.to_ascii_uppercase()) {
            match Self::LETTERS.iter().find(|(l, _)| *l == c) {
                Some(&(_, flag)) => flags |= flag,
                None if c == 'N' => {}
                None => {
                    return Err(Error::InvalidOption(format!(
                        "unknown prune flag '{c}' in \"{letters}\""
                    )))
                }
            }
        }
        Ok(flags)
    }
}

impl BitOr for PruneFlags {
    type Output = PruneFlags;

    fn bitor(self, rhs: PruneFlags) -> PruneFlags {
        PruneFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for PruneFlags {
    fn bitor_assign(&mut self, rhs: PruneFlags) {
        self.0 |= rhs.0;
    }
}

impl FromStr for PruneFlags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PruneFlags::from_letters(s)
    }
}

impl fmt::Display for PruneFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("N");
        }
        for (letter, flag) in Self::LETTERS {
            if self.contains(flag) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// What pruning proved about the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneOutcome {
    /// No Hamiltonian cycle can exist.
    Infeasible,
    /// The degree-2 vertices already form a Hamiltonian cycle.
    SolvedFound,
    Inconclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneResult {
    pub outcome: PruneOutcome,
    /// Edges removed by this call.
    pub removed: usize,
}

/// Result of walking a chain of degree-2 vertices.
enum ForcedPath {
    ShortCycle,
    Hamiltonian,
    Open,
}

struct Pruner<'a> {
    graph: &'a mut Graph,
    stack: Option<&'a mut EdgeStack>,
    removed: usize,
}

/// Prune `graph` in place until no rule in `flags` removes another edge.
///
/// Removed edges are pushed onto `stack` when one is given; with `None` they
/// are gone for good. The loop restarts after any removal since one edge
/// can enable further ones.
///
/// # Example
/// ```
/// use hamcycle::graph::Graph;
/// use hamcycle::hamiltonian::{prune, PruneFlags, PruneOutcome};
///
/// // two triangles joined by the bridge (2, 3)
/// let mut g = Graph::from_edges(
///     6,
///     &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)],
/// )
/// .unwrap();
/// let result = prune(&mut g, PruneFlags::ALL, None).unwrap();
/// assert_eq!(result.outcome, PruneOutcome::Infeasible);
/// ```
pub fn prune(
    graph: &mut Graph,
    flags: PruneFlags,
    stack: Option<&mut EdgeStack>,
) -> Result<PruneResult> {
    let mut pruner = Pruner {
        graph,
        stack,
        removed: 0,
    };
    let outcome = pruner.run(flags)?;
    Ok(PruneResult {
        outcome,
        removed: pruner.removed,
    })
}

/// Prune a copy of `graph` and return it with the outcome and removal count.
pub fn prune_graph(graph: &Graph, flags: PruneFlags) -> Result<(PruneOutcome, Graph, usize)> {
    let mut pruned = graph.clone();
    let result = prune(&mut pruned, flags, None)?;
    Ok((result.outcome, pruned, result.removed))
}

impl Pruner<'_> {
    fn remove(&mut self, u: usize, v: usize) -> Result<bool> {
        match self.graph.remove_edge(u, v)? {
            EdgeRemoval::Removed => {
                self.removed += 1;
                if let Some(stack) = self.stack.as_deref_mut() {
                    stack.push(u, v);
                }
                Ok(true)
            }
            EdgeRemoval::NotFound => Ok(false),
        }
    }

    fn run(&mut self, flags: PruneFlags) -> Result<PruneOutcome> {
        let n = self.graph.num_vertices();
        let basic = flags.contains(PruneFlags::BASIC);
        let forced = flags.contains(PruneFlags::FORCED_CYCLE);
        let mut deg2_neighbors = vec![0usize; n];
        let mut marked = bitvec![0; n];

        loop {
            let mut changed = false;

            if basic {
                if let Some(v) = (0..n).find(|&v| self.graph.degree(v) < 2) {
                    debug!(
                        "vertex {v} has degree {}, which implies no hamiltonian cycle",
                        self.graph.degree(v)
                    );
                    return Ok(PruneOutcome::Infeasible);
                }
                for v in 0..n {
                    let count = self
                        .graph
                        .neighbors(v)
                        .iter()
                        .filter(|&&w| self.graph.degree(w) == 2)
                        .count();
                    if count > 2 {
                        debug!(
                            "vertex {v} has {count} neighbors of degree 2, \
                             which implies no hamiltonian cycle"
                        );
                        return Ok(PruneOutcome::Infeasible);
                    }
                    deg2_neighbors[v] = count;
                }
            }

            marked.fill(false);
            for v in 0..n {
                // both cycle edges at v are fixed, drop the rest
                if basic && deg2_neighbors[v] == 2 && self.graph.degree(v) > 2 {
                    let mut i = 0;
                    while i < self.graph.degree(v) {
                        let w = self.graph.neighbors(v)[i];
                        if self.graph.degree(w) != 2 && self.remove(v, w)? {
                            changed = true;
                        } else {
                            i += 1;
                        }
                    }
                }

                if forced && self.graph.degree(v) == 2 && !marked[v] {
                    let before = self.removed;
                    match self.extend_forced_path(v, &mut marked)? {
                        ForcedPath::ShortCycle => {
                            debug!("graph has a forced short cycle, which implies no hamiltonian cycle");
                            return Ok(PruneOutcome::Infeasible);
                        }
                        ForcedPath::Hamiltonian => {
                            debug!("graph has a forced hamiltonian cycle");
                            return Ok(PruneOutcome::SolvedFound);
                        }
                        ForcedPath::Open => {}
                    }
                    changed |= self.removed > before;
                }
            }

            if !changed {
                break;
            }
        }

        if flags.contains(PruneFlags::CONNECTIVITY) && self.graph.component_count() > 1 {
            debug!("graph has multiple components, which implies no hamiltonian cycle");
            return Ok(PruneOutcome::Infeasible);
        }
        if flags.contains(PruneFlags::ARTICULATION) && self.graph.has_articulation_point() {
            debug!("graph has at least one cutpoint, which implies no hamiltonian cycle");
            return Ok(PruneOutcome::Infeasible);
        }
        Ok(PruneOutcome::Inconclusive)
    }

    /// Neighbor of the degree-2 vertex `v` other than `prev`.
    fn other_neighbor(&self, v: usize, prev: usize) -> usize {
        let nbrs = self.graph.neighbors(v);
        if nbrs[0] != prev {
            nbrs[0]
        } else {
            nbrs[1]
        }
    }

    /// Grow the chain of degree-2 vertices through `v` in both directions.
    ///
    /// While the chain is shorter than `n`, the edge joining its two ends
    /// would close a short cycle, so it is removed and growth continues.
    /// Interior vertices stay marked; the two ends are unmarked on return.
    fn extend_forced_path(&mut self, v: usize, marked: &mut BitVec) -> Result<ForcedPath> {
        let n = self.graph.num_vertices();
        let (mut start, mut end) = (self.graph.neighbors(v)[0], self.graph.neighbors(v)[1]);
        let (mut prev_start, mut prev_end) = (v, v);
        let mut length = 3;
        for u in [v, start, end] {
            marked.set(u, true);
        }

        loop {
            while self.graph.degree(start) == 2 {
                let next = self.other_neighbor(start, prev_start);
                if next == end {
                    return Ok(closed_chain(length, n));
                }
                prev_start = start;
                start = next;
                length += 1;
                marked.set(start, true);
            }

            while self.graph.degree(end) == 2 {
                let next = self.other_neighbor(end, prev_end);
                if next == start {
                    return Ok(closed_chain(length, n));
                }
                prev_end = end;
                end = next;
                length += 1;
                marked.set(end, true);
            }

            if length < n && self.remove(start, end)? {
                continue;
            }
            break;
        }

        marked.set(start, false);
        marked.set(end, false);
        Ok(ForcedPath::Open)
    }
}

fn closed_chain(length: usize, n: usize) -> ForcedPath {
    if length < n {
        ForcedPath::ShortCycle
    } else {
        ForcedPath::Hamiltonian
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generate;

    fn edge_set(g: &Graph) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = g.edge_list().collect();
        edges.sort();
        edges
    }

    #[test]
    fn test_flag_letters() {
        assert_eq!(PruneFlags::from_letters("BCOA").unwrap(), PruneFlags::ALL);
        assert_eq!(PruneFlags::from_letters("n").unwrap(), PruneFlags::NONE);
        assert_eq!(
            "bo".parse::<PruneFlags>().unwrap(),
            PruneFlags::BASIC | PruneFlags::CONNECTIVITY
        );
        assert!(PruneFlags::from_letters("BX").is_err());
        assert_eq!(PruneFlags::ALL.to_string(), "BCOA");
        assert_eq!(PruneFlags::NONE.to_string(), "N");
        assert!(PruneFlags::ALL.contains(PruneFlags::FORCED_CYCLE));
        assert!(!PruneFlags::BASIC.contains(PruneFlags::ARTICULATION));
    }

    #[test]
    fn test_low_degree_is_infeasible() {
        let mut g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let result = prune(&mut g, PruneFlags::BASIC, None).unwrap();
        assert_eq!(result.outcome, PruneOutcome::Infeasible);
        assert_eq!(result.removed, 0);
    }

    #[test]
    fn test_three_degree_two_neighbors_is_infeasible() {
        // vertex 0 is the hub of three 2-paths to vertex 4
        let g = Graph::from_edges(
            5,
            &[(0, 1), (0, 2), (0, 3), (1, 4), (2, 4), (3, 4)],
        )
        .unwrap();
        let (outcome, _, _) = prune_graph(&g, PruneFlags::BASIC).unwrap();
        assert_eq!(outcome, PruneOutcome::Infeasible);
    }

    #[test]
    fn test_basic_trims_forced_vertex() {
        // vertex 0 has degree-2 neighbors 1 and 2, so edge (0, 3) goes
        let g = Graph::from_edges(
            5,
            &[(0, 1), (0, 2), (0, 3), (1, 4), (2, 3), (3, 4)],
        )
        .unwrap();
        let mut work = g.clone();
        let mut stack = EdgeStack::new();
        let result = prune(&mut work, PruneFlags::BASIC, Some(&mut stack)).unwrap();
        assert!(!work.has_edge(0, 3));
        assert_eq!(result.removed, stack.len());
        assert!(result.removed >= 1);

        stack.restore_to(&mut work, 0);
        assert_eq!(edge_set(&work), edge_set(&g));
    }

    #[test]
    fn test_ring_is_solved() {
        let g = generate::ring(6).unwrap();
        let (outcome, pruned, removed) = prune_graph(&g, PruneFlags::ALL).unwrap();
        assert_eq!(outcome, PruneOutcome::SolvedFound);
        assert_eq!(removed, 0);
        assert_eq!(pruned, g);
    }

    #[test]
    fn test_forced_short_cycle() {
        // triangle 0-1-2 of degree-2 vertices hanging off nothing, plus a square
        let g = Graph::from_edges(
            7,
            &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 6), (6, 3)],
        )
        .unwrap();
        let (outcome, _, _) = prune_graph(&g, PruneFlags::FORCED_CYCLE).unwrap();
        assert_eq!(outcome, PruneOutcome::Infeasible);
    }

    #[test]
    fn test_forced_chain_drops_closing_edge() {
        // chain 1-0-2 is forced; (1, 2) would close a triangle
        let g = Graph::from_edges(
            5,
            &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 4), (3, 4), (1, 4), (2, 3)],
        )
        .unwrap();
        let (outcome, pruned, removed) =
            prune_graph(&g, PruneFlags::FORCED_CYCLE).unwrap();
        assert_ne!(outcome, PruneOutcome::Infeasible);
        assert!(!pruned.has_edge(1, 2));
        assert!(removed >= 1);
    }

    #[test]
    fn test_disconnected_and_cutpoint() {
        let two_squares = Graph::from_edges(
            8,
            &[(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (5, 6), (6, 7), (7, 4)],
        )
        .unwrap();
        let (outcome, _, _) = prune_graph(&two_squares, PruneFlags::CONNECTIVITY).unwrap();
        assert_eq!(outcome, PruneOutcome::Infeasible);

        let bridged = Graph::from_edges(
            6,
            &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)],
        )
        .unwrap();
        let (outcome, _, _) = prune_graph(&bridged, PruneFlags::ARTICULATION).unwrap();
        assert_eq!(outcome, PruneOutcome::Infeasible);
        let (outcome, _, _) = prune_graph(&bridged, PruneFlags::NONE).unwrap();
        assert_eq!(outcome, PruneOutcome::Inconclusive);
    }

    #[test]
    fn test_complete_graph_untouched() {
        let g = generate::complete(6).unwrap();
        let (outcome, pruned, removed) = prune_graph(&g, PruneFlags::ALL).unwrap();
        assert_eq!(outcome, PruneOutcome::Inconclusive);
        assert_eq!(removed, 0);
        assert_eq!(pruned, g);
    }
}
