//! Bounded-degree undirected graph stored as adjacency lists.
//!
//! Vertices are numbered `0..n`. Each vertex keeps its neighbors in insertion
//! order; removing an edge compacts the list by shifting the tail left, so
//! list order changes under removal/restore but adjacency never does.
//!
//! # Example
//! ```
//! use hamcycle::graph::Graph;
//!
//! // A 4-node cycle: edges (0-1, 1-2, 2-3, 3-0).
//! let mut g = Graph::new(4);
//! g.add_edge(0, 1).unwrap();
//! g.add_edge(1, 2).unwrap();
//! g.add_edge(2, 3).unwrap();
//! g.add_edge(3, 0).unwrap();
//!
//! assert!(g.has_edge(3, 0));
//! assert_eq!(g.degree(2), 2);
//! assert_eq!(g.num_edges(), 4);
//! ```

use crate::error::{Error, Result};

/// Largest number of neighbors a single vertex may have.
pub const MAX_DEGREE: usize = 50;

/// Result of [`Graph::remove_edge`]. A missing edge is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRemoval {
    Removed,
    NotFound,
}

/// Simple undirected graph with bounded adjacency lists.
///
/// The default value is the graph on zero vertices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    /// Neighbor lists, at most `MAX_DEGREE` long, compacted on removal.
    edges: Vec<Vec<usize>>,
    /// Vertex count; fixed once the graph is built.
    n: usize,
}

/// Degree statistics of a graph, as printed by the front end.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeSummary {
    pub num_edges: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    pub std_dev_degree: f64,
    /// `histogram[d]` is the number of vertices of degree `d`.
    pub histogram: Vec<usize>,
}

impl Graph {
    /// Edgeless graph on vertices `0..n`.
    pub fn new(n: usize) -> Self {
        let edges = vec![Vec::new(); n];
        Graph { edges, n }
    }

    /// Build a graph from a list of undirected edges.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = Graph::new(n);
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Build a graph from explicit neighbor lists, keeping their order.
    ///
    /// Every list must respect [`MAX_DEGREE`], contain no self loops or
    /// repeats, and the lists together must be symmetric.
    pub fn from_adjacency(lists: Vec<Vec<usize>>) -> Result<Self> {
        let graph = Graph {
            n: lists.len(),
            edges: lists,
        };
        for (v, nbrs) in graph.edges.iter().enumerate() {
            if nbrs.len() > MAX_DEGREE {
                return Err(Error::DegreeExceeded {
                    vertex: v,
                    max: MAX_DEGREE,
                });
            }
            for (i, &w) in nbrs.iter().enumerate() {
                graph.check_vertex(w)?;
                if w == v {
                    return Err(Error::SelfLoop(v));
                }
                if nbrs[..i].contains(&w) {
                    return Err(Error::DuplicateEdge(v, w));
                }
                if !graph.edges[w].contains(&v) {
                    return Err(Error::InconsistentEdge(v, w));
                }
            }
        }
        Ok(graph)
    }

    pub fn num_vertices(&self) -> usize {
        self.n
    }

    pub fn degree(&self, v: usize) -> usize {
        self.edges[v].len()
    }

    /// Neighbors of `v` in list order.
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.edges[v]
    }

    pub fn num_edges(&self) -> usize {
        self.edges.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Iterate over every undirected edge once, as `(u, v)` with `u < v`.
    pub fn edge_list(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().enumerate().flat_map(|(u, nbrs)| {
            nbrs.iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }

    fn check_vertex(&self, v: usize) -> Result<()> {
        if v >= self.n {
            return Err(Error::InvalidVertex {
                vertex: v,
                num_vertices: self.n,
            });
        }
        Ok(())
    }

    /// Add the undirected edge `(u, v)`.
    ///
    /// Fails if either endpoint is out of range, the edge is a self loop or
    /// already present, or either degree would exceed [`MAX_DEGREE`].
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<()> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        if u == v {
            return Err(Error::SelfLoop(u));
        }
        if self.has_edge(u, v) {
            return Err(Error::DuplicateEdge(u, v));
        }
        for w in [u, v] {
            if self.edges[w].len() >= MAX_DEGREE {
                return Err(Error::DegreeExceeded {
                    vertex: w,
                    max: MAX_DEGREE,
                });
            }
        }
        self.edges[u].push(v);
        self.edges[v].push(u);
        Ok(())
    }

    /// Re-insert an edge that was previously removed from this graph.
    ///
    /// Skips the validation in [`Graph::add_edge`]: the edge was present
    /// before, so both endpoints have room for it.
    pub(crate) fn restore_edge(&mut self, u: usize, v: usize) {
        debug_assert!(self.edges[u].len() < MAX_DEGREE && self.edges[v].len() < MAX_DEGREE);
        debug_assert!(!self.has_edge(u, v));
        self.edges[u].push(v);
        self.edges[v].push(u);
    }

    /// Remove the undirected edge `(u, v)` by compacting both neighbor lists.
    ///
    /// Returns [`EdgeRemoval::NotFound`] if the edge is absent. An edge found
    /// in `u`'s list but not in `v`'s is an [`Error::InconsistentEdge`].
    pub fn remove_edge(&mut self, u: usize, v: usize) -> Result<EdgeRemoval> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        let Some(pos) = self.edges[u].iter().position(|&w| w == v) else {
            return Ok(EdgeRemoval::NotFound);
        };
        let Some(rev) = self.edges[v].iter().position(|&w| w == u) else {
            return Err(Error::InconsistentEdge(u, v));
        };
        self.edges[u].remove(pos);
        self.edges[v].remove(rev);
        Ok(EdgeRemoval::Removed)
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.edges[u].contains(&v)
    }

    /// Relabel vertices so that old vertex `v` becomes `mapping[v]`.
    ///
    /// `mapping` must be a permutation of `0..n`. Neighbor lists are rebuilt
    /// in the order edges are met while scanning the old vertices.
    pub fn permute(&mut self, mapping: &[usize]) -> Result<()> {
        if mapping.len() != self.n {
            return Err(Error::InvalidOption(format!(
                "permutation has {} entries, graph has {} vertices",
                mapping.len(),
                self.n
            )));
        }
        let mut seen = vec![false; self.n];
        for &m in mapping {
            self.check_vertex(m)?;
            if std::mem::replace(&mut seen[m], true) {
                return Err(Error::InvalidOption(format!(
                    "vertex {m} appears twice in permutation"
                )));
            }
        }

        let mut permuted = Graph::new(self.n);
        for (u, v) in self.edge_list() {
            permuted.add_edge(mapping[u], mapping[v])?;
        }
        *self = permuted;
        Ok(())
    }

    /// Degree statistics: edge count, extremes, mean, deviation, histogram.
    pub fn degree_summary(&self) -> DegreeSummary {
        let degrees: Vec<usize> = self.edges.iter().map(Vec::len).collect();
        let min_degree = degrees.iter().copied().min().unwrap_or(0);
        let max_degree = degrees.iter().copied().max().unwrap_or(0);

        let (mean_degree, std_dev_degree) = if self.n == 0 {
            (0.0, 0.0)
        } else {
            let n = self.n as f64;
            let mean = degrees.iter().sum::<usize>() as f64 / n;
            let var = degrees
                .iter()
                .map(|&d| (d as f64 - mean).powi(2))
                .sum::<f64>()
                / n;
            (mean, var.sqrt())
        };

        let mut histogram = vec![0; max_degree + 1];
        for &d in &degrees {
            histogram[d] += 1;
        }

        DegreeSummary {
            num_edges: self.num_edges(),
            min_degree,
            max_degree,
            mean_degree,
            std_dev_degree,
            histogram,
        }
    }
}
