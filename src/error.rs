//! Error types shared by the graph store and the search drivers.
//!
//! Search outcomes (`Found`, `NotExist`, `NotFound`) are never errors; every
//! variant here is a configuration or invariant violation that aborts the run.

use std::io;

/// Errors raised by graph construction, graph I/O and the search drivers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A vertex id outside `0..num_vertices`.
    #[error("invalid vertex {vertex} (graph has {num_vertices} vertices)")]
    InvalidVertex { vertex: usize, num_vertices: usize },

    /// An edge from a vertex to itself.
    #[error("self loop on vertex {0}")]
    SelfLoop(usize),

    /// An edge that is already present.
    #[error("duplicate edge ({0}, {1})")]
    DuplicateEdge(usize, usize),

    /// Adding the edge would push a vertex past `MAX_DEGREE`.
    #[error("maximum degree {max} exceeded at vertex {vertex}")]
    DegreeExceeded { vertex: usize, max: usize },

    /// An edge present in one neighbor list but not the other.
    #[error("inconsistent edge ({0}, {1}): adjacency is not symmetric")]
    InconsistentEdge(usize, usize),

    /// Malformed graph file.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Underlying reader or writer failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Graph too large for the recursive backtracking search.
    #[error("graph has {vertices} vertices, backtracking handles at most {max}")]
    TooManyVertices { vertices: usize, max: usize },

    /// Option value outside its valid range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A search reported a cycle that does not verify against the graph.
    #[error("search produced an invalid solution: {0:?}")]
    InvalidSolution(Vec<usize>),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
