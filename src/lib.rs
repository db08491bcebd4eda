pub mod error;
pub mod graph;
pub mod hamiltonian;

pub use error::{Error, Result};
pub use graph::Graph;
pub use hamiltonian::{solve, SearchOutcome, SearchReport, SolverOptions};
