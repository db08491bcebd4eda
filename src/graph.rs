pub mod adjacency;
pub mod connectivity;
pub mod edge_stack;
pub mod generate;
pub mod io;

pub use adjacency::{DegreeSummary, EdgeRemoval, Graph, MAX_DEGREE};
pub use edge_stack::{EdgeLog, EdgeStack, UndoScope, WorkingGraph};
pub use io::{read_graph, read_graph_file, write_graph, write_graph_file};
