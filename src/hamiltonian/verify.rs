use bitvec::prelude::*;

use crate::graph::Graph;

/// Check that `solution` is a Hamiltonian cycle of `graph`.
///
/// True iff the solution lists every vertex exactly once and each pair of
/// cyclically consecutive vertices, last to first included, is an edge.
/// Graphs with fewer than 3 vertices have no Hamiltonian cycle.
///
/// # Example
/// ```
/// use hamcycle::graph::Graph;
/// use hamcycle::hamiltonian::verify_solution;
///
/// let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
/// assert!(verify_solution(&g, &[2, 1, 0, 3]));
/// assert!(!verify_solution(&g, &[0, 2, 1, 3]));
/// ```
pub fn verify_solution(graph: &Graph, solution: &[usize]) -> bool {
    let n = graph.num_vertices();
    if n < 3 || solution.len() != n {
        return false;
    }

    let mut seen = bitvec![0; n];
    for &v in solution {
        if v >= n || seen[v] {
            return false;
        }
        seen.set(v, true);
    }

    solution
        .iter()
        .zip(solution.iter().cycle().skip(1))
        .all(|(&u, &v)| graph.has_edge(u, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Graph {
        Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap()
    }

    #[test]
    fn test_valid_cycles() {
        let g = square();
        assert!(verify_solution(&g, &[0, 1, 2, 3]));
        assert!(verify_solution(&g, &[3, 2, 1, 0]));
        assert!(verify_solution(&g, &[1, 2, 3, 0]));
    }

    #[test]
    fn test_rejects_non_permutations() {
        let g = square();
        assert!(!verify_solution(&g, &[0, 1, 2]));
        assert!(!verify_solution(&g, &[0, 1, 2, 3, 0]));
        assert!(!verify_solution(&g, &[0, 1, 0, 3]));
        assert!(!verify_solution(&g, &[0, 1, 2, 4]));
    }

    #[test]
    fn test_rejects_missing_closing_edge() {
        let path = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        assert!(!verify_solution(&path, &[0, 1, 2, 3]));
    }

    #[test]
    fn test_tiny_graphs() {
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        assert!(!verify_solution(&g, &[0, 1]));
        assert!(!verify_solution(&Graph::new(0), &[]));
    }
}
