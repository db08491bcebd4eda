//! Graph generators.
//!
//! The random families relabel their vertices with a random permutation at
//! the end, so structure never lines up with vertex numbering. The fixtures
//! at the bottom are deterministic.

use rand::prelude::*;

use super::adjacency::Graph;
use crate::error::{Error, Result};

/// Relabel the vertices of `graph` with a uniformly random permutation.
pub fn random_permute<R: Rng + ?Sized>(graph: &mut Graph, rng: &mut R) -> Result<()> {
    let mut mapping: Vec<usize> = (0..graph.num_vertices()).collect();
    mapping.shuffle(rng);
    graph.permute(&mapping)
}

/// Graph on `n` vertices with `m` distinct edges chosen uniformly.
pub fn random_graph<R: Rng + ?Sized>(n: usize, m: usize, rng: &mut R) -> Result<Graph> {
    let max_edges = n * n.saturating_sub(1) / 2;
    if m > max_edges {
        return Err(Error::InvalidOption(format!(
            "{m} edges do not fit in a simple graph on {n} vertices"
        )));
    }

    let mut graph = Graph::new(n);
    for _ in 0..m {
        let (u, v) = loop {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            if u != v && !graph.has_edge(u, v) {
                break (u, v);
            }
        };
        graph.add_edge(u, v)?;
    }
    Ok(graph)
}

/// Union of random Hamiltonian cycles on `n` vertices.
///
/// `cycles` may be fractional: for `2.5` two full cycles are laid down plus
/// a random path over half the vertices. A fractional part covering fewer
/// than 2 vertices is dropped. Edges already present are skipped, so the
/// result is always Hamiltonian when `cycles >= 1`.
///
/// # Example
/// ```
/// use hamcycle::graph::generate::add_cycle_graph;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let g = add_cycle_graph(20, 1.5, &mut rng).unwrap();
/// assert!(g.num_edges() >= 20);
/// assert!((0..20).all(|v| g.degree(v) >= 2));
/// ```
pub fn add_cycle_graph<R: Rng + ?Sized>(n: usize, cycles: f64, rng: &mut R) -> Result<Graph> {
    if n < 3 {
        return Err(Error::InvalidOption(format!(
            "add-cycle graph needs at least 3 vertices, got {n}"
        )));
    }
    if !cycles.is_finite() || cycles < 0.0 {
        return Err(Error::InvalidOption(format!(
            "invalid number of cycles {cycles}"
        )));
    }

    let whole = cycles.trunc() as usize;
    let fraction = cycles - cycles.trunc();
    // number of path edges in the partial round
    let mut partial = 0;
    if fraction > 0.0 {
        partial = ((fraction + 1e-5) * n as f64) as usize;
        if partial < 2 {
            partial = 0;
        }
    }

    let mut graph = Graph::new(n);
    let mut order: Vec<usize> = (0..n).collect();
    let rounds = whole + usize::from(partial > 0);
    for round in 0..rounds {
        order.shuffle(rng);
        let last_partial = partial > 0 && round + 1 == rounds;
        let path_edges = if last_partial { partial.min(n - 1) } else { n - 1 };
        for i in 1..=path_edges {
            add_if_absent(&mut graph, order[i - 1], order[i])?;
        }
        if !last_partial {
            add_if_absent(&mut graph, order[0], order[n - 1])?;
        }
    }

    random_permute(&mut graph, rng)?;
    Ok(graph)
}

fn add_if_absent(graph: &mut Graph, u: usize, v: usize) -> Result<()> {
    if !graph.has_edge(u, v) {
        graph.add_edge(u, v)?;
    }
    Ok(())
}

/// Moves of a generalized `(a, b)` knight on a `width` by `height` board.
///
/// Cell `(x, y)` is vertex `x + y * width` before relabelling.
pub fn knight_tour_graph<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    (a, b): (usize, usize),
    rng: &mut R,
) -> Result<Graph> {
    let n = width * height;
    let mut graph = Graph::new(n);
    let (a, b) = (a as isize, b as isize);
    let moves = [
        (a, b),
        (b, a),
        (a, -b),
        (b, -a),
        (-a, b),
        (-b, a),
        (-a, -b),
        (-b, -a),
    ];
    let on_board = |x: isize, y: isize| {
        (0..width as isize).contains(&x) && (0..height as isize).contains(&y)
    };

    for v in 0..n {
        let (x, y) = ((v % width) as isize, (v / width) as isize);
        for (dx, dy) in moves {
            let (tx, ty) = (x + dx, y + dy);
            if !on_board(tx, ty) {
                continue;
            }
            let w = tx as usize + ty as usize * width;
            if w != v {
                add_if_absent(&mut graph, v, w)?;
            }
        }
    }

    random_permute(&mut graph, rng)?;
    Ok(graph)
}

/// Edges of the 7-vertex crossroads gadget; vertices 0 and 6 link outward.
const CROSSROADS: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (1, 6),
    (2, 3),
    (2, 4),
    (2, 5),
    (3, 4),
    (3, 5),
    (4, 5),
];

/// Ring of `subgraphs` crossroads gadgets, each joined to the next.
pub fn crossroads_graph<R: Rng + ?Sized>(subgraphs: usize, rng: &mut R) -> Result<Graph> {
    if subgraphs == 0 {
        return Err(Error::InvalidOption(
            "crossroads graph needs at least one subgraph".to_string(),
        ));
    }

    let n = 7 * subgraphs;
    let mut graph = Graph::new(n);
    for base in (0..n).step_by(7) {
        for (u, v) in CROSSROADS {
            graph.add_edge(base + u, base + v)?;
        }
        if base != 0 {
            graph.add_edge(base - 1, base)?;
        }
    }
    graph.add_edge(n - 1, 0)?;

    random_permute(&mut graph, rng)?;
    Ok(graph)
}

/// Cycle `0 - 1 - ... - (n-1) - 0`.
pub fn ring(n: usize) -> Result<Graph> {
    if n < 3 {
        return Err(Error::InvalidOption(format!(
            "a ring needs at least 3 vertices, got {n}"
        )));
    }
    let edges: Vec<_> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    Graph::from_edges(n, &edges)
}

/// Complete graph on `n` vertices.
pub fn complete(n: usize) -> Result<Graph> {
    let mut graph = Graph::new(n);
    for u in 0..n {
        for v in (u + 1)..n {
            graph.add_edge(u, v)?;
        }
    }
    Ok(graph)
}

/// The Petersen graph: 3-regular, 3-connected and not Hamiltonian.
///
/// Outer 5-cycle on `0..5`, inner pentagram on `5..10`, spokes `i - i+5`.
pub fn petersen() -> Result<Graph> {
    let mut graph = Graph::new(10);
    for i in 0..5 {
        graph.add_edge(i, (i + 1) % 5)?;
        graph.add_edge(i + 5, (i + 2) % 5 + 5)?;
        graph.add_edge(i, i + 5)?;
    }
    Ok(graph)
}
