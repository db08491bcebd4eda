//! Randomized rotation search in the manner of Posa.
//!
//! A path is grown from a start vertex by random moves. A move to an
//! unvisited neighbor extends the path; a move to a visited neighbor rotates
//! the path so a different vertex becomes the end. A vertex is not rotated
//! into the end twice at the same path length, so every start terminates.
//! The search is incomplete: `NotFound` says nothing about existence.

use rand::prelude::*;

use super::limits::Limits;
use super::options::{Completion, HeuristicOptions, VisitPolicy};
use super::outcome::{SearchOutcome, SearchReport, SearchStats};
use super::path::Path;
use super::prune::{prune, PruneFlags, PruneOutcome};
use crate::error::Result;
use crate::graph::Graph;

/// Next move of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Append(usize),
    /// Rotate at the slot of this visited neighbor of the end.
    Rotate(usize),
}

/// Result of trying to break a cycle open toward an unvisited vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extension {
    /// The path was reordered; this unvisited vertex is adjacent to the end.
    Target(usize),
    /// A cycle formed but no edge of it leads anywhere new.
    Stuck,
    /// The path could not be closed into a cycle.
    NoCycle,
}

struct Walk<'a, R: Rng + ?Sized> {
    graph: &'a Graph,
    options: &'a HeuristicOptions,
    path: Path,
    rng: &'a mut R,
    steps: u64,
}

/// Search for a Hamiltonian cycle with the rotation heuristic.
///
/// The graph is cloned and pruned with every rule; if that proves the cycle
/// impossible the result is `NotExist`. Otherwise a walk is started from
/// vertex 0, 1, ... in turn until one closes a cycle. `retries` counts the
/// failed starts before the successful one.
///
/// # Example
/// ```
/// use hamcycle::graph::generate;
/// use hamcycle::hamiltonian::{heuristic_search, HeuristicOptions};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let g = generate::complete(6).unwrap();
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let options = HeuristicOptions::default().with_cycle_extension();
/// let report = heuristic_search(&g, &options, &mut rng).unwrap();
/// assert!(report.outcome.is_found());
/// assert_eq!(report.stats.retries, 0);
/// ```
pub fn heuristic_search<R: Rng + ?Sized>(
    graph: &Graph,
    options: &HeuristicOptions,
    rng: &mut R,
) -> Result<SearchReport> {
    let mut limits = Limits::new(0, options.time_limit);
    let mut stats = SearchStats::default();
    let mut work = graph.clone();
    let pruned = prune(&mut work, PruneFlags::ALL, None)?;
    stats.initial_pruned = pruned.removed;

    let n = work.num_vertices();
    let mut outcome = SearchOutcome::NotFound;
    if n == 0 || pruned.outcome == PruneOutcome::Infeasible {
        outcome = SearchOutcome::NotExist;
    } else {
        stats.retries = n;
        for start in 0..n {
            if limits.check_time() {
                stats.retries = start;
                break;
            }
            let mut walk = Walk {
                graph: &work,
                options,
                path: Path::with_start(n, start),
                rng: &mut *rng,
                steps: 0,
            };
            let found = walk.run();
            stats.nodes += walk.steps;
            if found {
                outcome = SearchOutcome::Found(walk.path.order());
                stats.retries = start;
                break;
            }
        }
    }

    stats.elapsed = limits.elapsed();
    stats.hit_time_limit = limits.hit_time_limit();
    Ok(SearchReport::new(outcome, stats))
}

impl<R: Rng + ?Sized> Walk<'_, R> {
    /// Walk until the path closes into a Hamiltonian cycle (true) or no
    /// move is left (false).
    fn run(&mut self) -> bool {
        let n = self.graph.num_vertices();
        loop {
            self.steps += 1;
            let Some(next) = self.choose_move() else {
                return false;
            };
            match next {
                Move::Append(v) => self.path.push(v),
                Move::Rotate(x) => {
                    if let Some(slot) = self.path.slot_of(x) {
                        self.path.rotate(slot);
                    }
                }
            }

            if self.path.len() == n {
                let closed = match self.options.completion {
                    Completion::Simple => self
                        .graph
                        .has_edge(self.path.end_vertex(), self.path.start_vertex()),
                    Completion::Rotate => self.path.close_cycle(self.graph),
                };
                if closed {
                    return true;
                }
            }
        }
    }

    fn choose_move(&mut self) -> Option<Move> {
        let end = self.path.end_vertex();
        if self.graph.degree(end) == 0 {
            return None;
        }

        if self.options.visit == VisitPolicy::Smart {
            if let Some(v) = self.smart_target(end) {
                return Some(Move::Append(v));
            }
            if self.options.cycle_extension {
                match self.extend_cycle() {
                    Extension::Target(v) => return Some(Move::Append(v)),
                    Extension::Stuck => return None,
                    Extension::NoCycle => {}
                }
            }
        }
        self.random_move(end)
    }

    /// An unvisited degree-2 neighbor, else any unvisited neighbor scanned
    /// from a random offset.
    fn smart_target(&mut self, end: usize) -> Option<usize> {
        let nbrs = self.graph.neighbors(end);
        if let Some(&v) = nbrs
            .iter()
            .find(|&&v| self.graph.degree(v) == 2 && !self.path.contains(v))
        {
            return Some(v);
        }
        let offset = self.rng.gen_range(0..nbrs.len());
        (0..nbrs.len())
            .map(|i| nbrs[(offset + i) % nbrs.len()])
            .find(|&v| !self.path.contains(v))
    }

    /// First acceptable neighbor from a random offset.
    ///
    /// A visited neighbor `x` is acceptable if rotating at it would make
    /// its successor `y` the end for the first time at this length, and,
    /// under the smart policy, if the dropped edge `x-y` is not forced.
    fn random_move(&mut self, end: usize) -> Option<Move> {
        let nbrs = self.graph.neighbors(end);
        let len = self.path.len();
        let offset = self.rng.gen_range(0..nbrs.len());
        for i in 0..nbrs.len() {
            let x = nbrs[(offset + i) % nbrs.len()];
            let Some(y) = self.path.successor(x) else {
                if !self.path.contains(x) {
                    return Some(Move::Append(x));
                }
                continue;
            };
            let forced = self.options.visit == VisitPolicy::Smart && self.graph.degree(y) == 2;
            if self.path.ended(y) != len && !forced {
                return Some(Move::Rotate(x));
            }
        }
        None
    }

    /// Close the path into a cycle and break it at a random unforced edge
    /// whose far vertex has an unvisited neighbor.
    fn extend_cycle(&mut self) -> Extension {
        if !self.path.close_cycle(self.graph) {
            return Extension::NoCycle;
        }

        let order = self.path.order();
        let len = order.len();
        let offset = self.rng.gen_range(0..len);
        for k in 0..len {
            let i = (offset + k) % len;
            let (a, b) = (order[i], order[(i + 1) % len]);
            if self.graph.degree(a) == 2 || self.graph.degree(b) == 2 {
                continue;
            }
            let target = self
                .graph
                .neighbors(b)
                .iter()
                .copied()
                .find(|&w| !self.path.contains(w));
            if let Some(target) = target {
                self.path.break_cycle(i + 1);
                return Extension::Target(target);
            }
        }
        Extension::Stuck
    }
}
