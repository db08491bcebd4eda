//! Exact backtracking search with pruning.
//!
//! The path grows one vertex at a time from a chosen initial vertex. After
//! each step the previous end's remaining edges to unvisited vertices are
//! dead, so they are removed and pruning is re-run on what is left; all of
//! it is undone when the step is retracted.

use std::cmp::Reverse;

use log::info;
use rand::prelude::*;

use super::limits::Limits;
use super::options::{select_initial_vertex, BacktrackOptions, DegreeOrder, InitialVertex};
use super::outcome::{SearchOutcome, SearchReport, SearchStats};
use super::path::Path;
use super::prune::{prune, PruneFlags, PruneOutcome};
use crate::error::{Error, Result};
use crate::graph::{EdgeLog, EdgeRemoval, EdgeStack, Graph, UndoScope};

/// Largest graph the backtracking searches accept.
///
/// The search recurses once per path vertex, so the path length is bounded
/// to keep the recursion within a few megabytes of stack. The heuristic
/// has no such bound.
pub const MAX_SEARCH_VERTICES: usize = 1600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Found,
    NotExist,
    NotFound,
}

struct SearchState<'a, R: Rng + ?Sized> {
    /// Caller's graph; full paths are closed against it.
    original: &'a Graph,
    graph: Graph,
    stack: EdgeStack,
    path: Path,
    limits: Limits,
    nodes: u64,
    pruned: usize,
    flags: PruneFlags,
    order: DegreeOrder,
    rng: &'a mut R,
}

impl<R: Rng + ?Sized> EdgeLog for SearchState<'_, R> {
    fn graph_and_stack(&mut self) -> (&mut Graph, &mut EdgeStack) {
        (&mut self.graph, &mut self.stack)
    }
}

/// Search for a Hamiltonian cycle by backtracking with pruning.
///
/// The caller's graph is cloned and pruned with every rule first; if that
/// proves the cycle impossible the report is `NotExist` with zero nodes.
/// With `restart_factor` set the search runs in rounds of growing node
/// budgets until it finds a cycle, proves there is none, or hits the time
/// limit.
///
/// # Example
/// ```
/// use hamcycle::graph::generate;
/// use hamcycle::hamiltonian::{backtrack_search, verify_solution, BacktrackOptions, SearchOutcome};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let g = generate::complete(5).unwrap();
/// let mut rng = ChaCha20Rng::seed_from_u64(42);
/// let report = backtrack_search(&g, &BacktrackOptions::default(), &mut rng).unwrap();
/// match report.outcome {
///     SearchOutcome::Found(cycle) => assert!(verify_solution(&g, &cycle)),
///     other => panic!("expected a cycle, got {other:?}"),
/// }
/// ```
pub fn backtrack_search<R: Rng + ?Sized>(
    graph: &Graph,
    options: &BacktrackOptions,
    rng: &mut R,
) -> Result<SearchReport> {
    run(graph, options, rng, false)
}

/// Backtracking without pruning or visit ordering inside the recursion.
///
/// Shares the initial pruning pass and the limits with [`backtrack_search`];
/// `degree_order`, `prune_flags` and `restart_factor` are ignored.
pub fn plain_backtrack_search<R: Rng + ?Sized>(
    graph: &Graph,
    options: &BacktrackOptions,
    rng: &mut R,
) -> Result<SearchReport> {
    run(graph, options, rng, true)
}

fn run<R: Rng + ?Sized>(
    graph: &Graph,
    options: &BacktrackOptions,
    rng: &mut R,
    plain: bool,
) -> Result<SearchReport> {
    options.validate()?;
    let n = graph.num_vertices();
    if n > MAX_SEARCH_VERTICES {
        return Err(Error::TooManyVertices {
            vertices: n,
            max: MAX_SEARCH_VERTICES,
        });
    }
    let limits = Limits::new(options.node_limit, options.time_limit);
    let mut stats = SearchStats::default();
    if n == 0 {
        return Ok(finish(SearchOutcome::NotExist, stats, &limits));
    }

    let initial = select_initial_vertex(graph, options.initial_vertex, rng);
    let mut work = graph.clone();
    let mut stack = EdgeStack::new();
    let initial_prune = prune(&mut work, PruneFlags::ALL, Some(&mut stack))?;
    stats.initial_pruned = initial_prune.removed;
    if initial_prune.outcome == PruneOutcome::Infeasible {
        return Ok(finish(SearchOutcome::NotExist, stats, &limits));
    }

    let mut state = SearchState {
        original: graph,
        graph: work,
        stack,
        path: Path::with_start(n, initial),
        limits,
        nodes: 0,
        pruned: 0,
        flags: options.prune_flags,
        order: options.degree_order,
        rng,
    };

    let step = if plain {
        state.extend_plain()
    } else if let Some(factor) = options.restart_factor {
        state.iterated_restart(factor, options.initial_vertex)?
    } else {
        state.extend()?
    };

    stats.nodes = state.nodes;
    stats.edges_pruned = state.pruned;
    let outcome = match step {
        Step::Found => SearchOutcome::Found(state.path.order()),
        Step::NotExist => SearchOutcome::NotExist,
        Step::NotFound => SearchOutcome::NotFound,
    };
    Ok(finish(outcome, stats, &state.limits))
}

fn finish(outcome: SearchOutcome, mut stats: SearchStats, limits: &Limits) -> SearchReport {
    stats.elapsed = limits.elapsed();
    stats.hit_time_limit = limits.hit_time_limit();
    stats.hit_node_limit = limits.node_aborted();
    SearchReport::new(outcome, stats)
}

impl<R: Rng + ?Sized> SearchState<'_, R> {
    /// One recursive entry of the pruning search.
    fn extend(&mut self) -> Result<Step> {
        if self.limits.is_aborted() {
            return Ok(Step::NotFound);
        }
        self.nodes += 1;
        if !self.limits.admit_node(self.nodes) {
            return Ok(Step::NotFound);
        }

        if self.path.len() == self.graph.num_vertices() {
            let closed = self.path.close_cycle(self.original);
            return Ok(if closed { Step::Found } else { Step::NotExist });
        }

        let Some(candidates) = self.visit_list() else {
            return Ok(Step::NotExist);
        };

        for next in candidates {
            let prev_end = self.path.end_slot();
            self.path.push(next);
            let step = {
                let mut scope = UndoScope::enter(&mut *self);
                scope.descend(prev_end)?
            };
            if let Some(step) = step {
                return Ok(step);
            }
            self.path.pop_end(prev_end);
        }

        if self.limits.check_time() {
            return Ok(Step::NotFound);
        }
        Ok(Step::NotExist)
    }

    /// Prune after appending a vertex and recurse.
    ///
    /// Runs inside an [`UndoScope`]; returns the step to report upward, or
    /// `None` to go on with the next candidate.
    fn descend(&mut self, prev_end: usize) -> Result<Option<Step>> {
        let mut removed = 0;
        // the start keeps its edges so the cycle can close
        if self.path.len() > 2 {
            let from = self.path.vertex_at(prev_end);
            let mut i = 0;
            while i < self.graph.degree(from) {
                let w = self.graph.neighbors(from)[i];
                if !self.path.contains(w) && self.remove_logged(from, w)? {
                    removed += 1;
                } else {
                    i += 1;
                }
            }
        }

        let mut outcome = PruneOutcome::Inconclusive;
        if removed > 0 {
            self.pruned += removed;
            let result = prune(&mut self.graph, self.flags, Some(&mut self.stack))?;
            self.pruned += result.removed;
            outcome = result.outcome;
        }

        if outcome != PruneOutcome::Infeasible {
            if self.extend()? == Step::Found {
                return Ok(Some(Step::Found));
            }
            if self.limits.node_aborted() {
                return Ok(Some(Step::NotFound));
            }
        }

        if self.limits.check_time() {
            return Ok(Some(Step::NotFound));
        }
        Ok(None)
    }

    fn remove_logged(&mut self, u: usize, v: usize) -> Result<bool> {
        match self.graph.remove_edge(u, v)? {
            EdgeRemoval::Removed => {
                self.stack.push(u, v);
                Ok(true)
            }
            EdgeRemoval::NotFound => Ok(false),
        }
    }

    /// Candidates for the next vertex, or `None` if two unvisited degree-2
    /// neighbors make the current path a dead end.
    fn visit_list(&mut self) -> Option<Vec<usize>> {
        let end = self.path.end_vertex();
        let mut list: Vec<usize> = self
            .graph
            .neighbors(end)
            .iter()
            .copied()
            .filter(|&w| !self.path.contains(w))
            .collect();

        let forced: Vec<usize> = list
            .iter()
            .copied()
            .filter(|&w| self.graph.degree(w) == 2)
            .collect();
        if forced.len() >= 2 && self.path.len() != 1 {
            return None;
        }
        if forced.len() == 1 {
            return Some(forced);
        }

        let graph = &self.graph;
        match self.order {
            DegreeOrder::Unsorted => {}
            DegreeOrder::Min => {
                list.shuffle(&mut *self.rng);
                list.sort_by_key(|&w| graph.degree(w));
            }
            DegreeOrder::Max => {
                list.shuffle(&mut *self.rng);
                list.sort_by_key(|&w| Reverse(graph.degree(w)));
            }
        }

        // from the start vertex the last choice is covered by the others:
        // any cycle through it is found in reverse from another first step
        if self.path.len() == 1 {
            list.pop();
        }
        Some(list)
    }

    /// Backtracking without pruning; the graph is never modified.
    fn extend_plain(&mut self) -> Step {
        if self.limits.is_aborted() {
            return Step::NotFound;
        }
        self.nodes += 1;
        if !self.limits.admit_node(self.nodes) {
            return Step::NotFound;
        }

        if self.path.len() == self.graph.num_vertices() {
            return if self.path.close_cycle(&self.graph) {
                Step::Found
            } else {
                Step::NotExist
            };
        }

        let end = self.path.end_vertex();
        for i in 0..self.graph.degree(end) {
            let next = self.graph.neighbors(end)[i];
            if self.path.contains(next) {
                continue;
            }
            let prev_end = self.path.end_slot();
            self.path.push(next);
            match self.extend_plain() {
                Step::Found => return Step::Found,
                Step::NotFound => return Step::NotFound,
                Step::NotExist => {}
            }
            if self.limits.check_time() {
                return Step::NotFound;
            }
            self.path.pop_end(prev_end);
        }

        if self.limits.check_time() {
            return Step::NotFound;
        }
        Step::NotExist
    }

    /// Rounds of [`SearchState::extend`] with a node budget of
    /// `factor * n`, multiplied by `factor` after every round that runs out.
    ///
    /// Each round starts from the post-pruning graph with a freshly chosen
    /// initial vertex. Node and prune counts add up over all rounds.
    fn iterated_restart(&mut self, factor: u64, initial_vertex: InitialVertex) -> Result<Step> {
        let n = self.graph.num_vertices();
        let base_graph = self.graph.clone();
        let base_stack = self.stack.clone();
        let mut budget = factor.saturating_mul(n as u64);
        let (mut total_nodes, mut total_pruned) = (0, 0);

        loop {
            self.graph.clone_from(&base_graph);
            self.stack.clone_from(&base_stack);
            let start = select_initial_vertex(&self.graph, initial_vertex, &mut *self.rng);
            self.path = Path::with_start(n, start);
            self.nodes = 0;
            self.pruned = 0;
            self.limits.start_round(budget);

            let step = self.extend()?;
            total_nodes += self.nodes;
            total_pruned += self.pruned;

            if step != Step::NotFound || self.limits.check_time() {
                self.nodes = total_nodes;
                self.pruned = total_pruned;
                return Ok(step);
            }
            budget = budget.saturating_mul(factor);
            info!("increment and restart: maximum nodes limit = {budget}");
        }
    }
}
