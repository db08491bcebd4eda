//! End-to-end scenarios: graphs built or parsed, pruned and searched through
//! the public API only.

use std::io::Cursor;
use std::time::Duration;

use hamcycle::graph::{
    generate, read_graph, write_graph, EdgeLog, EdgeRemoval, Graph, UndoScope, WorkingGraph,
};
use hamcycle::hamiltonian::{
    backtrack_search, heuristic_search, plain_backtrack_search, prune_graph, solve, verify_solution,
    Algorithm, BacktrackOptions, DegreeOrder, HeuristicOptions, Path, PruneFlags, PruneOutcome,
    SearchOutcome, SolverOptions, VisitPolicy, MAX_SEARCH_VERTICES,
};
use hamcycle::Error;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

fn bridged_triangles() -> Graph {
    Graph::from_edges(
        6,
        &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)],
    )
    .unwrap()
}

fn assert_found(graph: &Graph, outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::Found(cycle) => {
            assert_eq!(cycle.len(), graph.num_vertices());
            assert!(verify_solution(graph, cycle), "bad cycle {cycle:?}");
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

mod exact_search {
    use super::*;

    #[test]
    fn test_ring_is_its_own_cycle() {
        let g = generate::ring(5).unwrap();
        let report = backtrack_search(&g, &BacktrackOptions::default(), &mut rng(1)).unwrap();
        assert_found(&g, &report.outcome);
        assert!(report.stats.nodes <= 5);
    }

    #[test]
    fn test_bridge_is_infeasible() {
        let g = bridged_triangles();
        let options = BacktrackOptions::default();
        for report in [
            backtrack_search(&g, &options, &mut rng(2)).unwrap(),
            plain_backtrack_search(&g, &options, &mut rng(2)).unwrap(),
        ] {
            assert_eq!(report.outcome, SearchOutcome::NotExist);
            assert_eq!(report.stats.nodes, 0);
        }
    }

    #[test]
    fn test_petersen_has_no_cycle() {
        let g = generate::petersen().unwrap();
        for degree_order in [DegreeOrder::Unsorted, DegreeOrder::Min, DegreeOrder::Max] {
            let options = BacktrackOptions {
                degree_order,
                ..BacktrackOptions::default()
            };
            let report = backtrack_search(&g, &options, &mut rng(3)).unwrap();
            assert_eq!(report.outcome, SearchOutcome::NotExist, "{degree_order:?}");
            assert!(!report.stats.hit_node_limit);
        }
        let report = plain_backtrack_search(&g, &BacktrackOptions::default(), &mut rng(3)).unwrap();
        assert_eq!(report.outcome, SearchOutcome::NotExist);
    }

    #[test]
    fn test_node_limit_reports_not_found() {
        let g = generate::complete(5).unwrap();
        let options = BacktrackOptions {
            node_limit: 2,
            ..BacktrackOptions::default()
        };
        let report = plain_backtrack_search(&g, &options, &mut rng(4)).unwrap();
        assert_eq!(report.outcome, SearchOutcome::NotFound);
        assert!(report.stats.hit_node_limit);
        assert!(!report.stats.hit_time_limit);
    }

    #[test]
    fn test_time_limit_is_not_a_proof() {
        let g = generate::petersen().unwrap();
        let options = BacktrackOptions {
            time_limit: Some(Duration::ZERO),
            ..BacktrackOptions::default()
        };
        let report = backtrack_search(&g, &options, &mut rng(4)).unwrap();
        assert_eq!(report.outcome, SearchOutcome::NotFound);
        assert!(report.stats.hit_time_limit);

        let options = BacktrackOptions {
            restart_factor: Some(2),
            ..options
        };
        let report = backtrack_search(&g, &options, &mut rng(4)).unwrap();
        assert_eq!(report.outcome, SearchOutcome::NotFound);
        assert!(report.stats.hit_time_limit);
    }

    #[test]
    fn test_triangle() {
        let g = generate::complete(3).unwrap();
        let report = backtrack_search(&g, &BacktrackOptions::default(), &mut rng(4)).unwrap();
        assert_found(&g, &report.outcome);
        let report = heuristic_search(&g, &HeuristicOptions::default(), &mut rng(4)).unwrap();
        assert_found(&g, &report.outcome);
    }

    #[test]
    fn test_large_graph_rejected() {
        let g = generate::ring(MAX_SEARCH_VERTICES + 1).unwrap();
        assert!(matches!(
            backtrack_search(&g, &BacktrackOptions::default(), &mut rng(4)),
            Err(Error::TooManyVertices { .. })
        ));
        // the heuristic has no recursion and takes any size
        let report = heuristic_search(&g, &HeuristicOptions::default(), &mut rng(4)).unwrap();
        assert_found(&g, &report.outcome);
    }

    #[test]
    fn test_restart_finds_generated_cycles() {
        let mut gen_rng = rng(5);
        let options = BacktrackOptions {
            degree_order: DegreeOrder::Min,
            restart_factor: Some(2),
            ..BacktrackOptions::default()
        };
        for n in [30, 60] {
            let g = generate::add_cycle_graph(n, 2.5, &mut gen_rng).unwrap();
            let report = backtrack_search(&g, &options, &mut rng(n as u64)).unwrap();
            assert_found(&g, &report.outcome);
        }
    }

    #[test]
    fn test_crossroads_chain() {
        let g = generate::crossroads_graph(4, &mut rng(6)).unwrap();
        let report = backtrack_search(&g, &BacktrackOptions::default(), &mut rng(7)).unwrap();
        assert_found(&g, &report.outcome);
    }

    #[test]
    fn test_caller_graph_untouched() {
        let g = generate::knight_tour_graph(5, 6, (1, 2), &mut rng(8)).unwrap();
        let before = g.clone();
        let options = BacktrackOptions {
            node_limit: 500,
            ..BacktrackOptions::default()
        };
        backtrack_search(&g, &options, &mut rng(9)).unwrap();
        assert_eq!(g, before);
    }
}

mod heuristic {
    use super::*;

    #[test]
    fn test_complete_graph_every_policy() {
        let g = generate::complete(5).unwrap();
        let smart = HeuristicOptions {
            visit: VisitPolicy::Smart,
            ..HeuristicOptions::default()
        };
        for options in [
            HeuristicOptions::default(),
            smart,
            HeuristicOptions::default().with_cycle_extension(),
        ] {
            let report = heuristic_search(&g, &options, &mut rng(10)).unwrap();
            assert_found(&g, &report.outcome);
        }
    }

    #[test]
    fn test_never_claims_nonexistence_after_search() {
        let g = generate::petersen().unwrap();
        let report = heuristic_search(&g, &HeuristicOptions::default(), &mut rng(11)).unwrap();
        assert_eq!(report.outcome, SearchOutcome::NotFound);
        assert_eq!(report.stats.retries, 10);

        let report =
            heuristic_search(&bridged_triangles(), &HeuristicOptions::default(), &mut rng(11))
                .unwrap();
        assert_eq!(report.outcome, SearchOutcome::NotExist);
    }

    #[test]
    fn test_time_limit_before_first_start() {
        let g = generate::petersen().unwrap();
        let options = HeuristicOptions {
            time_limit: Some(Duration::ZERO),
            ..HeuristicOptions::default()
        };
        let report = heuristic_search(&g, &options, &mut rng(12)).unwrap();
        assert_eq!(report.outcome, SearchOutcome::NotFound);
        assert!(report.stats.hit_time_limit);
        assert_eq!(report.stats.retries, 0);
        assert_eq!(report.stats.nodes, 0);
    }

    #[test]
    fn test_generated_graphs() {
        let mut gen_rng = rng(12);
        let options = HeuristicOptions::default().with_cycle_extension();
        for _ in 0..5 {
            let g = generate::add_cycle_graph(80, 3.0, &mut gen_rng).unwrap();
            let report = heuristic_search(&g, &options, &mut rng(13)).unwrap();
            assert_ne!(report.outcome, SearchOutcome::NotExist);
            if let Some(cycle) = report.outcome.solution() {
                assert!(verify_solution(&g, cycle));
            }
        }
    }
}

mod building_blocks {
    use super::*;

    #[test]
    fn test_prune_reaches_fixed_point() {
        // degree-2 vertex 0 forces the chain 1-0-2, so (1, 2) would close a
        // triangle and has to go; nothing else is decided
        let g = Graph::from_edges(
            5,
            &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 4), (3, 4), (1, 4), (2, 3)],
        )
        .unwrap();
        let (outcome, pruned, removed) = prune_graph(&g, PruneFlags::ALL).unwrap();
        assert_eq!(outcome, PruneOutcome::Inconclusive);
        assert_eq!(removed, 1);
        assert!(!pruned.has_edge(1, 2));
        assert_eq!(pruned.num_edges() + removed, g.num_edges());

        let (again, twice, removed) = prune_graph(&pruned, PruneFlags::ALL).unwrap();
        assert_eq!(again, PruneOutcome::Inconclusive);
        assert_eq!(removed, 0);
        assert_eq!(twice, pruned);
    }

    #[test]
    fn test_prune_keeps_cycles_of_generated_graphs() {
        let mut gen_rng = rng(14);
        for _ in 0..10 {
            let g = generate::add_cycle_graph(40, 1.5, &mut gen_rng).unwrap();
            let (outcome, pruned, removed) = prune_graph(&g, PruneFlags::ALL).unwrap();
            assert_ne!(outcome, PruneOutcome::Infeasible);
            assert_eq!(pruned.num_edges() + removed, g.num_edges());
            let options = BacktrackOptions {
                degree_order: DegreeOrder::Min,
                restart_factor: Some(2),
                ..BacktrackOptions::default()
            };
            let report = backtrack_search(&pruned, &options, &mut rng(15)).unwrap();
            assert_found(&g, &report.outcome);
        }
    }

    #[test]
    fn test_prune_letters() {
        assert_eq!("bcoa".parse::<PruneFlags>().unwrap(), PruneFlags::ALL);
        assert_eq!("N".parse::<PruneFlags>().unwrap(), PruneFlags::NONE);
        assert_eq!(PruneFlags::ALL.to_string(), "BCOA");
        assert!(matches!(
            "BX".parse::<PruneFlags>(),
            Err(Error::InvalidOption(_))
        ));
    }

    #[test]
    fn test_undo_scope_restores_adjacency() {
        let g = generate::complete(6).unwrap();
        let mut work = WorkingGraph::new(g.clone());
        {
            let mut scope = UndoScope::enter(&mut work);
            let (graph, stack) = scope.graph_and_stack();
            for (u, v) in [(0, 1), (2, 5), (3, 4)] {
                assert_eq!(graph.remove_edge(u, v).unwrap(), EdgeRemoval::Removed);
                stack.push(u, v);
            }
            assert_eq!(scope.graph.num_edges(), 12);
        }
        assert!(work.stack.is_empty());
        assert_eq!(work.graph.num_edges(), g.num_edges());
        for (u, v) in g.edge_list() {
            assert!(work.graph.has_edge(u, v));
        }
    }

    #[test]
    fn test_rotation_keeps_path_valid() {
        let g = generate::complete(6).unwrap();
        let mut path = Path::new(6);
        for v in 0..6 {
            path.push(v);
        }
        path.rotate(2);
        assert_eq!(path.order(), vec![0, 1, 2, 5, 4, 3]);
        assert_eq!(path.end_vertex(), 3);
        assert!(path.validate(&g));
        assert!(path.close_cycle(&g));
        assert!(verify_solution(&g, &path.order()));
    }

    #[test]
    fn test_graph_text_round_trip() {
        let g = generate::crossroads_graph(2, &mut rng(15)).unwrap();
        let mut buf = Vec::new();
        write_graph(&mut buf, &g, "two crossroads").unwrap();
        let back = read_graph(Cursor::new(buf)).unwrap();
        assert_eq!(back, g);

        let bad = "3\n0 2 1 2\n1 1 0\n2 1 0\n";
        assert!(matches!(
            read_graph(Cursor::new(bad)),
            Err(Error::InconsistentEdge(..))
        ));
        assert!(matches!(
            read_graph(Cursor::new("2\n0 1 1\n")),
            Err(Error::Parse { .. })
        ));
    }
}

#[test]
fn test_solve_all_algorithms() {
    let g = generate::add_cycle_graph(16, 3.0, &mut rng(16)).unwrap();
    for algorithm in [Algorithm::Backtrack, Algorithm::PlainBacktrack] {
        let options = SolverOptions {
            algorithm,
            ..SolverOptions::default()
        };
        let report = solve(&g, &options, &mut rng(17)).unwrap();
        assert_found(&g, &report.outcome);
    }

    let options = SolverOptions {
        algorithm: Algorithm::Heuristic,
        ..SolverOptions::default()
    };
    let report = solve(&bridged_triangles(), &options, &mut rng(18)).unwrap();
    assert_eq!(report.outcome, SearchOutcome::NotExist);
}
