//! hamcycle: load or generate a graph and search it for a Hamiltonian cycle.

use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{ArgAction, ArgGroup, CommandFactory, Parser, ValueEnum};
use hamcycle::graph::{generate, read_graph_file, write_graph_file, Graph};
use hamcycle::hamiltonian::{
    solve, Algorithm, Completion, DegreeOrder, InitialVertex, PruneFlags, SearchReport,
    SolverOptions, VisitPolicy,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::{fmt, EnvFilter};

/// Hamiltonian cycle search by pruning backtrack or rotation heuristic
#[derive(Parser)]
#[command(name = "hamcycle", version, about)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["graph", "random", "addcycle", "knight", "crossroads"])
))]
struct Cli {
    /// Read the graph from a .graph file
    #[arg(long, value_name = "FILE")]
    graph: Option<PathBuf>,

    /// Random graph with N vertices and M edges
    #[arg(long, num_args = 2, value_names = ["N", "M"])]
    random: Option<Vec<usize>>,

    /// Union of C random Hamiltonian cycles on N vertices (C may be fractional)
    #[arg(long, num_args = 2, value_names = ["N", "C"])]
    addcycle: Option<Vec<String>>,

    /// Knight moves on a W by H board
    #[arg(long, num_args = 2, value_names = ["W", "H"])]
    knight: Option<Vec<usize>>,

    /// Ring of K crossroads gadgets
    #[arg(long, value_name = "K")]
    crossroads: Option<usize>,

    /// Search algorithm
    #[arg(long, value_enum, default_value_t = AlgArg::Backtrack)]
    alg: AlgArg,

    /// Pruning rules as letters from BCOA, or N for none
    #[arg(long, value_name = "FLAGS", default_value = "BCOA")]
    prune: PruneFlags,

    /// Order backtracking candidates by degree
    #[arg(long, value_enum, default_value_t = DegSort::Rand)]
    degsort: DegSort,

    /// How backtracking picks its initial vertex
    #[arg(long, value_enum, default_value_t = InitVert::Random)]
    initvert: InitVert,

    /// Iterated restart, multiplying the node budget by K each round
    #[arg(long, value_name = "K")]
    restart: Option<u64>,

    /// Node budget for backtracking, 0 for none
    #[arg(long, value_name = "N", default_value_t = 0)]
    max_nodes: u64,

    /// CPU time budget in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    time_limit: Option<Duration>,

    /// Heuristic: prefer degree-2 unvisited neighbors and keep forced edges
    #[arg(long)]
    smart_visit: bool,

    /// Heuristic: rotate once to close the cycle
    #[arg(long)]
    smart_complete: bool,

    /// Heuristic: break closed short cycles to reach unvisited vertices
    #[arg(long)]
    cycle_extend: bool,

    /// Write the graph to FILE before searching
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Seed for graph generation and search
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity level (-v logs pruning decisions, -vv everything)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgArg {
    Plain,
    Backtrack,
    Heuristic,
}

#[derive(Clone, Copy, ValueEnum)]
enum DegSort {
    Rand,
    Min,
    Max,
}

#[derive(Clone, Copy, ValueEnum)]
enum InitVert {
    Random,
    #[value(name = "maxdeg")]
    MaxDeg,
    #[value(name = "randeg")]
    RanDeg,
    First,
}

enum Source {
    File(PathBuf),
    Random(usize, usize),
    AddCycle(usize, f64),
    Knight(usize, usize),
    Crossroads(usize),
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{e}"))
}

impl Cli {
    fn options(&self) -> SolverOptions {
        let mut options = SolverOptions {
            algorithm: match self.alg {
                AlgArg::Plain => Algorithm::PlainBacktrack,
                AlgArg::Backtrack => Algorithm::Backtrack,
                AlgArg::Heuristic => Algorithm::Heuristic,
            },
            ..SolverOptions::default()
        };

        let backtrack = &mut options.backtrack;
        backtrack.prune_flags = self.prune;
        backtrack.degree_order = match self.degsort {
            DegSort::Rand => DegreeOrder::Unsorted,
            DegSort::Min => DegreeOrder::Min,
            DegSort::Max => DegreeOrder::Max,
        };
        backtrack.initial_vertex = match self.initvert {
            InitVert::Random => InitialVertex::Random,
            InitVert::MaxDeg => InitialVertex::MaxDegree,
            InitVert::RanDeg => InitialVertex::DegreeWeighted,
            InitVert::First => InitialVertex::First,
        };
        backtrack.restart_factor = self.restart;
        backtrack.node_limit = self.max_nodes;
        backtrack.time_limit = self.time_limit;

        let heuristic = &mut options.heuristic;
        if self.smart_visit {
            heuristic.visit = VisitPolicy::Smart;
        }
        if self.smart_complete {
            heuristic.completion = Completion::Rotate;
        }
        if self.cycle_extend {
            *heuristic = heuristic.clone().with_cycle_extension();
        }
        heuristic.time_limit = self.time_limit;
        options
    }

    /// The graph source; the argument group guarantees exactly one.
    fn source(&self) -> Source {
        if let Some(path) = &self.graph {
            return Source::File(path.clone());
        }
        if let Some(nm) = &self.random {
            return Source::Random(nm[0], nm[1]);
        }
        if let Some(wh) = &self.knight {
            return Source::Knight(wh[0], wh[1]);
        }
        if let Some(k) = self.crossroads {
            return Source::Crossroads(k);
        }

        let nc = self.addcycle.as_deref().unwrap_or_default();
        match (nc.first().map(|n| n.parse()), nc.get(1).map(|c| c.parse())) {
            (Some(Ok(n)), Some(Ok(c))) => Source::AddCycle(n, c),
            _ => Cli::command()
                .error(
                    ErrorKind::InvalidValue,
                    "--addcycle takes a vertex count and a number of cycles",
                )
                .exit(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let options = cli.options();
    let source = cli.source();
    let mut rng = match cli.seed {
        Some(s) => ChaCha20Rng::seed_from_u64(s),
        None => ChaCha20Rng::from_entropy(),
    };

    let graph = match load(&source, &mut rng) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(path) = &cli.save {
        if let Err(e) = write_graph_file(path, &graph, &describe(&source)) {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }

    print_summary(&graph);
    match solve(&graph, &options, &mut rng) {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn load(source: &Source, rng: &mut ChaCha20Rng) -> hamcycle::Result<Graph> {
    match *source {
        Source::File(ref path) => read_graph_file(path),
        Source::Random(n, m) => generate::random_graph(n, m, rng),
        Source::AddCycle(n, c) => generate::add_cycle_graph(n, c, rng),
        Source::Knight(w, h) => generate::knight_tour_graph(w, h, (1, 2), rng),
        Source::Crossroads(k) => generate::crossroads_graph(k, rng),
    }
}

fn describe(source: &Source) -> String {
    match source {
        Source::File(path) => format!("copy of {}", path.display()),
        Source::Random(n, m) => format!("random graph: {n} vertices, {m} edges"),
        Source::AddCycle(n, c) => format!("add-cycle graph: {n} vertices, {c} cycles"),
        Source::Knight(w, h) => format!("knight tour graph: {w} x {h} board"),
        Source::Crossroads(k) => format!("crossroads graph: {k} subgraphs"),
    }
}

fn print_summary(graph: &Graph) {
    let s = graph.degree_summary();
    println!(
        "vertices: {}  edges: {}  degree min/max: {}/{}  mean: {:.3}  std dev: {:.3}",
        graph.num_vertices(),
        s.num_edges,
        s.min_degree,
        s.max_degree,
        s.mean_degree,
        s.std_dev_degree
    );
    let histogram: Vec<String> = s
        .histogram
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(d, count)| format!("{d}:{count}"))
        .collect();
    println!("degree histogram: {}", histogram.join(" "));
}

fn print_report(report: &SearchReport) {
    let stats = &report.stats;
    println!("hamiltonian cycle {}", report.outcome);
    println!(
        "nodes: {}  edges pruned: {} (initial {})  retries: {}  cpu time: {:.3}s",
        stats.nodes,
        stats.edges_pruned,
        stats.initial_pruned,
        stats.retries,
        stats.elapsed.as_secs_f64()
    );
    if stats.hit_node_limit {
        println!("node limit reached");
    }
    if stats.hit_time_limit {
        println!("time limit reached");
    }
    if let Some(cycle) = report.outcome.solution() {
        let order: Vec<String> = cycle.iter().map(usize::to_string).collect();
        println!("cycle: {}", order.join(" "));
    }
}
