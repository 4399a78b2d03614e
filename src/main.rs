use clap::{Parser, ValueEnum};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use flownet::input::{NetworkDescription, UndirectedGraphDescription};
use flownet::{dinic, edmonds_karp, karger, mincost, mincut, stoer_wagner};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
pub struct Cli {
    /// Path to the network file.
    #[arg(short, long)]
    pub input: std::path::PathBuf,
    /// Solver to run.
    #[arg(short = 'a', long, default_value = "dinic")]
    pub solver: Solver,
    /// Source vertex.
    #[arg(short, long, default_value_t = 0)]
    pub source: usize,
    /// Sink vertex (the last vertex if not specified).
    #[arg(short = 'k', long)]
    pub sink: Option<usize>,
    /// Flow target for the min-cost solver (min-cost max-flow if not specified).
    #[arg(short = 'f', long)]
    pub target: Option<i64>,
    /// Number of contraction trials (a high-confidence count if not specified).
    #[arg(short = 'r', long)]
    pub trials: Option<usize>,
    /// Number of threads to use (use all available threads if not specified).
    #[arg(short = 't', long)]
    pub num_of_threads: Option<usize>,
}

#[derive(Parser, Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    EdmondsKarp,
    Dinic,
    MinCost,
    GlobalMinCut,
    RandomizedMinCut,
}

fn run_max_flow(cli: &Cli) -> anyhow::Result<()> {
    let description = NetworkDescription::load(&cli.input)?;
    info!("network loaded: {:?}", description);
    let mut network = description.build()?;
    let sink = cli.sink.unwrap_or(network.vertex_count() - 1);
    let flow = match cli.solver {
        Solver::EdmondsKarp => edmonds_karp::max_flow(&mut network, cli.source, sink)?,
        _ => dinic::max_flow(&mut network, cli.source, sink)?,
    };
    println!("max flow: {flow}");
    let cut = mincut::min_cut(&network, cli.source, sink)?;
    println!("min cut: {}", cut.value);
    for edge in cut.edges.iter().copied() {
        let (from, to) = network.endpoints(edge);
        println!("  {} -> {} ({})", from, to, network.capacity(edge));
    }
    Ok(())
}

fn run_min_cost(cli: &Cli) -> anyhow::Result<()> {
    let description = NetworkDescription::load(&cli.input)?;
    info!("network loaded: {:?}", description);
    let mut network = description.build()?;
    let sink = cli.sink.unwrap_or(network.vertex_count() - 1);
    let (flow, cost) = match cli.target {
        Some(target) => mincost::min_cost_flow(&mut network, cli.source, sink, target)?,
        None => mincost::min_cost_max_flow(&mut network, cli.source, sink)?,
    };
    println!("flow sent: {flow}");
    println!("total cost: {cost}");
    for (from, to, flow) in network.flow_edges() {
        println!("  {} -> {} ({})", from, to, flow);
    }
    Ok(())
}

fn run_global_cut(cli: &Cli) -> anyhow::Result<()> {
    let description = UndirectedGraphDescription::load(&cli.input)?;
    info!("graph loaded: {:?}", description);
    match cli.solver {
        Solver::GlobalMinCut => {
            let cut = stoer_wagner::global_min_cut(description.vertices, &description.edges)?;
            println!("global min cut: {}", cut.value);
            println!("partition: {:?}", cut.partition);
        }
        _ => {
            let trials = cli
                .trials
                .unwrap_or_else(|| karger::suggested_trials(description.vertices));
            info!(trials, "running contraction trials");
            let cut =
                karger::randomized_min_cut(description.vertices, &description.edges, trials)?;
            println!("randomized min cut: {cut}");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("FLOWNET_LOG_LEVEL")
                .from_env_lossy(),
        )
        .init();
    let cli = Cli::parse();
    let thd_cnt = cli.num_of_threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|x| x.get())
            .unwrap_or(1)
    });
    rayon::ThreadPoolBuilder::new()
        .num_threads(thd_cnt)
        .build_global()?;
    match cli.solver {
        Solver::EdmondsKarp | Solver::Dinic => run_max_flow(&cli),
        Solver::MinCost => run_min_cost(&cli),
        Solver::GlobalMinCut | Solver::RandomizedMinCut => run_global_cut(&cli),
    }
}
