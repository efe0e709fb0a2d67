//! # Kademlia Overlay-Network Construction Simulator — CLI
//!
//! Parses `simulator m n k [num]`, runs `num` independent construction
//! simulations over an `m`-bit identifier space with bucket capacity `k`
//! and `n` joining nodes, and writes each run's connectivity graph to a
//! GML file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use kad_sim::adapters::gml::to_gml;
use kad_sim::adapters::rng::{fresh_rng, seeded_rng};
use kad_sim::ports::SimulationApi;
use kad_sim::service::SimulationService;

/// Parsed and validated configuration for one simulator invocation.
///
/// Holds everything the positional CLI contract and the additive `--seed`
/// flag supply, grouped the way the rest of the workspace groups parsed CLI
/// input before handing it to the library.
pub struct SimRunConfig {
    pub m: u32,
    pub n: u64,
    pub k: usize,
    pub num_runs: u32,
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
}

/// Builds a synthetic Kademlia overlay and exports its routing-table
/// connectivity as GML.
#[derive(Parser, Debug)]
#[command(name = "simulator", version)]
struct Cli {
    /// Identifier-space width in bits.
    m: u32,

    /// Number of nodes to join.
    n: u64,

    /// Bucket capacity.
    k: usize,

    /// Number of independent simulation runs to perform.
    #[arg(default_value_t = 1)]
    num: u32,

    /// Directory to write GML output files into (created if absent).
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// RNG seed for reproducible runs. Defaults to OS entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity. Repeatable, capped at TRACE.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print routing-table statistics for the first joined node after each
    /// run (diagnostic aid only; does not affect GML output).
    #[arg(long)]
    stats: bool,
}

fn verbosity_to_level(count: u8) -> Level {
    match count {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn run(config: &SimRunConfig, stats: bool) -> Result<()> {
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;

    for i in 1..=config.num_runs {
        let rng = match config.seed {
            Some(seed) => seeded_rng(seed.wrapping_add(i as u64)),
            None => fresh_rng(),
        };
        let mut service = SimulationService::new(config.m, config.k, rng)?;

        let started = Instant::now();
        let snapshot = service.run(config.n)?;
        let elapsed = started.elapsed();

        let file_name =
            format!("m{}_n{}_k{}__{}.gml", config.m, config.n, config.k, i);
        let path = config.output_dir.join(&file_name);
        fs::write(&path, to_gml(&snapshot))
            .with_context(|| format!("writing {}", path.display()))?;

        println!(
            "run {i}/{}: {} nodes, {} edges, {:.2?} -> {}",
            config.num_runs,
            snapshot.nodes.len(),
            snapshot.edges.len(),
            elapsed,
            path.display()
        );

        if stats {
            print_first_node_stats(&snapshot);
        }
    }

    Ok(())
}

fn print_first_node_stats(snapshot: &kad_sim::NetworkSnapshot) {
    let Some(first) = snapshot.nodes.first() else {
        return;
    };
    let peer_count = snapshot
        .edges
        .iter()
        .filter(|(owner, _)| owner == first)
        .count();
    println!("  node 0 routing-table peers: {peer_count}");
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprint!("{e}");
            std::process::exit(1);
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(verbosity_to_level(cli.verbose))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("installing tracing subscriber")?;

    if cli.m == 0 || cli.m > 256 {
        bail!("m must be in 1..=256");
    }
    if cli.n == 0 {
        bail!("n must be > 0");
    }
    if cli.k == 0 {
        bail!("k must be > 0");
    }
    if cli.num == 0 {
        bail!("num must be > 0");
    }

    let config = SimRunConfig {
        m: cli.m,
        n: cli.n,
        k: cli.k,
        num_runs: cli.num,
        output_dir: cli.output_dir,
        seed: cli.seed,
    };

    info!(m = config.m, n = config.n, k = config.k, num = config.num_runs, "starting simulation");
    run(&config, cli.stats)
}
