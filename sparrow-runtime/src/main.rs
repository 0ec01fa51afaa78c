use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, Command};
use sparrow_algorithms::route_search::sparrow_search::Solver;
use sparrow_challenges::*;
use sparrow_utils::{
    load_hyperparameters, read_graph_csv, read_route, write_coords_csv, write_graph_csv,
    write_json, write_report, ReportPaths, RouteStats,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("sparrow-runtime")
        .about("Generates graphs and searches them for low-cost routes")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate_graph")
                .about("Generates a random graph and its node coordinates")
                .arg(
                    arg!(<NUM_NODES> "Number of nodes")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--density [DENSITY] "Maximum distance between connected nodes")
                        .default_value("0.6")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for node placement")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--graph [GRAPH_FILE] "Output adjacency matrix csv")
                        .default_value("graph.csv")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--coords [COORDS_FILE] "Output node coordinates csv")
                        .default_value("coords.csv")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("solve")
                .about("Runs sparrow search on a graph")
                .arg(
                    arg!(<GRAPH> "Path to an adjacency matrix csv")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--route [ROUTE_FILE] "Best route output, one node per line")
                        .default_value("best_route.txt")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--stats [STATS_FILE] "Route statistics output")
                        .default_value("route_stats.txt")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--visits [VISITS_FILE] "Per node visit counts output")
                        .default_value("node_visits.txt")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"edge-visits" [EDGE_VISITS_FILE] "If set, the edge visit matrix is saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the full search result is saved to this file path (json)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--compress [COMPRESS] "If output file is set, the output data will be compressed as zlib")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Computes the weight of a route")
                .arg(
                    arg!(<GRAPH> "Path to an adjacency matrix csv")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<ROUTE> "Path to a route file, one node per line")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--penalty [PENALTY] "Cost charged for a zero weight step between distinct nodes")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("generate_graph", sub_m)) => generate_graph(
            *sub_m.get_one::<usize>("NUM_NODES").unwrap(),
            *sub_m.get_one::<f64>("density").unwrap(),
            *sub_m.get_one::<u64>("seed").unwrap(),
            sub_m.get_one::<PathBuf>("graph").unwrap().clone(),
            sub_m.get_one::<PathBuf>("coords").unwrap().clone(),
        ),
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<PathBuf>("GRAPH").unwrap().clone(),
            sub_m.get_one::<String>("hyperparameters").cloned(),
            ReportPaths {
                route: sub_m.get_one::<PathBuf>("route").cloned(),
                stats: sub_m.get_one::<PathBuf>("stats").cloned(),
                node_visits: sub_m.get_one::<PathBuf>("visits").cloned(),
                edge_visits: sub_m.get_one::<PathBuf>("edge-visits").cloned(),
            },
            sub_m.get_one::<PathBuf>("output").cloned(),
            sub_m.get_flag("compress"),
        ),
        Some(("evaluate", sub_m)) => evaluate(
            sub_m.get_one::<PathBuf>("GRAPH").unwrap().clone(),
            sub_m.get_one::<PathBuf>("ROUTE").unwrap().clone(),
            sub_m.get_one::<f64>("penalty").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn seed_bytes(seed: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes
}

pub fn generate_graph(
    num_nodes: usize,
    density: f64,
    seed: u64,
    graph_file: PathBuf,
    coords_file: PathBuf,
) -> Result<()> {
    let difficulty = Difficulty { num_nodes, density };
    let challenge = Challenge::generate_instance(&seed_bytes(seed), &difficulty)?;
    write_graph_csv(&graph_file, &challenge.graph)?;
    write_coords_csv(&coords_file, &challenge.node_positions)?;
    info!(
        num_nodes,
        density,
        num_edges = challenge.graph.num_edges(),
        graph = %graph_file.display(),
        coords = %coords_file.display(),
        "graph generated"
    );
    Ok(())
}

pub fn solve(
    graph_file: PathBuf,
    hyperparameters: Option<String>,
    report_paths: ReportPaths,
    output_file: Option<PathBuf>,
    compress: bool,
) -> Result<()> {
    let graph = read_graph_csv(&graph_file)?;
    let hyperparameters = load_hyperparameters(hyperparameters.as_deref())?;
    let result = Solver::solve_challenge_instance(&graph, &hyperparameters, None)?;

    write_report(&result.best, &report_paths)?;
    if let Some(path) = output_file {
        write_json(&path, &result, compress)?;
    }

    let stats = RouteStats::from_result(&result.best);
    println!("Best route: {:?}", result.best.best_route);
    println!("Route length: {}", stats.route_length);
    println!(
        "Most visited node: {} ({} visits)",
        stats.most_visited_node, stats.most_visited_count
    );
    Ok(())
}

pub fn evaluate(graph_file: PathBuf, route_file: PathBuf, penalty: Option<f64>) -> Result<()> {
    let graph = read_graph_csv(&graph_file)?;
    let route = read_route(&route_file)?;
    let missing_edge = match penalty {
        Some(penalty) => MissingEdge::Penalty(penalty),
        None => MissingEdge::ZeroCost,
    };
    missing_edge.validate()?;
    let weight = calc_route_weight(&graph, &route, missing_edge)?;
    println!("{}", weight);
    Ok(())
}
