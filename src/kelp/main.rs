use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use maritime::config::GraphConfig;
use maritime::graph_formats::write_graph_json;
use maritime::input::{load_lanes, load_ports};
use maritime::pipeline::assemble_graph;
use std::path::PathBuf;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GeoJSON FeatureCollection of shipping lane lines
    #[arg(long, env = "LANES_FILE")]
    lanes: PathBuf,

    /// GeoJSON FeatureCollection of port points
    #[arg(long, env = "PORTS_FILE")]
    ports: PathBuf,

    /// Where the assembled graph JSON is written
    #[arg(long, env = "OUTPUT_GRAPH_JSON", default_value = "maritime_transport_graph.json")]
    output: PathBuf,

    /// Optional RON file overriding the default tolerances.
    #[arg(long, env = "GRAPH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GraphConfig::from_ron_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GraphConfig::default(),
    };
    info!("Using {:?}", config);

    let lanes = load_lanes(&args.lanes)?;
    let ports = load_ports(&args.ports)?;

    let assembled = assemble_graph(&lanes, &ports, &config)?;
    write_graph_json(&args.output, &assembled.to_export())?;

    info!("Done.");
    Ok(())
}
