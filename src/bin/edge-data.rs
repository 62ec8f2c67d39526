//! Standalone generator for the two edge-projection tables. Each projection
//! is an independent relaxed BFS; both tables are written next to the corner
//! table under `position_data/`.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use puppet_cube::edge_gen::{self, Projection};

#[derive(Parser)]
#[command(name = "edge-data")]
struct Args {
    /// Directory the tables are written into
    #[arg(long, default_value = "position_data")]
    out_dir: PathBuf,
}

fn main() {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .expect("logger initialises once");

    if let Err(error) = fs::create_dir_all(&args.out_dir) {
        log::error!("CRITICAL ERROR: could not create {}: {error}", args.out_dir.display());
        std::process::exit(-1);
    }

    for projection in [Projection::Low, Projection::High] {
        let table = edge_gen::generate(projection);
        let path = args.out_dir.join(projection.file_name());
        if let Err(error) = edge_gen::save(&table, &path) {
            log::error!("CRITICAL ERROR: could not write {}: {error}", path.display());
            std::process::exit(-1);
        }
        log::info!("wrote {}", path.display());
    }
}
