//! Standalone generator for the corner table. Runs the exhaustive corner
//! BFS and writes `corner-data.bin`; this is the expensive offline step the
//! solver's loader depends on.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use puppet_cube::corner_gen;

#[derive(Parser)]
#[command(name = "corner-data")]
struct Args {
    /// Print the depth distribution and branching summary afterwards
    #[arg(long)]
    statistic: bool,

    /// Directory the table is written into
    #[arg(long, default_value = "position_data")]
    out_dir: PathBuf,
}

fn main() {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .expect("logger initialises once");

    let table = corner_gen::generate();
    if args.statistic {
        corner_gen::report_statistics(&table);
    }

    let write = fs::create_dir_all(&args.out_dir)
        .and_then(|()| corner_gen::save(&table, &args.out_dir.join(corner_gen::FILE_NAME)));
    if let Err(error) = write {
        log::error!("CRITICAL ERROR: could not write {}: {error}", corner_gen::FILE_NAME);
        std::process::exit(-1);
    }
    log::info!("wrote {}", args.out_dir.join(corner_gen::FILE_NAME).display());
}
