use crate::reports;
use clap::Args;
use rotorforge::api::build_key_space;
use rotorforge::config::QueryFile;
use rotorforge::error::RfResult;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CountArgs {
    /// Query file (JSON)
    #[arg(short, long)]
    pub query: PathBuf,

    /// Also show how the keys would be split over this many workers
    #[arg(long)]
    pub slices: Option<usize>,
}

pub fn run(args: CountArgs) -> RfResult<()> {
    let file = QueryFile::load_from_file(&args.query)?;
    let base = args.query.parent().unwrap_or_else(|| Path::new("."));
    let query = file.resolve(base)?;
    let space = build_key_space(&query.descriptor)?;

    info!("{} distinct keys, {} selected", space.total(), space.count());
    println!("{}", space.count());

    if let Some(n) = args.slices {
        reports::print_slices(&space.slice(n));
    }
    Ok(())
}
