use std::path::PathBuf;

use clap::Parser;
use volmesh_mesh_cpu::SurfaceExtractionType;

/// Headless driver for the volume mesh scheduler.
#[derive(Parser, Debug)]
#[command(name = "volmesh")]
#[command(about = "Meshes demo voxel volumes through the chunked extraction scheduler")]
pub struct Args {
    /// Mesh state configuration (TOML).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Extraction mode: cubic, binary or marching_cubes. Overrides the config.
    #[arg(short, long)]
    pub mode: Option<SurfaceExtractionType>,

    /// Mesh chunk edge length. Overrides the config.
    #[arg(long)]
    pub mesh_size: Option<i32>,

    /// Number of demo volumes; one extra slot aliases the first.
    #[arg(long, default_value_t = 3)]
    pub volumes: usize,

    /// Edge length of each demo volume.
    #[arg(long, default_value_t = 96)]
    pub size: i32,

    #[arg(long, default_value_t = 1337)]
    pub seed: i32,

    /// Keep running for this many seconds and re-mesh when the config file changes.
    #[arg(long)]
    pub watch: Option<u64>,

    /// Log filter, e.g. `debug` or `info,schedule=debug`. Defaults to RUST_LOG or `info`.
    #[arg(long)]
    pub log_level: Option<String>,
}
