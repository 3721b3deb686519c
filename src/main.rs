mod cli;
mod demo;
mod report;
mod watch;

use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};

use clap::Parser;
use volmesh_geom::{IVec3, Mat4, Vec3};
use volmesh_runtime::{MeshState, MeshStateConfig};

use crate::cli::Args;
use crate::watch::ConfigWatcher;

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}

fn load_config(args: &Args) -> Result<MeshStateConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => MeshStateConfig::from_path(path)?,
        None => MeshStateConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mesh_mode = mode;
    }
    if let Some(size) = args.mesh_size {
        config.mesh_size = size;
    }
    config.validate()?;
    Ok(config)
}

/// Puts the demo volumes into slots 0.. and an alias of slot 0 after them.
fn populate(state: &mut MeshState, args: &Args) -> Vec<(usize, String)> {
    let spacing = (args.size + 8) as f32;
    let mut labels = Vec::new();
    for (idx, demo) in demo::build_volumes(args.volumes, args.size, args.seed)
        .into_iter()
        .enumerate()
    {
        let region = demo.volume.region();
        let mins = Vec3::from(region.lower);
        let maxs = Vec3::from(region.upper + IVec3::ONE);
        state.set_volume(idx, Some(demo.volume), None, None, true);
        let model = Mat4::translation(Vec3::new(idx as f32 * spacing, 0.0, 0.0));
        state.set_model_matrix(idx, model, mins, maxs);
        state.schedule_region_extraction(idx, &region);
        labels.push((idx, demo.kind.name().to_string()));
    }
    if !labels.is_empty() {
        let alias = labels.len();
        state.set_reference(alias, Some(0));
        state.gray(alias, true);
        let (mins, maxs) = (state.mins(0), state.maxs(0));
        state.set_model_matrix(alias, Mat4::translation(Vec3::new(0.0, 0.0, spacing)), mins, maxs);
        log::debug!(
            "alias slot {} centered at {:?}",
            alias,
            state.center_pos(alias, true)
        );
        labels.push((alias, "alias".to_string()));
    }
    labels
}

/// Runs every queued extraction and merges the results.
fn extract_all(state: &mut MeshState) -> usize {
    let t0 = Instant::now();
    state.extract_all_pending();
    let mut merged = 0;
    while state.pop().is_some() {
        merged += 1;
    }
    log::info!(
        "merged {} chunk meshes in {} ms (mode={}, size={})",
        merged,
        t0.elapsed().as_millis(),
        state.mesh_mode(),
        state.mesh_size()
    );
    merged
}

fn watch_config(
    state: &mut MeshState,
    path: &Path,
    secs: u64,
    labels: &[(usize, String)],
) -> Result<(), Box<dyn Error>> {
    let watcher = ConfigWatcher::new(path)?;
    let deadline = Instant::now() + Duration::from_secs(secs);
    let mut mode = state.mesh_mode();
    log::info!("watching {} for {}s", path.display(), secs);
    while Instant::now() < deadline {
        if watcher.changed(Duration::from_millis(250)) {
            match MeshStateConfig::from_path(path) {
                Ok(cfg) => {
                    if cfg.mesh_size != state.mesh_size() {
                        log::warn!(
                            "mesh_size change {} -> {} needs a restart",
                            state.mesh_size(),
                            cfg.mesh_size
                        );
                    }
                    mode = cfg.mesh_mode;
                }
                Err(e) => log::warn!("ignoring config change: {}", e),
            }
        }
        if state.update(mode) {
            extract_all(state);
            report::print(state, labels);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = load_config(&args)?;
    let mut state = MeshState::new(config)?;
    let labels = populate(&mut state, &args);
    extract_all(&mut state);
    report::print(&state, &labels);

    if let Some(secs) = args.watch {
        match &args.config {
            Some(path) => watch_config(&mut state, path, secs, &labels)?,
            None => log::warn!("--watch needs --config"),
        }
    }

    let released = state.shutdown();
    log::info!(
        "shutdown released {} volumes",
        released.iter().flatten().count()
    );
    Ok(())
}
