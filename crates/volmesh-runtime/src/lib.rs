//! Mesh state: slot registry, chunk scheduling and background surface extraction (engine-only).
#![forbid(unsafe_code)]

mod config;
mod locks;
mod pool;
mod queue;
mod slot;
mod store;

use std::sync::Arc;

use volmesh_geom::{IVec3, Mat4, Region, Vec3, intersects};
use volmesh_mesh_cpu::{Mesh, MeshType, SurfaceExtractionType};
use volmesh_volume::{NormalPalette, Palette, RawVolume};

use crate::locks::SlotLocks;
use crate::pool::{ExtractionPool, ExtractionResult, ExtractionTask};
use crate::queue::ExtractQueue;
use crate::slot::Slot;
use crate::store::MeshStore;

pub use config::{ConfigError, DEFAULT_MESH_SIZE, MAX_MESH_SIZE, MeshStateConfig};
pub use queue::ExtractRegion;
pub use slot::CullFace;
pub use store::{MeshCounts, Meshes, MeshesMap};

/// Number of volume slots.
pub const MAX_VOLUMES: usize = 2048;

/// Extraction margin read around every chunk.
const HALO: i32 = 2;

/// Jobs per dispatch round in `extract_all_pending`.
const EXTRACT_ALL_BATCH: usize = 100;

#[derive(Debug)]
pub enum MeshStateError {
    Config(ConfigError),
    WorkerPool(rayon::ThreadPoolBuildError),
}

impl std::fmt::Display for MeshStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshStateError::Config(e) => write!(f, "{}", e),
            MeshStateError::WorkerPool(e) => write!(f, "failed to start extraction workers: {}", e),
        }
    }
}

impl std::error::Error for MeshStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshStateError::Config(e) => Some(e),
            MeshStateError::WorkerPool(e) => Some(e),
        }
    }
}

/// What `set_volume` replaced.
#[derive(Debug, Default)]
pub struct SetVolumeOutcome {
    /// The slot's old volume; `None` when nothing changed.
    pub previous: Option<Arc<RawVolume>>,
    pub meshes_deleted: bool,
}

/// Voxel region of chunk `c`; `None` when it leaves the `i32` range.
fn chunk_region(c: IVec3, size: i32) -> Option<Region> {
    let corner = |v: i32| -> Option<(i32, i32)> {
        let lo = v.checked_mul(size)?;
        Some((lo, lo.checked_add(size - 1)?))
    };
    let (x0, x1) = corner(c.x)?;
    let (y0, y1) = corner(c.y)?;
    let (z0, z1) = corner(c.z)?;
    Some(Region::new(IVec3::new(x0, y0, z0), IVec3::new(x1, y1, z1)))
}

/// Chunk coordinate range touched by a change to `region`. Lower bounds reach one
/// chunk further down since extraction of a chunk reads one voxel past its upper face.
/// `None` when the region sits too close to the `i32` limits.
fn chunk_range(region: &Region, size: i32) -> Option<(IVec3, IVec3)> {
    let lower = |v: i32| v.checked_sub(size - 1).map(|l| l / size);
    let upper = |v: i32| v.checked_add(1).map(|u| u / size);
    Some((
        IVec3::new(
            lower(region.lower.x)?,
            lower(region.lower.y)?,
            lower(region.lower.z)?,
        ),
        IVec3::new(
            upper(region.upper.x)?,
            upper(region.upper.y)?,
            upper(region.upper.z)?,
        ),
    ))
}

/// Owns the volume slots and their chunk meshes, and keeps the meshes in sync
/// with the volumes by extracting modified chunks on a worker pool.
///
/// All methods run on the owning thread; only extraction itself is off-thread.
pub struct MeshState {
    config: MeshStateConfig,
    mesh_mode: SurfaceExtractionType,
    slots: Vec<Slot>,
    queue: ExtractQueue,
    store: MeshStore,
    locks: Arc<SlotLocks>,
    pool: ExtractionPool,
    default_palette: Palette,
    default_normal_palette: NormalPalette,
}

impl MeshState {
    pub fn new(config: MeshStateConfig) -> Result<Self, MeshStateError> {
        config.validate().map_err(MeshStateError::Config)?;
        let locks = Arc::new(SlotLocks::default());
        let pool = ExtractionPool::new(config.worker_count(), locks.clone())
            .map_err(MeshStateError::WorkerPool)?;
        log::info!(
            target: "mesh_state",
            "mesh state: size={} mode={} workers={}",
            config.mesh_size,
            config.mesh_mode,
            pool.workers()
        );
        Ok(Self {
            mesh_mode: config.mesh_mode,
            config,
            slots: vec![Slot::default(); MAX_VOLUMES],
            queue: ExtractQueue::default(),
            store: MeshStore::default(),
            locks,
            pool,
            default_palette: Palette::default(),
            default_normal_palette: NormalPalette::default(),
        })
    }

    pub fn mesh_size(&self) -> i32 {
        self.config.mesh_size
    }

    pub fn mesh_mode(&self) -> SurfaceExtractionType {
        self.mesh_mode
    }

    fn slot(&self, idx: usize) -> Option<&Slot> {
        self.slots.get(idx)
    }

    fn slot_mut(&mut self, idx: usize) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(idx);
        if slot.is_none() {
            log::error!(target: "mesh_state", "given id {} is out of bounds", idx);
        }
        slot
    }

    // --- Slot registry ---

    /// Replaces the volume of slot `idx`. Blocks until no extraction reads the old
    /// volume, then drops its queued jobs and undelivered results.
    pub fn set_volume(
        &mut self,
        idx: usize,
        volume: Option<Arc<RawVolume>>,
        palette: Option<Palette>,
        normal_palette: Option<NormalPalette>,
        mesh_delete: bool,
    ) -> SetVolumeOutcome {
        let Some(slot) = self.slot_mut(idx) else {
            return SetVolumeOutcome::default();
        };
        slot.palette = palette;
        slot.normal_palette = normal_palette;
        let unchanged = match (&slot.volume, &volume) {
            (Some(old), Some(new)) => Arc::ptr_eq(old, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return SetVolumeOutcome::default();
        }

        self.locks.wait_unlocked(idx);
        let stale_results = self.pool.discard_results_for(idx);
        let previous = std::mem::replace(&mut self.slots[idx].volume, volume);
        let meshes_deleted = if mesh_delete {
            self.store.delete_slot(idx);
            true
        } else {
            false
        };
        let stale_jobs = self.queue.remove_slot(idx);
        if stale_jobs > 0 || stale_results > 0 {
            log::debug!(
                target: "mesh_state",
                "slot {}: dropped {} queued jobs and {} results of the old volume",
                idx,
                stale_jobs,
                stale_results
            );
        }
        SetVolumeOutcome {
            previous,
            meshes_deleted,
        }
    }

    pub fn volume(&self, idx: usize) -> Option<&Arc<RawVolume>> {
        self.slot(idx).and_then(|s| s.volume.as_ref())
    }

    /// The slot's palette, or the default one.
    pub fn palette(&self, idx: usize) -> &Palette {
        self.slot(idx)
            .and_then(|s| s.palette.as_ref())
            .unwrap_or(&self.default_palette)
    }

    pub fn normal_palette(&self, idx: usize) -> &NormalPalette {
        self.slot(idx)
            .and_then(|s| s.normal_palette.as_ref())
            .unwrap_or(&self.default_normal_palette)
    }

    /// Whether slot `idx` holds a normal palette equal to `palette` (both absent counts).
    pub fn same_normal_palette(&self, idx: usize, palette: Option<&NormalPalette>) -> bool {
        let Some(slot) = self.slot(idx) else {
            return false;
        };
        match (&slot.normal_palette, palette) {
            (None, None) => true,
            (Some(a), Some(b)) => a.hash() == b.hash(),
            _ => false,
        }
    }

    pub fn hide(&mut self, idx: usize, hide: bool) {
        if let Some(slot) = self.slot_mut(idx) {
            slot.hidden = hide;
        }
    }

    /// Out-of-range slots count as hidden.
    pub fn hidden(&self, idx: usize) -> bool {
        self.slot(idx).is_none_or(|s| s.hidden)
    }

    pub fn gray(&mut self, idx: usize, gray: bool) {
        if let Some(slot) = self.slot_mut(idx) {
            slot.gray = gray;
        }
    }

    pub fn grayed(&self, idx: usize) -> bool {
        self.slot(idx).is_none_or(|s| s.gray)
    }

    pub fn set_cull_face(&mut self, idx: usize, face: CullFace) {
        if let Some(slot) = self.slot_mut(idx) {
            slot.cull_face = face;
        }
    }

    pub fn cull_face(&self, idx: usize) -> CullFace {
        self.slot(idx).map_or(CullFace::Back, |s| s.cull_face)
    }

    /// Fails for out-of-range slots and slots with neither a volume nor a reference.
    pub fn set_model_matrix(&mut self, idx: usize, model: Mat4, mins: Vec3, maxs: Vec3) -> bool {
        let Some(slot) = self.slot_mut(idx) else {
            return false;
        };
        if slot.reference.is_none() && slot.volume.is_none() {
            log::error!(target: "mesh_state", "no volume found at: {}", idx);
            return false;
        }
        slot.model = model;
        slot.mins = mins;
        slot.maxs = maxs;
        true
    }

    pub fn model(&self, idx: usize) -> Mat4 {
        self.slot(idx).map_or(Mat4::IDENTITY, |s| s.model)
    }

    pub fn mins(&self, idx: usize) -> Vec3 {
        self.slot(idx).map_or(Vec3::ZERO, |s| s.mins)
    }

    pub fn maxs(&self, idx: usize) -> Vec3 {
        self.slot(idx).map_or(Vec3::ZERO, |s| s.maxs)
    }

    /// Center of the slot's bounds, optionally transformed by its model matrix.
    pub fn center_pos(&self, idx: usize, apply_model: bool) -> Vec3 {
        self.slot(idx)
            .map_or(Vec3::ZERO, |s| s.center_pos(apply_model))
    }

    // --- Aliases ---

    pub fn set_reference(&mut self, idx: usize, referenced: Option<usize>) {
        if let Some(slot) = self.slot_mut(idx) {
            slot.reference = referenced;
        }
    }

    pub fn reset_references(&mut self) {
        for slot in &mut self.slots {
            slot.reference = None;
        }
    }

    pub fn reference(&self, idx: usize) -> Option<usize> {
        self.slot(idx).and_then(|s| s.reference)
    }

    /// Follows reference links to the slot that owns the data. Cycles and
    /// dangling links resolve to `idx` itself.
    pub fn resolve_idx(&self, idx: usize) -> usize {
        let mut cur = idx;
        for _ in 0..MAX_VOLUMES {
            match self.reference(cur) {
                None => return cur,
                Some(next) if next < MAX_VOLUMES => cur = next,
                Some(next) => {
                    log::warn!(
                        target: "mesh_state",
                        "slot {} references out-of-range slot {}",
                        cur,
                        next
                    );
                    return idx;
                }
            }
        }
        log::warn!(target: "mesh_state", "reference cycle at slot {}", idx);
        idx
    }

    // --- Scheduling ---

    /// Queues every mesh chunk of the slot behind `idx` that `region` touches.
    /// Chunks outside the volume lose their mesh instead; returns whether any did.
    pub fn schedule_region_extraction(&mut self, idx: usize, region: &Region) -> bool {
        let slot_idx = self.resolve_idx(idx);
        let Some(volume) = self.volume(slot_idx) else {
            return false;
        };
        let mut complete = volume.region();
        complete.shift_upper_corner(1, 1, 1);
        let size = self.mesh_size();
        let visible = !self.hidden(slot_idx);
        let Some((l, u)) = chunk_range(region, size) else {
            log::warn!(target: "schedule", "modified region {} out of range", region);
            return false;
        };

        log::debug!(target: "schedule", "modified region: {}", region);
        let mut deleted = false;
        for x in l.x..=u.x {
            for y in l.y..=u.y {
                for z in l.z..=u.z {
                    let Some(chunk) = chunk_region(IVec3::new(x, y, z), size) else {
                        log::warn!(target: "schedule", "chunk {}:{}:{} out of range", x, y, z);
                        continue;
                    };
                    if !intersects(&complete, &chunk) {
                        self.store.delete_at(chunk.lower, slot_idx);
                        deleted = true;
                        continue;
                    }
                    log::debug!(target: "schedule", "extract region: {}", chunk);
                    self.queue.push(ExtractRegion {
                        region: chunk,
                        idx: slot_idx,
                        visible,
                    });
                }
            }
        }
        deleted
    }

    /// Hands up to `max_jobs` queued jobs to the workers (0 means one per worker).
    /// Returns whether jobs remain queued.
    pub fn run_scheduled_extractions(&mut self, max_jobs: usize) -> bool {
        let max_jobs = if max_jobs == 0 {
            self.pool.workers()
        } else {
            max_jobs
        };
        let mut dispatched = 0;
        while dispatched < max_jobs {
            let Some(job) = self.queue.pop() else {
                break;
            };
            let Some(volume) = self.volume(job.idx).cloned() else {
                continue;
            };
            self.locks.lock(job.idx);
            if !job.region.grow(HALO).is_valid() {
                self.locks.unlock(job.idx);
                continue;
            }
            self.pool.submit(ExtractionTask {
                region: job.region,
                idx: job.idx,
                volume,
                palette: self.palette(job.idx).clone(),
                kind: self.mesh_mode,
            });
            dispatched += 1;
        }
        if dispatched > 0 {
            log::debug!(target: "schedule", "dispatched {} extractions", dispatched);
        }
        !self.queue.is_empty()
    }

    /// Per-frame tick. A changed `mode` drops pending work and reschedules every
    /// volume; returns `true` in that case so callers can drop their own mesh caches.
    pub fn update(&mut self, mode: SurfaceExtractionType) -> bool {
        let mut switched = false;
        if mode != self.mesh_mode {
            log::info!(target: "mesh_state", "mesh mode {} -> {}", self.mesh_mode, mode);
            self.mesh_mode = mode;
            self.clear_pending_extractions();
            let regions: Vec<(usize, Region)> = self
                .slots
                .iter()
                .enumerate()
                .filter_map(|(idx, s)| s.volume.as_ref().map(|v| (idx, v.region())))
                .collect();
            for (idx, region) in regions {
                self.schedule_region_extraction(idx, &region);
            }
            switched = true;
        }
        self.run_scheduled_extractions(self.config.max_jobs_per_update);
        switched
    }

    /// Dispatches everything queued and waits until the workers are done.
    pub fn extract_all_pending(&mut self) {
        while self.run_scheduled_extractions(EXTRACT_ALL_BATCH) {}
        self.wait_for_pending_extractions();
    }

    pub fn wait_for_pending_extractions(&self) {
        self.pool.wait_idle();
    }

    /// Drops queued jobs, tasks not yet started and undelivered results.
    pub fn clear_pending_extractions(&mut self) {
        let jobs = self.queue.len();
        self.queue.clear();
        let aborted = self.pool.abort();
        self.pool.wait_idle();
        let results = self.pool.discard_results();
        if jobs + aborted + results > 0 {
            log::debug!(
                target: "mesh_state",
                "cleared {} jobs, {} tasks, {} results",
                jobs,
                aborted,
                results
            );
        }
    }

    /// Queued jobs not yet handed to a worker.
    pub fn pending_extractions(&self) -> usize {
        self.queue.len()
    }

    /// Worker tasks submitted and not yet finished.
    pub fn in_flight_extractions(&self) -> usize {
        self.pool.in_flight()
    }

    // --- Results ---

    /// Merges the next finished extraction into the store and returns its slot.
    pub fn pop(&mut self) -> Option<usize> {
        while let Some(ExtractionResult { mins, idx, mesh }) = self.pool.try_recv() {
            if self.volume(idx).is_none() {
                log::debug!(target: "mesh_state", "dropping result for empty slot {}", idx);
                continue;
            }
            let (opaque, transparent) = mesh.into_parts();
            self.store.replace(MeshType::Opaque, mins, idx, opaque);
            self.store.replace(MeshType::Transparency, mins, idx, transparent);
            return Some(idx);
        }
        None
    }

    pub fn meshes(&self, kind: MeshType) -> &MeshesMap {
        self.store.meshes(kind)
    }

    pub fn mesh(&self, kind: MeshType, mins: IVec3, idx: usize) -> Option<&Mesh> {
        if idx >= MAX_VOLUMES {
            return None;
        }
        self.store.get(kind, mins, idx)
    }

    /// Geometry totals of slot `idx` over all chunks.
    pub fn count(&self, kind: MeshType, idx: usize) -> MeshCounts {
        if idx >= MAX_VOLUMES {
            return MeshCounts::default();
        }
        self.store.count(kind, idx)
    }

    /// Stops all extraction, destroys every mesh and hands back each slot's volume.
    pub fn shutdown(&mut self) -> Vec<Option<Arc<RawVolume>>> {
        self.clear_pending_extractions();
        self.store.clear();
        self.slots.iter_mut().map(|s| s.volume.take()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volmesh_volume::Voxel;

    fn state(mesh_size: i32) -> MeshState {
        MeshState::new(MeshStateConfig {
            mesh_size,
            workers: Some(2),
            ..MeshStateConfig::default()
        })
        .unwrap()
    }

    fn solid(region: Region) -> Arc<RawVolume> {
        let mut v = RawVolume::new(region);
        v.fill(&region, Voxel::solid(1));
        Arc::new(v)
    }

    fn point(x: i32, y: i32, z: i32) -> Region {
        Region::new(IVec3::new(x, y, z), IVec3::new(x, y, z))
    }

    #[test]
    fn chunk_range_truncates() {
        assert_eq!(
            chunk_range(&point(15, 15, 15), 16),
            Some((IVec3::ZERO, IVec3::ONE))
        );
        assert_eq!(
            chunk_range(&point(14, 14, 14), 16),
            Some((IVec3::ZERO, IVec3::ZERO))
        );
        assert_eq!(
            chunk_range(&Region::cube(-1, 1), 16),
            Some((IVec3::splat(-1), IVec3::ZERO))
        );
        assert_eq!(chunk_range(&point(i32::MAX, 0, 0), 16), None);
        assert_eq!(chunk_range(&point(0, i32::MIN, 0), 16), None);
    }

    #[test]
    fn chunk_region_overflow() {
        assert_eq!(
            chunk_region(IVec3::new(1, -1, 0), 16),
            Some(Region::new(IVec3::new(16, -16, 0), IVec3::new(31, -1, 15)))
        );
        assert_eq!(chunk_region(IVec3::splat(i32::MAX / 16 + 1), 16), None);
    }

    #[test]
    fn schedule_near_i32_limits_fails_quietly() {
        let mut ms = state(62);
        let top = Region::cube(i32::MAX - 3, i32::MAX);
        ms.set_volume(0, Some(solid(top)), None, None, true);
        assert!(!ms.schedule_region_extraction(0, &point(i32::MAX, i32::MAX, i32::MAX)));
        assert!(!ms.schedule_region_extraction(0, &top));
        assert_eq!(ms.pending_extractions(), 0);

        let bottom = Region::cube(i32::MIN, i32::MIN + 3);
        ms.set_volume(1, Some(solid(bottom)), None, None, true);
        assert!(!ms.schedule_region_extraction(1, &point(i32::MIN, i32::MIN, i32::MIN)));
        assert_eq!(ms.pending_extractions(), 0);
    }

    #[test]
    fn visible_slots_are_dispatched_first() {
        let mut ms = MeshState::new(MeshStateConfig {
            mesh_size: 16,
            workers: Some(1),
            ..MeshStateConfig::default()
        })
        .unwrap();
        let region = Region::cube(0, 3);
        ms.set_volume(0, Some(solid(region)), None, None, true);
        ms.set_volume(1, Some(solid(region)), None, None, true);
        ms.hide(0, true);
        ms.schedule_region_extraction(0, &region);
        ms.schedule_region_extraction(1, &region);
        assert_eq!(ms.pending_extractions(), 2);

        assert!(ms.run_scheduled_extractions(1));
        ms.wait_for_pending_extractions();
        assert_eq!(ms.pop(), Some(1));
        assert_eq!(ms.pop(), None);

        assert!(!ms.run_scheduled_extractions(1));
        ms.wait_for_pending_extractions();
        assert_eq!(ms.pop(), Some(0));
    }

    #[test]
    fn small_volume_single_job() {
        let mut ms = state(16);
        ms.set_volume(0, Some(solid(Region::cube(-1, 1))), None, None, true);
        assert!(!ms.schedule_region_extraction(0, &point(1, 0, 1)));
        assert_eq!(ms.pending_extractions(), 1);
    }

    #[test]
    fn boundary_voxel_touches_eight_chunks() {
        let mut ms = state(16);
        ms.set_volume(0, Some(solid(Region::cube(0, 31))), None, None, true);
        ms.schedule_region_extraction(0, &point(15, 15, 15));
        assert_eq!(ms.pending_extractions(), 8);
        ms.schedule_region_extraction(0, &point(14, 14, 14));
        assert_eq!(ms.pending_extractions(), 9);
    }

    #[test]
    fn chunks_outside_the_volume_lose_their_mesh() {
        let mut ms = state(16);
        ms.set_volume(0, Some(solid(Region::cube(0, 15))), None, None, true);
        // Chunk -1 lies entirely outside the volume bounds
        assert!(ms.schedule_region_extraction(0, &Region::cube(-20, -18)));
        assert_eq!(ms.pending_extractions(), 0);
    }

    #[test]
    fn schedule_without_volume_is_noop() {
        let mut ms = state(16);
        assert!(!ms.schedule_region_extraction(5, &point(0, 0, 0)));
        assert!(!ms.schedule_region_extraction(MAX_VOLUMES + 1, &point(0, 0, 0)));
        assert_eq!(ms.pending_extractions(), 0);
    }

    #[test]
    fn set_volume_out_of_range_and_same_volume() {
        let mut ms = state(16);
        let v = solid(Region::cube(0, 3));
        let out = ms.set_volume(MAX_VOLUMES, Some(v.clone()), None, None, true);
        assert!(out.previous.is_none() && !out.meshes_deleted);
        ms.set_volume(1, Some(v.clone()), None, None, true);
        let out = ms.set_volume(1, Some(v.clone()), Some(Palette::default()), None, true);
        assert!(out.previous.is_none() && !out.meshes_deleted);
        assert!(Arc::ptr_eq(ms.volume(1).unwrap(), &v));
    }

    #[test]
    fn set_volume_invalidates_queued_jobs() {
        let mut ms = state(16);
        ms.set_volume(3, Some(solid(Region::cube(0, 31))), None, None, false);
        ms.schedule_region_extraction(3, &Region::cube(0, 31));
        assert!(ms.pending_extractions() > 0);
        let out = ms.set_volume(3, Some(solid(Region::cube(0, 7))), None, None, false);
        assert!(out.previous.is_some());
        assert_eq!(ms.pending_extractions(), 0);
    }

    #[test]
    fn resolve_follows_chain_and_breaks_cycles() {
        let mut ms = state(16);
        ms.set_reference(1, Some(2));
        ms.set_reference(2, Some(3));
        assert_eq!(ms.resolve_idx(1), 3);
        assert_eq!(ms.resolve_idx(4), 4);
        ms.set_reference(3, Some(1));
        assert_eq!(ms.resolve_idx(1), 1);
        ms.set_reference(5, Some(MAX_VOLUMES + 7));
        assert_eq!(ms.resolve_idx(5), 5);
        ms.reset_references();
        assert_eq!(ms.resolve_idx(1), 1);
        assert_eq!(ms.reference(2), None);
    }

    #[test]
    fn alias_schedules_the_referenced_slot() {
        let mut ms = state(16);
        ms.set_volume(0, Some(solid(Region::cube(0, 3))), None, None, true);
        ms.set_reference(7, Some(0));
        ms.schedule_region_extraction(7, &Region::cube(0, 3));
        ms.extract_all_pending();
        assert_eq!(ms.pop(), Some(0));
        assert!(ms.mesh(MeshType::Opaque, IVec3::ZERO, 0).is_some());
        assert!(ms.mesh(MeshType::Opaque, IVec3::ZERO, 7).is_none());
    }

    #[test]
    fn model_matrix_needs_volume_or_reference() {
        let mut ms = state(16);
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        assert!(!ms.set_model_matrix(0, m, Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0)));
        ms.set_reference(0, Some(1));
        assert!(ms.set_model_matrix(0, m, Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0)));
        assert_eq!(ms.model(0), m);
        assert_eq!(ms.center_pos(0, false), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(ms.center_pos(0, true), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(ms.maxs(0), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn display_flags_are_range_checked() {
        let mut ms = state(16);
        assert!(!ms.hidden(0));
        ms.hide(0, true);
        assert!(ms.hidden(0));
        assert!(ms.hidden(MAX_VOLUMES));
        ms.gray(2, true);
        assert!(ms.grayed(2) && !ms.grayed(3));
        assert_eq!(ms.cull_face(4), CullFace::Back);
        ms.set_cull_face(4, CullFace::None);
        assert_eq!(ms.cull_face(4), CullFace::None);
        ms.set_cull_face(MAX_VOLUMES, CullFace::Front);
    }

    #[test]
    fn normal_palette_comparison() {
        let mut ms = state(16);
        let pal = NormalPalette::default();
        assert!(ms.same_normal_palette(0, None));
        assert!(!ms.same_normal_palette(0, Some(&pal)));
        ms.set_volume(0, None, None, Some(pal.clone()), false);
        assert!(ms.same_normal_palette(0, Some(&pal)));
        assert!(!ms.same_normal_palette(0, None));
        assert!(!ms.same_normal_palette(MAX_VOLUMES, None));
    }
}
