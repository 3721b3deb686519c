use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use volmesh_geom::{IVec3, Region};
use volmesh_mesh_cpu::{ChunkMesh, SurfaceExtractionType, create_context, extract_surface};
use volmesh_volume::{Palette, RawVolume};

use crate::locks::SlotLocks;

/// One chunk to mesh. The slot is locked from submission until the result is queued.
pub(crate) struct ExtractionTask {
    pub region: Region,
    pub idx: usize,
    pub volume: Arc<RawVolume>,
    pub palette: Palette,
    pub kind: SurfaceExtractionType,
}

pub(crate) struct ExtractionResult {
    pub mins: IVec3,
    pub idx: usize,
    pub mesh: ChunkMesh,
}

#[derive(Clone, Copy, Default)]
struct Counters {
    queued: usize,
    running: usize,
}

#[derive(Default)]
struct TaskCounters {
    state: Mutex<Counters>,
    idle: Condvar,
}

impl TaskCounters {
    fn state(&self) -> MutexGuard<'_, Counters> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut Counters)) {
        let mut c = self.state();
        f(&mut c);
        if c.queued == 0 && c.running == 0 {
            self.idle.notify_all();
        }
    }

    fn in_flight(&self) -> usize {
        let c = self.state();
        c.queued + c.running
    }

    fn wait_idle(&self) {
        let c = self.state();
        let _c = self
            .idle
            .wait_while(c, |c| c.queued + c.running > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

fn run_extraction(task: ExtractionTask) -> ExtractionResult {
    let ExtractionTask {
        region,
        idx,
        volume,
        palette,
        kind,
    } = task;
    let t0 = Instant::now();
    let mins = region.lower;
    let mut mesh = ChunkMesh::with_capacity(1 << 14, 1 << 15);
    let ctx = create_context(kind, volume.as_ref(), region, &palette, mins);
    extract_surface(&ctx, &mut mesh);
    mesh.shrink_to_fit();
    log::debug!(
        target: "extract",
        "slot={} region={} kind={} vertices={} indices={} ms={}",
        idx,
        region,
        kind,
        mesh.opaque().no_of_vertices() + mesh.transparent().no_of_vertices(),
        mesh.opaque().no_of_indices() + mesh.transparent().no_of_indices(),
        t0.elapsed().as_millis()
    );
    ExtractionResult { mins, idx, mesh }
}

/// Fixed set of extraction workers fed through a channel.
pub(crate) struct ExtractionPool {
    job_tx: Sender<ExtractionTask>,
    job_rx: Receiver<ExtractionTask>,
    res_tx: Sender<ExtractionResult>,
    res_rx: Receiver<ExtractionResult>,
    counters: Arc<TaskCounters>,
    locks: Arc<SlotLocks>,
    workers: usize,
    _pool: ThreadPool,
}

impl ExtractionPool {
    pub(crate) fn new(workers: usize, locks: Arc<SlotLocks>) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<ExtractionTask>();
        let (res_tx, res_rx) = unbounded::<ExtractionResult>();
        let counters = Arc::new(TaskCounters::default());

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("volmesh-extract-{i}"))
            .build()?;
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let counters = counters.clone();
            let locks = locks.clone();
            pool.spawn(move || {
                while let Ok(task) = rx.recv() {
                    counters.update(|c| {
                        c.queued -= 1;
                        c.running += 1;
                    });
                    let idx = task.idx;
                    let result = run_extraction(task);
                    // Queue before unlocking so a waiting set_volume sees the result
                    let _ = tx.send(result);
                    locks.unlock(idx);
                    counters.update(|c| c.running -= 1);
                }
            });
        }
        log::info!(target: "extract", "extraction pool started with {} workers", workers);

        Ok(Self {
            job_tx,
            job_rx,
            res_tx,
            res_rx,
            counters,
            locks,
            workers,
            _pool: pool,
        })
    }

    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    pub(crate) fn submit(&self, task: ExtractionTask) {
        self.counters.update(|c| c.queued += 1);
        if let Err(err) = self.job_tx.send(task) {
            let task = err.into_inner();
            self.counters.update(|c| c.queued -= 1);
            self.locks.unlock(task.idx);
        }
    }

    /// Drops tasks no worker has picked up yet and releases their slots.
    pub(crate) fn abort(&self) -> usize {
        let mut n = 0;
        for task in self.job_rx.try_iter() {
            self.counters.update(|c| c.queued -= 1);
            self.locks.unlock(task.idx);
            n += 1;
        }
        n
    }

    /// Tasks submitted and not yet finished.
    pub(crate) fn in_flight(&self) -> usize {
        self.counters.in_flight()
    }

    pub(crate) fn wait_idle(&self) {
        self.counters.wait_idle();
    }

    pub(crate) fn try_recv(&self) -> Option<ExtractionResult> {
        self.res_rx.try_recv().ok()
    }

    pub(crate) fn discard_results(&self) -> usize {
        self.res_rx.try_iter().count()
    }

    /// Drops queued results of slot `idx`, keeping the others in order.
    pub(crate) fn discard_results_for(&self, idx: usize) -> usize {
        let pending: Vec<ExtractionResult> = self.res_rx.try_iter().collect();
        let mut dropped = 0;
        for result in pending {
            if result.idx == idx {
                dropped += 1;
            } else {
                let _ = self.res_tx.send(result);
            }
        }
        dropped
    }
}

impl Drop for ExtractionPool {
    fn drop(&mut self) {
        let n = self.abort();
        if n > 0 {
            log::debug!(target: "extract", "dropped {} queued extractions on shutdown", n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volmesh_volume::Voxel;

    fn task(idx: usize, volume: &Arc<RawVolume>) -> ExtractionTask {
        ExtractionTask {
            region: volume.region(),
            idx,
            volume: volume.clone(),
            palette: Palette::default(),
            kind: SurfaceExtractionType::Cubic,
        }
    }

    #[test]
    fn results_arrive_and_slots_unlock() {
        let locks = Arc::new(SlotLocks::default());
        let pool = ExtractionPool::new(2, locks.clone()).unwrap();
        let mut v = RawVolume::new(Region::cube(0, 3));
        v.set_voxel(IVec3::ONE, Voxel::solid(1));
        let v = Arc::new(v);
        for idx in [0, 1, 1] {
            locks.lock(idx);
            pool.submit(task(idx, &v));
        }
        pool.wait_idle();
        assert_eq!(pool.in_flight(), 0);
        assert!(!locks.is_locked(0) && !locks.is_locked(1));
        let mut got = Vec::new();
        while let Some(r) = pool.try_recv() {
            assert_eq!(r.mins, IVec3::ZERO);
            assert_eq!(r.mesh.opaque().no_of_indices(), 36);
            got.push(r.idx);
        }
        got.sort_unstable();
        assert_eq!(got, vec![0, 1, 1]);
    }

    #[test]
    fn discard_keeps_other_slots() {
        let locks = Arc::new(SlotLocks::default());
        let pool = ExtractionPool::new(1, locks.clone()).unwrap();
        let v = Arc::new(RawVolume::new(Region::cube(0, 1)));
        for idx in [4, 5, 4] {
            locks.lock(idx);
            pool.submit(task(idx, &v));
        }
        pool.wait_idle();
        assert_eq!(pool.discard_results_for(4), 2);
        assert_eq!(pool.try_recv().map(|r| r.idx), Some(5));
        assert!(pool.try_recv().is_none());
    }
}
