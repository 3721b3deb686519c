use hashbrown::HashMap;
use volmesh_mesh_cpu::MeshType;
use volmesh_runtime::{MeshCounts, MeshState};

#[derive(Clone, Copy, Debug, Default)]
pub struct SlotStats {
    pub chunks: usize,
    pub opaque: MeshCounts,
    pub transparent: MeshCounts,
}

/// Per-slot totals for every slot that owns at least one non-empty mesh.
pub fn collect(state: &MeshState) -> HashMap<usize, SlotStats> {
    let mut stats: HashMap<usize, SlotStats> = HashMap::new();
    let transparent = state.meshes(MeshType::Transparency);
    for (mins, slots) in state.meshes(MeshType::Opaque) {
        for (idx, mesh) in slots.iter().enumerate() {
            let has_opaque = mesh.as_deref().is_some_and(|m| !m.is_empty());
            let has_transparent = transparent
                .get(mins)
                .and_then(|t| t[idx].as_deref())
                .is_some_and(|m| !m.is_empty());
            if has_opaque || has_transparent {
                stats.entry(idx).or_default().chunks += 1;
            }
        }
    }
    for (idx, s) in stats.iter_mut() {
        s.opaque = state.count(MeshType::Opaque, *idx);
        s.transparent = state.count(MeshType::Transparency, *idx);
    }
    stats
}

pub fn print(state: &MeshState, labels: &[(usize, String)]) {
    let stats = collect(state);
    println!(
        "{:>5}  {:<18} {:>7} {:>10} {:>10} {:>10} {:>10}",
        "slot", "volume", "chunks", "opq-vert", "opq-idx", "trn-vert", "trn-idx"
    );
    for (idx, label) in labels {
        let owner = state.resolve_idx(*idx);
        let s = stats.get(&owner).copied().unwrap_or_default();
        let label = if owner != *idx {
            format!("{label} -> {owner}")
        } else {
            label.clone()
        };
        println!(
            "{:>5}  {:<18} {:>7} {:>10} {:>10} {:>10} {:>10}",
            idx,
            label,
            s.chunks,
            s.opaque.vertices,
            s.opaque.indices,
            s.transparent.vertices,
            s.transparent.indices
        );
    }
}
