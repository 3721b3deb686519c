//! CPU surface extraction: cubic, binary greedy and marching cubes meshers (engine-only).
#![forbid(unsafe_code)]

mod binary;
mod cubic;
mod emit;
pub mod face;
mod marching_cubes;
mod mesh;
mod tables;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use volmesh_geom::{IVec3, Region};
use volmesh_volume::{Palette, RawVolume};

pub use binary::extract_binary;
pub use cubic::{CubicOptions, extract_cubic};
pub use marching_cubes::extract_marching_cubes;
pub use mesh::{AO_NONE, ChunkMesh, MESH_NORMAL, Mesh, MeshType, VoxelVertex};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceExtractionType {
    #[default]
    Cubic,
    Binary,
    MarchingCubes,
}

impl SurfaceExtractionType {
    pub const ALL: [SurfaceExtractionType; 3] = [
        SurfaceExtractionType::Cubic,
        SurfaceExtractionType::Binary,
        SurfaceExtractionType::MarchingCubes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceExtractionType::Cubic => "cubic",
            SurfaceExtractionType::Binary => "binary",
            SurfaceExtractionType::MarchingCubes => "marching_cubes",
        }
    }
}

impl fmt::Display for SurfaceExtractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExtractionTypeError(pub String);

impl fmt::Display for ParseExtractionTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown mesh mode '{}' (expected cubic, binary or marching_cubes)",
            self.0
        )
    }
}

impl std::error::Error for ParseExtractionTypeError {}

impl FromStr for SurfaceExtractionType {
    type Err = ParseExtractionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cubic" => Ok(SurfaceExtractionType::Cubic),
            "binary" => Ok(SurfaceExtractionType::Binary),
            "marching_cubes" | "marchingcubes" => Ok(SurfaceExtractionType::MarchingCubes),
            _ => Err(ParseExtractionTypeError(s.to_string())),
        }
    }
}

/// Everything one extraction reads. Vertex positions come out as
/// `voxel position - region.lower + translate`.
#[derive(Clone, Copy)]
pub struct SurfaceExtractionContext<'a> {
    pub kind: SurfaceExtractionType,
    pub volume: &'a RawVolume,
    pub region: Region,
    pub palette: &'a Palette,
    pub translate: IVec3,
    pub merge_quads: bool,
    pub reuse_vertices: bool,
    pub ambient_occlusion: bool,
}

/// Context with the default options of `kind`.
pub fn create_context<'a>(
    kind: SurfaceExtractionType,
    volume: &'a RawVolume,
    region: Region,
    palette: &'a Palette,
    translate: IVec3,
) -> SurfaceExtractionContext<'a> {
    SurfaceExtractionContext {
        kind,
        volume,
        region,
        palette,
        translate,
        merge_quads: true,
        reuse_vertices: kind == SurfaceExtractionType::Cubic,
        ambient_occlusion: kind != SurfaceExtractionType::MarchingCubes,
    }
}

pub fn build_cubic_context<'a>(
    volume: &'a RawVolume,
    region: Region,
    palette: &'a Palette,
    translate: IVec3,
    opts: CubicOptions,
) -> SurfaceExtractionContext<'a> {
    SurfaceExtractionContext {
        merge_quads: opts.merge_quads,
        reuse_vertices: opts.reuse_vertices,
        ambient_occlusion: opts.ambient_occlusion,
        ..create_context(SurfaceExtractionType::Cubic, volume, region, palette, translate)
    }
}

pub fn build_binary_context<'a>(
    volume: &'a RawVolume,
    region: Region,
    palette: &'a Palette,
    translate: IVec3,
    ambient_occlusion: bool,
) -> SurfaceExtractionContext<'a> {
    SurfaceExtractionContext {
        ambient_occlusion,
        ..create_context(SurfaceExtractionType::Binary, volume, region, palette, translate)
    }
}

/// Runs the extractor selected by `ctx.kind`, appending to `out`.
/// Both sub-meshes get `ctx.region.lower` as their offset.
pub fn extract_surface(ctx: &SurfaceExtractionContext<'_>, out: &mut ChunkMesh) {
    match ctx.kind {
        SurfaceExtractionType::Cubic => extract_cubic(
            ctx.volume,
            &ctx.region,
            ctx.translate,
            CubicOptions {
                merge_quads: ctx.merge_quads,
                reuse_vertices: ctx.reuse_vertices,
                ambient_occlusion: ctx.ambient_occlusion,
            },
            out,
        ),
        SurfaceExtractionType::Binary => extract_binary(
            ctx.volume,
            &ctx.region,
            ctx.translate,
            ctx.ambient_occlusion,
            out,
        ),
        SurfaceExtractionType::MarchingCubes => {
            extract_marching_cubes(ctx.volume, &ctx.region, ctx.palette, ctx.translate, out)
        }
    }
    out.set_offset(ctx.region.lower);
    log::trace!(
        target: "mesh",
        "extracted {} region={} opaque_idx={} transparent_idx={}",
        ctx.kind,
        ctx.region,
        out.opaque().no_of_indices(),
        out.transparent().no_of_indices()
    );
}
