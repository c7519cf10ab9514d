//! Indexed mesh description
//!
//! Vertices hold positions only. Every face corner goes through a vertex instance that carries the
//! corner's shading attributes, so attribute seams never force position duplication. Triangles
//! live in polygon groups named after the source surface.

use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;

/// Indexed mesh produced by the mesh description builder
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexedMesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Global source vertex index (surface order) each mesh vertex was created from
    pub vertex_sources: Vec<u32>,
    /// Per-corner attributes
    pub vertex_instances: Vec<VertexInstance>,
    /// One group per source surface, in surface order
    pub polygon_groups: Vec<PolygonGroup>,
    /// UV channels per vertex instance (declared UV sets + 1 lightmap slot)
    pub uv_channel_count: usize,
}

impl IndexedMesh {
    /// Total number of triangles across all polygon groups
    pub fn triangle_count(&self) -> usize {
        self.polygon_groups.iter().map(|g| g.triangles.len()).sum()
    }

    /// Iterate (group index, triangle) pairs in group order
    pub fn triangles(&self) -> impl Iterator<Item = (usize, &[u32; 3])> {
        self.polygon_groups
            .iter()
            .enumerate()
            .flat_map(|(group, g)| g.triangles.iter().map(move |t| (group, t)))
    }

    /// Index of the lightmap UV channel (the last one)
    pub fn lightmap_channel(&self) -> usize {
        self.uv_channel_count.saturating_sub(1)
    }
}

/// Attributes of a single face corner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexInstance {
    /// Index into [`IndexedMesh::vertices`]
    pub vertex: u32,
    pub normal: Vec3,
    /// Zero until the host build stage recomputes tangents
    pub tangent: Vec3,
    pub binormal_sign: f32,
    /// Linear RGBA
    pub color: Vec4,
    /// [`IndexedMesh::uv_channel_count`] entries
    pub uvs: Vec<Vec2>,
}

/// Triangles belonging to one surface / material slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonGroup {
    pub name: String,
    /// Vertex instance indices in original corner order
    pub triangles: Vec<[u32; 3]>,
}
