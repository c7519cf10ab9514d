//! Mesh description builder (source surfaces -> indexed mesh)
//!
//! Every surface becomes one polygon group. Each source vertex yields a mesh vertex and one
//! vertex instance carrying its corner attributes; faces become triangles over those instances
//! in their original corner order.

use c2_common::{BoneWeight, IndexedMesh, PolygonGroup, SourceMesh, SourceVertex, VertexInstance};
use glam::{Vec2, Vec3};
use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::settings::VertexDedup;

/// Data-quality counts collected while building a mesh description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeshStats {
    /// Faces skipped because two corners share a vertex
    pub degenerate_faces: usize,
    /// Faces dropped because vertex merging left fewer than three distinct vertices
    pub collapsed_faces: usize,
    /// Source vertices folded into an existing mesh vertex
    pub merged_vertices: usize,
    /// Source vertices with fewer UV sets than the mesh declares
    pub missing_uv_vertices: usize,
}

impl MeshStats {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// Emit the counts; anything that altered the geometry is a warning
    pub fn log(&self, asset: &str) {
        tracing::debug!("{}: {:?}", asset, self);
        if self.degenerate_faces > 0 {
            tracing::warn!(
                "{}: skipped {} degenerate faces",
                asset,
                self.degenerate_faces
            );
        }
        if self.collapsed_faces > 0 {
            tracing::warn!(
                "{}: dropped {} faces collapsed by vertex merging",
                asset,
                self.collapsed_faces
            );
        }
        if self.missing_uv_vertices > 0 {
            tracing::warn!(
                "{}: {} vertices are missing UV sets (zero-filled)",
                asset,
                self.missing_uv_vertices
            );
        }
    }
}

/// Build the indexed mesh description of a source mesh
///
/// The description has `uv_set_count + 1` UV channels; the last one is reserved for the
/// lightmap and left zeroed. Tangents are zero with a +1 binormal sign, to be recomputed by
/// the consuming build step.
pub fn build_mesh_description(
    source: &SourceMesh,
    dedup: VertexDedup,
) -> Result<(IndexedMesh, MeshStats)> {
    let vertex_count = source.vertex_count();
    let uv_channel_count = source.uv_set_count + 1;

    let mut mesh = IndexedMesh {
        vertices: Vec::with_capacity(vertex_count),
        vertex_sources: Vec::with_capacity(vertex_count),
        vertex_instances: Vec::with_capacity(vertex_count),
        polygon_groups: Vec::with_capacity(source.surfaces.len()),
        uv_channel_count,
    };
    let mut stats = MeshStats::default();
    let mut welder = match dedup {
        VertexDedup::None => None,
        VertexDedup::PositionAndAttributes => Some(Welder::default()),
    };

    let mut surface_names = HashSet::with_capacity(source.surfaces.len());
    let mut global_index = 0u32;

    for surface in &source.surfaces {
        if !surface_names.insert(surface.name.as_str()) {
            return Err(ConvertError::DuplicateSurface(surface.name.clone()));
        }

        // Surface-local vertex index -> vertex instance index
        let mut instance_of = Vec::with_capacity(surface.vertices.len());

        for vertex in &surface.vertices {
            if vertex.uvs.len() < source.uv_set_count {
                stats.missing_uv_vertices += 1;
            }
            let uvs = instance_uvs(vertex, source.uv_set_count, uv_channel_count);

            let instance = match welder.as_mut() {
                None => push_vertex(&mut mesh, vertex, global_index, uvs),
                Some(welder) => welder.insert(&mut mesh, &mut stats, vertex, global_index, uvs),
            };
            instance_of.push(instance);
            global_index += 1;
        }

        let mut triangles = Vec::with_capacity(surface.faces.len());
        for (face_index, face) in surface.faces.iter().enumerate() {
            if let Some(&index) = face
                .indices
                .iter()
                .find(|&&i| i as usize >= surface.vertices.len())
            {
                return Err(ConvertError::FaceIndexOutOfRange {
                    surface: surface.name.clone(),
                    face: face_index,
                    index,
                    count: surface.vertices.len(),
                });
            }
            if let Some(&index) = face
                .materials
                .iter()
                .find(|&&m| m as usize >= source.materials.len())
            {
                return Err(ConvertError::MaterialIndexOutOfRange {
                    surface: surface.name.clone(),
                    index,
                    count: source.materials.len(),
                });
            }

            if face.is_degenerate() {
                stats.degenerate_faces += 1;
                continue;
            }

            let triangle = face.indices.map(|i| instance_of[i as usize]);
            let [a, b, c] = triangle.map(|i| mesh.vertex_instances[i as usize].vertex);
            if a == b || b == c || c == a {
                stats.collapsed_faces += 1;
                continue;
            }
            triangles.push(triangle);
        }

        mesh.polygon_groups.push(PolygonGroup {
            name: surface.name.clone(),
            triangles,
        });
    }

    tracing::debug!(
        "Built mesh description '{}': {} vertices, {} instances, {} triangles, {} groups",
        source.name,
        mesh.vertices.len(),
        mesh.vertex_instances.len(),
        mesh.triangle_count(),
        mesh.polygon_groups.len()
    );

    Ok((mesh, stats))
}

/// Declared UV sets copied verbatim, missing ones and the lightmap slot zeroed
fn instance_uvs(vertex: &SourceVertex, uv_set_count: usize, channels: usize) -> Vec<Vec2> {
    (0..channels)
        .map(|i| match vertex.uvs.get(i) {
            Some(uv) if i < uv_set_count => *uv,
            _ => Vec2::ZERO,
        })
        .collect()
}

fn new_instance(vertex: u32, source: &SourceVertex, uvs: Vec<Vec2>) -> VertexInstance {
    VertexInstance {
        vertex,
        normal: source.normal,
        tangent: Vec3::ZERO,
        binormal_sign: 1.0,
        color: source.color,
        uvs,
    }
}

/// One mesh vertex plus one instance; returns the instance index
fn push_vertex(mesh: &mut IndexedMesh, vertex: &SourceVertex, source: u32, uvs: Vec<Vec2>) -> u32 {
    let index = mesh.vertices.len() as u32;
    mesh.vertices.push(vertex.position);
    mesh.vertex_sources.push(source);

    let instance = mesh.vertex_instances.len() as u32;
    mesh.vertex_instances.push(new_instance(index, vertex, uvs));
    instance
}

// ============================================================================
// Vertex merging
// ============================================================================

/// Float bits with `-0.0` folded into `0.0`
#[inline]
fn bits(value: f32) -> u32 {
    (value + 0.0).to_bits()
}

#[derive(PartialEq, Eq, Hash)]
struct VertexKey {
    position: [u32; 3],
    weights: Vec<(u32, u32)>,
}

impl VertexKey {
    fn new(position: Vec3, weights: &[BoneWeight]) -> Self {
        Self {
            position: position.to_array().map(bits),
            weights: weights.iter().map(|w| (w.bone, bits(w.weight))).collect(),
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
struct InstanceKey {
    vertex: u32,
    normal: [u32; 3],
    color: [u32; 4],
    uvs: Vec<[u32; 2]>,
}

/// Lookup tables for position-and-attribute merging
#[derive(Default)]
struct Welder {
    vertices: HashMap<VertexKey, u32>,
    instances: HashMap<InstanceKey, u32>,
}

impl Welder {
    fn insert(
        &mut self,
        mesh: &mut IndexedMesh,
        stats: &mut MeshStats,
        vertex: &SourceVertex,
        source: u32,
        uvs: Vec<Vec2>,
    ) -> u32 {
        let key = VertexKey::new(vertex.position, &vertex.weights);
        let index = match self.vertices.get(&key) {
            Some(&index) => {
                stats.merged_vertices += 1;
                index
            }
            None => {
                let index = mesh.vertices.len() as u32;
                mesh.vertices.push(vertex.position);
                mesh.vertex_sources.push(source);
                self.vertices.insert(key, index);
                index
            }
        };

        let key = InstanceKey {
            vertex: index,
            normal: vertex.normal.to_array().map(bits),
            color: vertex.color.to_array().map(bits),
            uvs: uvs.iter().map(|uv| uv.to_array().map(bits)).collect(),
        };
        *self.instances.entry(key).or_insert_with(|| {
            let instance = mesh.vertex_instances.len() as u32;
            mesh.vertex_instances.push(new_instance(index, vertex, uvs));
            instance
        })
    }
}
