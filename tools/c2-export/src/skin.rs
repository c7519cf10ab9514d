//! Skinned mesh assembler (indexed mesh + bone weights -> skin payload)
//!
//! Flattens the mesh description into the wedge/face/influence layout consumed by the skeletal
//! mesh build step, converts the bone table, and runs the skeleton builder over the result.

use c2_common::{
    BoneInfo, Bounds, Color8, IndexedMesh, RawInfluence, ReferenceSkeleton, SkinFace, SkinPayload,
    SourceBone, SourceMesh, SourceVertex, Transform, Wedge,
};
use glam::{Quat, Vec2, Vec3};
use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::mesh::{
    asset_name, build_mesh_description, resolve_material_slots, MaterialSlot, MeshStats,
};
use crate::settings::{BoneAxisConvention, MeshSettings};
use crate::skeleton::{build_reference_skeleton, skeleton_name};

/// Wedges only carry the first two UV channels
const MAX_WEDGE_UVS: usize = 2;

/// Data-quality counts collected while assembling a skin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkinStats {
    /// Weights dropped for being zero or negative
    pub dropped_weights: usize,
    /// Influences removed by the `max_influences` cap
    pub capped_influences: usize,
}

/// Build options handed to the consuming skeletal mesh build step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkeletalBuildSettings {
    pub remove_degenerates: bool,
    pub recompute_tangents: bool,
    pub use_mikktspace: bool,
}

impl Default for SkeletalBuildSettings {
    fn default() -> Self {
        Self {
            remove_degenerates: true,
            recompute_tangents: true,
            use_mikktspace: true,
        }
    }
}

/// Result of skeletal mesh conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedSkeletalMesh {
    pub name: String,
    pub skeleton_name: String,
    pub skin: SkinPayload,
    pub skeleton: ReferenceSkeleton,
    pub materials: Vec<MaterialSlot>,
    pub build_settings: SkeletalBuildSettings,
    pub mesh_stats: MeshStats,
    pub skin_stats: SkinStats,
}

impl ConvertedSkeletalMesh {
    /// Skeletal depth of the built hierarchy
    pub fn depth(&self) -> u32 {
        self.skeleton.depth
    }
}

// ============================================================================
// Bones
// ============================================================================

/// Convert source bones to skin bones
///
/// Parent `-1` marks a root. Other negative parents and parents that are not earlier bones
/// are rejected.
pub fn convert_bones(bones: &[SourceBone], axis: BoneAxisConvention) -> Result<Vec<BoneInfo>> {
    bones
        .iter()
        .enumerate()
        .map(|(index, bone)| {
            let parent = match bone.parent {
                -1 => None,
                p if p >= 0 && (p as usize) < index => Some(p as usize),
                p => {
                    return Err(ConvertError::InvalidParent {
                        index,
                        name: bone.name.clone(),
                        parent: p as i64,
                    });
                }
            };

            let rotation = match axis {
                BoneAxisConvention::Native => bone.local_rotation,
                BoneAxisConvention::FlipHandedness => {
                    flip_handedness(bone.local_rotation, parent.is_none())
                }
            };

            Ok(BoneInfo {
                name: bone.name.clone(),
                parent,
                local_transform: Transform::from_translation_rotation(
                    bone.local_position,
                    rotation,
                ),
            })
        })
        .collect()
}

fn flip_handedness(q: Quat, is_root: bool) -> Quat {
    let w = if is_root { -q.w } else { q.w };
    Quat::from_xyzw(q.x, -q.y, q.z, w)
}

// ============================================================================
// Skin assembly
// ============================================================================

/// Assemble the skin payload of an indexed mesh
///
/// `mesh` must have been built from `source`; its `vertex_sources` index the source vertices
/// across all surfaces.
pub fn assemble_skin(
    mesh: &IndexedMesh,
    source: &SourceMesh,
    settings: &MeshSettings,
) -> Result<(SkinPayload, SkinStats)> {
    let mut stats = SkinStats::default();
    let source_vertices: Vec<&SourceVertex> = source.vertices().collect();
    let bones = convert_bones(&source.bones, settings.bone_axis)?;

    // Influences
    let mut influences = Vec::with_capacity(mesh.vertices.len());
    for (vertex_index, &raw) in mesh.vertex_sources.iter().enumerate() {
        let vertex = source_vertices.get(raw as usize).ok_or(
            ConvertError::VertexInstanceOutOfRange {
                index: raw,
                count: source_vertices.len(),
            },
        )?;
        let vertex_index = vertex_index as u32;

        let mut kept = Vec::with_capacity(vertex.weights.len());
        for weight in &vertex.weights {
            if weight.bone as usize >= bones.len() {
                return Err(ConvertError::BoneIndexOutOfRange {
                    vertex: vertex_index,
                    bone: weight.bone,
                    count: bones.len(),
                });
            }
            if weight.weight > 0.0 {
                kept.push(*weight);
            } else {
                stats.dropped_weights += 1;
            }
        }

        if let Some(max) = settings.max_influences {
            if kept.len() > max {
                let mut order: Vec<usize> = (0..kept.len()).collect();
                order.sort_by(|&a, &b| kept[b].weight.total_cmp(&kept[a].weight));
                order.truncate(max);
                order.sort_unstable();
                stats.capped_influences += kept.len() - max;
                kept = order.into_iter().map(|i| kept[i]).collect();
            }
        }

        influences.extend(kept.into_iter().map(|w| RawInfluence {
            bone_index: w.bone,
            vertex_index,
            weight: w.weight,
        }));
    }

    // Wedges and faces
    let triangle_count = mesh.triangle_count();
    let mut wedges = Vec::with_capacity(triangle_count * 3);
    let mut faces = Vec::with_capacity(triangle_count);

    for (group, triangle) in mesh.triangles() {
        let material_index = group as u16;
        let base = wedges.len() as u32;
        let mut face = SkinFace {
            wedge_indices: [base, base + 1, base + 2],
            material_index,
            smoothing_groups: 0,
            tangent_x: [Vec3::ZERO; 3],
            tangent_y: [Vec3::ZERO; 3],
            tangent_z: [Vec3::ZERO; 3],
        };

        for (corner, &index) in triangle.iter().enumerate() {
            let instance = mesh.vertex_instances.get(index as usize).ok_or(
                ConvertError::VertexInstanceOutOfRange {
                    index,
                    count: mesh.vertex_instances.len(),
                },
            )?;

            let mut uvs = [Vec2::ZERO; MAX_WEDGE_UVS];
            for (slot, uv) in uvs.iter_mut().zip(&instance.uvs) {
                *slot = *uv;
            }
            wedges.push(Wedge {
                vertex_index: instance.vertex,
                material_index,
                uvs,
                color: Color8::from_linear(instance.color),
            });

            face.tangent_x[corner] = instance.tangent;
            let binormal = instance.normal.cross(instance.tangent).normalize_or_zero();
            face.tangent_y[corner] = binormal * instance.binormal_sign;
            face.tangent_z[corner] = instance.normal;
        }

        // Flip winding for the target engine
        face.wedge_indices.swap(0, 2);
        face.tangent_z.swap(0, 2);
        faces.push(face);
    }

    if faces.len() != triangle_count {
        return Err(ConvertError::TriangleCountMismatch {
            produced: faces.len(),
            expected: triangle_count,
        });
    }

    let has_vertex_colors = wedges.iter().any(|w| !w.color.is_white_rgb());
    let num_tex_coords = mesh.uv_channel_count.clamp(1, MAX_WEDGE_UVS) as u32;

    let payload = SkinPayload {
        bounds: Bounds::from_points(&mesh.vertices),
        points: mesh.vertices.clone(),
        point_to_raw: mesh.vertex_sources.clone(),
        wedges,
        faces,
        influences,
        materials: mesh.polygon_groups.iter().map(|g| g.name.clone()).collect(),
        bones,
        num_tex_coords,
        has_vertex_colors,
    };

    tracing::debug!(
        "Assembled skin: {} points, {} wedges, {} faces, {} influences, {} bones",
        payload.points.len(),
        payload.wedges.len(),
        payload.faces.len(),
        payload.influences.len(),
        payload.bones.len()
    );

    Ok((payload, stats))
}

/// Convert a source mesh into a skeletal mesh payload and its reference skeleton
pub fn convert_skeletal_mesh(
    source: &SourceMesh,
    settings: &MeshSettings,
) -> Result<ConvertedSkeletalMesh> {
    let name = asset_name(&source.name);
    let materials = resolve_material_slots(source)?;
    let (mesh, mesh_stats) = build_mesh_description(source, settings.dedup)?;
    mesh_stats.log(&name);

    let (skin, skin_stats) = assemble_skin(&mesh, source, settings)?;
    if skin_stats.dropped_weights > 0 {
        tracing::warn!(
            "{}: dropped {} non-positive bone weights",
            name,
            skin_stats.dropped_weights
        );
    }
    if skin_stats.capped_influences > 0 {
        tracing::warn!(
            "{}: removed {} influences over the per-vertex limit",
            name,
            skin_stats.capped_influences
        );
    }

    let skeleton = build_reference_skeleton(&skin.bones)?;

    tracing::info!(
        "Converted skeletal mesh '{}': {} points, {} faces, {} bones (depth {})",
        name,
        skin.points.len(),
        skin.faces.len(),
        skeleton.len(),
        skeleton.depth
    );

    Ok(ConvertedSkeletalMesh {
        skeleton_name: skeleton_name(&source.name),
        name,
        skin,
        skeleton,
        materials,
        build_settings: SkeletalBuildSettings::default(),
        mesh_stats,
        skin_stats,
    })
}
