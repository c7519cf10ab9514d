//! Skin-ready mesh payload
//!
//! The raw import data a skeletal mesh build consumes: points, per-corner wedges, faces with a
//! tangent basis per corner, loose (bone, vertex, weight) influences, and the binding bones.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::math::{Color8, Transform};

/// Skin payload produced by the skinned mesh assembler
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkinPayload {
    /// One point per mesh vertex
    pub points: Vec<Vec3>,
    /// Point index -> raw (source) vertex index
    pub point_to_raw: Vec<u32>,
    pub wedges: Vec<Wedge>,
    pub faces: Vec<SkinFace>,
    pub influences: Vec<RawInfluence>,
    /// Material import names, indexed by [`SkinFace::material_index`]
    pub materials: Vec<String>,
    pub bones: Vec<BoneInfo>,
    /// UV channels carried by the wedges (1 or 2)
    pub num_tex_coords: u32,
    /// Set when any wedge color differs from white
    pub has_vertex_colors: bool,
    pub bounds: Bounds,
}

/// A face corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wedge {
    /// Index into [`SkinPayload::points`]
    pub vertex_index: u32,
    pub material_index: u16,
    /// UV channels 0 and 1
    pub uvs: [Vec2; 2],
    pub color: Color8,
}

/// A skin triangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkinFace {
    pub wedge_indices: [u32; 3],
    pub material_index: u16,
    pub smoothing_groups: u32,
    /// Tangent per corner
    pub tangent_x: [Vec3; 3],
    /// Bitangent per corner
    pub tangent_y: [Vec3; 3],
    /// Normal per corner
    pub tangent_z: [Vec3; 3],
}

/// Loose bone influence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawInfluence {
    pub bone_index: u32,
    pub vertex_index: u32,
    pub weight: f32,
}

/// A bone with its parent-relative bind transform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneInfo {
    pub name: String,
    /// `None` for root bones
    pub parent: Option<usize>,
    pub local_transform: Transform,
}

/// Axis-aligned box plus bounding sphere
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
    pub origin: Vec3,
    pub extent: Vec3,
    pub sphere_radius: f32,
}

impl Bounds {
    /// Bounds of a point cloud; zero for an empty slice
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        let origin = (min + max) * 0.5;
        let extent = (max - min) * 0.5;

        Self {
            min,
            max,
            origin,
            extent,
            sphere_radius: extent.length(),
        }
    }
}
