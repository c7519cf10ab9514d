//! Parsed source assets
//!
//! In-memory representation of the proprietary mesh (`.c2m`) and animation (`.seanim`) files as
//! handed over by the external reader. Byte layout and parsing are not part of this crate.

use glam::{Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

// ============================================================================
// Mesh
// ============================================================================

/// A parsed source mesh: ordered surfaces, bone list, and material table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMesh {
    /// Asset name, may contain `::` namespace separators
    pub name: String,
    /// Number of UV sets declared for every vertex
    #[serde(default = "default_uv_set_count")]
    pub uv_set_count: usize,
    /// Surfaces in rendering order
    pub surfaces: Vec<Surface>,
    /// Bones in hierarchy order (parents before children)
    #[serde(default)]
    pub bones: Vec<SourceBone>,
    /// Material table referenced by [`Surface::materials`]
    #[serde(default)]
    pub materials: Vec<SourceMaterial>,
}

fn default_uv_set_count() -> usize {
    1
}

impl SourceMesh {
    /// Total number of vertices across all surfaces
    pub fn vertex_count(&self) -> usize {
        self.surfaces.iter().map(|s| s.vertices.len()).sum()
    }

    /// Total number of faces across all surfaces, degenerate ones included
    pub fn face_count(&self) -> usize {
        self.surfaces.iter().map(|s| s.faces.len()).sum()
    }

    /// Iterate every vertex in surface order (the global vertex numbering)
    pub fn vertices(&self) -> impl Iterator<Item = &SourceVertex> {
        self.surfaces.iter().flat_map(|s| s.vertices.iter())
    }
}

/// A named group of vertices and faces sharing a material binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    /// Unique within the mesh; becomes the polygon group / material slot name
    pub name: String,
    pub vertices: Vec<SourceVertex>,
    pub faces: Vec<Face>,
    /// Indices into [`SourceMesh::materials`]
    #[serde(default)]
    pub materials: Vec<u16>,
}

/// A single source vertex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Linear RGBA in [0, 1]
    #[serde(default = "default_vertex_color")]
    pub color: Vec4,
    /// One entry per UV set
    #[serde(default)]
    pub uvs: Vec<Vec2>,
    /// Bone influences, any count, not necessarily normalized
    #[serde(default)]
    pub weights: Vec<BoneWeight>,
}

fn default_vertex_color() -> Vec4 {
    Vec4::ONE
}

/// A (bone, weight) pair on a vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneWeight {
    pub bone: u32,
    pub weight: f32,
}

/// A triangle referencing its surface's vertex buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub indices: [u32; 3],
    /// Indices into [`SourceMesh::materials`], checked but not otherwise used
    #[serde(default)]
    pub materials: Vec<u16>,
}

impl Face {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: [a, b, c],
            materials: Vec::new(),
        }
    }

    /// Two or more corners share a vertex index
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.indices;
        a == b || b == c || c == a
    }
}

/// A bone record from the source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBone {
    pub name: String,
    /// Index of the parent bone, -1 for a root
    pub parent: i32,
    pub local_position: Vec3,
    pub local_rotation: Quat,
}

/// A material table entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMaterial {
    pub name: String,
}

// ============================================================================
// Animation
// ============================================================================

/// How keyframe values relate to the reference pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    /// Values are final local poses
    #[default]
    Absolute,
    /// Translations are offsets from the reference pose
    #[serde(alias = "delta")]
    Relative,
    /// Translations are offsets and rotations are deltas composed onto the reference pose
    Additive,
}

impl std::fmt::Display for AnimationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnimationType::Absolute => "absolute",
            AnimationType::Relative => "relative",
            AnimationType::Additive => "additive",
        };
        f.write_str(name)
    }
}

/// Animation file header
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnimationHeader {
    /// Frames per second
    pub frame_rate: f32,
    /// Number of frames in the clip
    pub frame_count: u32,
    pub anim_type: AnimationType,
}

/// A parsed source animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAnimation {
    pub header: AnimationHeader,
    pub bones: Vec<BoneKeyframes>,
}

/// Sparse keyframes for one bone, one list per channel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoneKeyframes {
    pub name: String,
    #[serde(default)]
    pub positions: Vec<Keyframe<Vec3>>,
    #[serde(default)]
    pub rotations: Vec<Keyframe<Quat>>,
    #[serde(default)]
    pub scales: Vec<Keyframe<Vec3>>,
}

impl BoneKeyframes {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.rotations.is_empty() && self.scales.is_empty()
    }
}

/// A single (frame, value) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub frame: u32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(frame: u32, value: T) -> Self {
        Self { frame, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_face() {
        assert!(!Face::new(0, 1, 2).is_degenerate());
        assert!(Face::new(0, 0, 2).is_degenerate());
        assert!(Face::new(0, 1, 1).is_degenerate());
        assert!(Face::new(2, 1, 2).is_degenerate());
    }

    #[test]
    fn test_source_mesh_defaults_from_json() {
        let mesh: SourceMesh = serde_json::from_str(
            r#"{
                "name": "mdl::crate",
                "surfaces": [{
                    "name": "body",
                    "vertices": [{ "position": [0, 0, 0], "normal": [0, 0, 1] }],
                    "faces": []
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(mesh.uv_set_count, 1);
        assert!(mesh.bones.is_empty());
        let vertex = &mesh.surfaces[0].vertices[0];
        assert_eq!(vertex.color, Vec4::ONE);
        assert!(vertex.uvs.is_empty());
        assert_eq!(mesh.vertex_count(), 1);
    }

    #[test]
    fn test_animation_type_accepts_delta_alias() {
        let t: AnimationType = serde_json::from_str(r#""delta""#).unwrap();
        assert_eq!(t, AnimationType::Relative);
        assert_eq!(AnimationType::Additive.to_string(), "additive");
    }
}
