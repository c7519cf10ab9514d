//! Reference skeleton
//!
//! Bone hierarchy plus the bind (reference) pose in local space. Bones are stored parent-first,
//! so every `parent` index is lower than the bone's own index.

use serde::Serialize;

use crate::math::Transform;

/// Name and parent link of a skeleton bone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeshBoneInfo {
    pub name: String,
    pub parent: Option<usize>,
}

/// Hierarchy built by the skeleton builder
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferenceSkeleton {
    pub bones: Vec<MeshBoneInfo>,
    /// Local bind transform per bone
    pub ref_pose: Vec<Transform>,
    /// Hierarchy depth per bone (roots are 1)
    pub depths: Vec<u32>,
    /// Maximum of `depths`, 0 for an empty skeleton
    pub depth: u32,
}

impl ReferenceSkeleton {
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Index of the bone with the given name
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.bones.get(index).and_then(|b| b.parent)
    }

    pub fn bone_name(&self, index: usize) -> Option<&str> {
        self.bones.get(index).map(|b| b.name.as_str())
    }
}
