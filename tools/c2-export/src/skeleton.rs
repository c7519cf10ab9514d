//! Skeleton builder (bone list -> reference skeleton)
//!
//! Builds the bone hierarchy and bind pose from an ordered bone list and computes the
//! per-bone hierarchy depth.

use c2_common::{BoneInfo, MeshBoneInfo, ReferenceSkeleton, SourceMesh};
use hashbrown::HashSet;
use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::mesh::asset_name;
use crate::settings::MeshSettings;
use crate::skin::convert_bones;

/// Result of skeleton conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedSkeleton {
    /// Skeleton asset name (`SK_<mesh name>`)
    pub name: String,
    pub skeleton: ReferenceSkeleton,
}

/// Build a reference skeleton from bones stored parent-first
///
/// Every parent must have a lower index than its child. Forward or self references and
/// duplicate names are rejected instead of producing a wrong depth.
pub fn build_reference_skeleton(bones: &[BoneInfo]) -> Result<ReferenceSkeleton> {
    let mut names = HashSet::with_capacity(bones.len());
    let mut infos = Vec::with_capacity(bones.len());
    let mut ref_pose = Vec::with_capacity(bones.len());
    let mut depths: Vec<u32> = Vec::with_capacity(bones.len());
    let mut max_depth = 0;

    for (index, bone) in bones.iter().enumerate() {
        if !names.insert(bone.name.as_str()) {
            return Err(ConvertError::DuplicateBone(bone.name.clone()));
        }

        let depth = match bone.parent {
            None => 1,
            Some(parent) if parent < index => depths[parent] + 1,
            Some(parent) => {
                return Err(ConvertError::InvalidParent {
                    index,
                    name: bone.name.clone(),
                    parent: parent as i64,
                });
            }
        };

        max_depth = max_depth.max(depth);
        depths.push(depth);
        infos.push(MeshBoneInfo {
            name: bone.name.clone(),
            parent: bone.parent,
        });
        ref_pose.push(bone.local_transform);
    }

    Ok(ReferenceSkeleton {
        bones: infos,
        ref_pose,
        depths,
        depth: max_depth,
    })
}

/// Skeleton asset name for a mesh
pub fn skeleton_name(mesh_name: &str) -> String {
    format!("SK_{}", asset_name(mesh_name))
}

/// Convert the bones of a source mesh into a reference skeleton
pub fn convert_skeleton(mesh: &SourceMesh, settings: &MeshSettings) -> Result<ConvertedSkeleton> {
    let bones = convert_bones(&mesh.bones, settings.bone_axis)?;
    let skeleton = build_reference_skeleton(&bones)?;

    tracing::debug!(
        "Built skeleton for '{}': {} bones, depth {}",
        mesh.name,
        skeleton.len(),
        skeleton.depth
    );

    Ok(ConvertedSkeleton {
        name: skeleton_name(&mesh.name),
        skeleton,
    })
}
