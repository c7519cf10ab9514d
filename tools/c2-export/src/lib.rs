//! c2-export library
//!
//! Converts parsed C2 meshes and SEAnim animations into engine import data: indexed mesh
//! descriptions, skinned mesh payloads, reference skeletons, and resampled animation clips.
//! The conversion entry points are pure functions over in-memory data; [`manifest`] and
//! [`formats`] add file-based glue.

pub mod animation;
pub mod error;
pub mod formats;
pub mod manifest;
pub mod mesh;
pub mod settings;
pub mod skeleton;
pub mod skin;

// Re-export the shared data model
pub use c2_common::{
    AnimationClip, AnimationType, ClipTracks, IndexedMesh, ReferenceSkeleton, SkinPayload,
    SourceAnimation, SourceMesh, Transform,
};

pub use error::{ConvertError, Result};
pub use settings::{AnimationSettings, ImportSettings, MeshSettings};

// Re-export key types for mesh conversion
pub use mesh::{build_mesh_description, convert_static_mesh, ConvertedMesh, MeshStats};

// Re-export skin and skeleton conversion types
pub use skeleton::{build_reference_skeleton, convert_skeleton, ConvertedSkeleton};
pub use skin::{assemble_skin, convert_skeletal_mesh, ConvertedSkeletalMesh, SkinStats};

// Re-export animation conversion types
pub use animation::{
    convert_animation, AnimationStats, ConvertedAnimation, PoseSampler, ReferencePose,
};
