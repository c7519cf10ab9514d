//! Shared types and utilities for the C2 asset converter
//!
//! This crate provides the host-agnostic data model shared between:
//! - the external reader that parses proprietary mesh/animation files
//! - `c2-export` (conversion core and asset pipeline)
//! - host integrations that turn converted payloads into engine assets
//!
//! # Modules
//!
//! - [`math`] - Transforms, Euler rotators, 8-bit color packing
//! - [`formats`] - Source asset types and converted payload types

pub mod formats;
pub mod math;

// Re-export commonly used math items
pub use math::{Color8, Rotator, Transform, f32_to_unorm8};

// Re-export commonly used format items
pub use formats::{
    evaluate_curve, sampled_key_count, AnimationClip, AnimationHeader, AnimationType, AxisCurves,
    BoneInfo, BoneKeyframes, BoneTrack, BoneWeight, Bounds, ClipTracks, CurveKey, Face,
    IndexedMesh, Keyframe, MeshBoneInfo, PolygonGroup, RawInfluence, ReferenceSkeleton, SkinFace,
    SkinPayload, SourceAnimation, SourceBone, SourceMaterial, SourceMesh, SourceVertex, Surface,
    TransformCurve, VertexInstance, Wedge,
};
