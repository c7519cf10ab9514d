//! Conversion errors
//!
//! Structural problems that abort the conversion of one asset. Data-quality issues (degenerate
//! faces, zero weights, missing UV sets, unknown animation bones) are never errors; they are
//! counted in the per-asset stats instead.

use std::fmt;

use thiserror::Error;

/// Keyframe channel, used in error messages and stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Position => "position",
            Channel::Rotation => "rotation",
            Channel::Scale => "scale",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Bone '{name}' (index {index}) has parent {parent}, which is not an earlier bone")]
    InvalidParent {
        index: usize,
        name: String,
        parent: i64,
    },

    #[error("Duplicate bone name '{0}'")]
    DuplicateBone(String),

    #[error("Animation bone '{0}' appears more than once")]
    DuplicateAnimationBone(String),

    #[error("Duplicate surface name '{0}'")]
    DuplicateSurface(String),

    #[error(
        "Surface '{surface}' face {face} references vertex {index}, but the surface has {count} vertices"
    )]
    FaceIndexOutOfRange {
        surface: String,
        face: usize,
        index: u32,
        count: usize,
    },

    #[error(
        "Surface '{surface}' references material {index}, but the mesh has {count} materials"
    )]
    MaterialIndexOutOfRange {
        surface: String,
        index: u16,
        count: usize,
    },

    #[error("Vertex {vertex} is weighted to bone {bone}, but the mesh has {count} bones")]
    BoneIndexOutOfRange { vertex: u32, bone: u32, count: usize },

    #[error("Triangle references vertex instance {index}, but the mesh has {count}")]
    VertexInstanceOutOfRange { index: u32, count: usize },

    #[error("Skin assembly produced {produced} triangles, mesh description has {expected}")]
    TriangleCountMismatch { produced: usize, expected: usize },

    #[error("Invalid frame rate {0} (must be finite and greater than zero)")]
    InvalidFrameRate(f32),

    #[error("Bone '{bone}' {channel} keyframes are not strictly increasing at frame {frame}")]
    UnorderedKeyframes {
        bone: String,
        channel: Channel,
        frame: u32,
    },
}

/// Result type of the conversion core
pub type Result<T> = std::result::Result<T, ConvertError>;
