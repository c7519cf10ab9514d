//! Import settings
//!
//! Explicit configuration passed into the conversion entry points. Loaded from a TOML file or the
//! `[settings]` table of an asset manifest; every field has a default.
//!
//! ```toml
//! [mesh]
//! dedup = "position_and_attributes"   # default: "none"
//! bone_axis = "native"                # or "flip_handedness"
//! max_influences = 4                  # default: unlimited
//!
//! [animation]
//! anim_type = "additive"              # override the file header
//! output = "curves"                   # default: "dense"
//! pose_frame = 0                      # reference pose evaluation frame
//! ```

use anyhow::{Context, Result};
use c2_common::AnimationType;
use serde::Deserialize;
use std::path::Path;

/// All import settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportSettings {
    pub mesh: MeshSettings,
    pub animation: AnimationSettings,
}

impl ImportSettings {
    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse import settings")
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid settings file: {:?}", path))
    }
}

// ============================================================================
// Mesh
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshSettings {
    pub dedup: VertexDedup,
    pub bone_axis: BoneAxisConvention,
    /// Keep at most this many influences per vertex (largest weights first)
    pub max_influences: Option<usize>,
}

/// Vertex sharing policy of the mesh description builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexDedup {
    /// Every source vertex becomes its own mesh vertex
    #[default]
    None,
    /// Merge vertices with identical position and weights, and vertex instances that also
    /// share normal, color, and UVs
    PositionAndAttributes,
}

/// Bone rotation convention applied when building skin bones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoneAxisConvention {
    /// Rotations are used as stored
    #[default]
    Native,
    /// Negate Y (and W on root bones)
    FlipHandedness,
}

// ============================================================================
// Animation
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationSettings {
    /// Replaces the animation type from the file header
    pub anim_type: Option<AnimationType>,
    pub output: TrackOutput,
    /// Frame at which an external reference pose sequence is evaluated
    pub pose_frame: u32,
}

impl AnimationSettings {
    /// Animation type after applying the override
    pub fn effective_type(&self, header: AnimationType) -> AnimationType {
        self.anim_type.unwrap_or(header)
    }
}

/// Track representation produced by the resampler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackOutput {
    /// One sample per frame
    #[default]
    Dense,
    /// One knot per keyframe on per-axis curves
    Curves,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = ImportSettings::parse("").unwrap();
        assert_eq!(settings.mesh.dedup, VertexDedup::None);
        assert_eq!(settings.mesh.bone_axis, BoneAxisConvention::Native);
        assert!(settings.mesh.max_influences.is_none());
        assert!(settings.animation.anim_type.is_none());
        assert_eq!(settings.animation.output, TrackOutput::Dense);
        assert_eq!(settings.animation.pose_frame, 0);
    }

    #[test]
    fn test_settings_full() {
        let settings = ImportSettings::parse(
            r#"
[mesh]
dedup = "position_and_attributes"
bone_axis = "flip_handedness"
max_influences = 4

[animation]
anim_type = "delta"
output = "curves"
pose_frame = 12
"#,
        )
        .unwrap();

        assert_eq!(settings.mesh.dedup, VertexDedup::PositionAndAttributes);
        assert_eq!(settings.mesh.bone_axis, BoneAxisConvention::FlipHandedness);
        assert_eq!(settings.mesh.max_influences, Some(4));
        assert_eq!(settings.animation.anim_type, Some(AnimationType::Relative));
        assert_eq!(settings.animation.output, TrackOutput::Curves);
        assert_eq!(settings.animation.pose_frame, 12);
    }

    #[test]
    fn test_settings_override_anim_type() {
        let mut settings = AnimationSettings::default();
        assert_eq!(
            settings.effective_type(AnimationType::Additive),
            AnimationType::Additive
        );
        settings.anim_type = Some(AnimationType::Absolute);
        assert_eq!(
            settings.effective_type(AnimationType::Additive),
            AnimationType::Absolute
        );
    }

    #[test]
    fn test_settings_reject_unknown_keys() {
        assert!(ImportSettings::parse("[mesh]\nflip_uvs = true\n").is_err());
    }
}
