//! Animation converter (sparse keyframes -> dense tracks or curves)
//!
//! Keyframes are matched to skeleton bones by name, corrected into the target coordinate
//! system, expressed against a reference pose, and either resampled to one value per frame or
//! emitted as per-axis curve knots.
//!
//! For non-absolute animations every skeleton bone is seeded with its reference pose first, so
//! bones without keyframes still hold a valid rest transform.

mod channels;
mod curves;
mod reference_pose;
mod resample;

use c2_common::{
    sampled_key_count, AnimationClip, AnimationType, BoneKeyframes, BoneTrack, ClipTracks,
    Keyframe, ReferenceSkeleton, SourceAnimation, Transform, TransformCurve,
};
use hashbrown::HashSet;
use serde::Serialize;

use crate::error::{Channel, ConvertError, Result};
use crate::mesh::asset_name;
use crate::settings::{AnimationSettings, TrackOutput};

pub use reference_pose::{resolve_reference_pose, PoseSampler, ReferencePose};

/// Counts collected while converting an animation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnimationStats {
    /// Skeleton bones that received keyframe data
    pub keyed_bones: usize,
    /// Animation bones with no skeleton bone of the same name
    pub unmatched_bones: usize,
    /// Skeleton bones seeded with their reference pose
    pub seeded_bones: usize,
    /// Keyframes past the last sampled frame (dense output only)
    pub dropped_keyframes: usize,
}

/// Result of animation conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedAnimation {
    pub name: String,
    pub clip: AnimationClip,
    pub stats: AnimationStats,
}

/// Check the frame rate, bone name uniqueness and per-channel keyframe ordering
pub fn validate_animation(source: &SourceAnimation) -> Result<()> {
    let frame_rate = source.header.frame_rate;
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(ConvertError::InvalidFrameRate(frame_rate));
    }

    let mut names = HashSet::with_capacity(source.bones.len());
    for bone in &source.bones {
        if !names.insert(bone.name.as_str()) {
            return Err(ConvertError::DuplicateAnimationBone(bone.name.clone()));
        }
        check_order(&bone.name, Channel::Position, &bone.positions)?;
        check_order(&bone.name, Channel::Rotation, &bone.rotations)?;
        check_order(&bone.name, Channel::Scale, &bone.scales)?;
    }
    Ok(())
}

fn check_order<T>(bone: &str, channel: Channel, keys: &[Keyframe<T>]) -> Result<()> {
    match keys.windows(2).find(|w| w[1].frame <= w[0].frame) {
        Some(w) => Err(ConvertError::UnorderedKeyframes {
            bone: bone.to_string(),
            channel,
            frame: w[1].frame,
        }),
        None => Ok(()),
    }
}

/// Convert a source animation against `skeleton`
///
/// `reference` selects the pose relative and additive keys are expressed against.
pub fn convert_animation(
    name: &str,
    source: &SourceAnimation,
    skeleton: &ReferenceSkeleton,
    reference: ReferencePose<'_>,
    settings: &AnimationSettings,
) -> Result<ConvertedAnimation> {
    validate_animation(source)?;

    let header = source.header;
    let anim_type = settings.effective_type(header.anim_type);
    let pose = resolve_reference_pose(skeleton, reference);
    let mut stats = AnimationStats::default();

    let mut matched = Vec::with_capacity(source.bones.len());
    for bone in &source.bones {
        match skeleton.find_bone(&bone.name) {
            Some(index) => matched.push((index, bone)),
            None => {
                tracing::debug!("Skipping animation bone '{}': not in skeleton", bone.name);
                stats.unmatched_bones += 1;
            }
        }
    }

    let tracks = match settings.output {
        TrackOutput::Dense => ClipTracks::Dense(dense_tracks(
            skeleton,
            &pose,
            &matched,
            anim_type,
            sampled_key_count(header.frame_count),
            &mut stats,
        )),
        TrackOutput::Curves => ClipTracks::Curves(curve_tracks(
            skeleton,
            &pose,
            &matched,
            anim_type,
            header.frame_rate,
            &mut stats,
        )),
    };

    let name = asset_name(name);
    if stats.unmatched_bones > 0 {
        tracing::warn!(
            "{}: {} animation bones not found in skeleton",
            name,
            stats.unmatched_bones
        );
    }
    if stats.dropped_keyframes > 0 {
        tracing::warn!(
            "{}: dropped {} keyframes past frame {}",
            name,
            stats.dropped_keyframes,
            header.frame_count
        );
    }

    let clip = AnimationClip {
        frame_rate: header.frame_rate,
        frame_count: header.frame_count,
        anim_type,
        tracks,
    };

    tracing::info!(
        "Converted animation '{}': {} frames @ {} fps, {} ({}), {} bone tracks",
        name,
        clip.frame_count,
        clip.frame_rate,
        anim_type,
        match settings.output {
            TrackOutput::Dense => "dense",
            TrackOutput::Curves => "curves",
        },
        clip.bone_count()
    );

    Ok(ConvertedAnimation { name, clip, stats })
}

fn dense_tracks(
    skeleton: &ReferenceSkeleton,
    pose: &[Transform],
    matched: &[(usize, &BoneKeyframes)],
    anim_type: AnimationType,
    key_count: usize,
    stats: &mut AnimationStats,
) -> Vec<BoneTrack> {
    let mut slots: Vec<Option<BoneTrack>> = match anim_type {
        AnimationType::Absolute => vec![None; skeleton.len()],
        AnimationType::Relative | AnimationType::Additive => skeleton
            .bones
            .iter()
            .zip(pose)
            .map(|(bone, reference)| {
                Some(resample::seeded_track(&bone.name, reference, key_count))
            })
            .collect(),
    };
    stats.seeded_bones = slots.iter().flatten().count();

    for &(index, keys) in matched {
        stats.dropped_keyframes += resample::out_of_range_keys(keys, key_count);
        if let Some(track) = resample::resample_bone(keys, &pose[index], anim_type, key_count) {
            slots[index] = Some(track);
            stats.keyed_bones += 1;
        }
    }

    slots.into_iter().flatten().collect()
}

fn curve_tracks(
    skeleton: &ReferenceSkeleton,
    pose: &[Transform],
    matched: &[(usize, &BoneKeyframes)],
    anim_type: AnimationType,
    frame_rate: f32,
    stats: &mut AnimationStats,
) -> Vec<TransformCurve> {
    let mut slots: Vec<Option<TransformCurve>> = match anim_type {
        AnimationType::Absolute => vec![None; skeleton.len()],
        AnimationType::Relative | AnimationType::Additive => skeleton
            .bones
            .iter()
            .zip(pose)
            .map(|(bone, reference)| {
                Some(TransformCurve::new(bone.name.as_str(), Some(*reference)))
            })
            .collect(),
    };
    stats.seeded_bones = slots.iter().flatten().count();

    for &(index, keys) in matched {
        if keys.is_empty() {
            continue;
        }
        let curve =
            slots[index].get_or_insert_with(|| TransformCurve::new(keys.name.as_str(), None));
        curves::key_curves(curve, keys, &pose[index], anim_type, frame_rate);
        stats.keyed_bones += 1;
    }

    slots
        .into_iter()
        .flatten()
        .filter(|c| c.rest_key.is_some() || !c.has_no_knots())
        .collect()
}
