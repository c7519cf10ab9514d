//! Converted animation clip
//!
//! A clip holds either dense per-frame bone tracks or sparse per-axis transform curves.
//!
//! # Frame numbering
//! A clip of `frame_count` frames spans the closed range `0..=frame_count`, so it has
//! `frame_count + 1` sampled keys. Dense tracks never hold more entries than that.

use glam::{Quat, Vec3};
use serde::Serialize;

use crate::formats::source::AnimationType;
use crate::math::Transform;

/// Converted animation
#[derive(Debug, Clone, Serialize)]
pub struct AnimationClip {
    pub frame_rate: f32,
    pub frame_count: u32,
    /// Animation type the clip was converted with (after any override)
    pub anim_type: AnimationType,
    pub tracks: ClipTracks,
}

impl AnimationClip {
    /// Number of sampled keys (`frame_count + 1`)
    pub fn sampled_key_count(&self) -> usize {
        sampled_key_count(self.frame_count)
    }

    /// Clip length in seconds
    pub fn duration(&self) -> f32 {
        self.frame_count as f32 / self.frame_rate
    }

    /// Number of bones carrying a track or curve
    pub fn bone_count(&self) -> usize {
        match &self.tracks {
            ClipTracks::Dense(tracks) => tracks.len(),
            ClipTracks::Curves(curves) => curves.len(),
        }
    }
}

/// Sampled key count for a clip of `frame_count` frames
#[inline]
pub fn sampled_key_count(frame_count: u32) -> usize {
    frame_count as usize + 1
}

/// Track payload of a clip
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", content = "bones", rename_all = "snake_case")]
pub enum ClipTracks {
    Dense(Vec<BoneTrack>),
    Curves(Vec<TransformCurve>),
}

// ============================================================================
// Dense tracks
// ============================================================================

/// One value per output frame for each channel; all three channels have the same length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneTrack {
    pub bone: String,
    pub positions: Vec<Vec3>,
    pub rotations: Vec<Quat>,
    pub scales: Vec<Vec3>,
}

impl BoneTrack {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Transform at `frame`, clamped to the last sample
    pub fn sample(&self, frame: usize) -> Option<Transform> {
        let last = self.len().checked_sub(1)?;
        let i = frame.min(last);
        Some(Transform {
            translation: self.positions[i],
            rotation: self.rotations[i],
            scale: self.scales[i],
        })
    }
}

// ============================================================================
// Curves
// ============================================================================

/// A (time, value) knot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveKey {
    /// Seconds
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Independent X/Y/Z curves of one transform channel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisCurves {
    pub x: Vec<CurveKey>,
    pub y: Vec<CurveKey>,
    pub z: Vec<CurveKey>,
}

impl AxisCurves {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty() && self.z.is_empty()
    }

    pub fn push(&mut self, time: f32, value: [f32; 3]) {
        self.x.push(CurveKey::new(time, value[0]));
        self.y.push(CurveKey::new(time, value[1]));
        self.z.push(CurveKey::new(time, value[2]));
    }

    /// Evaluate all three axes; `None` for an axis without knots
    pub fn evaluate(&self, time: f32) -> [Option<f32>; 3] {
        [
            evaluate_curve(&self.x, time),
            evaluate_curve(&self.y, time),
            evaluate_curve(&self.z, time),
        ]
    }
}

/// Transform curves of one bone
///
/// Rotation curves hold Euler degrees: X = roll, Y = pitch, Z = yaw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformCurve {
    pub bone: String,
    /// Reference transform keyed at time 0, present for non-absolute clips
    pub rest_key: Option<Transform>,
    pub translation: AxisCurves,
    pub rotation: AxisCurves,
    pub scale: AxisCurves,
}

impl TransformCurve {
    pub fn new(bone: impl Into<String>, rest_key: Option<Transform>) -> Self {
        Self {
            bone: bone.into(),
            rest_key,
            translation: AxisCurves::default(),
            rotation: AxisCurves::default(),
            scale: AxisCurves::default(),
        }
    }

    /// No knots on any channel
    pub fn has_no_knots(&self) -> bool {
        self.translation.is_empty() && self.rotation.is_empty() && self.scale.is_empty()
    }
}

/// Linear evaluation of sorted knots, clamped at both ends
pub fn evaluate_curve(keys: &[CurveKey], time: f32) -> Option<f32> {
    let first = keys.first()?;
    if time <= first.time {
        return Some(first.value);
    }

    let next = keys.iter().position(|k| k.time > time);
    match next {
        None => keys.last().map(|k| k.value),
        Some(i) => {
            let a = keys[i - 1];
            let b = keys[i];
            let span = b.time - a.time;
            let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };
            Some(a.value + (b.value - a.value) * t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_curve_clamps_and_interpolates() {
        let keys = [CurveKey::new(0.5, 2.0), CurveKey::new(1.5, 4.0)];
        assert_eq!(evaluate_curve(&keys, 0.0), Some(2.0));
        assert_eq!(evaluate_curve(&keys, 1.0), Some(3.0));
        assert_eq!(evaluate_curve(&keys, 9.0), Some(4.0));
        assert_eq!(evaluate_curve(&[], 1.0), None);
    }

    #[test]
    fn test_bone_track_sample_clamps() {
        let track = BoneTrack {
            bone: "root".into(),
            positions: vec![Vec3::ZERO, Vec3::X],
            rotations: vec![Quat::IDENTITY; 2],
            scales: vec![Vec3::ONE; 2],
        };
        assert_eq!(track.sample(7).unwrap().translation, Vec3::X);

        let empty = BoneTrack {
            bone: "root".into(),
            positions: vec![],
            rotations: vec![],
            scales: vec![],
        };
        assert!(empty.sample(0).is_none());
    }

    #[test]
    fn test_sampled_key_count_includes_last_frame() {
        assert_eq!(sampled_key_count(0), 1);
        assert_eq!(sampled_key_count(30), 31);
    }
}
