//! Dense per-frame resampling of sparse keyframe channels

use c2_common::{AnimationType, BoneKeyframes, BoneTrack, Keyframe, Transform};
use glam::{Quat, Vec3};

use super::channels::{correct_position, correct_rotation};

/// Expand sparse keyframes into one value per frame, at most `key_count` values
///
/// Frames before the first keyframe repeat its value; frames between two keyframes are
/// interpolated with `lerp`. Keyframes must be strictly increasing. Nothing is produced past
/// the last keyframe; padding is up to the caller.
pub(crate) fn densify<T: Copy>(
    keys: &[Keyframe<T>],
    key_count: usize,
    lerp: impl Fn(T, T, f32) -> T,
) -> Vec<T> {
    let (out, _) = keys.iter().fold(
        (Vec::with_capacity(key_count), None::<Keyframe<T>>),
        |(mut out, prev), key| {
            let end = (key.frame as usize).min(key_count);
            match prev {
                None => out.resize(end, key.value),
                Some(prev) => {
                    let span = (key.frame - prev.frame) as f32;
                    while out.len() < end {
                        let t = (out.len() as u32 - prev.frame) as f32 / span;
                        out.push(lerp(prev.value, key.value, t));
                    }
                }
            }
            if (key.frame as usize) < key_count {
                out.push(key.value);
            }
            (out, Some(*key))
        },
    );
    out
}

/// Number of keyframes that fall past the last sampled frame
pub(crate) fn out_of_range_keys(bone: &BoneKeyframes, key_count: usize) -> usize {
    let past = |frame: u32| frame as usize >= key_count;
    bone.positions.iter().filter(|k| past(k.frame)).count()
        + bone.rotations.iter().filter(|k| past(k.frame)).count()
        + bone.scales.iter().filter(|k| past(k.frame)).count()
}

/// Repeat the last value until `len`, seeding an empty channel with `seed`
fn pad<T: Copy>(mut values: Vec<T>, len: usize, seed: T) -> Vec<T> {
    let fill = values.last().copied().unwrap_or(seed);
    values.resize(len, fill);
    values
}

/// Track of a skeleton bone holding its reference pose on every frame
pub(crate) fn seeded_track(bone: &str, reference: &Transform, key_count: usize) -> BoneTrack {
    BoneTrack {
        bone: bone.to_string(),
        positions: vec![reference.translation; key_count],
        rotations: vec![reference.rotation; key_count],
        scales: vec![Vec3::ONE; key_count],
    }
}

/// Resample one bone's keyframes into a dense track
///
/// Returns `None` when the bone has no keyframes in any channel.
pub(crate) fn resample_bone(
    keys: &BoneKeyframes,
    reference: &Transform,
    anim_type: AnimationType,
    key_count: usize,
) -> Option<BoneTrack> {
    let positions: Vec<_> = keys
        .positions
        .iter()
        .map(|k| Keyframe::new(k.frame, correct_position(k.value, reference, anim_type)))
        .collect();
    let rotations: Vec<_> = keys
        .rotations
        .iter()
        .map(|k| Keyframe::new(k.frame, correct_rotation(k.value, reference, anim_type)))
        .collect();

    let positions = densify(&positions, key_count, Vec3::lerp);
    let rotations = densify(&rotations, key_count, Quat::slerp);
    let scales = densify(&keys.scales, key_count, Vec3::lerp);

    let len = positions.len().max(rotations.len()).max(scales.len());
    if len == 0 {
        return None;
    }

    let position_seed = match anim_type {
        AnimationType::Absolute => Vec3::ZERO,
        AnimationType::Relative | AnimationType::Additive => reference.translation,
    };

    Some(BoneTrack {
        bone: keys.name.clone(),
        positions: pad(positions, len, position_seed),
        rotations: pad(rotations, len, reference.rotation),
        scales: pad(scales, len, Vec3::ONE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    fn keys(frames: &[(u32, f32)]) -> Vec<Keyframe<f32>> {
        frames.iter().map(|&(f, v)| Keyframe::new(f, v)).collect()
    }

    #[test]
    fn test_densify_interpolates_between_keys() {
        let out = densify(&keys(&[(0, 0.0), (10, 10.0)]), 11, lerp_f32);
        assert_eq!(out.len(), 11);
        assert_eq!(out[5], 5.0);
        assert_eq!(out[10], 10.0);
    }

    #[test]
    fn test_densify_replicates_first_key_backwards() {
        let out = densify(&keys(&[(5, 3.0)]), 11, lerp_f32);
        assert_eq!(out, vec![3.0; 6]);
    }

    #[test]
    fn test_densify_stops_at_key_count() {
        let out = densify(&keys(&[(0, 0.0), (4, 4.0), (20, 20.0)]), 7, lerp_f32);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let out = densify(&keys(&[(9, 1.0)]), 4, lerp_f32);
        assert_eq!(out, vec![1.0; 4]);
    }

    #[test]
    fn test_densify_empty() {
        assert!(densify(&keys(&[]), 10, lerp_f32).is_empty());
    }

    #[test]
    fn test_resample_pads_missing_rotation_with_reference() {
        let reference = Transform::from_translation_rotation(Vec3::Z, Quat::from_rotation_x(0.4));
        let keys = BoneKeyframes {
            name: "j_knee".into(),
            positions: vec![Keyframe::new(0, Vec3::ZERO), Keyframe::new(4, Vec3::X)],
            ..Default::default()
        };

        let track = resample_bone(&keys, &reference, AnimationType::Relative, 11).unwrap();
        assert_eq!(track.positions.len(), 5);
        assert_eq!(track.rotations, vec![reference.rotation; 5]);
        assert_eq!(track.scales, vec![Vec3::ONE; 5]);
        assert_eq!(track.positions[0], Vec3::Z);
    }

    #[test]
    fn test_resample_rotation_keeps_constant_angular_speed() {
        let keys = BoneKeyframes {
            name: "j_knee".into(),
            rotations: vec![
                Keyframe::new(0, Quat::IDENTITY),
                Keyframe::new(10, Quat::from_rotation_x(160f32.to_radians())),
            ],
            ..Default::default()
        };

        let track =
            resample_bone(&keys, &Transform::IDENTITY, AnimationType::Absolute, 11).unwrap();
        for (frame, degrees) in [(2, 32.0f32), (7, 112.0)] {
            let angle = (2.0 * track.rotations[frame].w.abs().min(1.0).acos()).to_degrees();
            assert!((angle - degrees).abs() < 0.05, "frame {}: {}", frame, angle);
        }
    }

    #[test]
    fn test_resample_pads_short_channels_with_last_value() {
        let keys = BoneKeyframes {
            name: "j_knee".into(),
            positions: vec![Keyframe::new(0, Vec3::ZERO), Keyframe::new(6, Vec3::X)],
            scales: vec![Keyframe::new(2, Vec3::splat(2.0))],
            ..Default::default()
        };

        let track =
            resample_bone(&keys, &Transform::IDENTITY, AnimationType::Absolute, 11).unwrap();
        assert_eq!(track.len(), 7);
        assert_eq!(track.scales, vec![Vec3::splat(2.0); 7]);
    }

    #[test]
    fn test_resample_absolute_seeds_zero_position() {
        let reference = Transform::from_translation_rotation(Vec3::Z, Quat::IDENTITY);
        let keys = BoneKeyframes {
            name: "j_knee".into(),
            scales: vec![Keyframe::new(1, Vec3::ONE)],
            ..Default::default()
        };
        let track = resample_bone(&keys, &reference, AnimationType::Absolute, 11).unwrap();
        assert_eq!(track.positions, vec![Vec3::ZERO; 2]);
    }

    #[test]
    fn test_resample_bone_without_keys() {
        let keys = BoneKeyframes {
            name: "j_knee".into(),
            ..Default::default()
        };
        assert!(resample_bone(&keys, &Transform::IDENTITY, AnimationType::Relative, 11).is_none());
    }

    #[test]
    fn test_out_of_range_keys() {
        let keys = BoneKeyframes {
            name: "j_knee".into(),
            positions: vec![Keyframe::new(0, Vec3::ZERO), Keyframe::new(11, Vec3::X)],
            rotations: vec![Keyframe::new(12, Quat::IDENTITY)],
            ..Default::default()
        };
        assert_eq!(out_of_range_keys(&keys, 11), 2);
    }

    #[test]
    fn test_seeded_track() {
        let reference = Transform::from_translation_rotation(Vec3::Y, Quat::from_rotation_z(1.0));
        let track = seeded_track("j_hip", &reference, 4);
        assert_eq!(track.len(), 4);
        assert_eq!(track.sample(3), Some(reference));
    }
}
