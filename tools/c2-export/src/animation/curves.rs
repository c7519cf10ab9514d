//! Sparse curve output: one knot per keyframe on per-axis curves

use c2_common::{AnimationType, BoneKeyframes, Transform, TransformCurve};

use super::channels::{correct_position, correct_rotator, rotator_to_axes};

/// Fill `curve` with the corrected keyframes of one bone
///
/// Knot times are `frame / frame_rate` seconds. Rotation knots hold roll, pitch and yaw in
/// degrees on X, Y and Z.
pub(crate) fn key_curves(
    curve: &mut TransformCurve,
    keys: &BoneKeyframes,
    reference: &Transform,
    anim_type: AnimationType,
    frame_rate: f32,
) {
    let time = |frame: u32| frame as f32 / frame_rate;

    for key in &keys.positions {
        let p = correct_position(key.value, reference, anim_type);
        curve.translation.push(time(key.frame), p.to_array());
    }
    for key in &keys.rotations {
        let r = correct_rotator(key.value, reference, anim_type);
        curve.rotation.push(time(key.frame), rotator_to_axes(r));
    }
    for key in &keys.scales {
        curve.scale.push(time(key.frame), key.value.to_array());
    }
}
