//! Per-keyframe value corrections
//!
//! Source keyframes are mirrored across the XZ plane into the target engine's coordinate
//! system and offset by the reference pose where the animation type asks for it.

use c2_common::{AnimationType, Rotator, Transform};
use glam::{Quat, Vec3};

/// Position: Y negated, reference translation added unless absolute
pub(crate) fn correct_position(
    value: Vec3,
    reference: &Transform,
    anim_type: AnimationType,
) -> Vec3 {
    let mirrored = Vec3::new(value.x, -value.y, value.z);
    match anim_type {
        AnimationType::Absolute => mirrored,
        AnimationType::Relative | AnimationType::Additive => mirrored + reference.translation,
    }
}

/// Rotation as Euler angles: additive keys are composed with the reference rotation, then
/// yaw and roll are negated
pub(crate) fn correct_rotator(
    value: Quat,
    reference: &Transform,
    anim_type: AnimationType,
) -> Rotator {
    let rotation = match anim_type {
        AnimationType::Additive => value * reference.rotation,
        AnimationType::Absolute | AnimationType::Relative => value,
    };
    let rotator = Rotator::from_quat(rotation);
    Rotator::new(rotator.pitch, -rotator.yaw, -rotator.roll)
}

pub(crate) fn correct_rotation(
    value: Quat,
    reference: &Transform,
    anim_type: AnimationType,
) -> Quat {
    correct_rotator(value, reference, anim_type).to_quat()
}

/// Curve knot layout of a rotator: X = roll, Y = pitch, Z = yaw
#[inline]
pub(crate) fn rotator_to_axes(rotator: Rotator) -> [f32; 3] {
    [rotator.roll, rotator.pitch, rotator.yaw]
}
