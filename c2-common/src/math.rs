//! Math helpers shared by the conversion stages
//!
//! - [`Transform`] - translation / rotation / scale triple used for bind and reference poses
//! - [`Rotator`] - pitch / yaw / roll Euler angles (degrees) in the target engine's convention
//! - [`Color8`] - linear float color packed to 8 bits per channel

use glam::{Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

// ============================================================================
// Transform
// ============================================================================

/// Local bone transform (no shear)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Build a transform from a translation and rotation with unit scale
    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ============================================================================
// Euler Rotator
// ============================================================================

/// Gimbal-lock threshold for quaternion -> Euler extraction
const SINGULARITY_THRESHOLD: f32 = 0.499_999_5;

/// Euler rotation in degrees
///
/// Pitch rotates about Y, yaw about Z, roll about X. The quaternion conversions match the
/// target engine's rotator convention, so `from_quat(to_quat(r))` reproduces `r` away from
/// the ±90° pitch singularity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Extract Euler angles from a unit quaternion
    pub fn from_quat(q: Quat) -> Self {
        let singularity = q.z * q.x - q.w * q.y;
        let yaw_y = 2.0 * (q.w * q.z + q.x * q.y);
        let yaw_x = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
        let yaw = yaw_y.atan2(yaw_x).to_degrees();

        if singularity < -SINGULARITY_THRESHOLD {
            Self {
                pitch: -90.0,
                yaw,
                roll: normalize_axis(-yaw - 2.0 * q.x.atan2(q.w).to_degrees()),
            }
        } else if singularity > SINGULARITY_THRESHOLD {
            Self {
                pitch: 90.0,
                yaw,
                roll: normalize_axis(yaw - 2.0 * q.x.atan2(q.w).to_degrees()),
            }
        } else {
            let roll_y = -2.0 * (q.w * q.x + q.y * q.z);
            let roll_x = 1.0 - 2.0 * (q.x * q.x + q.y * q.y);
            Self {
                pitch: (2.0 * singularity).asin().to_degrees(),
                yaw,
                roll: roll_y.atan2(roll_x).to_degrees(),
            }
        }
    }

    /// Compose the Euler angles back into a quaternion
    pub fn to_quat(self) -> Quat {
        let (sp, cp) = (self.pitch.to_radians() * 0.5).sin_cos();
        let (sy, cy) = (self.yaw.to_radians() * 0.5).sin_cos();
        let (sr, cr) = (self.roll.to_radians() * 0.5).sin_cos();

        Quat::from_xyzw(
            cr * sp * sy - sr * cp * cy,
            -cr * sp * cy - sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
            cr * cp * cy + sr * sp * sy,
        )
    }
}

/// Wrap an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_axis(angle: f32) -> f32 {
    let mut angle = angle % 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    if angle > 180.0 {
        angle -= 360.0;
    }
    angle
}

// ============================================================================
// Color Packing
// ============================================================================

/// Convert f32 to unsigned normalized 8-bit integer (unorm8)
///
/// Maps [0.0, 1.0] to [0, 255] without sRGB conversion; out-of-range input is clamped.
#[inline]
pub fn f32_to_unorm8(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.999) as u8
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color8 {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Pack a linear float color (no sRGB conversion)
    pub fn from_linear(color: Vec4) -> Self {
        Self {
            r: f32_to_unorm8(color.x),
            g: f32_to_unorm8(color.y),
            b: f32_to_unorm8(color.z),
            a: f32_to_unorm8(color.w),
        }
    }

    /// True when the RGB channels are all 255; alpha is not considered
    pub fn is_white_rgb(&self) -> bool {
        self.r == 255 && self.g == 255 && self.b == 255
    }
}

impl Default for Color8 {
    fn default() -> Self {
        Self::WHITE
    }
}
