use crate::foundation::error::{AvatarError, AvatarResult};

/// Absolute 0-based frame index in output video space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> AvatarResult<Self> {
        if den == 0 {
            return Err(AvatarError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(AvatarError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timestamp of the start of `frame`, in seconds.
    pub fn frame_to_secs(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * self.frame_duration_secs()
    }

    /// Number of frames needed to cover `secs`, rounding up.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        // Multiply before dividing so exact rational products do not pick up an extra frame.
        (secs * f64::from(self.num) / f64::from(self.den)).ceil() as u64
    }
}

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a resolution that is safe for yuv420p output (non-zero, even sides).
    pub fn new(width: u32, height: u32) -> AvatarResult<Self> {
        let r = Self { width, height };
        r.validate()?;
        Ok(r)
    }

    /// Reject zero or odd dimensions.
    pub fn validate(self) -> AvatarResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AvatarError::validation(
                "resolution width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(AvatarError::validation(
                "resolution width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }

    /// `WxH` form accepted by ffmpeg's `-s`.
    pub fn ffmpeg_size(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Three-component vector used for gesture translation (scene units) and rotation (degrees).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// All-zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Construct from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise linear interpolation.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
            z: lerp(self.z, other.z, t),
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Scalar linear interpolation.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamp a timestamp into `[0, duration]`.
pub fn clamp_time(t: f64, duration: f64) -> f64 {
    t.clamp(0.0, duration.max(0.0))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
