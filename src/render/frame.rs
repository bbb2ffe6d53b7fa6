use std::path::Path;

use anyhow::Context as _;

use crate::animation::gesture::GestureData;
use crate::animation::lipsync::LipSyncData;
use crate::animation::sample::{AvatarPose, sample_pose};
use crate::foundation::core::{Fps, FrameIndex, Resolution};
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::model::request::AvatarConfig;

/// printf-style pattern of persisted frame files, as understood by ffmpeg's image2 demuxer.
pub const FRAME_PATTERN: &str = "frame_%06d.png";

/// File name of `frame` under [`FRAME_PATTERN`].
pub fn frame_file_name(frame: FrameIndex) -> String {
    format!("frame_{:06}.png", frame.0)
}

/// One rendered frame: tightly packed, straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Check that `data` matches the dimensions.
    pub fn validate(&self) -> AvatarResult<()> {
        let want = (self.width as usize) * (self.height as usize) * 4;
        if self.data.len() != want {
            return Err(AvatarError::render(format!(
                "frame buffer is {} bytes, expected {want} for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

impl From<image::RgbaImage> for FrameRGBA {
    fn from(img: image::RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
        }
    }
}

/// Encode `frame` as PNG at `path`.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> AvatarResult<()> {
    frame.validate()?;
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write frame '{}'", path.display()))?;
    Ok(())
}

/// Everything a rasterizer needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameRequest<'a> {
    /// Avatar settings.
    pub avatar: &'a AvatarConfig,
    /// Frame to draw.
    pub frame: FrameIndex,
    /// Output frame rate.
    pub fps: Fps,
    /// Output size.
    pub resolution: Resolution,
    /// Lip-sync track, when generated.
    pub lip_sync: Option<&'a LipSyncData>,
    /// Gesture track, when generated.
    pub gestures: Option<&'a GestureData>,
}

impl FrameRequest<'_> {
    /// Presentation time of the frame in seconds.
    pub fn time_secs(&self) -> f64 {
        self.fps.frame_to_secs(self.frame)
    }

    /// Avatar pose at this frame.
    pub fn pose(&self) -> AvatarPose {
        sample_pose(self.lip_sync, self.gestures, self.time_secs())
    }
}

/// Capability that rasterizes one avatar frame.
///
/// Called once per frame, in order, from a blocking worker thread.
pub trait FrameRenderer: Send + Sync {
    /// Draw `req`. The returned frame must match `req.resolution`.
    fn render(&self, req: &FrameRequest<'_>) -> AvatarResult<FrameRGBA>;
}

/// Flat 2-D bust: torso, hand, head, eyes and a mouth driven by the sampled pose.
#[derive(Clone, Debug)]
pub struct SilhouetteRenderer {
    /// Background colour.
    pub background: [u8; 4],
    /// Clothing colour.
    pub torso: [u8; 4],
    /// Eye and mouth colour.
    pub features: [u8; 4],
}

impl Default for SilhouetteRenderer {
    fn default() -> Self {
        Self {
            background: [24, 28, 38, 255],
            torso: [52, 84, 140, 255],
            features: [40, 20, 24, 255],
        }
    }
}

/// Skin tones picked per model name.
const SKIN_TONES: [[u8; 4]; 4] = [
    [241, 194, 167, 255],
    [224, 172, 105, 255],
    [141, 85, 36, 255],
    [198, 134, 66, 255],
];

fn skin_tone(model: &str) -> [u8; 4] {
    let h = model
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
    SKIN_TONES[h % SKIN_TONES.len()]
}

impl FrameRenderer for SilhouetteRenderer {
    fn render(&self, req: &FrameRequest<'_>) -> AvatarResult<FrameRGBA> {
        let Resolution { width, height } = req.resolution;
        if width == 0 || height == 0 {
            return Err(AvatarError::render("cannot render a zero-sized frame"));
        }

        let pose = req.pose();
        let w = f64::from(width);
        let h = f64::from(height);
        let s = h;
        let skin = skin_tone(&req.avatar.model);
        let mut img = image::RgbaImage::from_pixel(width, height, image::Rgba(self.background));

        let torso = (
            w / 2.0 + pose.body.position.x * s,
            h * 0.98 - pose.body.position.y * s,
        );
        fill_ellipse(
            &mut img,
            torso,
            (0.30 * s, 0.26 * s),
            pose.body.rotation.z.to_radians(),
            self.torso,
        );

        let lift = pose.hand.rotation.x.to_radians().sin() * 0.1 * s;
        let hand = (
            w / 2.0 + 0.24 * s + pose.hand.position.x * s,
            h * 0.86 - pose.hand.position.y * s - lift,
        );
        fill_ellipse(&mut img, hand, (0.05 * s, 0.05 * s), 0.0, skin);

        // Yaw and pitch slide the head, roll tilts it.
        let roll = pose.head.rotation.z.to_radians();
        let yaw = pose.head.rotation.y.to_radians().sin() * 0.12 * s;
        let pitch = pose.head.rotation.x.to_radians().sin() * 0.12 * s;
        let head = (
            w / 2.0 + yaw + pose.head.position.x * s,
            h * 0.42 + pitch - pose.head.position.y * s,
        );
        fill_ellipse(&mut img, head, (0.14 * s, 0.18 * s), roll, skin);

        let on_head = |dx: f64, dy: f64| {
            let (sin, cos) = roll.sin_cos();
            (head.0 + dx * cos - dy * sin, head.1 + dx * sin + dy * cos)
        };
        for side in [-1.0, 1.0] {
            fill_ellipse(
                &mut img,
                on_head(side * 0.05 * s, -0.04 * s),
                (0.018 * s, 0.012 * s),
                roll,
                self.features,
            );
        }

        let m = pose.mouth;
        fill_ellipse(
            &mut img,
            on_head(0.0, (0.09 - m.lip_position * 0.01) * s),
            (
                (0.025 + m.width * 0.04) * s,
                (0.004 + m.openness * 0.045) * s,
            ),
            roll,
            self.features,
        );

        Ok(img.into())
    }
}

/// Fill an ellipse centred at `center` with radii `radii`, rotated by `angle` radians.
fn fill_ellipse(
    img: &mut image::RgbaImage,
    center: (f64, f64),
    radii: (f64, f64),
    angle: f64,
    color: [u8; 4],
) {
    let (rx, ry) = radii;
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let reach = rx.max(ry);
    let x0 = (center.0 - reach).floor().max(0.0) as u32;
    let y0 = (center.1 - reach).floor().max(0.0) as u32;
    let x1 = ((center.0 + reach).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((center.1 + reach).ceil().max(0.0) as u32).min(img.height());
    let (sin, cos) = angle.sin_cos();

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = f64::from(x) + 0.5 - center.0;
            let dy = f64::from(y) + 0.5 - center.1;
            let u = dx * cos + dy * sin;
            let v = -dx * sin + dy * cos;
            if (u / rx).powi(2) + (v / ry).powi(2) <= 1.0 {
                img.put_pixel(x, y, image::Rgba(color));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
