// Where the viewfinder window sits, both on screen and in camera-preview pixels.
// Visual: the framing rect is the bright, unmasked area in the middle of the window.

use crate::types::FramingRect;

const MIN_FRAME_WIDTH: u32 = 240;
const MIN_FRAME_HEIGHT: u32 = 240;
const MAX_FRAME_WIDTH: u32 = 1200; // = 5/8 * 1920
const MAX_FRAME_HEIGHT: u32 = 675; // = 5/8 * 1080

/// Source of the framing geometry. Either rect may be `None` until the
/// provider has finished configuring.
pub trait CameraGeometry {
    fn framing_rect(&self) -> Option<FramingRect>;
    fn framing_rect_in_preview(&self) -> Option<FramingRect>;
}

/// Derives both rects from the screen and camera-preview resolutions.
#[derive(Clone, Debug, Default)]
pub struct PreviewGeometry {
    screen: Option<(u32, u32)>,
    preview: Option<(u32, u32)>,
}

/// 5/8 of the resolution, clamped to the hard limits.
fn desired_dimension(resolution: u32, hard_min: u32, hard_max: u32) -> u32 {
    let dim = 5 * resolution / 8;
    dim.clamp(hard_min, hard_max)
}

impl PreviewGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the on-screen view size and the camera's preview resolution.
    pub fn configure(&mut self, screen: (u32, u32), preview: (u32, u32)) {
        self.screen = Some(screen);
        self.preview = Some(preview);
    }
}

impl CameraGeometry for PreviewGeometry {
    fn framing_rect(&self) -> Option<FramingRect> {
        let (sw, sh) = self.screen?;
        if sw == 0 || sh == 0 {
            return None;
        }
        // Never larger than the screen itself.
        let w = desired_dimension(sw, MIN_FRAME_WIDTH, MAX_FRAME_WIDTH).min(sw);
        let h = desired_dimension(sh, MIN_FRAME_HEIGHT, MAX_FRAME_HEIGHT).min(sh);
        let left = (sw - w) / 2;
        let top = (sh - h) / 2;
        Some(FramingRect::new(left as i32, top as i32, (left + w) as i32, (top + h) as i32))
    }

    fn framing_rect_in_preview(&self) -> Option<FramingRect> {
        let frame = self.framing_rect()?;
        let (sw, sh) = self.screen?;
        let (pw, ph) = self.preview?;
        let sx = |v: i32| (v as i64 * pw as i64 / sw as i64) as i32;
        let sy = |v: i32| (v as i64 * ph as i64 / sh as i64) as i32;
        Some(FramingRect::new(sx(frame.left), sy(frame.top), sx(frame.right), sy(frame.bottom)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_has_no_geometry() {
        let g = PreviewGeometry::new();
        assert_eq!(g.framing_rect(), None);
        assert_eq!(g.framing_rect_in_preview(), None);
    }

    #[test]
    fn frame_is_centred_five_eighths() {
        let mut g = PreviewGeometry::new();
        g.configure((640, 480), (640, 480));
        // 5/8*640 = 400, 5/8*480 = 300
        assert_eq!(g.framing_rect(), Some(FramingRect::new(120, 90, 520, 390)));
    }

    #[test]
    fn frame_respects_hard_limits() {
        let mut g = PreviewGeometry::new();
        g.configure((3840, 2160), (1920, 1080));
        let f = g.framing_rect().unwrap();
        assert_eq!((f.width(), f.height()), (1200, 675));

        g.configure((320, 240), (320, 240));
        let f = g.framing_rect().unwrap();
        assert_eq!((f.width(), f.height()), (240, 240));
        assert_eq!(f, FramingRect::new(40, 0, 280, 240));
    }

    #[test]
    fn preview_rect_is_scaled() {
        let mut g = PreviewGeometry::new();
        g.configure((640, 480), (1280, 960));
        assert_eq!(g.framing_rect_in_preview(), Some(FramingRect::new(240, 180, 1040, 780)));
    }
}
