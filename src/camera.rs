// Preview frame sources for the `scan` loop.
// Visual expectation: each `next_frame()` gives a Vec<u32> of 0x00RRGGBB pixels,
// ready to have the viewfinder painted on top and be pushed to the screen.

use crate::error::Result;
use crate::types::FrameBuffer;

pub trait FrameSource {
    /// Grab the next preview frame.
    fn next_frame(&mut self) -> Result<FrameBuffer>;

    /// Resolution the source actually delivers.
    fn resolution(&self) -> (u32, u32);
}

#[cfg(feature = "camera")]
pub use webcam::CameraCapture;

#[cfg(feature = "camera")]
mod webcam {
    use super::FrameSource;
    use crate::error::{Error, Result};
    use crate::types::FrameBuffer;
    use log::info;
    use nokhwa::{
        Camera,
        pixel_format::RgbFormat,
        utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
    };

    // A small wrapper around nokhwa::Camera so the scan loop stays clean.
    pub struct CameraCapture {
        cam: Camera,
        width: u32,
        height: u32,
    }

    impl CameraCapture {
        /// Open camera `index` near the requested resolution and start streaming.
        pub fn new(index: u32, width: u32, height: u32) -> Result<Self> {
            let fmt = CameraFormat::new(
                Resolution::new(width, height),
                FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
                30,
            );
            let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

            let mut cam = Camera::new(CameraIndex::Index(index), req)
                .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
            cam.open_stream()
                .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

            // The stream might settle on a slightly different resolution.
            let actual = cam.resolution();
            info!("camera {index} streaming at {}x{}", actual.width(), actual.height());
            Ok(Self { cam, width: actual.width(), height: actual.height() })
        }
    }

    impl FrameSource for CameraCapture {
        fn next_frame(&mut self) -> Result<FrameBuffer> {
            // blocks until a new frame is ready
            let frame = self
                .cam
                .frame()
                .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
            let rgb_img = frame
                .decode_image::<RgbFormat>()
                .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

            let (w, h) = rgb_img.dimensions();
            let pixels = rgb_img
                .pixels()
                .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
                .collect();
            Ok(FrameBuffer { width: w as usize, height: h as usize, pixels })
        }

        fn resolution(&self) -> (u32, u32) {
            (self.width, self.height)
        }
    }
}

/// Stand-in preview when no camera is compiled in: a slowly drifting gradient
/// with an optional image (e.g. a generated barcode) pasted in the middle.
pub struct TestPattern {
    width: usize,
    height: usize,
    tick: u32,
    center: Option<FrameBuffer>,
}

impl TestPattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: width as usize, height: height as usize, tick: 0, center: None }
    }

    pub fn with_center(mut self, image: FrameBuffer) -> Self {
        self.center = Some(image);
        self
    }
}

impl FrameSource for TestPattern {
    fn next_frame(&mut self) -> Result<FrameBuffer> {
        let (w, h) = (self.width, self.height);
        let t = self.tick;
        self.tick = self.tick.wrapping_add(1);

        let mut fb = FrameBuffer::new(w, h, 0);
        for y in 0..h {
            for x in 0..w {
                let r = ((x as u32 + t) * 255 / w.max(1) as u32) & 0xFF;
                let g = (y as u32 * 255 / h.max(1) as u32) & 0xFF;
                fb.pixels[y * w + x] = (r << 16) | (g << 8) | 0x60;
            }
        }
        if let Some(img) = &self.center {
            let ox = w.saturating_sub(img.width) / 2;
            let oy = h.saturating_sub(img.height) / 2;
            for y in 0..img.height.min(h) {
                for x in 0..img.width.min(w) {
                    fb.pixels[(oy + y) * w + ox + x] = img.pixels[y * img.width + x];
                }
            }
        }
        Ok(fb)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_matches_resolution_and_pastes_center() {
        let mut p = TestPattern::new(40, 30).with_center(FrameBuffer::new(10, 10, 0x00_AB_CD_EF));
        assert_eq!(p.resolution(), (40, 30));
        let f = p.next_frame().unwrap();
        assert_eq!((f.width, f.height), (40, 30));
        assert_eq!(f.pixel(20, 15), Some(0x00_AB_CD_EF));
        assert_ne!(f.pixel(0, 0), Some(0x00_AB_CD_EF));
    }

    #[test]
    fn pattern_drifts_between_frames() {
        let mut p = TestPattern::new(16, 4);
        let a = p.next_frame().unwrap();
        let b = p.next_frame().unwrap();
        assert_ne!(a, b);
    }
}
