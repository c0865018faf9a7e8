// Viewfinder overlay painted on top of the camera preview.
// Visual outcomes, in paint order:
// - everything outside the framing rect darkened by the mask color
// - four corner brackets at the rect's corners
// - the laser line sweeping top to bottom inside the rect
// - a status caption centred under the rect

use crate::animation::Phase;
use crate::assets::OverlayAssets;
use crate::config::OverlayStyle;
use crate::draw::{Surface, text_width_5x7};
use crate::error::{Error, Result};
use crate::geometry::CameraGeometry;
use crate::types::FramingRect;
use log::debug;

/// Repaint margin around the framing rect on each animation tick.
const POINT_SIZE: i32 = 6;

/// Top edge of the laser sprite for a given phase.
pub fn laser_top(frame: &FramingRect, phase: Phase) -> i32 {
    frame.top + (phase.value() * frame.height() as f32) as i32
}

/// The four mask bands around `frame`: above, left, right, below.
pub fn mask_bands(bounds: &FramingRect, frame: &FramingRect) -> [FramingRect; 4] {
    [
        FramingRect::new(bounds.left, bounds.top, bounds.right, frame.top),
        FramingRect::new(bounds.left, frame.top, frame.left, frame.bottom),
        FramingRect::new(frame.right, frame.top, bounds.right, frame.bottom),
        FramingRect::new(bounds.left, frame.bottom, bounds.right, bounds.bottom),
    ]
}

/// Clip `frame` to the surface; an empty result counts as no geometry.
fn usable_frame<S: Surface + ?Sized>(surface: &S, frame: Option<FramingRect>) -> Result<FramingRect> {
    frame
        .and_then(|f| f.intersect(&surface.bounds()))
        .ok_or(Error::GeometryUnavailable)
}

fn paint<S: Surface + ?Sized>(
    surface: &mut S,
    assets: &OverlayAssets,
    style: &OverlayStyle,
    frame: FramingRect,
    phase: Phase,
) {
    let bounds = surface.bounds();

    // 1) Darken the exterior
    for band in mask_bands(&bounds, &frame) {
        if !band.is_empty() {
            surface.fill_rect(band, style.mask_color);
        }
    }

    // 2) Corner brackets
    let (lt, rt, lb, rb) = (&assets.corner_lt, &assets.corner_rt, &assets.corner_lb, &assets.corner_rb);
    surface.draw_sprite(lt, frame.left, frame.top);
    surface.draw_sprite(rt, frame.right - rt.width as i32, frame.top);
    surface.draw_sprite(lb, frame.left, frame.bottom - lb.height as i32);
    surface.draw_sprite(rb, frame.right - rb.width as i32, frame.bottom - rb.height as i32);

    // 3) Laser, stretched across the frame; may hang below it at the end of a sweep
    let top = laser_top(&frame, phase);
    let laser_rect = FramingRect::new(frame.left, top, frame.right, top + assets.laser.height as i32);
    let columns = FramingRect::new(frame.left, bounds.top, frame.right, bounds.bottom);
    surface.draw_sprite_scaled(&assets.laser, laser_rect, columns);

    // 4) Caption
    let scale = style.text_scale.max(1);
    let x = bounds.width() / 2 - text_width_5x7(&style.caption, scale) / 2;
    surface.draw_text(&style.caption, x, frame.bottom + style.caption_margin, scale, style.caption_color);
}

/// Paint the whole overlay for one frame.
///
/// Does nothing and returns `false` when either rect is missing, or when the
/// framing rect lies completely off the surface. Returns `true` once painted.
pub fn render_overlay<S: Surface + ?Sized>(
    surface: &mut S,
    assets: &OverlayAssets,
    style: &OverlayStyle,
    frame: Option<FramingRect>,
    preview_frame: Option<FramingRect>,
    phase: Phase,
) -> bool {
    if preview_frame.is_none() {
        return false;
    }
    match usable_frame(surface, frame) {
        Ok(frame) => {
            paint(surface, assets, style, frame, phase);
            true
        }
        Err(_) => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    /// No geometry seen yet; every draw is a no-op.
    Unready,
    /// Last geometry received from the provider.
    Ready { frame: FramingRect, preview_frame: FramingRect },
}

/// The overlay plus its geometry state. Once ready, stays ready: if the
/// provider drops out later the last known rects keep being used.
pub struct Viewfinder {
    assets: OverlayAssets,
    style: OverlayStyle,
    state: OverlayState,
}

impl Viewfinder {
    pub fn new(assets: OverlayAssets, style: OverlayStyle) -> Self {
        Self { assets, style, state: OverlayState::Unready }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, OverlayState::Ready { .. })
    }

    /// Pull fresh rects from the provider.
    pub fn update_geometry<G: CameraGeometry + ?Sized>(&mut self, geometry: &G) {
        if let (Some(frame), Some(preview_frame)) =
            (geometry.framing_rect(), geometry.framing_rect_in_preview())
        {
            if !self.is_ready() {
                debug!("viewfinder ready: frame {frame:?}, preview {preview_frame:?}");
            }
            self.state = OverlayState::Ready { frame, preview_frame };
        }
    }

    /// Refresh geometry and paint. Returns whether anything was drawn.
    pub fn draw<S, G>(&mut self, surface: &mut S, geometry: &G, phase: Phase) -> bool
    where
        S: Surface + ?Sized,
        G: CameraGeometry + ?Sized,
    {
        self.update_geometry(geometry);
        match self.state {
            OverlayState::Unready => false,
            OverlayState::Ready { frame, preview_frame } => render_overlay(
                surface,
                &self.assets,
                &self.style,
                Some(frame),
                Some(preview_frame),
                phase,
            ),
        }
    }

    /// Region to repaint per animation tick: the frame plus a small margin,
    /// clipped to `bounds`.
    pub fn invalidation_rect(&self, bounds: &FramingRect) -> Option<FramingRect> {
        match self.state {
            OverlayState::Unready => None,
            OverlayState::Ready { frame, .. } => frame.inflate(POINT_SIZE).intersect(bounds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sprite;

    /// Surface that only records what it was asked to do.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Surface for Recorder {
        fn width(&self) -> i32 {
            400
        }
        fn height(&self) -> i32 {
            300
        }
        fn fill_rect(&mut self, rect: FramingRect, _argb: u32) {
            self.calls.push(format!("fill {rect:?}"));
        }
        fn draw_sprite(&mut self, _sprite: &Sprite, x: i32, y: i32) {
            self.calls.push(format!("sprite {x},{y}"));
        }
        fn draw_sprite_scaled(&mut self, _sprite: &Sprite, dst: FramingRect, _clip: FramingRect) {
            self.calls.push(format!("laser {}", dst.top));
        }
        fn draw_text(&mut self, text: &str, x: i32, baseline: i32, _scale: i32, _argb: u32) {
            self.calls.push(format!("text {x},{baseline} {text}"));
        }
    }

    struct Fixed(Option<FramingRect>, Option<FramingRect>);

    impl CameraGeometry for Fixed {
        fn framing_rect(&self) -> Option<FramingRect> {
            self.0
        }
        fn framing_rect_in_preview(&self) -> Option<FramingRect> {
            self.1
        }
    }

    fn style() -> OverlayStyle {
        OverlayStyle { caption: "SCAN".into(), ..OverlayStyle::default() }
    }

    const FRAME: FramingRect = FramingRect::new(100, 50, 300, 250);

    #[test]
    fn missing_geometry_draws_nothing() {
        let style = style();
        let assets = OverlayAssets::from_style(&style);
        let mut s = Recorder::default();
        assert!(!render_overlay(&mut s, &assets, &style, None, Some(FRAME), Phase::ZERO));
        assert!(!render_overlay(&mut s, &assets, &style, Some(FRAME), None, Phase::ZERO));
        let off = FramingRect::new(500, 500, 600, 600);
        assert!(!render_overlay(&mut s, &assets, &style, Some(off), Some(off), Phase::ZERO));
        assert!(s.calls.is_empty());
    }

    #[test]
    fn paints_mask_corners_laser_caption_in_order() {
        let style = style();
        let assets = OverlayAssets::from_style(&style);
        let mut s = Recorder::default();
        assert!(render_overlay(&mut s, &assets, &style, Some(FRAME), Some(FRAME), Phase::new(0.5)));
        let n = style.corner_len as i32;
        assert_eq!(
            s.calls,
            vec![
                format!("fill {:?}", FramingRect::new(0, 0, 400, 50)),
                format!("fill {:?}", FramingRect::new(0, 50, 100, 250)),
                format!("fill {:?}", FramingRect::new(300, 50, 400, 250)),
                format!("fill {:?}", FramingRect::new(0, 250, 400, 300)),
                "sprite 100,50".to_string(),
                format!("sprite {},50", 300 - n),
                format!("sprite 100,{}", 250 - n),
                format!("sprite {},{}", 300 - n, 250 - n),
                "laser 150".to_string(),
                // "SCAN" is 24px wide at scale 1
                "text 188,280 SCAN".to_string(),
            ]
        );
    }

    #[test]
    fn frame_touching_edges_skips_empty_bands() {
        let style = style();
        let assets = OverlayAssets::from_style(&style);
        let mut s = Recorder::default();
        let full = FramingRect::new(0, 0, 400, 300);
        render_overlay(&mut s, &assets, &style, Some(full), Some(full), Phase::ZERO);
        assert!(s.calls.iter().all(|c| !c.starts_with("fill")));
    }

    #[test]
    fn laser_top_follows_phase() {
        assert_eq!(laser_top(&FRAME, Phase::ZERO), 50);
        assert_eq!(laser_top(&FRAME, Phase::new(0.25)), 100);
        assert_eq!(laser_top(&FRAME, Phase::new(0.999)), 249);
        assert_eq!(laser_top(&FRAME, Phase::new(1.0)), 50);
    }

    #[test]
    fn becomes_ready_once_and_stays_ready() {
        let style = style();
        let mut vf = Viewfinder::new(OverlayAssets::from_style(&style), style);
        let mut s = Recorder::default();

        assert!(!vf.draw(&mut s, &Fixed(None, None), Phase::ZERO));
        assert!(!vf.draw(&mut s, &Fixed(Some(FRAME), None), Phase::ZERO));
        assert_eq!(vf.state(), OverlayState::Unready);
        assert!(s.calls.is_empty());

        assert!(vf.draw(&mut s, &Fixed(Some(FRAME), Some(FRAME)), Phase::ZERO));
        assert!(vf.is_ready());

        // provider drops out: keep painting with the last rects
        s.calls.clear();
        assert!(vf.draw(&mut s, &Fixed(None, None), Phase::ZERO));
        assert_eq!(vf.state(), OverlayState::Ready { frame: FRAME, preview_frame: FRAME });
        assert!(!s.calls.is_empty());
    }

    #[test]
    fn invalidation_rect_is_inflated_and_clipped() {
        let style = style();
        let mut vf = Viewfinder::new(OverlayAssets::from_style(&style), style);
        let bounds = FramingRect::new(0, 0, 400, 300);
        assert_eq!(vf.invalidation_rect(&bounds), None);
        let edge = FramingRect::new(0, 10, 200, 300);
        vf.update_geometry(&Fixed(Some(edge), Some(edge)));
        assert_eq!(vf.invalidation_rect(&bounds), Some(FramingRect::new(0, 4, 206, 300)));
    }
}
