//! Viewfinder painted onto a real framebuffer.

use proptest::prelude::*;
use scanview::viewfinder::laser_top;
use scanview::{
    FrameBuffer, FramingRect, OverlayAssets, OverlayStyle, Phase, PreviewGeometry, Viewfinder,
    render_overlay,
};

const WHITE: u32 = 0x00_FF_FF_FF;
const FRAME: FramingRect = FramingRect::new(100, 50, 300, 250);

fn setup() -> (OverlayStyle, OverlayAssets, FrameBuffer) {
    let style = OverlayStyle::default();
    let assets = OverlayAssets::from_style(&style);
    (style, assets, FrameBuffer::new(400, 300, WHITE))
}

#[test]
fn exterior_is_masked_and_interior_untouched() {
    let (style, assets, mut fb) = setup();
    assert!(render_overlay(&mut fb, &assets, &style, Some(FRAME), Some(FRAME), Phase::ZERO));

    let masked = 0x00_40_40_40;
    assert_eq!(fb.pixel(10, 10), Some(masked));
    assert_eq!(fb.pixel(50, 150), Some(masked));
    assert_eq!(fb.pixel(350, 150), Some(masked));
    assert_eq!(fb.pixel(10, 295), Some(masked));

    // centre of the window, away from laser and brackets
    assert_eq!(fb.pixel(200, 150), Some(WHITE));
    // the top-left bracket is opaque accent color
    assert_eq!(fb.pixel(100, 50), Some(style.corner_color & 0x00FF_FFFF));
}

#[test]
fn no_geometry_leaves_buffer_alone() {
    let (style, assets, mut fb) = setup();
    let before = fb.clone();
    assert!(!render_overlay(&mut fb, &assets, &style, None, None, Phase::ZERO));
    assert_eq!(fb, before);
}

#[test]
fn laser_moves_down_with_phase() {
    let (style, assets, fb) = setup();
    let laser_row = |phase: f32| {
        let mut fb = fb.clone();
        render_overlay(&mut fb, &assets, &style, Some(FRAME), Some(FRAME), Phase::new(phase));
        // first non-white row in the middle column of the window
        (FRAME.top..FRAME.bottom).find(|y| fb.pixel(200, *y as usize) != Some(WHITE))
    };
    let a = laser_row(0.1).unwrap();
    let b = laser_row(0.6).unwrap();
    assert!(a < b, "{a} should be above {b}");
    assert_eq!(a, laser_top(&FRAME, Phase::new(0.1)));
}

#[test]
fn laser_overhangs_frame_bottom_but_not_sides() {
    let (style, assets, mut fb) = setup();
    // top lands on the last frame row, the rest of the sprite hangs below
    let phase = Phase::new(0.999);
    assert_eq!(laser_top(&FRAME, phase), FRAME.bottom - 1);
    render_overlay(&mut fb, &assets, &style, Some(FRAME), Some(FRAME), phase);

    let masked = 0x00_40_40_40;
    let below = FRAME.bottom as usize + 1;
    assert_ne!(fb.pixel(200, below), Some(masked));
    assert_eq!(fb.pixel(50, below), Some(masked));
    assert_eq!(fb.pixel(350, below), Some(masked));
}

#[test]
fn geometry_provider_drives_viewfinder() {
    let (style, assets, mut fb) = setup();
    let mut vf = Viewfinder::new(assets, style);
    let mut geometry = PreviewGeometry::new();

    assert!(!vf.draw(&mut fb, &geometry, Phase::ZERO));
    assert_eq!(fb.pixel(0, 0), Some(WHITE));

    geometry.configure((400, 300), (800, 600));
    assert!(vf.draw(&mut fb, &geometry, Phase::ZERO));
    assert_ne!(fb.pixel(0, 0), Some(WHITE));
}

proptest! {
    #[test]
    fn laser_top_is_monotonic_within_a_sweep(
        top in -100i32..500,
        height in 1i32..1000,
        a in 0.0f32..1.0,
        b in 0.0f32..1.0,
    ) {
        let frame = FramingRect::new(0, top, 10, top + height);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (t_lo, t_hi) = (laser_top(&frame, Phase::new(lo)), laser_top(&frame, Phase::new(hi)));
        prop_assert!(t_lo <= t_hi);
        prop_assert!(t_lo >= frame.top && t_hi < frame.bottom);
    }

    #[test]
    fn laser_returns_to_top_on_wrap(top in -100i32..500, height in 1i32..1000, k in 0u8..5) {
        let frame = FramingRect::new(0, top, 10, top + height);
        prop_assert_eq!(laser_top(&frame, Phase::new(k as f32)), frame.top);
    }
}
