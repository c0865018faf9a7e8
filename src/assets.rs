// Decorative sprites for the viewfinder: four corner brackets and the laser line.
// Built procedurally from the style, or loaded from PNGs in an asset directory.

use crate::config::OverlayStyle;
use crate::error::{Error, Result};
use crate::types::Sprite;
use log::debug;
use std::path::Path;

/// Loaded once at startup, read-only afterwards.
#[derive(Clone, Debug)]
pub struct OverlayAssets {
    pub corner_lt: Sprite,
    pub corner_rt: Sprite,
    pub corner_lb: Sprite,
    pub corner_rb: Sprite,
    pub laser: Sprite,
}

#[derive(Clone, Copy)]
enum Corner {
    LeftTop,
    RightTop,
    LeftBottom,
    RightBottom,
}

/// L-shaped bracket hugging the given corner.
fn corner_sprite(corner: Corner, len: usize, thickness: usize, argb: u32) -> Sprite {
    let mut s = Sprite::blank(len, len);
    let t = thickness.min(len);
    for y in 0..len {
        for x in 0..len {
            let (near_x, near_y) = match corner {
                Corner::LeftTop => (x < t, y < t),
                Corner::RightTop => (x >= len - t, y < t),
                Corner::LeftBottom => (x < t, y >= len - t),
                Corner::RightBottom => (x >= len - t, y >= len - t),
            };
            if near_x || near_y {
                s.pixels[y * len + x] = argb;
            }
        }
    }
    s
}

/// Horizontal glow: bright center row, alpha falling off vertically and toward
/// both ends. Gets stretched across the framing rect when drawn.
fn laser_sprite(height: usize, argb: u32) -> Sprite {
    const WIDTH: usize = 64;
    let height = height.max(1);
    let base_a = (argb >> 24) as f32;
    let rgb = argb & 0x00FF_FFFF;
    let mid = (height as f32 - 1.0) / 2.0;
    let mut s = Sprite::blank(WIDTH, height);
    for y in 0..height {
        let vy = if mid > 0.0 { 1.0 - ((y as f32 - mid).abs() / (mid + 1.0)) } else { 1.0 };
        for x in 0..WIDTH {
            let edge = x.min(WIDTH - 1 - x) as f32 / 8.0;
            let a = (base_a * vy * edge.min(1.0)).round() as u32;
            s.pixels[y * WIDTH + x] = (a.min(255) << 24) | rgb;
        }
    }
    s
}

impl OverlayAssets {
    pub fn from_style(style: &OverlayStyle) -> Self {
        let (len, t, c) = (style.corner_len, style.corner_thickness, style.corner_color);
        Self {
            corner_lt: corner_sprite(Corner::LeftTop, len, t, c),
            corner_rt: corner_sprite(Corner::RightTop, len, t, c),
            corner_lb: corner_sprite(Corner::LeftBottom, len, t, c),
            corner_rb: corner_sprite(Corner::RightBottom, len, t, c),
            laser: laser_sprite(style.laser_height, style.laser_color),
        }
    }

    /// Load `corner_lt.png`, `corner_rt.png`, `corner_lb.png`, `corner_rb.png` and
    /// `laser.png` from `dir`. Missing files fall back to the generated sprite.
    pub fn load_dir(dir: &Path, style: &OverlayStyle) -> Result<Self> {
        let mut assets = Self::from_style(style);
        for (name, slot) in [
            ("corner_lt.png", &mut assets.corner_lt),
            ("corner_rt.png", &mut assets.corner_rt),
            ("corner_lb.png", &mut assets.corner_lb),
            ("corner_rb.png", &mut assets.corner_rb),
            ("laser.png", &mut assets.laser),
        ] {
            let path = dir.join(name);
            if !path.is_file() {
                debug!("{} missing, using generated sprite", path.display());
                continue;
            }
            *slot = load_sprite(&path)?;
        }
        Ok(assets)
    }
}

/// Decode a PNG (or anything `image` reads) into an ARGB sprite.
pub fn load_sprite(path: &Path) -> Result<Sprite> {
    let img = image::open(path)
        .map_err(|source| Error::Asset { path: path.display().to_string(), source })?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
        })
        .collect();
    Ok(Sprite::new(w as usize, h as usize, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_hug_their_own_corner() {
        let style = OverlayStyle::default();
        let a = OverlayAssets::from_style(&style);
        let n = style.corner_len - 1;
        let c = style.corner_color;
        assert_eq!(a.corner_lt.argb(0, 0), c);
        assert_eq!(a.corner_lt.argb(n, n), 0);
        assert_eq!(a.corner_rt.argb(n, 0), c);
        assert_eq!(a.corner_rt.argb(0, n), 0);
        assert_eq!(a.corner_lb.argb(0, n), c);
        assert_eq!(a.corner_rb.argb(n, n), c);
        assert_eq!(a.corner_rb.argb(0, 0), 0);
    }

    #[test]
    fn laser_is_brightest_in_the_middle() {
        let s = laser_sprite(5, 0xFF_00_FF_00);
        assert_eq!(s.height, 5);
        let alpha = |x: usize, y: usize| s.argb(x, y) >> 24;
        assert_eq!(alpha(32, 2), 255);
        assert!(alpha(32, 0) < alpha(32, 2));
        assert_eq!(alpha(0, 2), 0);
    }

    #[test]
    fn missing_asset_dir_falls_back_to_generated() {
        let style = OverlayStyle::default();
        let dir = std::env::temp_dir().join("scanview-no-such-assets");
        let a = OverlayAssets::load_dir(&dir, &style).unwrap();
        assert_eq!(a.laser, OverlayAssets::from_style(&style).laser);
    }

    #[test]
    fn png_round_trips_into_argb() {
        let path = std::env::temp_dir().join(format!("scanview-sprite-{}.png", std::process::id()));
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([0x11, 0x22, 0x33, 0x44]));
        img.save(&path).unwrap();
        let s = load_sprite(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!((s.width, s.height), (2, 1));
        assert_eq!(s.argb(0, 0), 0x44_11_22_33);
        assert_eq!(s.argb(1, 0), 0);
    }
}
