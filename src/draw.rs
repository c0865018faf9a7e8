// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the live camera preview (or a generated barcode).
// 2) Alpha-blended rectangles and sprite blits, the building blocks of the viewfinder.
// 3) A tiny 5x7 bitmap font for the status caption.

use crate::error::{Error, Result};
use crate::types::{FrameBuffer, FramingRect, Sprite};
use log::info;
use minifb::{Key, Window, WindowOptions};

/// Width of one glyph cell (5 pixels + 1 spacing) before scaling.
pub const GLYPH_ADVANCE: i32 = 6;
/// Height of one glyph before scaling.
pub const GLYPH_HEIGHT: i32 = 7;

/// Drawing capability the overlay renders through.
///
/// Colors are 0xAARRGGBB; implementations blend by the alpha channel.
pub trait Surface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Fill `rect` (clipped to the surface) with `argb`.
    fn fill_rect(&mut self, rect: FramingRect, argb: u32);

    /// Blit `sprite` 1:1 with its top-left corner at (x, y).
    fn draw_sprite(&mut self, sprite: &Sprite, x: i32, y: i32);

    /// Stretch `sprite` into `dst`, only touching pixels inside `clip`.
    fn draw_sprite_scaled(&mut self, sprite: &Sprite, dst: FramingRect, clip: FramingRect);

    /// Draw `text` with the 5x7 font; `baseline` is the bottom row of the glyphs.
    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, scale: i32, argb: u32);

    fn bounds(&self) -> FramingRect {
        FramingRect::new(0, 0, self.width(), self.height())
    }
}

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the preview.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        info!("window {width}x{height} open");
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }
}

/* ---------- Software drawing on FrameBuffer ---------- */

/// Source-over blend of an ARGB color onto an 0x00RRGGBB pixel.
#[inline]
pub fn blend_over(dst: u32, argb: u32) -> u32 {
    let a = argb >> 24;
    if a == 0 {
        return dst;
    }
    if a == 0xFF {
        return argb & 0x00FF_FFFF;
    }
    let inv = 255 - a;
    let mix = |shift: u32| {
        let s = (argb >> shift) & 0xFF;
        let d = (dst >> shift) & 0xFF;
        ((s * a + d * inv + 127) / 255) << shift
    };
    mix(16) | mix(8) | mix(0)
}

/// Blend a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, argb: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = blend_over(fb.pixels[idx], argb);
}

impl Surface for FrameBuffer {
    fn width(&self) -> i32 {
        self.width as i32
    }

    fn height(&self) -> i32 {
        self.height as i32
    }

    fn fill_rect(&mut self, rect: FramingRect, argb: u32) {
        let Some(r) = rect.intersect(&FrameBuffer::bounds(self)) else { return };
        for y in r.top..r.bottom {
            let row = y as usize * self.width;
            for x in r.left..r.right {
                let idx = row + x as usize;
                self.pixels[idx] = blend_over(self.pixels[idx], argb);
            }
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: i32, y: i32) {
        for sy in 0..sprite.height {
            for sx in 0..sprite.width {
                put_pixel(self, x + sx as i32, y + sy as i32, sprite.argb(sx, sy));
            }
        }
    }

    fn draw_sprite_scaled(&mut self, sprite: &Sprite, dst: FramingRect, clip: FramingRect) {
        if sprite.width == 0 || sprite.height == 0 || dst.is_empty() {
            return;
        }
        let Some(area) = dst
            .intersect(&clip)
            .and_then(|r| r.intersect(&FrameBuffer::bounds(self)))
        else {
            return;
        };
        let (dw, dh) = (dst.width() as usize, dst.height() as usize);
        for y in area.top..area.bottom {
            // nearest neighbour
            let sy = (y - dst.top) as usize * sprite.height / dh;
            for x in area.left..area.right {
                let sx = (x - dst.left) as usize * sprite.width / dw;
                put_pixel(self, x, y, sprite.argb(sx, sy));
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, scale: i32, argb: u32) {
        draw_text_5x7(self, x, baseline - GLYPH_HEIGHT * scale, text, scale, argb);
    }
}

/* ---------- 5x7 bitmap font ---------- */

/// Return a 5x7 glyph bitmap. Lowercase letters share the uppercase shapes.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Pixel width of `text` rendered at `scale`.
pub fn text_width_5x7(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE * scale
}

/// Draw a single 5x7 character with its top-left at (x,y); each font pixel is a
/// `scale`-sized square. A 1-pixel black shadow keeps it readable on video.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, scale: i32, argb: u32) {
    let Some(rows) = glyph5x7(ch) else { return };
    let shadow = argb & 0xFF00_0000;
    for (offset, color) in [(scale, shadow), (0, argb)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) == 0 {
                    continue;
                }
                let px = x + rx * scale + offset;
                let py = y + ry as i32 * scale + offset;
                fb.fill_rect(FramingRect::new(px, py, px + scale, py + scale), color);
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; unknown characters leave a blank cell.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, scale: i32, argb: u32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, scale, argb);
        x += GLYPH_ADVANCE * scale;
    }
}
