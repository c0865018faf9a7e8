// Core pixel and geometry types shared by the overlay, the encoder and the window.

/// Software screen buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer of `width * height` pixels, all set to `fill`.
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self { width, height, pixels: vec![fill; width * height] }
    }

    /// Pixel at (x, y), or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// The whole buffer as a rectangle, handy for clipping.
    pub fn bounds(&self) -> FramingRect {
        FramingRect::new(0, 0, self.width as i32, self.height as i32)
    }
}

/// Axis-aligned rectangle in view coordinates. `right` and `bottom` are exclusive.
/// Visual: the window the user lines a barcode up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FramingRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FramingRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Overlap of two rectangles; `None` when they do not overlap.
    pub fn intersect(&self, other: &FramingRect) -> Option<FramingRect> {
        let r = FramingRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if r.is_empty() { None } else { Some(r) }
    }

    /// Grow by `d` pixels on every side.
    pub fn inflate(&self, d: i32) -> FramingRect {
        FramingRect::new(self.left - d, self.top - d, self.right + d, self.bottom + d)
    }
}

/// A small ARGB image (0xAARRGGBB) drawn on top of the preview.
/// Visual: corner brackets and the laser line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>, // length = width * height, row-major ARGB
}

impl Sprite {
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self { width, height, pixels }
    }

    /// Fully transparent sprite of the given size.
    pub fn blank(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![0; width * height])
    }

    #[inline]
    pub fn argb(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}
