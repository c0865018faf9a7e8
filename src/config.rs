// Overlay look and timing. Defaults reproduce the classic portrait scanner:
// 75% black mask, translucent white caption 30px under the window, 3.5s laser sweep.

use std::time::Duration;

pub const DEFAULT_CAPTION: &str = "Place a barcode inside the viewfinder rectangle to scan it.";

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    pub mask_color: u32,    // ARGB painted outside the framing rect
    pub caption: String,
    pub caption_color: u32, // ARGB
    pub caption_margin: i32, // pixels from frame bottom to caption baseline
    pub text_scale: i32,    // 5x7 font pixel size
    pub corner_color: u32,
    pub corner_len: usize,
    pub corner_thickness: usize,
    pub laser_color: u32,
    pub laser_height: usize,
    pub laser_period: Duration, // one full top-to-bottom sweep
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            mask_color: 0xBF_00_00_00,
            caption: DEFAULT_CAPTION.to_string(),
            caption_color: 0xBF_FF_FF_FF,
            caption_margin: 30,
            text_scale: 1,
            corner_color: 0xFF_1E_C8_5A,
            corner_len: 24,
            corner_thickness: 4,
            laser_color: 0xFF_1E_C8_5A,
            laser_height: 6,
            laser_period: Duration::from_millis(3500),
        }
    }
}

/// Parse `#AARRGGBB`, `#RRGGBB` (opaque) or the same without `#`.
pub fn parse_argb(s: &str) -> Result<u32, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    let v = u32::from_str_radix(hex, 16).map_err(|e| format!("bad color {s:?}: {e}"))?;
    match hex.len() {
        8 => Ok(v),
        6 => Ok(0xFF00_0000 | v),
        _ => Err(format!("bad color {s:?}: expected RRGGBB or AARRGGBB")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_color_forms() {
        assert_eq!(parse_argb("#BF000000"), Ok(0xBF00_0000));
        assert_eq!(parse_argb("ffffff"), Ok(0xFFFF_FFFF));
        assert!(parse_argb("#fff").is_err());
        assert!(parse_argb("zz000000").is_err());
    }

    #[test]
    fn defaults_match_classic_scanner() {
        let s = OverlayStyle::default();
        assert_eq!(s.mask_color, 0xBF00_0000);
        assert_eq!(s.laser_period, Duration::from_millis(3500));
        assert_eq!(s.caption_margin, 30);
    }
}
