//! Turns an inbound "show me a barcode" request into an [`EncodeRequest`] and,
//! on demand, into a black/white raster of the requested size.
//!
//! Two request kinds are understood: *generate* (an app asks for a barcode of some
//! data) and *share* (text shared from another app). Anything the encoder can't
//! handle comes back as `None`; callers show nothing.

use crate::error::{Error, Result};
use crate::types::FrameBuffer;
use image::{GrayImage, Luma};
use log::debug;
use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// Request field names.
pub const FORMAT: &str = "FORMAT";
pub const TYPE: &str = "TYPE";
pub const DATA: &str = "DATA";
pub const SUBJECT: &str = "SUBJECT";
pub const TITLE: &str = "TITLE";
pub const STREAM: &str = "STREAM";

/// The only content type encoded here; contact cards, phone numbers etc. are not.
pub const TYPE_TEXT: &str = "TEXT";

const QUIET_ZONE: u32 = 4;
const ECI_UTF8: u32 = 26;

const ARGB_BLACK: u32 = 0xFF00_0000;
const ARGB_WHITE: u32 = 0xFFFF_FFFF;

/// Barcode format names other than QR that a request may name.
const OTHER_FORMATS: &[&str] = &[
    "AZTEC",
    "CODABAR",
    "CODE_39",
    "CODE_93",
    "CODE_128",
    "DATA_MATRIX",
    "EAN_8",
    "EAN_13",
    "ITF",
    "MAXICODE",
    "PDF_417",
    "RSS_14",
    "RSS_EXPANDED",
    "UPC_A",
    "UPC_E",
    "UPC_EAN_EXTENSION",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Generate,
    ScanShare,
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "generate" | "encode-from-app" | "com.google.zxing.client.android.ENCODE" => {
                Ok(RequestKind::Generate)
            }
            "scan-share" | "share" | "android.intent.action.SEND" => Ok(RequestKind::ScanShare),
            other => Err(format!("unknown request action {other:?}")),
        }
    }
}

/// Key/value extras carried by a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestFields(BTreeMap<String, String>);

impl RequestFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SymbolFormat {
    #[default]
    Qr,
    Other(String),
}

impl SymbolFormat {
    /// Recognised format name, or `None` for anything unknown.
    pub fn parse(name: &str) -> Option<Self> {
        if name == "QR_CODE" {
            return Some(SymbolFormat::Qr);
        }
        OTHER_FORMATS
            .iter()
            .find(|f| **f == name)
            .map(|f| SymbolFormat::Other((*f).to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            SymbolFormat::Qr => "QR_CODE",
            SymbolFormat::Other(name) => name,
        }
    }
}

impl fmt::Display for SymbolFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Character-set hint passed to the symbol encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterSet {
    Utf8,
}

/// UTF-8 if anything falls outside ISO-8859-1, otherwise no hint.
pub fn guess_encoding(contents: &str) -> Option<CharacterSet> {
    contents.chars().any(|c| c as u32 > 0xFF).then_some(CharacterSet::Utf8)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Module {
    Black,
    White,
}

impl Module {
    pub fn argb(self) -> u32 {
        match self {
            Module::Black => ARGB_BLACK,
            Module::White => ARGB_WHITE,
        }
    }
}

/// Row-major offset, in usize so large rasters don't overflow.
fn cell_index(dimension: u32, x: u32, y: u32) -> usize {
    y as usize * dimension as usize + x as usize
}

/// Square monochrome raster of an encoded symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterResult {
    dimension: u32,
    dark: Vec<bool>, // row-major, true = black
}

impl RasterResult {
    pub fn width(&self) -> u32 {
        self.dimension
    }

    pub fn height(&self) -> u32 {
        self.dimension
    }

    pub fn get(&self, x: u32, y: u32) -> Module {
        if self.dark[cell_index(self.dimension, x, y)] { Module::Black } else { Module::White }
    }

    pub fn count(&self, module: Module) -> usize {
        let black = self.dark.iter().filter(|d| **d).count();
        match module {
            Module::Black => black,
            Module::White => self.dark.len() - black,
        }
    }

    /// One 0xAARRGGBB value per cell.
    pub fn to_argb(&self) -> Vec<u32> {
        self.dark
            .iter()
            .map(|d| (if *d { Module::Black } else { Module::White }).argb())
            .collect()
    }

    /// Same raster as window pixels.
    pub fn to_frame_buffer(&self) -> FrameBuffer {
        let d = self.dimension as usize;
        FrameBuffer {
            width: d,
            height: d,
            pixels: self.to_argb().into_iter().map(|p| p & 0x00FF_FFFF).collect(),
        }
    }

    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.dimension, self.dimension, |x, y| match self.get(x, y) {
            Module::Black => Luma([0]),
            Module::White => Luma([255]),
        })
    }
}

/// Everything needed to draw one barcode. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeRequest {
    payload: Option<String>,
    display_text: Option<String>,
    format: SymbolFormat,
    use_contact_card: bool,
    dimension: u32,
}

impl EncodeRequest {
    /// A ready-made request for `payload` in `format`.
    pub fn new(payload: &str, format: SymbolFormat, dimension: u32) -> Self {
        Self {
            payload: Some(payload.to_string()),
            display_text: Some(payload.to_string()),
            format,
            use_contact_card: false,
            dimension,
        }
    }

    /// Interpret an inbound request. `None` when it carries nothing to show.
    pub fn build(kind: RequestKind, fields: &RequestFields, dimension: u32) -> Option<Self> {
        Self::build_with_contact_card(kind, fields, dimension, false)
    }

    /// Like [`EncodeRequest::build`], taking the action as a raw string.
    pub fn from_action(action: &str, fields: &RequestFields, dimension: u32) -> Option<Self> {
        match action.parse() {
            Ok(kind) => Self::build(kind, fields, dimension),
            Err(e) => {
                debug!("ignoring request: {e}");
                None
            }
        }
    }

    pub fn build_with_contact_card(
        kind: RequestKind,
        fields: &RequestFields,
        dimension: u32,
        use_contact_card: bool,
    ) -> Option<Self> {
        let mut req = Self {
            payload: None,
            display_text: None,
            format: SymbolFormat::Qr,
            use_contact_card,
            dimension,
        };
        match kind {
            RequestKind::Generate => req.fill_from_generate(fields),
            RequestKind::ScanShare => {
                // Attachments are not encoded.
                if fields.contains(STREAM) {
                    debug!("share request carries a stream, nothing to encode");
                    return None;
                }
                req.fill_from_share(fields);
            }
        }
        if req.payload.is_none() && req.display_text.is_none() {
            return None;
        }
        Some(req)
    }

    fn fill_from_generate(&mut self, fields: &RequestFields) {
        // Unknown format names are ignored, which lands on QR.
        match fields.get(FORMAT).and_then(SymbolFormat::parse) {
            Some(format @ SymbolFormat::Other(_)) => {
                self.format = format;
                if let Some(data) = fields.non_empty(DATA) {
                    self.payload = Some(data.to_string());
                    self.display_text = Some(data.to_string());
                }
            }
            None | Some(SymbolFormat::Qr) => {
                let Some(content_type) = fields.non_empty(TYPE) else { return };
                self.format = SymbolFormat::Qr;
                if content_type != TYPE_TEXT {
                    debug!("content type {content_type:?} not supported");
                    return;
                }
                if let Some(data) = fields.non_empty(DATA) {
                    self.payload = Some(data.to_string());
                    self.display_text = Some(data.to_string());
                }
            }
        }
    }

    fn fill_from_share(&mut self, fields: &RequestFields) {
        self.format = SymbolFormat::Qr;
        self.display_text = fields
            .get(SUBJECT)
            .or_else(|| fields.get(TITLE))
            .map(str::to_string)
            .or_else(|| self.payload.clone());
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn display_text(&self) -> Option<&str> {
        self.display_text.as_deref()
    }

    pub fn format(&self) -> &SymbolFormat {
        &self.format
    }

    pub fn use_contact_card(&self) -> bool {
        self.use_contact_card
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Rasterize, or `None` when there is nothing the encoder can draw.
    pub fn rasterize(&self) -> Option<RasterResult> {
        match self.try_rasterize() {
            Ok(r) => Some(r),
            Err(e) => {
                debug!("no barcode for {}: {e}", self.format);
                None
            }
        }
    }

    /// Rasterize, reporting why nothing could be drawn.
    pub fn try_rasterize(&self) -> Result<RasterResult> {
        let payload = self.payload().filter(|p| !p.is_empty()).ok_or(Error::EmptyPayload)?;
        let code = match &self.format {
            SymbolFormat::Qr => encode_qr(payload, guess_encoding(payload))
                .map_err(|e| Error::UnsupportedFormat(format!("QR_CODE: {e}")))?,
            SymbolFormat::Other(name) => return Err(Error::UnsupportedFormat(name.clone())),
        };
        render_scaled(&code, self.dimension)
    }
}

fn encode_qr(contents: &str, hint: Option<CharacterSet>) -> std::result::Result<QrCode, QrError> {
    match hint {
        // ISO-8859-1: every char already fits in a byte.
        None => {
            let bytes: Vec<u8> = contents.chars().map(|c| c as u32 as u8).collect();
            encode_byte_mode(&bytes, None)
        }
        Some(CharacterSet::Utf8) => encode_byte_mode(contents.as_bytes(), Some(ECI_UTF8)),
    }
}

/// Smallest symbol holding `bytes` as one byte-mode segment, optionally behind an
/// ECI designator. Byte mode only: the segment optimiser would turn Latin-1 pairs
/// like "\u{e9}\u{e9}" into Shift-JIS kanji.
fn encode_byte_mode(bytes: &[u8], eci: Option<u32>) -> std::result::Result<QrCode, QrError> {
    let ec = EcLevel::L;
    for v in 1..=40i16 {
        let mut bits = Bits::new(Version::Normal(v));
        let fits = eci.is_none_or(|d| bits.push_eci_designator(d).is_ok())
            && bits.push_byte_data(bytes).is_ok()
            && bits.push_terminator(ec).is_ok();
        if fits {
            return QrCode::with_bits(bits, ec);
        }
    }
    Err(QrError::DataTooLong)
}

/// Lay the symbol out on a `dimension`-square canvas: 4-module quiet zone, largest
/// integer scale that fits, centred.
fn render_scaled(code: &QrCode, dimension: u32) -> Result<RasterResult> {
    let input = code.width() as u32;
    let required = input + 2 * QUIET_ZONE;
    if dimension < required {
        return Err(Error::DimensionTooSmall { dimension, required });
    }
    let multiple = dimension / required;
    let pad = (dimension - input * multiple) / 2;
    let d = dimension as usize;
    let mut dark = vec![false; d * d];
    for my in 0..input {
        for mx in 0..input {
            if code[(mx as usize, my as usize)] != Color::Dark {
                continue;
            }
            let (x0, y0) = (pad + mx * multiple, pad + my * multiple);
            for y in y0..y0 + multiple {
                let row = y as usize * d;
                for x in x0..x0 + multiple {
                    dark[row + x as usize] = true;
                }
            }
        }
    }
    Ok(RasterResult { dimension, dark })
}
