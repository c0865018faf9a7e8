//! Barcode scanner front end: a viewfinder overlay for a live camera preview and
//! a builder that turns "encode this" requests into QR rasters.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod config;
pub mod draw;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod types;
pub mod viewfinder;

pub use animation::{LaserTicker, Phase};
pub use assets::OverlayAssets;
pub use config::OverlayStyle;
pub use draw::Surface;
pub use encode::{EncodeRequest, Module, RasterResult, RequestFields, RequestKind, SymbolFormat};
pub use error::{Error, Result};
pub use geometry::{CameraGeometry, PreviewGeometry};
pub use types::{FrameBuffer, FramingRect, Sprite};
pub use viewfinder::{OverlayState, Viewfinder, render_overlay};
