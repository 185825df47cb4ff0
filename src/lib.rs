//! zoomgraph: interactive zoomable chart engine.
//!
//! The crate maps large numeric series onto a zoomable, horizontally
//! scrolled viewport, caches the drawing in four dependent raster layers and
//! routes pointer and keyboard input to draggable range markers, y range
//! markers, hover and selection. Drawing is delegated to a
//! [`render::DrawingSurface`] implementation supplied by the host.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{
    ChartEngine, ChartEngineConfig, ChartStyle, EngineSnapshot, GraphMargins,
    MarkerPositionOptions, OverlayRange, Selection, WheelMode, ZoomParts,
};
pub use error::{ChartError, ChartResult};
