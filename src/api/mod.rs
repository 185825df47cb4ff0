//! Public engine facade.
//!
//! `ChartEngine` is split across controller files by concern; coordinators
//! hold the multi-step flows shared between controllers.

mod autoscroll_coordinator;
mod bar_selection_controller;
mod chart_model;
mod chart_presentation;
mod chart_runtime;
mod chart_style;
mod custom_layer_registry;
mod data_controller;
mod decoration_scene_builder;
mod engine;
mod engine_config;
mod engine_core;
mod engine_init;
mod engine_snapshot;
mod graph_layout;
mod interaction_coordinator;
mod invalidation;
mod keyboard_controller;
mod listener_controller;
mod marker_controller;
mod overlay_scene_builder;
mod render_coordinator;
mod series_projection;
mod series_scene_builder;
mod smooth_scroll_coordinator;
mod snapshot_controller;
mod task_runner;
mod viewport_controller;

pub use chart_model::{OverlayRange, Selection, ZoomParts};
pub use chart_style::ChartStyle;
pub use engine::ChartEngine;
pub use engine_config::{ChartEngineConfig, GraphMargins, WheelMode};
pub use engine_snapshot::{EngineSnapshot, SeriesRangeSnapshot};
pub use marker_controller::MarkerPositionOptions;

use marker_controller::MarkerCoordinator;
