//! Optional building blocks layered on top of the core engine.
//!
//! Keep these free of engine internals so hosts can use them directly.

pub mod custom_layers;
pub mod labels;
pub mod listeners;

pub use custom_layers::{CustomLayer, CustomLayerContext};
pub use labels::{
    LabelBounds, LabelPlacementConfig, LabelRequest, PlacedLabel, place_marker_labels,
};
pub use listeners::{
    ChartListeners, HoveredValueChanged, ListenerRegistry, MarkerMoved, OverlayRangeMoved,
    PointDoubleClicked, PointSelected, Subscription, ViewportResized,
};
