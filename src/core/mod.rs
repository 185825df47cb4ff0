pub mod deferred;
pub mod hit_test;
pub mod markers;
pub mod scale;
pub mod series;
pub mod synch;
pub mod types;
pub mod viewport;

pub use deferred::{DeferredQueue, TaskHandle};
pub use hit_test::{HitResult, HitTestIndex};
pub use markers::{Marker, MarkerKind, MarkerLabel, MarkerSet, RangeMarkers, YMarker, YMarkerPair};
pub use scale::{LinearScale, VisibleRange};
pub use series::{
    AxisUnit, ChartDataModel, GraphKind, SeriesId, TitleSegment, XSeries, YSeries,
    datetime_to_unix_seconds, decimal_to_f64,
};
pub use synch::{SharedMinMaxKeeper, SynchConfiguration, SynchedMinMaxKeeper};
pub use types::{CanvasSize, DevicePoint, DeviceRect};
pub use viewport::{
    DEFAULT_ZOOM_FACTOR, FINE_ZOOM_FACTOR, MAX_VIRTUAL_WIDTH, ViewportState, ViewportTransform,
    ZOOM_WITH_PARTS_RATIO,
};
