use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{CanvasSize, TaskHandle};
use crate::error::ChartResult;
use crate::render::DrawingSurface;

/// The four cached raster layers, bottom to top.
///
/// Each layer starts as a copy of the one below it, so recomposing layer N
/// forces every layer above it to be recomposed as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerId {
    /// Bare series bodies.
    Series,
    /// Series plus axes, grid, title and segments.
    Decorated,
    /// Decorated chart plus host-provided foreground layers.
    Custom,
    /// Everything plus markers, selection and hover feedback.
    Overlay,
}

impl LayerId {
    pub const ALL: [Self; 4] = [Self::Series, Self::Decorated, Self::Custom, Self::Overlay];

    /// 1-based layer number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.slot() as u8 + 1
    }

    const fn slot(self) -> usize {
        match self {
            Self::Series => 0,
            Self::Decorated => 1,
            Self::Custom => 2,
            Self::Overlay => 3,
        }
    }
}

/// How often each layer was recomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerRecomputeStats {
    pub series: u64,
    pub decorated: u64,
    pub custom: u64,
    pub overlay: u64,
}

impl LayerRecomputeStats {
    #[must_use]
    pub fn get(&self, layer: LayerId) -> u64 {
        match layer {
            LayerId::Series => self.series,
            LayerId::Decorated => self.decorated,
            LayerId::Custom => self.custom,
            LayerId::Overlay => self.overlay,
        }
    }

    fn bump(&mut self, layer: LayerId) {
        match layer {
            LayerId::Series => self.series += 1,
            LayerId::Decorated => self.decorated += 1,
            LayerId::Custom => self.custom += 1,
            LayerId::Overlay => self.overlay += 1,
        }
    }
}

#[derive(Debug)]
struct RenderLayer<L> {
    id: LayerId,
    bitmap: Option<L>,
    size: CanvasSize,
    dirty: bool,
}

impl<L> RenderLayer<L> {
    fn new(id: LayerId) -> Self {
        Self {
            id,
            bitmap: None,
            size: CanvasSize::default(),
            dirty: true,
        }
    }
}

/// Dirty-tracked stack of four raster layers with coalesced recomposition.
///
/// `request_render` bumps a generation counter; a deferred recomposition
/// runs only when it still carries the latest generation, so a burst of
/// requests collapses into one recompute.
#[derive(Debug)]
pub struct LayeredRenderCache<L> {
    layers: [RenderLayer<L>; 4],
    generation: u64,
    pending_generation: Option<u64>,
    pending_handle: Option<TaskHandle>,
    stats: LayerRecomputeStats,
    pan_offset: f64,
}

impl<L> Default for LayeredRenderCache<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> LayeredRenderCache<L> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: LayerId::ALL.map(RenderLayer::new),
            generation: 0,
            pending_generation: None,
            pending_handle: None,
            stats: LayerRecomputeStats::default(),
            pan_offset: 0.0,
        }
    }

    /// Marks `layer` and every layer above it dirty.
    pub fn invalidate(&mut self, layer: LayerId) {
        for entry in &mut self.layers[layer.slot()..] {
            entry.dirty = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        self.invalidate(LayerId::Series);
    }

    #[must_use]
    pub fn is_dirty(&self, layer: LayerId) -> bool {
        self.layers[layer.slot()].dirty
    }

    #[must_use]
    pub fn needs_recompute(&self, layer: LayerId) -> bool {
        let entry = &self.layers[layer.slot()];
        entry.dirty || entry.bitmap.is_none()
    }

    #[must_use]
    pub fn any_dirty(&self) -> bool {
        LayerId::ALL.iter().any(|layer| self.needs_recompute(*layer))
    }

    #[must_use]
    pub fn stats(&self) -> LayerRecomputeStats {
        self.stats
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new render generation and returns it.
    pub fn request_render(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending_generation = Some(self.generation);
        trace!(generation = self.generation, "render requested");
        self.generation
    }

    /// Stores the queued task of the latest request, returning the superseded one.
    pub fn set_pending_handle(&mut self, handle: TaskHandle) -> Option<TaskHandle> {
        self.pending_handle.replace(handle)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending_generation.is_some()
    }

    /// Consumes the pending request when `generation` is still the latest.
    ///
    /// Returns `false` for a stale generation, which callers treat as a no-op.
    pub fn take_pending(&mut self, generation: u64) -> bool {
        if self.pending_generation != Some(generation) || self.generation != generation {
            trace!(generation, latest = self.generation, "stale render generation");
            return false;
        }
        self.pending_generation = None;
        self.pending_handle = None;
        true
    }

    /// Drops the pending request; any queued recomposition becomes stale.
    pub fn cancel_pending(&mut self) -> Option<TaskHandle> {
        self.generation = self.generation.wrapping_add(1);
        self.pending_generation = None;
        self.pending_handle.take()
    }

    /// Reallocates every layer whose bitmap does not match `size`.
    ///
    /// A zero-area size leaves the cache untouched and returns `Ok(false)`.
    pub fn ensure_size<S>(&mut self, surface: &mut S, size: CanvasSize) -> ChartResult<bool>
    where
        S: DrawingSurface<Layer = L>,
    {
        if !size.is_valid() {
            return Ok(false);
        }
        for slot in 0..self.layers.len() {
            let entry = &mut self.layers[slot];
            if entry.bitmap.is_some() && entry.size == size {
                continue;
            }
            if let Some(old) = entry.bitmap.take() {
                surface.dispose_layer(old);
            }
            entry.bitmap = Some(surface.allocate_layer(size)?);
            entry.size = size;
            debug!(
                layer = entry.id.number(),
                width = size.width,
                height = size.height,
                "render layer allocated"
            );
            let id = entry.id;
            self.invalidate(id);
        }
        Ok(true)
    }

    /// Borrows the layer below `layer` (the blit source) together with
    /// `layer` itself for recomposition.
    pub fn split_for_compose(&mut self, layer: LayerId) -> Option<(Option<&L>, &mut L)> {
        let (lower, upper) = self.layers.split_at_mut(layer.slot());
        let target = upper.first_mut()?.bitmap.as_mut()?;
        let source = lower.last().and_then(|entry| entry.bitmap.as_ref());
        Some((source, target))
    }

    /// Records a finished recomposition and dirties the layers above it.
    pub fn mark_composed(&mut self, layer: LayerId) {
        self.stats.bump(layer);
        self.layers[layer.slot()].dirty = false;
        for entry in &mut self.layers[layer.slot() + 1..] {
            entry.dirty = true;
        }
    }

    #[must_use]
    pub fn layer(&self, layer: LayerId) -> Option<&L> {
        self.layers[layer.slot()].bitmap.as_ref()
    }

    #[must_use]
    pub fn layer_size(&self, layer: LayerId) -> CanvasSize {
        self.layers[layer.slot()].size
    }

    /// The bitmap the host should present: the top layer.
    ///
    /// While a recomposition is pending this is the previous frame. The
    /// bitmap itself is never shifted; during a chart drag the host draws it
    /// translated by [`Self::pan_offset`].
    #[must_use]
    pub fn presented(&self) -> Option<&L> {
        self.layer(LayerId::Overlay)
    }

    #[must_use]
    pub fn pan_offset(&self) -> f64 {
        self.pan_offset
    }

    pub fn set_pan_offset(&mut self, offset: f64) {
        self.pan_offset = if offset.is_finite() { offset } else { 0.0 };
    }

    /// Releases all bitmaps back to the surface.
    pub fn dispose<S>(&mut self, surface: &mut S)
    where
        S: DrawingSurface<Layer = L>,
    {
        for entry in &mut self.layers {
            if let Some(bitmap) = entry.bitmap.take() {
                surface.dispose_layer(bitmap);
            }
            entry.dirty = true;
        }
        self.pending_generation = None;
        self.pending_handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerId, LayeredRenderCache};
    use crate::core::CanvasSize;
    use crate::render::{RecordedLayer, RecordingSurface};

    #[test]
    fn invalidating_a_layer_dirties_the_layers_above() {
        let mut cache = LayeredRenderCache::<RecordedLayer>::new();
        let mut surface = RecordingSurface::default();
        cache
            .ensure_size(&mut surface, CanvasSize::new(100, 50))
            .expect("allocate");
        for layer in LayerId::ALL {
            cache.mark_composed(layer);
        }
        assert!(!cache.any_dirty());

        cache.invalidate(LayerId::Decorated);
        assert!(!cache.is_dirty(LayerId::Series));
        assert!(cache.is_dirty(LayerId::Decorated));
        assert!(cache.is_dirty(LayerId::Overlay));
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut cache = LayeredRenderCache::<RecordedLayer>::new();
        let first = cache.request_render();
        let second = cache.request_render();
        assert!(!cache.take_pending(first));
        assert!(cache.take_pending(second));
        assert!(!cache.take_pending(second));
    }

    #[test]
    fn zero_area_size_is_ignored() {
        let mut cache = LayeredRenderCache::<RecordedLayer>::new();
        let mut surface = RecordingSurface::default();
        let allocated = cache
            .ensure_size(&mut surface, CanvasSize::new(0, 40))
            .expect("no-op");
        assert!(!allocated);
        assert_eq!(surface.allocated_layers(), 0);
    }
}
