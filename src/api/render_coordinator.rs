use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::ChartResult;
use crate::extensions::CustomLayerContext;
use crate::render::{DrawingSurface, LayerId, Primitive};

use super::ChartEngine;
use super::decoration_scene_builder::build_decoration_primitives;
use super::overlay_scene_builder::build_overlay_scene;
use super::series_projection::{GraphProjection, project_graphs};
use super::series_scene_builder::build_series_primitives;

pub(super) struct RenderCoordinator;

impl RenderCoordinator {
    /// Composes synchronously, superseding any queued request.
    pub(super) fn render_now<S: DrawingSurface>(engine: &mut ChartEngine<S>) -> ChartResult<()> {
        if let Some(handle) = engine.core.presentation.render_cache.cancel_pending() {
            engine.core.runtime.tasks.cancel(handle);
        }
        Self::compose(engine)
    }

    /// Runs a queued recomposition unless a newer request superseded it.
    pub(super) fn run_queued<S: DrawingSurface>(
        engine: &mut ChartEngine<S>,
        generation: u64,
    ) -> ChartResult<()> {
        if !engine
            .core
            .presentation
            .render_cache
            .take_pending(generation)
        {
            return Ok(());
        }
        Self::compose(engine)
    }

    /// Recomputes every dirty layer bottom-up.
    ///
    /// Each layer starts from a copy of the one below it, so a clean lower
    /// layer is reused as-is and its painter is never invoked.
    fn compose<S: DrawingSurface>(engine: &mut ChartEngine<S>) -> ChartResult<()> {
        let size = engine.core.model.size;
        if !engine
            .core
            .presentation
            .render_cache
            .ensure_size(&mut engine.surface, size)?
        {
            trace!(
                width = size.width,
                height = size.height,
                "skipping composition of zero-area canvas"
            );
            return Ok(());
        }

        let style = Arc::clone(&engine.core.presentation.style);
        let mut projections: Option<Vec<GraphProjection>> = None;
        for layer in LayerId::ALL {
            if !engine.core.presentation.render_cache.needs_recompute(layer) {
                continue;
            }
            let primitives = match layer {
                LayerId::Series => {
                    let projected = project_graphs(&engine.core.model);
                    engine.store_hit_index(&projected);
                    let primitives = build_series_primitives(&projected, &style);
                    projections = Some(projected);
                    primitives
                }
                LayerId::Decorated => {
                    let projected =
                        projections.get_or_insert_with(|| project_graphs(&engine.core.model));
                    build_decoration_primitives(
                        &engine.core.model,
                        projected,
                        &style,
                        engine.core.behavior.margins,
                    )
                }
                LayerId::Custom => custom_layer_primitives(engine),
                LayerId::Overlay => {
                    engine.ensure_hit_index();
                    let scene = build_overlay_scene(
                        &engine.surface,
                        &engine.core.model,
                        &style,
                        &engine.core.behavior,
                    )?;
                    for (kind, labels) in scene.labels {
                        engine.core.model.markers.set_labels(kind, labels);
                    }
                    scene.primitives
                }
            };
            Self::paint_layer(engine, layer, &primitives)?;
        }
        Ok(())
    }

    fn paint_layer<S: DrawingSurface>(
        engine: &mut ChartEngine<S>,
        layer: LayerId,
        primitives: &[Primitive],
    ) -> ChartResult<()> {
        let ChartEngine { surface, core } = engine;
        let background = core.presentation.style.background;
        let Some((source, target)) = core.presentation.render_cache.split_for_compose(layer)
        else {
            return Ok(());
        };
        surface.clear_layer(target, background)?;
        if let Some(source) = source {
            surface.blit(source, target, 0.0)?;
        }
        for primitive in primitives {
            surface.draw(target, primitive)?;
        }
        core.presentation.render_cache.mark_composed(layer);
        trace!(
            layer = layer.number(),
            primitives = primitives.len(),
            "layer composed"
        );
        Ok(())
    }
}

/// Collects the host decorations of the custom layer, dropping invalid
/// draw commands instead of failing the whole composition.
fn custom_layer_primitives<S: DrawingSurface>(engine: &ChartEngine<S>) -> Vec<Primitive> {
    let model = &engine.core.model;
    let layers = &engine.core.presentation.custom_layers;
    if layers.is_empty() || !model.has_graph() {
        return Vec::new();
    }
    let context = CustomLayerContext {
        size: model.size,
        viewport: model.viewport.state(),
        graph_bands: model.graph_bands.clone(),
        value_positions: model
            .data
            .x
            .values
            .iter()
            .map(|value| model.viewport.value_to_device(*value))
            .collect(),
    };
    let mut primitives = Vec::new();
    for layer in layers {
        for primitive in layer.paint(&context) {
            match primitive.validate() {
                Ok(()) => primitives.push(primitive),
                Err(err) => {
                    warn!(layer = layer.id(), error = %err, "dropping invalid custom primitive");
                }
            }
        }
    }
    primitives
}
