use std::sync::Arc;

use tracing::debug;

use crate::error::ChartResult;
use crate::render::DrawingSurface;

use super::{
    ChartEngine, ChartEngineConfig, ChartStyle, chart_model::ChartModel,
    chart_presentation::ChartPresentationState, chart_runtime::ChartRuntimeState,
    engine_core::EngineCore,
};

impl<S: DrawingSurface> ChartEngine<S> {
    /// Creates an engine showing the no-graph state until a model is set.
    pub fn new(surface: S, config: ChartEngineConfig) -> ChartResult<Self> {
        Self::with_style(surface, config, Arc::new(ChartStyle::default()))
    }

    /// Creates an engine sharing an already resolved theme.
    pub fn with_style(
        surface: S,
        config: ChartEngineConfig,
        style: Arc<ChartStyle>,
    ) -> ChartResult<Self> {
        config.validate()?;
        style.validate()?;

        let mut engine = Self {
            surface,
            core: EngineCore {
                model: ChartModel::new(config.size),
                behavior: config,
                presentation: ChartPresentationState::new(style),
                runtime: ChartRuntimeState::default(),
            },
        };
        engine.relayout_graphs();
        engine.invalidate_all();
        debug!(
            width = config.size.width,
            height = config.size.height,
            "chart engine created"
        );
        Ok(engine)
    }

    /// Replaces the behavior configuration.
    ///
    /// A changed size goes through `resize`; margin changes relayout the graph
    /// bands. Everything is repainted.
    pub fn set_config(&mut self, config: ChartEngineConfig) -> ChartResult<()> {
        self.ensure_alive()?;
        config.validate()?;
        let resized = config.size != self.core.model.size;
        let margins_changed = config.margins != self.core.behavior.margins;
        self.core.behavior = ChartEngineConfig {
            size: self.core.model.size,
            ..config
        };
        if resized {
            self.resize(config.size)?;
        } else {
            if margins_changed {
                self.relayout_graphs();
            }
            self.invalidate_all();
        }
        debug!(?config, "chart config replaced");
        Ok(())
    }
}
