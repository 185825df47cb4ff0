use std::sync::Arc;

use crate::error::{ChartError, ChartResult};
use crate::extensions::CustomLayer;
use crate::render::{DrawingSurface, LayerId};

use super::{ChartEngine, ChartStyle};

impl<S: DrawingSurface> ChartEngine<S> {
    /// Registers a custom foreground layer with unique identifier.
    pub fn register_custom_layer(&mut self, layer: Box<dyn CustomLayer>) -> ChartResult<()> {
        self.ensure_alive()?;
        let layer_id = layer.id().to_owned();
        if layer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "custom layer id must not be empty".to_owned(),
            ));
        }
        if self.has_custom_layer(&layer_id) {
            return Err(ChartError::InvalidData(format!(
                "custom layer with id `{layer_id}` is already registered"
            )));
        }
        self.core.presentation.custom_layers.push(layer);
        self.invalidate_layer(LayerId::Custom);
        Ok(())
    }

    /// Unregisters a custom layer by id. Returns `true` when removed.
    pub fn unregister_custom_layer(&mut self, layer_id: &str) -> bool {
        let Some(position) = self
            .core
            .presentation
            .custom_layers
            .iter()
            .position(|entry| entry.id() == layer_id)
        else {
            return false;
        };
        self.core.presentation.custom_layers.remove(position);
        self.invalidate_layer(LayerId::Custom);
        true
    }

    #[must_use]
    pub fn custom_layer_count(&self) -> usize {
        self.core.presentation.custom_layers.len()
    }

    #[must_use]
    pub fn has_custom_layer(&self, layer_id: &str) -> bool {
        self.core
            .presentation
            .custom_layers
            .iter()
            .any(|layer| layer.id() == layer_id)
    }

    /// Repaints the custom layer and the overlay on the next composition.
    pub fn invalidate_custom_layers(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        self.invalidate_layer(LayerId::Custom);
        Ok(())
    }

    /// Swaps the shared theme and repaints every layer.
    pub fn on_theme_changed(&mut self, style: ChartStyle) -> ChartResult<()> {
        self.ensure_alive()?;
        style.validate()?;
        self.core.presentation.style = Arc::new(style);
        self.invalidate_all();
        Ok(())
    }
}
