use super::{
    ChartEngineConfig, chart_model::ChartModel, chart_presentation::ChartPresentationState,
    chart_runtime::ChartRuntimeState,
};

/// Internal engine core state used by the public facade (`ChartEngine`).
pub(super) struct EngineCore<L> {
    pub(super) model: ChartModel,
    pub(super) behavior: ChartEngineConfig,
    pub(super) presentation: ChartPresentationState<L>,
    pub(super) runtime: ChartRuntimeState,
}
