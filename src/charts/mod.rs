//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{
    contract_rgb, ChartData, ChartPlotter, BAR_TITLE, BAR_X_LABEL, BAR_Y_LABEL, DENSITY_TITLE,
    DENSITY_X_LABEL, DENSITY_Y_LABEL,
};
pub use renderer::{StaticChartRenderer, BAR_CHART_FILE, DENSITY_CHART_FILE};
