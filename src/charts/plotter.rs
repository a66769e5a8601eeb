//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::stats::{
    ChurnChargeSummary, ContractChurnCount, CrossTab, DensityCurve, PaymentChurnRate,
};
use egui::{Align2, Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoint, PlotPoints, Text};

pub const BAR_TITLE: &str = "Churn Count by Contract Type";
pub const BAR_X_LABEL: &str = "Contract Type";
pub const BAR_Y_LABEL: &str = "Number of Churned Customers";

pub const DENSITY_TITLE: &str = "Tenure Distribution of Churned Customers";
pub const DENSITY_X_LABEL: &str = "Tenure (Months)";
pub const DENSITY_Y_LABEL: &str = "Density";

/// Bar colors (blue, orange, green). Further contracts reuse the palette cyclically.
pub const CONTRACT_PALETTE: [(u8, u8, u8); 3] = [(31, 119, 180), (255, 127, 14), (44, 160, 44)];

pub const DENSITY_RGB: (u8, u8, u8) = (255, 0, 0);
pub const DENSITY_FILL_ALPHA: f64 = 0.3;

/// Palette entry for the bar at `index`.
pub fn contract_rgb(index: usize) -> (u8, u8, u8) {
    CONTRACT_PALETTE[index % CONTRACT_PALETTE.len()]
}

/// Everything the renderers need, computed once.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub contract_churn: Vec<ContractChurnCount>,
    /// None when the churned tenure sample cannot support a KDE
    pub tenure_density: Option<DensityCurve>,
}

/// Draws the churn charts and summary tables using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn bar_color(index: usize) -> Color32 {
        let (r, g, b) = contract_rgb(index);
        Color32::from_rgb(r, g, b)
    }

    /// Bar chart of churned customers per contract, count above each bar.
    pub fn draw_contract_bars(ui: &mut egui::Ui, bars: &[ContractChurnCount], height: f32) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(BAR_TITLE).size(16.0).strong());
        });

        if bars.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No churned customers").size(14.0));
            });
            return;
        }

        let labels: Vec<String> = bars.iter().map(|b| b.contract.clone()).collect();
        let n = labels.len();
        let max_count = bars.iter().map(|b| b.churned).max().unwrap_or(0) as f64;
        let label_offset = (max_count * 0.01).max(0.5);

        Plot::new("contract_churn_bars")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_grid([false, true])
            .x_axis_label(BAR_X_LABEL)
            .y_axis_label(BAR_Y_LABEL)
            .include_x(-0.5)
            .include_x(n as f64 - 0.5)
            .include_y(0.0)
            .include_y(max_count * 1.1 + 1.0)
            .x_grid_spacer(move |_input| {
                (0..n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx as usize) < labels.len() && (mark.value - idx).abs() < 1e-6 {
                    labels[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let chart_bars: Vec<Bar> = bars
                    .iter()
                    .enumerate()
                    .map(|(i, b)| {
                        Bar::new(i as f64, b.churned as f64)
                            .width(0.6)
                            .name(&b.contract)
                            .fill(Self::bar_color(i))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(chart_bars));

                for (i, b) in bars.iter().enumerate() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(i as f64, b.churned as f64 + label_offset),
                            RichText::new(b.churned.to_string()).size(13.0),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            });
    }

    /// Line over the KDE grid, shaded down to zero with `DENSITY_FILL_ALPHA`.
    pub fn density_line(curve: &DensityCurve) -> Line {
        let (r, g, b) = DENSITY_RGB;
        let points: PlotPoints = curve.points().map(|(x, y)| [x, y]).collect();

        Line::new(points)
            .color(Color32::from_rgb(r, g, b))
            .width(2.0)
            .fill(0.0_f32)
            .fill_alpha(DENSITY_FILL_ALPHA as f32)
            .name(format!("n = {}", curve.sample_size))
    }

    /// Subtitle naming the most common churn tenure.
    pub fn density_caption(curve: &DensityCurve) -> String {
        match curve.peak() {
            Some((x, _)) => format!(
                "Peak at {:.1} months, {} churned customers",
                x, curve.sample_size
            ),
            None => format!("{} churned customers", curve.sample_size),
        }
    }

    /// Density curve with the area beneath it shaded.
    pub fn draw_tenure_density(ui: &mut egui::Ui, curve: &DensityCurve, height: f32) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(DENSITY_TITLE).size(16.0).strong());
            ui.label(
                RichText::new(Self::density_caption(curve))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        Plot::new("tenure_density")
            .height(height)
            .x_axis_label(DENSITY_X_LABEL)
            .y_axis_label(DENSITY_Y_LABEL)
            .include_y(0.0)
            .include_y(curve.max_density() * 1.05)
            .show(ui, |plot_ui| {
                plot_ui.line(Self::density_line(curve));
            });
    }

    /// Payment method churn rates table.
    pub fn draw_payment_table(ui: &mut egui::Ui, rates: &[PaymentChurnRate]) {
        egui::Grid::new("payment_churn_table")
            .striped(true)
            .min_col_width(55.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("PaymentMethod").strong().size(11.0));
                ui.label(RichText::new("N").strong().size(11.0));
                ui.label(RichText::new("Churn Rate (%)").strong().size(11.0));
                ui.end_row();

                for rate in rates {
                    ui.label(RichText::new(&rate.payment_method).size(11.0));
                    ui.label(RichText::new(rate.customers.to_string()).size(11.0));
                    ui.label(RichText::new(format!("{:.2}", rate.churn_rate_pct)).size(11.0));
                    ui.end_row();
                }
            });
    }

    /// Mean MonthlyCharges per churn status.
    pub fn draw_charges_table(ui: &mut egui::Ui, summary: &[ChurnChargeSummary]) {
        egui::Grid::new("churn_charges_table")
            .striped(true)
            .min_col_width(55.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Churn").strong().size(11.0));
                ui.label(RichText::new("N").strong().size(11.0));
                ui.label(RichText::new("Mean MonthlyCharges").strong().size(11.0));
                ui.end_row();

                for row in summary {
                    ui.label(RichText::new(&row.churn).size(11.0));
                    ui.label(RichText::new(row.customers.to_string()).size(11.0));
                    ui.label(RichText::new(format!("{:.3}", row.mean_monthly_charges)).size(11.0));
                    ui.end_row();
                }
            });
    }

    /// Cross-tabulation with margins, churn rate, and row percentages.
    pub fn draw_crosstab(ui: &mut egui::Ui, tab: &CrossTab) {
        let highlight = Color32::from_rgb(220, 53, 69);

        egui::Grid::new("crosstab_table")
            .striped(true)
            .min_col_width(45.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new(&tab.index_name).strong().size(11.0));
                for label in &tab.column_labels {
                    ui.label(RichText::new(label).strong().size(11.0));
                }
                ui.label(RichText::new(crate::stats::TOTAL_LABEL).strong().size(11.0));
                ui.label(RichText::new(crate::stats::CHURN_RATE_LABEL).strong().size(11.0));
                ui.end_row();

                for (i, row_label) in tab.row_labels.iter().enumerate() {
                    ui.label(RichText::new(row_label).size(11.0));
                    for (count, pct) in tab.counts[i].iter().zip(&tab.row_percentages[i]) {
                        ui.label(RichText::new(format!("{} ({:.2}%)", count, pct)).size(11.0));
                    }
                    ui.label(RichText::new(tab.row_totals[i].to_string()).size(11.0));
                    ui.label(
                        RichText::new(format!("{:.1}", tab.churn_rate_pct[i]))
                            .size(11.0)
                            .color(highlight),
                    );
                    ui.end_row();
                }

                ui.label(RichText::new(crate::stats::TOTAL_LABEL).strong().size(11.0));
                for total in &tab.column_totals {
                    ui.label(RichText::new(total.to_string()).strong().size(11.0));
                }
                ui.label(RichText::new(tab.grand_total.to_string()).strong().size(11.0));
                ui.label(
                    RichText::new(format!("{:.1}", tab.overall_churn_rate_pct))
                        .strong()
                        .size(11.0)
                        .color(highlight),
                );
                ui.end_row();
            });
    }
}
