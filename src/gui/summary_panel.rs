//! Summary Panel Widget
//! Left side panel with the data source and the aggregated churn tables.

use crate::analysis::ChurnReport;
use crate::charts::ChartPlotter;
use crate::data::Strictness;
use crate::stats::{ChurnChargeSummary, CrossTab, PaymentChurnRate};
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Read-only view of the run's summary tables.
pub struct SummaryPanel {
    pub source: PathBuf,
    pub strictness: Strictness,
    pub rows: usize,
    pub imputed: usize,
    pub median: f64,
    pub overall_churn_rate_pct: f64,
    pub payment_churn: Vec<PaymentChurnRate>,
    pub charges_by_churn: Vec<ChurnChargeSummary>,
    pub crosstab: CrossTab,
}

impl SummaryPanel {
    pub fn new(report: &ChurnReport, source: PathBuf, strictness: Strictness) -> Self {
        Self {
            source,
            strictness,
            rows: report.table.height(),
            imputed: report.cleaning.imputed_total_charges,
            median: report.cleaning.total_charges_median,
            overall_churn_rate_pct: report.overall_churn_rate_pct,
            payment_churn: report.payment_churn.clone(),
            charges_by_churn: report.charges_by_churn.clone(),
            crosstab: report.internet_crosstab.clone(),
        }
    }

    /// Draw the panel
    pub fn show(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Churnscope")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Telco Customer Churn")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let file_name = self
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| self.source.display().to_string());
                ui.label(RichText::new(file_name).size(12.0));
                ui.label(
                    RichText::new(format!(
                        "{} rows · {} TotalCharges imputed (median {:.2}) · {:?}",
                        self.rows, self.imputed, self.median, self.strictness
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
                ui.label(
                    RichText::new(format!(
                        "Overall churn rate: {:.2}%",
                        self.overall_churn_rate_pct
                    ))
                    .size(12.0)
                    .color(Color32::from_rgb(220, 53, 69)),
                );
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("💳 Churn Rate by Payment Method").size(14.0).strong());
        ui.add_space(5.0);
        ChartPlotter::draw_payment_table(ui, &self.payment_churn);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("💲 Monthly Charges by Churn").size(14.0).strong());
        ui.add_space(5.0);
        ChartPlotter::draw_charges_table(ui, &self.charges_by_churn);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("🌐 Internet Service vs Churn").size(14.0).strong());
        ui.add_space(5.0);
        ChartPlotter::draw_crosstab(ui, &self.crosstab);
    }
}
