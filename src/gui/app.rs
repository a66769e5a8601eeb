//! Churnscope Main Application
//! Main window with summary panel and chart viewer.

use crate::analysis::ChurnReport;
use crate::charts::BAR_TITLE;
use crate::data::Strictness;
use crate::gui::{ChartViewer, SummaryPanel};
use egui::{ScrollArea, SidePanel};
use std::path::PathBuf;

/// Main application window.
pub struct ChurnApp {
    summary_panel: SummaryPanel,
    chart_viewer: ChartViewer,
}

impl ChurnApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        report: ChurnReport,
        source: PathBuf,
        strictness: Strictness,
    ) -> Self {
        Self {
            summary_panel: SummaryPanel::new(&report, source, strictness),
            chart_viewer: ChartViewer::new(report.charts),
        }
    }

    /// Open the chart window and block until it is closed.
    pub fn run(report: ChurnReport, source: PathBuf, strictness: Strictness) -> eframe::Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1400.0, 800.0])
                .with_min_inner_size([1000.0, 600.0])
                .with_title(BAR_TITLE),
            ..Default::default()
        };

        eframe::run_native(
            "Churnscope",
            options,
            Box::new(move |cc| Ok(Box::new(ChurnApp::new(cc, report, source, strictness)))),
        )
    }
}

impl eframe::App for ChurnApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("summary_panel")
            .resizable(true)
            .default_width(460.0)
            .min_width(380.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    self.summary_panel.show(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });

        self.chart_viewer.show_density_viewport(ctx);
    }
}
