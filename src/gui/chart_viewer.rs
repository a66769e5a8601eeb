//! Chart Viewer Widget
//! Bar chart in the main window and the tenure density plot in its own viewport.

use crate::charts::{ChartData, ChartPlotter, DENSITY_TITLE};
use egui::{Color32, RichText};

const DENSITY_WINDOW_SIZE: [f32; 2] = [1000.0, 600.0];

pub struct ChartViewer {
    pub chart_data: ChartData,
    /// Whether the density viewport is open
    pub density_open: bool,
}

impl ChartViewer {
    pub fn new(chart_data: ChartData) -> Self {
        let density_open = chart_data.tenure_density.is_some();
        Self {
            chart_data,
            density_open,
        }
    }

    /// Draw the bar chart card
    pub fn show(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, Color32::from_rgb(31, 119, 180)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if self.chart_data.tenure_density.is_some() {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .add_enabled(!self.density_open, egui::Button::new("📈 Tenure density"))
                                .clicked()
                            {
                                self.density_open = true;
                            }
                        });
                    } else {
                        ui.label(
                            RichText::new("Tenure density unavailable: too few churned customers")
                                .size(11.0)
                                .color(Color32::GRAY),
                        );
                    }
                });

                let height = (ui.available_height() - 40.0).max(300.0);
                ChartPlotter::draw_contract_bars(ui, &self.chart_data.contract_churn, height);
            });
    }

    /// Show the density plot in a second native window while open.
    pub fn show_density_viewport(&mut self, ctx: &egui::Context) {
        if !self.density_open {
            return;
        }
        let Some(curve) = &self.chart_data.tenure_density else {
            return;
        };

        let mut close_requested = false;
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("tenure_density"),
            egui::ViewportBuilder::default()
                .with_title(DENSITY_TITLE)
                .with_inner_size(DENSITY_WINDOW_SIZE),
            |ctx, class| {
                if matches!(class, egui::ViewportClass::Embedded) {
                    // Backend without multi-viewport support
                    let mut open = true;
                    egui::Window::new(DENSITY_TITLE)
                        .open(&mut open)
                        .default_size([800.0, 500.0])
                        .show(ctx, |ui| {
                            ChartPlotter::draw_tenure_density(ui, curve, 420.0);
                        });
                    close_requested = !open;
                } else {
                    egui::CentralPanel::default().show(ctx, |ui| {
                        let height = (ui.available_height() - 30.0).max(200.0);
                        ChartPlotter::draw_tenure_density(ui, curve, height);
                    });
                    if ctx.input(|i| i.viewport().close_requested()) {
                        close_requested = true;
                    }
                }
            },
        );

        if close_requested {
            self.density_open = false;
        }
    }
}
