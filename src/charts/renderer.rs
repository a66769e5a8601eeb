//! Static Chart Renderer
//! Writes the churn charts as PNG images using plotters.
//!
//! Layout matches the interactive charts:
//! 1. Bar chart: churned customers per contract type, count above each bar
//! 2. Density plot: KDE of churned tenure, line plus shaded area

use crate::charts::plotter::{
    contract_rgb, ChartData, BAR_TITLE, BAR_X_LABEL, BAR_Y_LABEL, DENSITY_FILL_ALPHA,
    DENSITY_RGB, DENSITY_TITLE, DENSITY_X_LABEL, DENSITY_Y_LABEL,
};
use crate::stats::{ContractChurnCount, DensityCurve};
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

pub const BAR_CHART_FILE: &str = "churn_by_contract.png";
pub const DENSITY_CHART_FILE: &str = "tenure_density.png";

/// Output image size in pixels
const CHART_SIZE: (u32, u32) = (1000, 600);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Write every available chart into `dir`, returning the files written.
    pub fn export_all(data: &ChartData, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;

        let mut written = Vec::new();

        let bar_path = dir.join(BAR_CHART_FILE);
        Self::render_contract_bars(&data.contract_churn, &bar_path)
            .with_context(|| format!("rendering {}", bar_path.display()))?;
        written.push(bar_path);

        match &data.tenure_density {
            Some(curve) => {
                let density_path = dir.join(DENSITY_CHART_FILE);
                Self::render_tenure_density(curve, &density_path)
                    .with_context(|| format!("rendering {}", density_path.display()))?;
                written.push(density_path);
            }
            None => log::warn!("Skipping {}: no density curve", DENSITY_CHART_FILE),
        }

        for path in &written {
            log::info!("Wrote {}", path.display());
        }
        Ok(written)
    }

    fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
        RGBColor(r, g, b)
    }

    /// Category name for a tick at an integer position, empty elsewhere.
    fn category_label(labels: &[String], x: f64) -> String {
        let idx = x.round();
        if idx >= 0.0 && (x - idx).abs() < 1e-6 {
            labels.get(idx as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    }

    /// Bar chart of churned customers per contract.
    pub fn render_contract_bars(bars: &[ContractChurnCount], path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let n = bars.len().max(1);
        let max_count = bars.iter().map(|b| b.churned).max().unwrap_or(0) as f64;
        let y_max = max_count * 1.1 + 1.0;
        let label_offset = (max_count * 0.01).max(0.5);
        let labels: Vec<String> = bars.iter().map(|b| b.contract.clone()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(BAR_TITLE, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        let label_at = |x: &f64| Self::category_label(&labels, *x);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(BLACK.mix(0.3))
            .light_line_style(TRANSPARENT)
            .x_labels(n)
            .x_label_formatter(&label_at)
            .y_label_formatter(&|y| format!("{:.0}", y))
            .x_desc(BAR_X_LABEL)
            .y_desc(BAR_Y_LABEL)
            .axis_desc_style(("sans-serif", 18))
            .label_style(("sans-serif", 16))
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.3, 0.0), (x + 0.3, b.churned as f64)],
                Self::rgb(contract_rgb(i)).filled(),
            )
        }))?;

        let value_style = TextStyle::from(("sans-serif", 16).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
            Text::new(
                b.churned.to_string(),
                (i as f64, b.churned as f64 + label_offset),
                value_style.clone(),
            )
        }))?;

        root.present()?;
        Ok(())
    }

    /// Density curve; the same points draw the border line and the shaded area.
    pub fn render_tenure_density(curve: &DensityCurve, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_min, x_max) = curve.x_range();
        let y_max = curve.max_density() * 1.1;
        let color = Self::rgb(DENSITY_RGB);

        let mut chart = ChartBuilder::on(&root)
            .caption(DENSITY_TITLE, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .bold_line_style(BLACK.mix(0.3))
            .light_line_style(TRANSPARENT)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.3}", y))
            .x_desc(DENSITY_X_LABEL)
            .y_desc(DENSITY_Y_LABEL)
            .axis_desc_style(("sans-serif", 18))
            .label_style(("sans-serif", 16))
            .draw()?;

        chart.draw_series(
            AreaSeries::new(curve.points(), 0.0, color.mix(DENSITY_FILL_ALPHA))
                .border_style(color.stroke_width(2)),
        )?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::KernelDensity;
    use tempfile::TempDir;

    /// Text rendering needs a system sans-serif font.
    fn fonts_available() -> bool {
        let available = ("sans-serif", 16).into_font().box_size("0").is_ok();
        if !available {
            eprintln!("no sans-serif font found, skipping PNG export check");
        }
        available
    }

    fn contract_bars() -> Vec<ContractChurnCount> {
        vec![
            ContractChurnCount {
                contract: "Month-to-month".to_string(),
                churned: 1655,
            },
            ContractChurnCount {
                contract: "One year".to_string(),
                churned: 166,
            },
            ContractChurnCount {
                contract: "Two year".to_string(),
                churned: 48,
            },
        ]
    }

    fn assert_non_empty_file(path: &Path) {
        let meta = std::fs::metadata(path).unwrap();
        assert!(meta.len() > 0, "{} is empty", path.display());
    }

    #[test]
    fn test_export_writes_both_charts() {
        if !fonts_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let curve = KernelDensity::estimate(&[1.0, 2.0, 2.0, 5.0, 9.0, 14.0, 30.0]).unwrap();
        let data = ChartData {
            contract_churn: contract_bars(),
            tenure_density: Some(curve),
        };

        let written = StaticChartRenderer::export_all(&data, dir.path()).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join(BAR_CHART_FILE), dir.path().join(DENSITY_CHART_FILE)]
        );
        for path in &written {
            assert_non_empty_file(path);
        }
    }

    #[test]
    fn test_export_without_density_writes_bar_chart_only() {
        if !fonts_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let data = ChartData {
            contract_churn: contract_bars(),
            tenure_density: None,
        };

        let written = StaticChartRenderer::export_all(&data, &out).unwrap();

        assert_eq!(written, vec![out.join(BAR_CHART_FILE)]);
        assert_non_empty_file(&written[0]);
        assert!(!out.join(DENSITY_CHART_FILE).exists());
    }

    #[test]
    fn test_category_label_only_on_integer_ticks() {
        let labels = vec!["Month-to-month".to_string(), "One year".to_string()];
        assert_eq!(StaticChartRenderer::category_label(&labels, 0.0), "Month-to-month");
        assert_eq!(StaticChartRenderer::category_label(&labels, 1.0), "One year");
        assert_eq!(StaticChartRenderer::category_label(&labels, 0.5), "");
        assert_eq!(StaticChartRenderer::category_label(&labels, 2.0), "");
        assert_eq!(StaticChartRenderer::category_label(&labels, -0.5), "");
    }
}
