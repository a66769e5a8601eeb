//! Churnscope - Telecom Customer Churn Exploratory Analysis & Chart Viewer
//!
//! Prints the churn summaries and shows the charts in native windows, or
//! writes them as PNG files when configured to export.

use anyhow::{anyhow, Context, Result};
use churnscope::analysis::{format_charges_summary, format_payment_churn};
use churnscope::charts::StaticChartRenderer;
use churnscope::gui::ChurnApp;
use churnscope::{run_analysis, AnalysisConfig, OutputTarget};

fn main() -> Result<()> {
    env_logger::init();

    let config = AnalysisConfig::load()?;
    let report = run_analysis(&config)
        .with_context(|| format!("analysing {}", config.csv_path.display()))?;

    println!("{}", format_charges_summary(&report.charges_by_churn));

    log::info!(
        "Churn rate by payment method:\n{}",
        format_payment_churn(&report.payment_churn)
    );
    match report.internet_crosstab.to_dataframe() {
        Ok(table) => log::info!("InternetService x Churn:\n{}", table),
        Err(e) => log::warn!("Could not format cross-tabulation: {}", e),
    }
    match report.internet_crosstab.percentages_dataframe() {
        Ok(table) => log::info!("InternetService x Churn (row %):\n{}", table),
        Err(e) => log::warn!("Could not format row percentages: {}", e),
    }

    match &config.output {
        OutputTarget::Window => {
            ChurnApp::run(report, config.csv_path.clone(), config.strictness)
                .map_err(|e| anyhow!("chart window failed: {e}"))?;
        }
        OutputTarget::Export { dir } => {
            let written = StaticChartRenderer::export_all(&report.charts, dir)?;
            if config.open_exports {
                for path in &written {
                    if let Err(e) = open::that(path) {
                        log::warn!("Could not open {}: {}", path.display(), e);
                    }
                }
            }
        }
    }

    Ok(())
}
