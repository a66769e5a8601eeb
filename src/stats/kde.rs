//! Kernel Density Estimation
//! Gaussian KDE with Scott's rule bandwidth, evaluated on an evenly spaced grid.

use crate::stats::StatsError;
use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Number of grid points the density is evaluated on
pub const KDE_GRID_POINTS: usize = 1000;

/// A sampled density curve. Shared by the line and the filled area.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub bandwidth: f64,
    pub sample_size: usize,
}

impl DensityCurve {
    /// (x, density) pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Grid point with the highest density.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.points()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn x_range(&self) -> (f64, f64) {
        (
            self.xs.first().copied().unwrap_or(0.0),
            self.xs.last().copied().unwrap_or(0.0),
        )
    }

    pub fn max_density(&self) -> f64 {
        self.ys.iter().copied().fold(0.0, f64::max)
    }

    /// Trapezoidal area under the sampled curve.
    pub fn area(&self) -> f64 {
        self.xs
            .windows(2)
            .zip(self.ys.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
            .sum()
    }
}

pub struct KernelDensity;

impl KernelDensity {
    /// Scott's rule: sample standard deviation times n^(-1/5).
    pub fn scott_bandwidth(values: &[f64]) -> Result<f64, StatsError> {
        let n = values.len();
        if n < 2 {
            return Err(StatsError::DegenerateSample {
                size: n,
                reason: "at least two observations are required",
            });
        }

        let std = values.iter().std_dev();
        if !std.is_finite() || std <= 0.0 {
            return Err(StatsError::DegenerateSample {
                size: n,
                reason: "observations have zero variance",
            });
        }

        Ok(std * (n as f64).powf(-0.2))
    }

    /// Estimate the density of `values` over [min - range/2, max + range/2].
    pub fn estimate(values: &[f64]) -> Result<DensityCurve, StatsError> {
        let bandwidth = Self::scott_bandwidth(values)?;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        let xs = Self::linspace(min - 0.5 * range, max + 0.5 * range, KDE_GRID_POINTS);

        let kernel = Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
        let n = values.len() as f64;

        let ys: Vec<f64> = xs
            .par_iter()
            .map(|&x| {
                values
                    .iter()
                    .map(|&xi| kernel.pdf((x - xi) / bandwidth))
                    .sum::<f64>()
                    / (n * bandwidth)
            })
            .collect();

        log::debug!(
            "KDE over {} values: bandwidth {:.4}, grid [{:.2}, {:.2}]",
            values.len(),
            bandwidth,
            min - 0.5 * range,
            max + 0.5 * range
        );

        Ok(DensityCurve {
            xs,
            ys,
            bandwidth,
            sample_size: values.len(),
        })
    }

    /// `count` evenly spaced points from `start` to `stop` inclusive.
    pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (count - 1) as f64;
                let mut xs: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
                xs[count - 1] = stop;
                xs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let xs = KernelDensity::linspace(-1.0, 1.0, 5);
        assert_eq!(xs, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert!(KernelDensity::linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_scott_bandwidth() {
        // sample std of [1, 2, 3, 4, 5] is sqrt(2.5)
        let bw = KernelDensity::scott_bandwidth(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let expected = 2.5f64.sqrt() * 5f64.powf(-0.2);
        assert!((bw - expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_samples() {
        assert!(matches!(
            KernelDensity::estimate(&[]),
            Err(StatsError::DegenerateSample { size: 0, .. })
        ));
        assert!(matches!(
            KernelDensity::estimate(&[4.0]),
            Err(StatsError::DegenerateSample { size: 1, .. })
        ));
        assert!(matches!(
            KernelDensity::estimate(&[3.0, 3.0, 3.0]),
            Err(StatsError::DegenerateSample { size: 3, .. })
        ));
    }

    #[test]
    fn test_density_integrates_to_one() {
        let tenure = [1.0, 2.0, 2.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0, 70.0];
        let curve = KernelDensity::estimate(&tenure).unwrap();

        assert_eq!(curve.xs.len(), KDE_GRID_POINTS);
        assert_eq!(curve.ys.len(), KDE_GRID_POINTS);
        assert_eq!(curve.x_range(), (1.0 - 34.5, 70.0 + 34.5));
        assert!(curve.ys.iter().all(|&y| y >= 0.0));
        assert!((curve.area() - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_symmetric_sample_peaks_at_center() {
        let curve = KernelDensity::estimate(&[-1.0, 0.0, 0.0, 1.0]).unwrap();
        let (x, y) = curve.peak().unwrap();
        assert!(x.abs() < 0.01);
        assert_eq!(y, curve.max_density());
    }
}
