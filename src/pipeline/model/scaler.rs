//! Per-column standardization that tolerates missing values

use faer::Mat;

/// Column-wise `(x - mean) / std` fitted on observed (non-NaN) entries.
///
/// Missing entries pass through as NaN. Columns with zero variance, or with
/// no observed values at all, are left unscaled (scale 1).
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Mat<f64>) -> Self {
        let (n_rows, n_cols) = (x.nrows(), x.ncols());
        let mut means = Vec::with_capacity(n_cols);
        let mut scales = Vec::with_capacity(n_cols);

        for j in 0..n_cols {
            let mut count = 0usize;
            let mut mean = 0.0;
            let mut m2 = 0.0;
            for i in 0..n_rows {
                let v = x[(i, j)];
                if v.is_nan() {
                    continue;
                }
                count += 1;
                let delta = v - mean;
                mean += delta / count as f64;
                m2 += delta * (v - mean);
            }

            if count == 0 {
                means.push(0.0);
                scales.push(1.0);
                continue;
            }

            // Population variance, matching the usual standard scaler
            let std = (m2 / count as f64).sqrt();
            means.push(mean);
            scales.push(if std > f64::EPSILON * mean.abs().max(1.0) {
                std
            } else {
                1.0
            });
        }

        Self { means, scales }
    }

    pub fn transform(&self, x: &Mat<f64>) -> Mat<f64> {
        let mut out = Mat::<f64>::zeros(x.nrows(), x.ncols());
        for j in 0..x.ncols() {
            for i in 0..x.nrows() {
                out[(i, j)] = (x[(i, j)] - self.means[j]) / self.scales[j];
            }
        }
        out
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Mat<f64> {
        let mut m = Mat::<f64>::zeros(values.len(), 1);
        for (i, &v) in values.iter().enumerate() {
            m[(i, 0)] = v;
        }
        m
    }

    #[test]
    fn standardizes_observed_values() {
        let x = column(&[1.0, 2.0, 3.0, f64::NAN]);
        let scaler = StandardScaler::fit(&x);
        assert!((scaler.means()[0] - 2.0).abs() < 1e-12);
        assert!((scaler.scales()[0] - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let z = scaler.transform(&x);
        assert!(z[(1, 0)].abs() < 1e-12);
        assert!(z[(3, 0)].is_nan());
    }

    #[test]
    fn constant_column_keeps_unit_scale() {
        let x = column(&[4.0, 4.0, 4.0]);
        let scaler = StandardScaler::fit(&x);
        assert_eq!(scaler.scales()[0], 1.0);
        let z = scaler.transform(&x);
        assert_eq!(z[(0, 0)], 0.0);
    }
}
