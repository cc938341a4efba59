//! Ordinary least squares with intercept

use faer::Mat;

/// Linear model `y = intercept + x · coefficients`.
///
/// Fitted on centered data through a thin SVD, keeping only singular values
/// above `max(n, p) * eps * s_max`. Rank-deficient designs (duplicated or
/// constant columns, fewer rows than features) get the minimum-norm solution.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearRegression {
    pub fn fit(x: &Mat<f64>, y: &[f64]) -> Self {
        let (n, p) = (x.nrows(), x.ncols());
        debug_assert_eq!(n, y.len());

        let y_mean = y.iter().sum::<f64>() / n as f64;
        let x_means: Vec<f64> = (0..p)
            .map(|j| (0..n).map(|i| x[(i, j)]).sum::<f64>() / n as f64)
            .collect();

        let mut xc = Mat::<f64>::zeros(n, p);
        for j in 0..p {
            for i in 0..n {
                xc[(i, j)] = x[(i, j)] - x_means[j];
            }
        }
        let yc: Vec<f64> = y.iter().map(|v| v - y_mean).collect();

        let svd = xc.thin_svd();
        let u = svd.u().to_owned();
        let s = svd.s_diagonal().to_owned();
        let v = svd.v().to_owned();

        let rank_dims = s.nrows();
        let s_max = (0..rank_dims).map(|k| s[k]).fold(0.0f64, f64::max);
        let cutoff = s_max * n.max(p) as f64 * f64::EPSILON;

        // beta = V diag(1/s) U^T yc over the retained singular values
        let mut coefficients = vec![0.0; p];
        for k in 0..rank_dims {
            if s[k] <= cutoff {
                continue;
            }
            let projection = (0..n).map(|i| u[(i, k)] * yc[i]).sum::<f64>() / s[k];
            for (j, coef) in coefficients.iter_mut().enumerate() {
                *coef += v[(j, k)] * projection;
            }
        }

        let intercept = y_mean
            - x_means
                .iter()
                .zip(&coefficients)
                .map(|(m, c)| m * c)
                .sum::<f64>();

        Self {
            intercept,
            coefficients,
        }
    }

    pub fn predict(&self, x: &Mat<f64>) -> Vec<f64> {
        (0..x.nrows())
            .map(|i| {
                self.intercept
                    + self
                        .coefficients
                        .iter()
                        .enumerate()
                        .map(|(j, c)| c * x[(i, j)])
                        .sum::<f64>()
            })
            .collect()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}
