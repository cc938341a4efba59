//! Nearest-neighbor imputation of missing values

use faer::Mat;

/// Default number of donors averaged per imputed entry.
pub const DEFAULT_NEIGHBORS: usize = 2;

/// Fills each missing entry with the mean of that column over the `n_neighbors`
/// nearest fitted rows that observe it.
///
/// Distance is nan-Euclidean: squared differences over the coordinates both rows
/// observe, rescaled by `total / observed` coordinates. Rows sharing no observed
/// coordinate are not neighbors. When no donor is reachable the fitted column
/// mean is used. Columns with no observed value at fit time are kept and filled
/// with zeros.
#[derive(Debug, Clone)]
pub struct KnnImputer {
    n_neighbors: usize,
    fit_x: Mat<f64>,
    column_means: Vec<Option<f64>>,
}

impl KnnImputer {
    pub fn fit(x: &Mat<f64>, n_neighbors: usize) -> Self {
        let column_means = (0..x.ncols())
            .map(|j| {
                let (sum, count) = (0..x.nrows())
                    .map(|i| x[(i, j)])
                    .filter(|v| !v.is_nan())
                    .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
                (count > 0).then(|| sum / count as f64)
            })
            .collect();

        Self {
            n_neighbors: n_neighbors.max(1),
            fit_x: x.clone(),
            column_means,
        }
    }

    /// Columns that had no observed value when fitted.
    pub fn empty_columns(&self) -> Vec<usize> {
        self.column_means
            .iter()
            .enumerate()
            .filter_map(|(j, m)| m.is_none().then_some(j))
            .collect()
    }

    pub fn transform(&self, x: &Mat<f64>) -> Mat<f64> {
        let mut out = x.clone();
        let n_fit = self.fit_x.nrows();

        for j in 0..x.ncols() {
            let Some(column_mean) = self.column_means[j] else {
                for i in 0..x.nrows() {
                    out[(i, j)] = 0.0;
                }
                continue;
            };

            for i in 0..x.nrows() {
                if !x[(i, j)].is_nan() {
                    continue;
                }

                let mut donors: Vec<(f64, usize)> = (0..n_fit)
                    .filter(|&r| !self.fit_x[(r, j)].is_nan())
                    .filter_map(|r| self.distance(x, i, r).map(|d| (d, r)))
                    .collect();

                out[(i, j)] = if donors.is_empty() {
                    column_mean
                } else {
                    // Stable sort keeps ties in fitted row order
                    donors.sort_by(|a, b| a.0.total_cmp(&b.0));
                    let k = self.n_neighbors.min(donors.len());
                    donors[..k]
                        .iter()
                        .map(|&(_, r)| self.fit_x[(r, j)])
                        .sum::<f64>()
                        / k as f64
                };
            }
        }

        out
    }

    /// nan-Euclidean distance between row `i` of `x` and fitted row `r`.
    fn distance(&self, x: &Mat<f64>, i: usize, r: usize) -> Option<f64> {
        let total = x.ncols();
        let mut observed = 0usize;
        let mut sum_sq = 0.0;
        for c in 0..total {
            let (a, b) = (x[(i, c)], self.fit_x[(r, c)]);
            if a.is_nan() || b.is_nan() {
                continue;
            }
            observed += 1;
            sum_sq += (a - b) * (a - b);
        }

        if observed == 0 {
            return None;
        }
        Some((sum_sq * total as f64 / observed as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> Mat<f64> {
        let mut m = Mat::<f64>::zeros(rows.len(), rows[0].len());
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                m[(i, j)] = v;
            }
        }
        m
    }

    #[test]
    fn imputes_from_nearest_donors() {
        let x = matrix(&[
            &[0.0, 10.0],
            &[1.0, 20.0],
            &[10.0, 100.0],
            &[0.5, f64::NAN],
        ]);
        let imputer = KnnImputer::fit(&x, 2);
        let filled = imputer.transform(&x);

        // Rows 0 and 1 are nearest to 0.5
        assert!((filled[(3, 1)] - 15.0).abs() < 1e-12);
        assert_eq!(filled[(2, 1)], 100.0);
    }

    #[test]
    fn unreachable_row_falls_back_to_column_mean() {
        let x = matrix(&[&[1.0, f64::NAN], &[3.0, f64::NAN], &[f64::NAN, 5.0]]);
        let imputer = KnnImputer::fit(&x, 2);
        let filled = imputer.transform(&x);

        // Row 2 shares no observed coordinate with rows 0 and 1
        assert!((filled[(2, 0)] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_column_is_kept_as_zeros() {
        let x = matrix(&[&[1.0, f64::NAN], &[2.0, f64::NAN]]);
        let imputer = KnnImputer::fit(&x, 2);
        let filled = imputer.transform(&x);

        assert_eq!(imputer.empty_columns(), vec![1]);
        assert_eq!(filled.ncols(), 2);
        assert_eq!(filled[(0, 1)], 0.0);
        assert_eq!(filled[(1, 1)], 0.0);
    }
}
