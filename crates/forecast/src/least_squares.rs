use crate::error::ForecastError;
use nalgebra::{DMatrix, DVector};

/// Singular values below this are treated as zero when solving.
const SVD_EPS: f64 = 1e-12;

/// Result of an ordinary least-squares solve.
#[derive(Debug, Clone)]
pub(crate) struct LeastSquares {
    pub coefficients: DVector<f64>,
    pub residuals: DVector<f64>,
}

impl LeastSquares {
    pub fn rss(&self) -> f64 {
        self.residuals.norm_squared()
    }
}

/// Minimum-norm least-squares solution of `design * b = target` via SVD.
pub(crate) fn solve(design: &DMatrix<f64>, target: &DVector<f64>) -> Result<LeastSquares, ForecastError> {
    if design.nrows() == 0 || design.nrows() != target.len() {
        return Err(ForecastError::Fit(format!(
            "design matrix has {} rows for {} targets",
            design.nrows(),
            target.len()
        )));
    }
    let svd = design.clone().svd(true, true);
    let coefficients = svd.solve(target, SVD_EPS).map_err(|e| ForecastError::Fit(e.to_string()))?;
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ForecastError::Fit("least squares produced non-finite coefficients".to_string()));
    }
    let residuals = target - design * &coefficients;
    Ok(LeastSquares { coefficients, residuals })
}
