use crate::error::ForecastError;
use serde::Serialize;

/// Min-max scaler onto `[0, 1]`, fitted on one series and reused to map
/// forecasts back to price units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinMaxScaler {
    min: f64,
    range: f64,
}

impl MinMaxScaler {
    /// Fits the scaler. A constant series gets a unit range, so it maps to 0
    /// and inverts exactly.
    pub fn fit(values: &[f64]) -> Result<Self, ForecastError> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientHistory { required: 1, available: 0 });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidData("cannot scale non-finite values".to_string()));
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = if max - min > 0.0 { max - min } else { 1.0 };
        Ok(Self { min, range })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.min + self.range
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| (v - self.min) / self.range).collect()
    }

    pub fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| v * self.range + self.min).collect()
    }
}

/// Fits a scaler on `values` and returns the scaled copy alongside it.
pub fn scaling(values: &[f64]) -> Result<(Vec<f64>, MinMaxScaler), ForecastError> {
    let scaler = MinMaxScaler::fit(values)?;
    Ok((scaler.transform(values), scaler))
}

pub fn inverse_scaling(scaler: &MinMaxScaler, values: &[f64]) -> Vec<f64> {
    scaler.inverse_transform(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_unit_interval() {
        let (scaled, scaler) = scaling(&[10.0, 15.0, 20.0]).unwrap();
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
        assert_eq!(scaler.min(), 10.0);
        assert_eq!(scaler.max(), 20.0);
    }

    #[test]
    fn round_trip_is_within_tolerance() {
        let prices: Vec<f64> = (0..250).map(|i| 180.0 + (i as f64 * 0.13).sin() * 25.0 + i as f64 * 0.4).collect();
        let (scaled, scaler) = scaling(&prices).unwrap();
        let restored = inverse_scaling(&scaler, &scaled);
        for (original, back) in prices.iter().zip(&restored) {
            assert!(((original - back) / original).abs() < 1e-6);
        }
    }

    #[test]
    fn constant_series_uses_unit_range() {
        let (scaled, scaler) = scaling(&[100.0; 5]).unwrap();
        assert!(scaled.iter().all(|v| *v == 0.0));
        assert_eq!(inverse_scaling(&scaler, &[0.0]), vec![100.0]);
    }

    #[test]
    fn rejects_empty_and_non_finite_input() {
        assert!(scaling(&[]).is_err());
        assert!(matches!(scaling(&[1.0, f64::NAN]), Err(ForecastError::InvalidData(_))));
    }
}
