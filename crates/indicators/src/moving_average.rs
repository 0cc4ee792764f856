use crate::error::IndicatorError;
use ta::Next;
use ta::indicators::SimpleMovingAverage as Sma;

/// Trailing simple moving average aligned with `values`.
///
/// The `ta` SMA averages whatever it has seen during warm-up; those first
/// `period - 1` outputs are partial windows and are reported as `None`.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut indicator =
        Sma::new(period).map_err(|e| IndicatorError::InvalidParameters(format!("SMA({period}): {e:?}")))?;
    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let value = indicator.next(v);
            (i + 1 >= period).then_some(value)
        })
        .collect())
}
