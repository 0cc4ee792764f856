use crate::error::AnalyticsError;
use core_types::AlignedTable;

/// Converts every column of a price table into daily percentage returns.
///
/// Row `i` holds `(p[i] / p[i-1] - 1) * 100`. The first row has no prior
/// observation and is set to `0.0` for every column rather than left undefined,
/// so the output keeps exactly the input's dates and columns.
pub fn daily_return(table: &AlignedTable) -> AlignedTable {
    table.map_columns(|column| {
        let values = &column.values;
        let mut returns = Vec::with_capacity(values.len());
        if !values.is_empty() {
            returns.push(0.0);
        }
        returns.extend(values.windows(2).map(|w| (w[1] / w[0] - 1.0) * 100.0));
        returns
    })
}

/// Rescales each column by its first value so every series starts at 1.0.
///
/// Used to compare relative growth of several instruments; the beta
/// calculation does not depend on it.
pub fn normalize(table: &AlignedTable) -> Result<AlignedTable, AnalyticsError> {
    table.try_map_columns(|column| {
        let Some(&first) = column.values.first() else {
            return Ok(Vec::new());
        };
        if first == 0.0 {
            return Err(AnalyticsError::DivisionByZero(format!("normalize({})", column.name)));
        }
        Ok(column.values.iter().map(|v| v / first).collect())
    })
}

/// Mean daily return scaled to a year of `trading_days`. `None` for an empty slice.
pub fn annualized_mean(returns: &[f64], trading_days: u32) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    Some(mean * f64::from(trading_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::Column;

    fn table(columns: Vec<(&str, Vec<f64>)>) -> AlignedTable {
        let rows = columns[0].1.len();
        let dates = (0..rows)
            .map(|i| NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Days::new(i as u64))
            .collect();
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column { name: name.to_string(), values })
            .collect();
        AlignedTable::from_columns(dates, columns).unwrap()
    }

    #[test]
    fn daily_return_keeps_shape_and_zero_fills_first_row() {
        let prices = table(vec![
            ("AAPL", vec![100.0, 110.0, 99.0]),
            ("sp500", vec![50.0, 50.0, 55.0]),
        ]);

        let returns = daily_return(&prices);

        assert_eq!(returns.dates(), prices.dates());
        assert_eq!(returns.column_names(), prices.column_names());
        for column in returns.columns() {
            assert_eq!(column.values[0], 0.0);
        }
        let aapl = returns.column("AAPL").unwrap();
        assert!((aapl[1] - 10.0).abs() < 1e-12);
        assert!((aapl[2] + 10.0).abs() < 1e-12);
        let market = returns.column("sp500").unwrap();
        assert_eq!(market[1], 0.0);
        assert!((market[2] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn daily_return_of_empty_table_is_empty() {
        let returns = daily_return(&AlignedTable::default());
        assert!(returns.is_empty());
    }

    #[test]
    fn normalize_starts_every_column_at_one() {
        let prices = table(vec![("A", vec![4.0, 8.0, 2.0]), ("B", vec![10.0, 5.0, 30.0])]);

        let normalized = normalize(&prices).unwrap();

        assert_eq!(normalized.column("A").unwrap(), &[1.0, 2.0, 0.5]);
        assert_eq!(normalized.column("B").unwrap(), &[1.0, 0.5, 3.0]);
        assert_eq!(normalized.dates(), prices.dates());
    }

    #[test]
    fn normalize_rejects_zero_first_value() {
        let prices = table(vec![("A", vec![0.0, 1.0])]);
        assert!(matches!(normalize(&prices), Err(AnalyticsError::DivisionByZero(_))));
    }

    #[test]
    fn annualized_mean_scales_by_trading_days() {
        let value = annualized_mean(&[0.0004; 10], 252).unwrap();
        assert!((value - 0.1008).abs() < 1e-12);
        assert_eq!(annualized_mean(&[], 252), None);
    }
}
