use crate::error::CoreError;
use crate::structs::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A named numeric column of an [`AlignedTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Several instruments' values on a shared, chronologically ordered date index.
///
/// A date only appears when every input series has a value for it. Rows with a
/// missing instrument are dropped, never imputed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignedTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
    benchmark: Option<String>,
}

impl AlignedTable {
    /// Builds a table from pre-aligned columns, validating shape, order and names.
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, CoreError> {
        if dates.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CoreError::InvalidInput(
                "aligned table".to_string(),
                "dates must be unique and increasing".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for column in &columns {
            if column.values.len() != dates.len() {
                return Err(CoreError::InvalidInput(
                    format!("column '{}'", column.name),
                    format!("expected {} rows, got {}", dates.len(), column.values.len()),
                ));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(CoreError::InvalidInput(
                    format!("column '{}'", column.name),
                    "duplicate column name".to_string(),
                ));
            }
        }
        Ok(Self { dates, columns, benchmark: None })
    }

    /// Inner-joins the close prices of several series on their dates.
    ///
    /// Each entry is `(column name, series)`; the column name usually is the
    /// ticker, except for the benchmark which gets its configured label.
    pub fn inner_join(series: &[(&str, &PriceSeries)]) -> Result<Self, CoreError> {
        let Some(((_, first), rest)) = series.split_first() else {
            return Ok(Self::default());
        };

        let mut common: BTreeSet<NaiveDate> = first.dates().into_iter().collect();
        for (_, other) in rest {
            let dates: BTreeSet<NaiveDate> = other.dates().into_iter().collect();
            common = common.intersection(&dates).copied().collect();
        }

        let dates: Vec<NaiveDate> = common.into_iter().collect();
        let columns = series
            .iter()
            .map(|(name, s)| {
                let by_date: HashMap<NaiveDate, f64> = s.close_column().into_iter().collect();
                Column {
                    name: name.to_string(),
                    values: dates.iter().map(|d| by_date[d]).collect(),
                }
            })
            .collect();

        tracing::debug!(rows = dates.len(), inputs = series.len(), "Inner-joined price series");
        Self::from_columns(dates, columns)
    }

    /// Marks one existing column as the market benchmark.
    pub fn with_benchmark(mut self, name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if self.column(&name).is_none() {
            return Err(CoreError::InvalidInput(
                format!("benchmark '{}'", name),
                "no such column".to_string(),
            ));
        }
        self.benchmark = Some(name);
        Ok(self)
    }

    pub fn benchmark_name(&self) -> Option<&str> {
        self.benchmark.as_deref()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Produces a new table with the same index and names, transforming each column.
    pub fn map_columns(&self, mut f: impl FnMut(&Column) -> Vec<f64>) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column { name: c.name.clone(), values: f(c) })
            .collect();
        Self { dates: self.dates.clone(), columns, benchmark: self.benchmark.clone() }
    }

    /// Fallible variant of [`AlignedTable::map_columns`].
    pub fn try_map_columns<E>(
        &self,
        mut f: impl FnMut(&Column) -> Result<Vec<f64>, E>,
    ) -> Result<Self, E> {
        let columns = self
            .columns
            .iter()
            .map(|c| Ok(Column { name: c.name.clone(), values: f(c)? }))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { dates: self.dates.clone(), columns, benchmark: self.benchmark.clone() })
    }
}
