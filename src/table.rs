//! Column-oriented feature table.
//!
//! A [`FeatureTable`] holds named `f64` columns of equal length. Missing
//! values are stored as `NaN` and skipped by [`ColumnStats`].

use serde::Serialize;

use crate::errors::FeatureError;
use crate::indicators::candle::Candle;

pub const OPEN: &str = "open";
pub const HIGH: &str = "high";
pub const LOW: &str = "low";
pub const CLOSE: &str = "close";
pub const VOLUME: &str = "volume";

/// A single named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    // serde_json writes NaN as null
    pub values: Vec<f64>,
}

/// Ordered set of named numeric columns sharing an implicit row index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureTable {
    columns: Vec<Column>,
    #[serde(skip)]
    rows: usize,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table with `open, high, low, close, volume` columns.
    pub fn from_candles(candles: &[Candle]) -> Self {
        let pick = |f: fn(&Candle) -> f64| candles.iter().map(f).collect::<Vec<_>>();

        Self {
            columns: vec![
                Column { name: OPEN.into(), values: pick(Candle::get_open) },
                Column { name: HIGH.into(), values: pick(Candle::get_high) },
                Column { name: LOW.into(), values: pick(Candle::get_low) },
                Column { name: CLOSE.into(), values: pick(Candle::get_close) },
                Column { name: VOLUME.into(), values: pick(Candle::get_volume) },
            ],
            rows: candles.len(),
        }
    }

    /// Builds a table from `(name, values)` pairs, in order.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.insert_column(name, values)?;
        }
        Ok(table)
    }

    /// Appends a column, or replaces the values of an existing column with
    /// the same name while keeping its position.
    ///
    /// A table without columns adopts the length of the first one inserted.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), FeatureError> {
        let name = name.into();

        if self.columns.is_empty() {
            self.rows = values.len();
        } else if values.len() != self.rows {
            return Err(FeatureError::LengthMismatch {
                column: name,
                expected: self.rows,
                actual: values.len(),
            });
        }

        match self.position(&name) {
            Some(index) => self.columns[index].values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.position(name).map(|i| self.columns[i].values.as_slice())
    }

    /// Like [`column`](Self::column) but fails with `MissingColumn`.
    pub fn require(&self, name: &str) -> Result<&[f64], FeatureError> {
        self.column(name).ok_or_else(|| FeatureError::missing(name))
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Vec<f64>> {
        let index = self.position(name)?;
        Some(&mut self.columns[index].values)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Statistics over the defined values of a column.
    pub fn stats(&self, name: &str) -> Result<ColumnStats, FeatureError> {
        self.require(name).map(ColumnStats::from_values)
    }

    /// Number of rows holding at least one missing value.
    pub fn incomplete_rows(&self) -> usize {
        (0..self.rows).filter(|&row| self.row_has_missing(row)).count()
    }

    /// Removes every row that holds a missing value in any column.
    ///
    /// Returns the number of rows dropped.
    pub fn drop_incomplete_rows(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.rows).map(|row| !self.row_has_missing(row)).collect();
        let kept = keep.iter().filter(|&&k| k).count();
        let dropped = self.rows - kept;

        if dropped > 0 {
            for column in &mut self.columns {
                let mut flags = keep.iter();
                column.values.retain(|_| *flags.next().unwrap_or(&false));
            }
            self.rows = kept;
        }

        dropped
    }

    fn row_has_missing(&self, row: usize) -> bool {
        self.columns.iter().any(|c| c.values[row].is_nan())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// Observed range and spread of a column, ignoring missing values.
///
/// Every field is `None` when it is undefined for the column: no defined
/// values at all, or fewer than two for the deviation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: Option<f64>,
    pub defined: usize,
}

impl ColumnStats {
    pub fn from_values(values: &[f64]) -> Self {
        let defined: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if defined.is_empty() {
            return Self::default();
        }

        let min = defined.iter().copied().fold(f64::INFINITY, f64::min);
        let max = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let n = defined.len();
        let std_dev = if n < 2 {
            None
        } else {
            let mean = defined.iter().sum::<f64>() / n as f64;
            let sum_sq: f64 = defined.iter().map(|v| (v - mean).powi(2)).sum();
            Some((sum_sq / (n - 1) as f64).sqrt())
        };

        Self {
            min: Some(min),
            max: Some(max),
            std_dev,
            defined: n,
        }
    }

    /// True when the column holds no defined value.
    pub fn is_empty(&self) -> bool {
        self.defined == 0
    }
}
