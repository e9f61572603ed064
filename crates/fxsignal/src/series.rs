//! Price and indicator series.
//!
//! A [`TimeSeries`] is the caller-owned, date-ordered sequence of daily
//! [`Bar`]s every engine reads. Engines borrow it and return owned
//! [`IndicatorSeries`] values that share its date index, so each output is
//! aligned bar-for-bar with the input.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::defined;

/// One calendar day of OHLC prices.
///
/// Ingestion is expected to hand over finite prices with
/// `low <= open, close <= high`; the engines do not re-check this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price of the day.
    pub high: f64,
    /// Lowest price of the day.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

impl Bar {
    /// Creates a bar.
    #[must_use]
    pub const fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// Returns the selected price.
    #[inline]
    #[must_use]
    pub const fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }

    /// Daily range, `high - low`.
    #[inline]
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Selects one price column of a [`Bar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    /// Opening price.
    Open,
    /// Daily high.
    High,
    /// Daily low.
    Low,
    /// Closing price.
    #[default]
    Close,
}

/// Ascending, date-ordered sequence of daily bars.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    bars: Vec<Bar>,
    dates: Arc<[NaiveDate]>,
}

impl TimeSeries {
    /// Wraps bars that are already sorted ascending by date.
    ///
    /// Ordering is the ingestion collaborator's responsibility and is not
    /// re-checked here; call [`validate_order`](Self::validate_order) when
    /// the source is untrusted.
    #[must_use]
    pub fn new(bars: Vec<Bar>) -> Self {
        let dates = bars.iter().map(|bar| bar.date).collect();
        Self { bars, dates }
    }

    /// Number of bars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns `true` if the series holds no bars.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The bars, oldest first.
    #[inline]
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The date index shared with every derived [`IndicatorSeries`].
    #[inline]
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The most recent bar.
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Materializes one price column.
    #[must_use]
    pub fn field(&self, field: PriceField) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.price(field)).collect()
    }

    /// Materializes the close column.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.field(PriceField::Close)
    }

    /// Checks that dates are strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnorderedDates` naming the first bar that is not
    /// dated after its predecessor.
    pub fn validate_order(&self) -> Result<()> {
        match self.dates.windows(2).position(|pair| pair[1] <= pair[0]) {
            Some(pos) => Err(Error::UnorderedDates { index: pos + 1 }),
            None => Ok(()),
        }
    }

    /// Returns the bars dated within `[start, end]`, inclusive.
    ///
    /// An inverted range yields an empty series.
    #[must_use]
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        // Dates are ascending, so the range is a contiguous slice.
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);
        Self::new(self.bars[lo..hi].to_vec())
    }

    /// Wraps `values` as an indicator aligned with this series.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per bar; every engine
    /// produces same-length output, so a mismatch is a bug.
    #[must_use]
    pub fn indicator(&self, values: Vec<f64>) -> IndicatorSeries {
        assert_eq!(
            values.len(),
            self.len(),
            "indicator output must be aligned with its source series"
        );
        IndicatorSeries {
            dates: Arc::clone(&self.dates),
            values,
        }
    }
}

impl From<Vec<Bar>> for TimeSeries {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}

impl FromIterator<Bar> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = Bar>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Date-aligned indicator output, one entry per source bar.
///
/// Values before a window's first full observation are missing. Internally
/// a missing value is stored as `NaN`; the accessors surface it as `None`.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    dates: Arc<[NaiveDate]>,
    values: Vec<f64>,
}

impl IndicatorSeries {
    /// Number of entries (equal to the source series length).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the source series was empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The shared date index.
    #[inline]
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Raw values with `NaN` marking missing entries.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at bar `index`, `None` when missing or out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().and_then(defined)
    }

    /// Value at the most recent bar.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().and_then(defined)
    }

    /// Most recent defined value with its date.
    #[must_use]
    pub fn last_defined(&self) -> Option<(NaiveDate, f64)> {
        self.iter().rev().find_map(|(date, v)| v.map(|v| (date, v)))
    }

    /// Index of the first defined value; its value equals the warm-up gap.
    #[must_use]
    pub fn first_defined_index(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_nan())
    }

    /// Number of defined values.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Returns `true` when no entry is defined.
    #[must_use]
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(|v| v.is_nan())
    }

    /// Iterates `(date, value)` pairs in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates
            .iter()
            .copied()
            .zip(self.values.iter().copied().map(defined))
    }

    /// Consumes the series, returning the raw values.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}
