//! Common datatypes supporting the purchase pipeline

use std::ops::Index;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// The number of buckets in a [`MonthlySeries`], January through December
pub const MONTHS: usize = 12;

/// A single purchase, as loaded from one line of CSV.
///
/// Fields that failed to parse are kept as `None` rather than rejected, so a purchase can
/// always be built from a line, however malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    /// The type of the item (coat, hat, etc.), verbatim from the input
    pub(crate) item: String,
    /// The day of the purchase, or `None` if the date text could not be read
    pub(crate) date: Option<NaiveDate>,
    /// The price paid, or `None` if the price text was not a number
    pub(crate) price: Option<Decimal>,
    /// The name of the store, verbatim from the input
    pub(crate) store: String,
}

impl Purchase {
    /// Creates a purchase from already-parsed fields
    #[must_use]
    pub fn new(
        item: impl Into<String>,
        date: Option<NaiveDate>,
        price: Option<Decimal>,
        store: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            date,
            price,
            store: store.into(),
        }
    }

    /// Returns the item name
    #[must_use]
    #[inline]
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Returns the purchase date, if it was valid
    #[must_use]
    #[inline]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Returns the price, if it was a number
    #[must_use]
    #[inline]
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Returns the store name
    #[must_use]
    #[inline]
    pub fn store(&self) -> &str {
        &self.store
    }
}

/// The value of a named field on a [`Record`].
///
/// Equality is strict: values of different variants never compare equal, so the text `"5.7"`
/// does not match the number `5.7`. [`Value::Invalid`] is not equal to anything, itself
/// included.
#[derive(Debug, Clone)]
pub enum Value {
    /// A string field
    Text(String),
    /// A numeric field
    Number(Decimal),
    /// A calendar date field
    Date(NaiveDate),
    /// A field whose text failed to parse
    Invalid,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Decimal> for Value {
    fn from(number: Decimal) -> Self {
        Self::Number(number)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Invalid, Into::into)
    }
}

/// Anything with named fields that can be filtered on
pub trait Record {
    /// Looks up a field by name. Unknown names return `None`.
    fn field(&self, name: &str) -> Option<Value>;
}

/// Twelve values, one per calendar month, January at index 0.
///
/// The length is fixed by the backing array, so a series can never have more or fewer than
/// [`MONTHS`] buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlySeries(pub(crate) [Decimal; MONTHS]);

impl MonthlySeries {
    /// Creates a series with every bucket at zero
    #[must_use]
    pub fn new() -> Self {
        MonthlySeries::default()
    }

    /// Returns the number of buckets, which is always [`MONTHS`]
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A series is never empty; provided for symmetry with [`MonthlySeries::len`]
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the buckets in month order
    pub fn iter(&self) -> std::slice::Iter<'_, Decimal> {
        self.0.iter()
    }

    /// Returns the largest bucket, or zero if every bucket is zero or negative
    #[must_use]
    pub fn max(&self) -> Decimal {
        self.0.iter().copied().fold(Decimal::ZERO, Decimal::max)
    }
}

impl From<[Decimal; MONTHS]> for MonthlySeries {
    fn from(buckets: [Decimal; MONTHS]) -> Self {
        Self(buckets)
    }
}

impl Index<usize> for MonthlySeries {
    type Output = Decimal;

    fn index(&self, month: usize) -> &Self::Output {
        &self.0[month]
    }
}

impl<'a> IntoIterator for &'a MonthlySeries {
    type Item = &'a Decimal;
    type IntoIter = std::slice::Iter<'a, Decimal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_value_equality_is_type_sensitive() {
        assert_eq!(Value::from(dec!(5.7)), Value::Number(dec!(5.70)));
        assert_ne!(Value::from("5.7"), Value::Number(dec!(5.7)));
        assert_ne!(Value::Invalid, Value::Invalid);
        let date = NaiveDate::from_ymd_opt(2016, 3, 18).unwrap();
        assert_eq!(Value::from(Some(date)), Value::Date(date));
        assert_ne!(Value::from(None::<NaiveDate>), Value::Date(date));
    }

    #[test]
    fn test_series_max() {
        let mut series = MonthlySeries::new();
        assert_eq!(series.max(), dec!(0));
        series.0[4] = dec!(12.5);
        series.0[9] = dec!(3);
        assert_eq!(series.max(), dec!(12.5));
        assert_eq!(series.len(), MONTHS);
        assert_eq!(series[4], dec!(12.5));
    }
}
