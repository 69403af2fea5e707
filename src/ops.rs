use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use crate::types::{MonthlySeries, Purchase, Record, Value};

impl Record for Purchase {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "item" => Some(Value::from(self.item.as_str())),
            "date" => Some(Value::from(self.date)),
            "price" => Some(Value::from(self.price)),
            "store" => Some(Value::from(self.store.as_str())),
            _ => None,
        }
    }
}

impl MonthlySeries {
    /// Adds `amount` to the bucket for the month `date` falls in.
    ///
    /// The year is ignored, so dates from different years land in the same bucket. Returns
    /// `false`, leaving the bucket as it was, if the sum would overflow.
    fn add(&mut self, date: NaiveDate, amount: Decimal) -> bool {
        let bucket = &mut self.0[date.month0() as usize];
        match bucket.checked_add(amount) {
            Some(sum) => {
                *bucket = sum;
                true
            }
            None => false,
        }
    }
}

/// Returns the records whose `field` is strictly equal to `value`.
///
/// The input is left untouched. Values of different types never match (see [`Value`]), and
/// neither do fields that failed to parse.
///
/// ```
/// use tally::{io::parse_purchase_csv, ops::filter_purchases};
///
/// let purchases = parse_purchase_csv("hat,2016-01-02,5,A\nhat,2016-01-03,5,B").unwrap();
/// let at_b = filter_purchases(&purchases, "store", "B");
/// assert_eq!(at_b.len(), 1);
/// assert_eq!(purchases.len(), 2);
/// ```
pub fn filter_purchases<R>(records: &[R], field: &str, value: impl Into<Value>) -> Vec<R>
where
    R: Record + Clone,
{
    let value = value.into();
    records
        .iter()
        .filter(|record| record.field(field).is_some_and(|actual| actual == value))
        .cloned()
        .collect()
}

/// Counts the purchases made in each calendar month.
///
/// Assumes every purchase falls within the same calendar year. Purchases without a valid date
/// are skipped.
#[must_use]
pub fn counts_by_month(purchases: &[Purchase]) -> MonthlySeries {
    let mut counts = MonthlySeries::new();
    for purchase in purchases {
        match purchase.date {
            Some(date) => {
                if !counts.add(date, Decimal::ONE) {
                    debug!("Not counting {:?}: month count overflowed", purchase);
                }
            }
            None => debug!("Not counting {:?}: no valid date", purchase),
        }
    }
    counts
}

/// Sums the amount spent in each calendar month.
///
/// Assumes every purchase falls within the same calendar year. Purchases without a valid date
/// or price are skipped, as is any purchase that would push its month past [`Decimal::MAX`].
#[must_use]
pub fn total_spent_by_month(purchases: &[Purchase]) -> MonthlySeries {
    let mut spent = MonthlySeries::new();
    for purchase in purchases {
        match (purchase.date, purchase.price) {
            (Some(date), Some(price)) => {
                if !spent.add(date, price) {
                    debug!("Not totalling {:?}: month total overflowed", purchase);
                }
            }
            _ => debug!("Not totalling {:?}: no valid date or price", purchase),
        }
    }
    spent
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[derive(Debug, Clone)]
    struct Person {
        name: &'static str,
        age: u32,
        height: Value,
    }

    impl Record for Person {
        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(self.name)),
                "age" => Some(Value::from(Decimal::from(self.age))),
                "height" => Some(self.height.clone()),
                _ => None,
            }
        }
    }

    fn dated(date: &str) -> Purchase {
        Purchase::new("", NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(), None, "")
    }

    fn priced(date: &str, price: Decimal) -> Purchase {
        Purchase {
            price: Some(price),
            ..dated(date)
        }
    }

    #[test]
    fn test_filter_strict_equality() {
        let input = vec![
            Person { name: "bob", age: 45, height: Value::from("5.7") },
            Person { name: "terry", age: 33, height: Value::from(dec!(5.5)) },
            Person { name: "alice", age: 28, height: Value::from(dec!(5.7)) },
            Person { name: "alice", age: 37, height: Value::from(dec!(5.2)) },
        ];
        let alices = filter_purchases(&input, "name", "alice");
        assert_eq!(input.len(), 4);
        assert_eq!(alices.len(), 2);
        assert_eq!(alices[0].age, 28);
        assert_eq!(alices[0].height, Value::from(dec!(5.7)));
        assert_eq!(alices[1].age, 37);

        let height57 = filter_purchases(&input, "height", dec!(5.7));
        assert_eq!(height57.len(), 1);
        assert_eq!(height57[0].name, "alice");
        assert_eq!(height57[0].age, 28);

        assert!(filter_purchases(&input, "weight", dec!(5.7)).is_empty());
    }

    #[test]
    fn test_filter_chained_item_and_store() {
        let purchases = vec![
            Purchase::new("hat", None, Some(dec!(5)), "OKNY"),
            Purchase::new("hat", None, Some(dec!(6)), "GAP"),
            Purchase::new("coat", None, Some(dec!(7)), "OKNY"),
        ];
        let hats = filter_purchases(&purchases, "item", "hat");
        let hats_at_okny = filter_purchases(&hats, "store", "OKNY");
        assert_eq!(hats_at_okny, vec![purchases[0].clone()]);
        assert!(filter_purchases(&purchases, "item", " hat").is_empty());
    }

    #[test]
    fn test_filter_never_matches_invalid_fields() {
        let purchases = vec![Purchase::new("hat", None, None, "OKNY")];
        assert!(filter_purchases(&purchases, "price", Value::Invalid).is_empty());
        assert!(filter_purchases(&purchases, "date", None::<NaiveDate>).is_empty());
        let dated = vec![dated("2016-03-18")];
        let found = filter_purchases(&dated, "date", NaiveDate::from_ymd_opt(2016, 3, 18));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_counts_by_month() {
        let data: Vec<_> = [
            "2016-01-15",
            "2016-02-16",
            "2016-02-17",
            "2016-03-18",
            "2016-03-19",
            "2016-03-20",
            "2016-03-21",
            "2015-12-22",
            "2015-02-23",
        ]
        .into_iter()
        .map(dated)
        .collect();
        let counts = counts_by_month(&data);
        assert_eq!(counts.len(), 12);
        assert_eq!(
            counts,
            MonthlySeries::from([
                dec!(1),
                dec!(3),
                dec!(4),
                dec!(0),
                dec!(0),
                dec!(0),
                dec!(0),
                dec!(0),
                dec!(0),
                dec!(0),
                dec!(0),
                dec!(1),
            ])
        );
    }

    #[test]
    fn test_total_spent_by_month() {
        let data = vec![
            priced("2016-12-15", dec!(75.1)),
            priced("2016-12-16", dec!(75.9)),
            priced("2016-01-17", dec!(50)),
            priced("2016-07-18", dec!(25.5)),
            priced("2016-07-19", dec!(40)),
            priced("2016-07-20", dec!(10)),
            priced("2016-08-21", dec!(66)),
            priced("2016-08-21", dec!(22)),
            priced("2015-09-22", dec!(27)),
            priced("2015-12-23", dec!(24)),
        ];
        let spent = total_spent_by_month(&data);
        assert_eq!(spent.len(), 12);
        assert_eq!(spent[0], dec!(50));
        assert_eq!(spent[1], dec!(0));
        assert_eq!(spent[5], dec!(0));
        assert_eq!(spent[6], dec!(75.5));
        assert_eq!(spent[7], dec!(88));
        assert_eq!(spent[8], dec!(27));
        assert_eq!(spent[9], dec!(0));
        assert_eq!(spent[11], dec!(175));
    }

    #[test]
    fn test_invalid_dates_and_prices_are_skipped() {
        let data = vec![
            Purchase::new("", None, Some(dec!(10)), ""),
            dated("2016-04-01"),
            priced("2016-04-02", dec!(3)),
        ];
        let counts = counts_by_month(&data);
        assert_eq!(counts[3], dec!(2));
        assert_eq!(counts.iter().copied().sum::<Decimal>(), dec!(2));
        let spent = total_spent_by_month(&data);
        assert_eq!(spent[3], dec!(3));
        assert_eq!(spent.iter().copied().sum::<Decimal>(), dec!(3));
    }

    #[test]
    fn test_month_total_overflow_skips_purchase() {
        let purchases = crate::io::parse_purchase_csv(
            "a,2016-01-01,79228162514264337593543950335,x\n\
             b,2016-01-02,79228162514264337593543950335,x\n\
             c,2016-02-03,4.5,x",
        )
        .unwrap();
        let spent = total_spent_by_month(&purchases);
        assert_eq!(spent[0], Decimal::MAX);
        assert_eq!(spent[1], dec!(4.5));
        assert_eq!(counts_by_month(&purchases)[0], dec!(2));
    }
}
