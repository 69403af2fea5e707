//! ASCII bar charts of a [`MonthlySeries`]

use std::num::NonZeroU32;

use log::warn;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::types::MonthlySeries;

/// The X-axis printed under every chart, one column per month
pub const X_AXIS: &str = "   -J--F--M--A--M--J--J--A--S--O--N--D-";

/// The Y-axis scale used when none is given
pub const DEFAULT_SCALE: NonZeroU32 = NonZeroU32::MIN;

/// Height of the tallest column, rounded up to a whole number.
///
/// Returns `None` if the height does not fit in a `u64`.
fn max_height(columns: &MonthlySeries) -> Option<u64> {
    columns.max().ceil().to_u64()
}

/// Renders a monthly series as a bar chart.
///
/// Each row of the chart stands for `scale` units, and the Y-axis counts by `scale`. A column
/// reaches a row when its value divided by `scale` is at least the row number, so a value of
/// 12 at scale 5 is two `*`s tall.
///
/// The result has no trailing newline. If no column reaches the first row, only the X-axis is
/// returned. The X-axis alone is also returned, with a warning logged, when the tallest column
/// is beyond [`u64::MAX`] and cannot be drawn.
///
/// ```
/// use tally::{chart::{to_chart, DEFAULT_SCALE}, types::MonthlySeries};
///
/// assert_eq!(to_chart(&MonthlySeries::new(), DEFAULT_SCALE), tally::chart::X_AXIS);
/// ```
#[must_use]
pub fn to_chart(columns: &MonthlySeries, scale: NonZeroU32) -> String {
    let Some(max_height) = max_height(columns) else {
        warn!(
            "Tallest column {} is too tall to chart; showing the X-axis only",
            columns.max()
        );
        return X_AXIS.to_owned();
    };
    let scale = u64::from(scale.get());
    let label_width = max_height.to_string().len();

    let mut output = String::new();
    for row in (1..=max_height / scale).rev() {
        let threshold = Decimal::from(row * scale);
        output.push_str(&format!("{:>label_width$} ", row * scale));
        for column in columns {
            output.push_str("  ");
            output.push(if *column >= threshold { '*' } else { ' ' });
        }
        output.push_str(" \n");
    }
    output.push_str(&" ".repeat(label_width - 1));
    output.push_str(X_AXIS);
    output
}
