//! Weighted grade calculator.
//!
//! A [`Gradebook`] holds two lists of scored fractions, homework and tests, and a weight for
//! each list. It is never modified in place: every [`Action`] produces a new gradebook in an
//! [`Update`], together with the averages and the two line charts derived from it.

use std::fmt::Display;

use log::debug;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{errors::Error, io::coerce_number};

/// Weight given to each category in a new gradebook, out of 100
pub const DEFAULT_WEIGHT: u32 = 50;

/// Number of decimals shown for averages and the grade to date
const DISPLAY_SCALE: u32 = 2;

/// Unique identifier for a gradebook entry. Identifiers are never reused, even after the entry
/// they named is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

impl From<u64> for EntryId {
    fn from(entry_id: u64) -> Self {
        Self(entry_id)
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "id[{}]", self.0)
    }
}

/// The two lists a gradebook keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Homework assignments
    Homework,
    /// Tests and exams
    Test,
}

impl Category {
    fn other(self) -> Self {
        match self {
            Category::Homework => Category::Test,
            Category::Test => Category::Homework,
        }
    }
}

/// One scored fraction, such as `17 / 20`
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    id: EntryId,
    numerator: Decimal,
    denominator: Decimal,
}

impl Entry {
    /// Creates a blank `0 / 100` entry
    fn new(id: EntryId) -> Self {
        Self {
            id,
            numerator: Decimal::ZERO,
            denominator: Decimal::ONE_HUNDRED,
        }
    }

    /// Returns the entry's identifier
    #[must_use]
    #[inline]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Returns the points scored
    #[must_use]
    #[inline]
    pub fn numerator(&self) -> Decimal {
        self.numerator
    }

    /// Returns the points possible. Always at least one.
    #[must_use]
    #[inline]
    pub fn denominator(&self) -> Decimal {
        self.denominator
    }

    /// Returns the score as a percentage, capped at [`Decimal::MAX`]
    #[must_use]
    pub fn percentage(&self) -> Decimal {
        saturate(
            self.numerator
                .checked_div(self.denominator)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
        )
    }
}

/// A change to a [`Gradebook`].
///
/// Values arrive as text, exactly as typed; they are validated when the action is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Appends a blank `0 / 100` entry to a category
    Add(Category),
    /// Removes an entry
    Remove(EntryId),
    /// Sets the points scored. Negative or non-numeric values become zero.
    SetNumerator(EntryId, String),
    /// Sets the points possible. Values below one, or non-numeric values, become one.
    SetDenominator(EntryId, String),
    /// Sets a category's weight, clamped to `0..=100`; the other category gets the remainder
    /// of 100. Non-numeric values become zero.
    SetWeight(Category, String),
}

/// Settings handed to the charting library along with each [`LineChart`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// Use the fixed scale below instead of fitting the axis to the data
    pub scale_override: bool,
    /// Number of steps on the fixed scale
    pub scale_steps: u32,
    /// Value between steps on the fixed scale
    pub scale_step_width: f64,
    /// Lowest value on the fixed scale
    pub scale_start_value: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            scale_override: true,
            scale_steps: 10,
            scale_step_width: 10.0,
            scale_start_value: 0.0,
        }
    }
}

impl ChartOptions {
    /// Returns the Y-axis tick values of the fixed scale, or `None` when the charting library
    /// is left to pick its own.
    #[must_use]
    pub fn ticks(&self) -> Option<Vec<f64>> {
        self.scale_override.then(|| {
            (0..=self.scale_steps)
                .map(|step| self.scale_start_value + f64::from(step) * self.scale_step_width)
                .collect()
        })
    }
}

/// One line on a [`LineChart`], with the styling the charting library expects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Legend text
    pub label: &'static str,
    /// Area under the line
    pub fill_color: &'static str,
    /// The line itself
    pub stroke_color: &'static str,
    /// Point fill
    pub point_color: &'static str,
    /// Point outline
    pub point_stroke_color: &'static str,
    /// Point fill on hover
    pub point_highlight_fill: &'static str,
    /// Point outline on hover
    pub point_highlight_stroke: &'static str,
    /// The percentage of each entry, in list order
    pub data: Vec<f64>,
}

impl Dataset {
    fn new(label: &'static str, data: Vec<f64>) -> Self {
        Self {
            label,
            fill_color: "rgba(220,220,220,0.2)",
            stroke_color: "rgba(220,220,220,1)",
            point_color: "rgba(220,220,220,1)",
            point_stroke_color: "#fff",
            point_highlight_fill: "#fff",
            point_highlight_stroke: "rgba(220,220,220,1)",
            data,
        }
    }
}

/// Everything needed to draw the line chart for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    /// X-axis labels, `"1"` through the number of entries
    pub labels: Vec<String>,
    /// Always a single dataset
    pub datasets: Vec<Dataset>,
    /// Scale settings
    pub options: ChartOptions,
}

impl LineChart {
    /// Renders the chart as JSON for the charting library
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Statistics shown alongside the charts.
///
/// Averages and the grade to date carry exactly two decimals, unless a value is too large to
/// hold them. Values that overflow are capped at [`Decimal::MAX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Mean homework percentage, or zero with no homework
    pub homework_average: Decimal,
    /// Mean test percentage, or zero with no tests
    pub test_average: Decimal,
    /// Weighted grade; zero until both categories have entries
    pub grade_to_date: Decimal,
    /// Whether the homework list is empty
    pub no_homework: bool,
    /// Whether the test list is empty
    pub no_tests: bool,
}

/// The result of applying an [`Action`]
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// The gradebook after the action
    pub gradebook: Gradebook,
    /// Statistics for the new gradebook
    pub summary: Summary,
    /// Chart of homework percentages
    pub homework_chart: LineChart,
    /// Chart of test percentages
    pub test_chart: LineChart,
}

/// Homework and test scores with their weights
#[derive(Debug, Clone, PartialEq)]
pub struct Gradebook {
    homework: Vec<Entry>,
    tests: Vec<Entry>,
    homework_weight: Decimal,
    test_weight: Decimal,
    options: ChartOptions,
    next_id: u64,
}

impl Default for Gradebook {
    fn default() -> Self {
        Self::with_options(ChartOptions::default())
    }
}

impl Gradebook {
    /// Creates an empty gradebook with equal weights and the default chart options
    #[must_use]
    pub fn new() -> Self {
        Gradebook::default()
    }

    /// Creates an empty gradebook with equal weights, whose charts will use `options`
    #[must_use]
    pub fn with_options(options: ChartOptions) -> Self {
        Self {
            homework: Vec::new(),
            tests: Vec::new(),
            homework_weight: Decimal::from(DEFAULT_WEIGHT),
            test_weight: Decimal::from(DEFAULT_WEIGHT),
            options,
            next_id: 1,
        }
    }

    /// Returns the entries of a category, in the order they were added
    #[must_use]
    pub fn entries(&self, category: Category) -> &[Entry] {
        match category {
            Category::Homework => &self.homework,
            Category::Test => &self.tests,
        }
    }

    /// Returns the weight of a category, between 0 and 100
    #[must_use]
    pub fn weight(&self, category: Category) -> Decimal {
        match category {
            Category::Homework => self.homework_weight,
            Category::Test => self.test_weight,
        }
    }

    /// Applies an action to a copy of this gradebook.
    ///
    /// # Errors
    /// [`Error::UnknownEntry`] if the action names an entry that is not in the gradebook
    pub fn apply(&self, action: Action) -> Result<Update, Error> {
        debug!("Applying {:?}", action);
        let mut gradebook = self.clone();
        match action {
            Action::Add(category) => {
                let entry = Entry::new(EntryId(gradebook.next_id));
                gradebook.next_id += 1;
                gradebook.entries_mut(category).push(entry);
            }
            Action::Remove(id) => {
                for category in [Category::Homework, Category::Test] {
                    let entries = gradebook.entries_mut(category);
                    if let Some(position) = entries.iter().position(|entry| entry.id == id) {
                        entries.remove(position);
                        return Ok(gradebook.update());
                    }
                }
                return Err(Error::UnknownEntry(id));
            }
            Action::SetNumerator(id, text) => {
                gradebook.entry_mut(id)?.numerator = match coerce_number(&text) {
                    Some(value) if value >= Decimal::ZERO => value,
                    _ => Decimal::ZERO,
                };
            }
            Action::SetDenominator(id, text) => {
                gradebook.entry_mut(id)?.denominator = match coerce_number(&text) {
                    Some(value) if value >= Decimal::ONE => value,
                    _ => Decimal::ONE,
                };
            }
            Action::SetWeight(category, text) => {
                let weight = coerce_number(&text)
                    .unwrap_or(Decimal::ZERO)
                    .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
                gradebook.set_weight(category, weight);
                gradebook.set_weight(category.other(), Decimal::ONE_HUNDRED - weight);
            }
        }
        Ok(gradebook.update())
    }

    /// Computes the averages and grade to date
    #[must_use]
    pub fn summary(&self) -> Summary {
        let homework_average = to_fixed(average(&self.homework));
        let test_average = to_fixed(average(&self.tests));
        let grade_to_date = if self.homework.is_empty() || self.tests.is_empty() {
            Decimal::ZERO
        } else {
            let weighted = |mean: Decimal, weight: Decimal| {
                (mean / Decimal::ONE_HUNDRED).checked_mul(weight)
            };
            saturate(
                weighted(test_average, self.test_weight)
                    .zip(weighted(homework_average, self.homework_weight))
                    .and_then(|(test, homework)| test.checked_add(homework)),
            )
        };
        Summary {
            homework_average,
            test_average,
            grade_to_date: to_fixed(grade_to_date),
            no_homework: self.homework.is_empty(),
            no_tests: self.tests.is_empty(),
        }
    }

    /// Builds the line chart of a category's percentages
    #[must_use]
    pub fn chart(&self, category: Category) -> LineChart {
        let entries = self.entries(category);
        let label = match category {
            Category::Homework => "Homework",
            Category::Test => "Tests",
        };
        LineChart {
            labels: (1..=entries.len()).map(|n| n.to_string()).collect(),
            datasets: vec![Dataset::new(
                label,
                entries
                    .iter()
                    .map(|entry| entry.percentage().to_f64().unwrap_or_default())
                    .collect(),
            )],
            options: self.options,
        }
    }

    fn update(self) -> Update {
        Update {
            summary: self.summary(),
            homework_chart: self.chart(Category::Homework),
            test_chart: self.chart(Category::Test),
            gradebook: self,
        }
    }

    fn entries_mut(&mut self, category: Category) -> &mut Vec<Entry> {
        match category {
            Category::Homework => &mut self.homework,
            Category::Test => &mut self.tests,
        }
    }

    fn entry_mut(&mut self, id: EntryId) -> Result<&mut Entry, Error> {
        self.homework
            .iter_mut()
            .chain(self.tests.iter_mut())
            .find(|entry| entry.id == id)
            .ok_or(Error::UnknownEntry(id))
    }

    fn set_weight(&mut self, category: Category, weight: Decimal) {
        match category {
            Category::Homework => self.homework_weight = weight,
            Category::Test => self.test_weight = weight,
        }
    }
}

/// Mean percentage of the entries, zero if there are none
fn average(entries: &[Entry]) -> Decimal {
    if entries.is_empty() {
        return Decimal::ZERO;
    }
    let total = entries
        .iter()
        .map(Entry::percentage)
        .try_fold(Decimal::ZERO, Decimal::checked_add);
    saturate(total) / Decimal::from(entries.len())
}

/// Caps an overflowed computation at [`Decimal::MAX`]. Every score is non-negative, so
/// overflow only ever happens upwards.
fn saturate(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::MAX)
}

/// Rounds half away from zero to exactly [`DISPLAY_SCALE`] decimals
fn to_fixed(value: Decimal) -> Decimal {
    let mut value =
        value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(DISPLAY_SCALE);
    value
}
