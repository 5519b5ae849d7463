//! Year-range filtering of fire-occurrence features.
//!
//! The slider selects an inclusive [`YearRange`]; the range translates into a
//! declarative [`FilterExpr`] over the `YEAR` feature property which the map
//! layer then evaluates per feature.

use serde::{Deserialize, Serialize};

use crate::error::CnfdbError;

/// First year covered by the fire database.
pub const YEAR_MIN: u16 = 1980;
/// Last year covered by the fire database.
pub const YEAR_MAX: u16 = 2020;
/// Name of the feature property holding the fire year.
pub const YEAR_PROPERTY: &str = "YEAR";

/// Inclusive year interval selected by the slider.
///
/// `low <= high` holds for every constructed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    low: u16,
    high: u16,
}

impl YearRange {
    /// Creates a range from a `[low, high]` pair.
    pub fn new(low: u16, high: u16) -> Result<Self, CnfdbError> {
        if low > high {
            return Err(CnfdbError::InvalidYearRange { low, high });
        }

        Ok(Self { low, high })
    }

    /// The full domain of the slider, `[1980, 2020]`.
    pub fn full() -> Self {
        Self {
            low: YEAR_MIN,
            high: YEAR_MAX,
        }
    }

    /// Lower bound of the range.
    pub fn low(&self) -> u16 {
        self.low
    }

    /// Upper bound of the range.
    pub fn high(&self) -> u16 {
        self.high
    }

    /// Returns true if the year lies within the range, bounds included.
    pub fn contains(&self, year: u16) -> bool {
        year >= self.low && year <= self.high
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::full()
    }
}

/// Declarative boolean predicate over feature properties.
///
/// Mirrors the filter expression model of vector map renderers: a filter is a
/// tree of comparisons combined with `All`. The only shape this application
/// produces is a conjunction of two range comparisons on `YEAR`, but the
/// evaluator does not depend on that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// True if all sub-expressions are true.
    All(Vec<FilterExpr>),
    /// True if the named property is present and `>=` the value.
    GreaterOrEqual(String, i64),
    /// True if the named property is present and `<=` the value.
    LessOrEqual(String, i64),
}

impl FilterExpr {
    /// The filter the slider produces: `AND(YEAR >= low, YEAR <= high)`.
    pub fn year_range(range: YearRange) -> Self {
        FilterExpr::All(vec![
            FilterExpr::GreaterOrEqual(YEAR_PROPERTY.to_string(), range.low() as i64),
            FilterExpr::LessOrEqual(YEAR_PROPERTY.to_string(), range.high() as i64),
        ])
    }

    /// Evaluates the filter against a property lookup. Missing properties
    /// fail the comparison they appear in.
    pub fn evaluate(&self, property: &dyn Fn(&str) -> Option<i64>) -> bool {
        match self {
            FilterExpr::All(exprs) => exprs.iter().all(|expr| expr.evaluate(property)),
            FilterExpr::GreaterOrEqual(name, value) => {
                property(name).is_some_and(|actual| actual >= *value)
            }
            FilterExpr::LessOrEqual(name, value) => {
                property(name).is_some_and(|actual| actual <= *value)
            }
        }
    }

    /// Evaluates the filter for a feature whose only relevant property is
    /// `YEAR`.
    pub fn matches_year(&self, year: u16) -> bool {
        self.evaluate(&|name| (name == YEAR_PROPERTY).then_some(year as i64))
    }
}
