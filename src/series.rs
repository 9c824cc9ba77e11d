//! Time-series construction for charting.
//!
//! A [`MetricSeries`] is a date-ordered sequence of (period-end, value) points
//! built from one or two fact lists. Direct mode takes every usable fact for a
//! single concept; paired mode keys each source by period-end date, intersects
//! the period sets and combines values per period. Both are pure functions over
//! [`CompanyFacts`].

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::error::{FundvizError, Result};
use crate::facts::{CompanyFacts, Fact, gaap};

/// One point of a metric series.
///
/// `value` is `None` only for periods where a derived metric is undefined
/// (EPS with a zero share count); direct series never produce `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub end: NaiveDate,
    pub value: Option<f64>,
}

/// A date-ordered metric series, non-decreasing by period-end date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    pub points: Vec<SeriesPoint>,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates the points that carry a value, skipping undefined periods.
    pub fn defined(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.end, v)))
    }
}

fn data_absent(concept: &str, unit: &str) -> FundvizError {
    FundvizError::DataAbsent {
        concept: concept.to_string(),
        unit: unit.to_string(),
    }
}

/// Keys facts by parsed period-end date. Later list entries overwrite earlier
/// ones on duplicate dates; facts without a parseable date or numeric value
/// are dropped.
fn period_map(facts: &[Fact]) -> BTreeMap<NaiveDate, f64> {
    let mut map = BTreeMap::new();
    for fact in facts {
        if let (Some(end), Some(val)) = (fact.end_date(), fact.numeric_val()) {
            map.insert(end, val);
        }
    }
    map
}

/// Builds the full series for a single concept and unit.
///
/// Facts missing a parseable date or numeric value are skipped; the rest are
/// sorted ascending by period-end date. Duplicate dates are retained in their
/// sorted order rather than deduplicated, matching how the chart draws them.
///
/// # Errors
///
/// `DataAbsent` when the concept/unit path does not exist or no usable facts
/// remain after filtering.
pub fn direct_series(facts: &CompanyFacts, concept: &str, unit: &str) -> Result<MetricSeries> {
    let list = facts
        .gaap_units(concept, unit)
        .ok_or_else(|| data_absent(concept, unit))?;

    let mut points: Vec<SeriesPoint> = list
        .iter()
        .filter_map(|fact| {
            let end = fact.end_date()?;
            let value = fact.numeric_val()?;
            Some(SeriesPoint {
                end,
                value: Some(value),
            })
        })
        .collect();

    if points.is_empty() {
        return Err(data_absent(concept, unit));
    }

    points.sort_by_key(|p| p.end);
    Ok(MetricSeries { points })
}

/// Builds a series by combining two concepts over their common periods.
///
/// Each source is collapsed to a period-end → value map, the period sets are
/// intersected and `combine` runs once per common period. `combine` returning
/// `None` marks that single period undefined without failing the series.
fn paired_series<F>(
    facts: &CompanyFacts,
    left: (&str, &str),
    right: (&str, &str),
    combine: F,
) -> Result<MetricSeries>
where
    F: Fn(f64, f64) -> Option<f64>,
{
    let (left_concept, left_unit) = left;
    let (right_concept, right_unit) = right;

    let left_map = period_map(
        facts
            .gaap_units(left_concept, left_unit)
            .ok_or_else(|| data_absent(left_concept, left_unit))?,
    );
    let right_map = period_map(
        facts
            .gaap_units(right_concept, right_unit)
            .ok_or_else(|| data_absent(right_concept, right_unit))?,
    );

    // BTreeMap iteration is ascending, so the intersection comes out sorted.
    let points: Vec<SeriesPoint> = left_map
        .iter()
        .filter_map(|(end, left_val)| {
            right_map.get(end).map(|right_val| SeriesPoint {
                end: *end,
                value: combine(*left_val, *right_val),
            })
        })
        .collect();

    if points.is_empty() {
        return Err(FundvizError::NoOverlap {
            left: left_concept.to_string(),
            right: right_concept.to_string(),
        });
    }

    Ok(MetricSeries { points })
}

/// EPS over time: net income ÷ shares outstanding per common period.
///
/// Periods where the share count is zero yield an undefined point, not an
/// error.
pub fn eps_series(facts: &CompanyFacts) -> Result<MetricSeries> {
    paired_series(
        facts,
        (gaap::NET_INCOME_LOSS, gaap::USD),
        (gaap::SHARES_OUTSTANDING, gaap::SHARES),
        |net_income, shares| {
            if shares == 0.0 {
                None
            } else {
                Some(net_income / shares)
            }
        },
    )
}

/// EBITDA over time, approximated as operating income plus depreciation per
/// common period.
pub fn ebitda_series(facts: &CompanyFacts) -> Result<MetricSeries> {
    paired_series(
        facts,
        (gaap::OPERATING_INCOME_LOSS, gaap::USD),
        (gaap::DEPRECIATION, gaap::USD),
        |operating_income, depreciation| Some(operating_income + depreciation),
    )
}

/// Gross profit over time, always computed as Revenues − CostOfRevenue.
///
/// A reported GrossProfit concept is deliberately ignored even when present:
/// the derivation is consistent across filers, reported gross profit is not.
pub fn gross_profit_series(facts: &CompanyFacts) -> Result<MetricSeries> {
    paired_series(
        facts,
        (gaap::REVENUES, gaap::USD),
        (gaap::COST_OF_REVENUE, gaap::USD),
        |revenue, cost| Some(revenue - cost),
    )
}
