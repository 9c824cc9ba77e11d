//! Latest-value metric extraction.
//!
//! Every function here is a pure lookup over a [`CompanyFacts`] document: no
//! network, no state. "Latest" means the fact with the greatest period-end date
//! among the numeric facts for a concept and unit. When two facts share an end
//! date the one with the greater `filed` date wins; a full tie keeps the earlier
//! list position.
//!
//! Derived metrics (EPS, EBITDA) resolve each input's latest value independently,
//! so the two sides can come from different reporting periods. That mirrors how
//! headline figures are commonly quoted from the most recent report of each
//! concept, and it is pinned by tests rather than silently aligned.

use crate::facts::{CompanyFacts, Fact, gaap};

/// Picks the latest fact: greatest `end`, ties broken by greatest `filed`,
/// then earliest list position.
fn latest_fact<'a>(facts: impl Iterator<Item = &'a Fact>) -> Option<&'a Fact> {
    facts
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            a.end
                .cmp(&b.end)
                .then_with(|| a.filed.cmp(&b.filed))
                .then_with(|| ib.cmp(ia))
        })
        .map(|(_, fact)| fact)
}

/// Latest numeric value for a concept and unit, with its period-end date.
///
/// Returns `None` when the concept/unit path is absent or holds no numeric facts.
pub fn latest_value(facts: &CompanyFacts, concept: &str, unit: &str) -> Option<(f64, String)> {
    let list = facts.gaap_units(concept, unit)?;
    let fact = latest_fact(list.iter().filter(|f| f.numeric_val().is_some()))?;
    Some((fact.numeric_val()?, fact.end.clone()))
}

fn year_of(end: &str) -> String {
    end.chars().take(4).collect()
}

/// Latest EPS: most recent net income divided by most recent share count.
///
/// The two inputs are resolved independently and may belong to different
/// periods. `None` when either input is absent or the share count is zero.
pub fn latest_eps(facts: &CompanyFacts) -> Option<f64> {
    let (net_income, _) = latest_value(facts, gaap::NET_INCOME_LOSS, gaap::USD)?;
    let (shares, _) = latest_value(facts, gaap::SHARES_OUTSTANDING, gaap::SHARES)?;
    if shares == 0.0 {
        return None;
    }
    Some(net_income / shares)
}

/// Latest EPS together with the year of the net-income period it came from.
pub fn latest_eps_and_year(facts: &CompanyFacts) -> Option<(f64, String)> {
    let (net_income, end) = latest_value(facts, gaap::NET_INCOME_LOSS, gaap::USD)?;
    let (shares, _) = latest_value(facts, gaap::SHARES_OUTSTANDING, gaap::SHARES)?;
    if shares == 0.0 {
        return None;
    }
    Some((net_income / shares, year_of(&end)))
}

/// Latest reported revenue and its year.
pub fn latest_revenue_and_year(facts: &CompanyFacts) -> Option<(f64, String)> {
    let (revenue, end) = latest_value(facts, gaap::REVENUES, gaap::USD)?;
    Some((revenue, year_of(&end)))
}

/// Latest reported gross profit and its year.
///
/// Unlike the chart series, the headline figure reads the GrossProfit concept
/// as filed.
pub fn latest_gross_profit_and_year(facts: &CompanyFacts) -> Option<(f64, String)> {
    let (gross_profit, end) = latest_value(facts, gaap::GROSS_PROFIT, gaap::USD)?;
    Some((gross_profit, year_of(&end)))
}

/// Latest EBITDA approximated as operating income plus depreciation.
///
/// Inputs are resolved independently, like [`latest_eps`]. `None` when either
/// is absent.
pub fn latest_ebitda(facts: &CompanyFacts) -> Option<f64> {
    let (operating_income, _) = latest_value(facts, gaap::OPERATING_INCOME_LOSS, gaap::USD)?;
    let (depreciation, _) = latest_value(facts, gaap::DEPRECIATION, gaap::USD)?;
    Some(operating_income + depreciation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{Concept, Taxonomies};
    use std::collections::HashMap;

    fn fact(end: &str, val: f64) -> Fact {
        Fact {
            start: None,
            end: end.to_string(),
            val: serde_json::json!(val),
            accn: None,
            fy: None,
            fp: None,
            form: None,
            filed: None,
            frame: None,
        }
    }

    fn fact_filed(end: &str, val: f64, filed: &str) -> Fact {
        Fact {
            filed: Some(filed.to_string()),
            ..fact(end, val)
        }
    }

    fn facts_doc(concepts: Vec<(&str, &str, Vec<Fact>)>) -> CompanyFacts {
        let mut us_gaap = HashMap::new();
        for (concept, unit, list) in concepts {
            let entry: &mut Concept = us_gaap.entry(concept.to_string()).or_insert(Concept {
                label: None,
                description: None,
                units: HashMap::new(),
            });
            entry.units.insert(unit.to_string(), list);
        }
        CompanyFacts {
            cik: 1,
            entity_name: Some("Test Co".to_string()),
            taxonomies: Taxonomies {
                us_gaap,
                dei: HashMap::new(),
            },
        }
    }

    #[test]
    fn latest_value_picks_greatest_end_date() {
        let facts = facts_doc(vec![(
            gaap::REVENUES,
            gaap::USD,
            // deliberately unsorted
            vec![
                fact("2023-12-31", 500.0),
                fact("2021-12-31", 300.0),
                fact("2022-12-31", 400.0),
            ],
        )]);

        let (val, end) = latest_value(&facts, gaap::REVENUES, gaap::USD).unwrap();
        assert_eq!(val, 500.0);
        assert_eq!(end, "2023-12-31");
    }

    #[test]
    fn latest_value_tie_prefers_later_filing() {
        let facts = facts_doc(vec![(
            gaap::REVENUES,
            gaap::USD,
            vec![
                fact_filed("2023-12-31", 510.0, "2024-02-15"),
                fact_filed("2023-12-31", 500.0, "2024-01-30"),
            ],
        )]);

        let (val, _) = latest_value(&facts, gaap::REVENUES, gaap::USD).unwrap();
        assert_eq!(val, 510.0);
    }

    #[test]
    fn latest_value_full_tie_keeps_first_entry() {
        let facts = facts_doc(vec![(
            gaap::REVENUES,
            gaap::USD,
            vec![fact("2023-12-31", 500.0), fact("2023-12-31", 999.0)],
        )]);

        let (val, _) = latest_value(&facts, gaap::REVENUES, gaap::USD).unwrap();
        assert_eq!(val, 500.0);
    }

    #[test]
    fn latest_value_skips_non_numeric_facts() {
        let mut text_fact = fact("2024-12-31", 0.0);
        text_fact.val = serde_json::json!("not a number");

        let facts = facts_doc(vec![(
            gaap::REVENUES,
            gaap::USD,
            vec![fact("2023-12-31", 500.0), text_fact],
        )]);

        let (val, end) = latest_value(&facts, gaap::REVENUES, gaap::USD).unwrap();
        assert_eq!(val, 500.0);
        assert_eq!(end, "2023-12-31");
    }

    #[test]
    fn latest_value_absent_path() {
        let facts = facts_doc(vec![]);
        assert!(latest_value(&facts, gaap::REVENUES, gaap::USD).is_none());
        // concept present but wrong unit
        let facts = facts_doc(vec![(gaap::REVENUES, gaap::USD, vec![fact("2023-12-31", 1.0)])]);
        assert!(latest_value(&facts, gaap::REVENUES, gaap::SHARES).is_none());
    }

    #[test]
    fn eps_uses_independently_resolved_latest_values() {
        // Net income has a newer period than the share count; the mismatch is
        // intentional and must not be "fixed" by aligning periods.
        let facts = facts_doc(vec![
            (
                gaap::NET_INCOME_LOSS,
                gaap::USD,
                vec![fact("2022-12-31", 1000.0), fact("2023-12-31", 2000.0)],
            ),
            (
                gaap::SHARES_OUTSTANDING,
                gaap::SHARES,
                vec![fact("2023-12-31", 100.0)],
            ),
        ]);

        let (eps, year) = latest_eps_and_year(&facts).unwrap();
        assert_eq!(eps, 20.0);
        assert_eq!(year, "2023");
    }

    #[test]
    fn eps_mixed_periods_preserved() {
        let facts = facts_doc(vec![
            (
                gaap::NET_INCOME_LOSS,
                gaap::USD,
                vec![fact("2023-12-31", 2000.0)],
            ),
            (
                gaap::SHARES_OUTSTANDING,
                gaap::SHARES,
                // share count most recently reported for an older period
                vec![fact("2022-12-31", 50.0)],
            ),
        ]);

        assert_eq!(latest_eps(&facts), Some(40.0));
    }

    #[test]
    fn eps_zero_shares_is_unavailable() {
        let facts = facts_doc(vec![
            (
                gaap::NET_INCOME_LOSS,
                gaap::USD,
                vec![fact("2023-12-31", 2000.0)],
            ),
            (
                gaap::SHARES_OUTSTANDING,
                gaap::SHARES,
                vec![fact("2023-12-31", 0.0)],
            ),
        ]);

        assert_eq!(latest_eps(&facts), None);
        assert_eq!(latest_eps_and_year(&facts), None);
    }

    #[test]
    fn eps_missing_input_is_unavailable() {
        let facts = facts_doc(vec![(
            gaap::NET_INCOME_LOSS,
            gaap::USD,
            vec![fact("2023-12-31", 2000.0)],
        )]);
        assert_eq!(latest_eps(&facts), None);
    }

    #[test]
    fn ebitda_sums_latest_inputs() {
        let facts = facts_doc(vec![
            (
                gaap::OPERATING_INCOME_LOSS,
                gaap::USD,
                vec![fact("2023-12-31", 700.0)],
            ),
            (
                gaap::DEPRECIATION,
                gaap::USD,
                vec![fact("2023-12-31", 50.0)],
            ),
        ]);

        assert_eq!(latest_ebitda(&facts), Some(750.0));
    }

    #[test]
    fn ebitda_missing_depreciation_is_unavailable() {
        let facts = facts_doc(vec![(
            gaap::OPERATING_INCOME_LOSS,
            gaap::USD,
            vec![fact("2023-12-31", 700.0)],
        )]);
        assert_eq!(latest_ebitda(&facts), None);
    }

    #[test]
    fn headline_revenue_and_year() {
        let facts = facts_doc(vec![(
            gaap::REVENUES,
            gaap::USD,
            vec![fact("2022-12-31", 400.0), fact("2023-12-31", 500.0)],
        )]);

        assert_eq!(
            latest_revenue_and_year(&facts),
            Some((500.0, "2023".to_string()))
        );
    }

    #[test]
    fn headline_gross_profit_reads_reported_concept() {
        let facts = facts_doc(vec![(
            gaap::GROSS_PROFIT,
            gaap::USD,
            vec![fact("2023-12-31", 250.0)],
        )]);

        assert_eq!(
            latest_gross_profit_and_year(&facts),
            Some((250.0, "2023".to_string()))
        );
    }
}
