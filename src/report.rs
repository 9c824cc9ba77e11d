//! Per-ticker report orchestration.
//!
//! [`run_report`] sequences the whole pipeline for one ticker: resolve the CIK,
//! fetch the facts document, then attempt each chart and headline figure in
//! isolation. Registry and fetch problems are fatal and short-circuit; a metric
//! that cannot be computed is logged and recorded as unavailable while its
//! siblings proceed. Partial success is the normal case, not an error state.

use crate::chart::{ChartOptions, render_line_chart};
use crate::error::Result;
use crate::facts::{CompanyFacts, gaap};
use crate::metrics;
use crate::series::{self, MetricSeries};
use crate::traits::FactsOperations;

/// The metrics a report attempts to chart, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Revenue,
    GrossProfit,
    OperatingIncome,
    NetIncome,
    SharesOutstanding,
    Eps,
    /// Gross profit derived as Revenues − CostOfRevenue, charted separately
    /// from the reported GrossProfit concept.
    GrossProfitCalculated,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Revenue,
        Metric::GrossProfit,
        Metric::OperatingIncome,
        Metric::NetIncome,
        Metric::SharesOutstanding,
        Metric::Eps,
        Metric::GrossProfitCalculated,
    ];

    /// Human-facing metric name.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Revenue => "Revenue",
            Metric::GrossProfit => "Gross Profit",
            Metric::OperatingIncome => "Operating Income",
            Metric::NetIncome => "Net Income",
            Metric::SharesOutstanding => "Shares Outstanding",
            Metric::Eps => "EPS",
            Metric::GrossProfitCalculated => "Gross Profit (Calculated)",
        }
    }

    /// Unit the metric is charted in.
    pub fn unit_label(&self) -> &'static str {
        match self {
            Metric::SharesOutstanding => gaap::SHARES,
            _ => gaap::USD,
        }
    }

    fn series(&self, facts: &CompanyFacts) -> Result<MetricSeries> {
        match self {
            Metric::Revenue => series::direct_series(facts, gaap::REVENUES, gaap::USD),
            Metric::GrossProfit => series::direct_series(facts, gaap::GROSS_PROFIT, gaap::USD),
            Metric::OperatingIncome => {
                series::direct_series(facts, gaap::OPERATING_INCOME_LOSS, gaap::USD)
            }
            Metric::NetIncome => series::direct_series(facts, gaap::NET_INCOME_LOSS, gaap::USD),
            Metric::SharesOutstanding => {
                series::direct_series(facts, gaap::SHARES_OUTSTANDING, gaap::SHARES)
            }
            Metric::Eps => series::eps_series(facts),
            Metric::GrossProfitCalculated => series::gross_profit_series(facts),
        }
    }

    fn chart_options(&self) -> ChartOptions {
        let title = match self {
            Metric::GrossProfitCalculated => "Gross Profit Over Time (Calculated)".to_string(),
            other => format!("{} Over Time", other.label()),
        };
        ChartOptions::new(title).with_y_label(format!("{} ({})", self.label(), self.unit_label()))
    }
}

/// One chart attempt's outcome: the SVG artifact, or `None` when the metric's
/// data or computation was unavailable.
#[derive(Debug, Clone)]
pub struct MetricChart {
    pub metric: Metric,
    pub svg: Option<String>,
}

/// Everything derived from one ticker's facts document.
///
/// Headline scalars are `None` when the corresponding concept is absent or the
/// computation is undefined; `charts` always holds one entry per [`Metric`],
/// with `svg: None` marking an unavailable chart. The presentation layer must
/// render absent artifacts as a clearly marked unavailable state.
#[derive(Debug, Clone)]
pub struct Report {
    pub ticker: String,
    pub entity_name: Option<String>,
    pub latest_eps: Option<f64>,
    pub latest_revenue: Option<f64>,
    pub latest_gross_profit: Option<f64>,
    pub charts: Vec<MetricChart>,
}

impl Report {
    /// Builds the full report from an already-fetched facts document.
    ///
    /// Pure apart from diagnostics: each metric attempt is isolated, and a
    /// failure is logged with ticker and metric context then recorded as
    /// unavailable without touching the other attempts.
    pub fn from_facts(ticker: &str, facts: &CompanyFacts) -> Self {
        let ticker = ticker.trim().to_uppercase();

        let charts = Metric::ALL
            .iter()
            .map(|&metric| {
                let svg = metric
                    .series(facts)
                    .and_then(|s| render_line_chart(&s, &metric.chart_options()));
                match svg {
                    Ok(svg) => MetricChart {
                        metric,
                        svg: Some(svg),
                    },
                    Err(e) => {
                        tracing::warn!(
                            ticker = %ticker,
                            metric = metric.label(),
                            error = %e,
                            "chart unavailable"
                        );
                        MetricChart { metric, svg: None }
                    }
                }
            })
            .collect();

        // Headline figures only when the concept is confirmed present.
        let latest_eps = facts
            .has_gaap_concept(gaap::NET_INCOME_LOSS)
            .then(|| metrics::latest_eps_and_year(facts))
            .flatten()
            .map(|(eps, _)| eps);
        let latest_revenue = facts
            .has_gaap_concept(gaap::REVENUES)
            .then(|| metrics::latest_revenue_and_year(facts))
            .flatten()
            .map(|(revenue, _)| revenue);
        let latest_gross_profit = facts
            .has_gaap_concept(gaap::GROSS_PROFIT)
            .then(|| metrics::latest_gross_profit_and_year(facts))
            .flatten()
            .map(|(gross_profit, _)| gross_profit);

        Report {
            ticker,
            entity_name: facts.entity_name.clone(),
            latest_eps,
            latest_revenue,
            latest_gross_profit,
            charts,
        }
    }

    /// The rendered SVG for a metric, if it was available.
    pub fn chart(&self, metric: Metric) -> Option<&str> {
        self.charts
            .iter()
            .find(|c| c.metric == metric)
            .and_then(|c| c.svg.as_deref())
    }
}

/// Runs the full pipeline for one ticker: resolve → fetch → chart.
///
/// Generic over [`FactsOperations`] so alternative transports and test doubles
/// can drive the same sequencing as the real `EdgarClient`.
///
/// # Errors
///
/// An unknown ticker surfaces as `TickerNotFound` before any facts fetch is
/// attempted; transport and parse failures of either lookup are returned as-is.
/// Per-metric problems never reach this level.
pub async fn run_report(client: &impl FactsOperations, ticker: &str) -> Result<Report> {
    let cik = client.resolve_cik(ticker).await?;
    tracing::debug!(ticker = ticker.trim(), %cik, "resolved ticker");

    let facts = client.company_facts(cik).await?;
    Ok(Report::from_facts(ticker, &facts))
}
