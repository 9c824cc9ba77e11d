//! Ticker registry and XBRL company-facts endpoints.
//!
//! Two bootstrap lookups drive everything else in this crate:
//! - The ticker registry (`company_tickers.json`) maps a stock ticker to a CIK.
//! - The companyfacts API returns every XBRL fact a filer has reported, grouped by
//!   taxonomy, concept and unit of measure.
//!
//! Most users will call `resolve_cik("AAPL")` followed by `company_facts(cik)`,
//! then hand the resulting [`CompanyFacts`] to the `metrics` and `series` modules.
//! The SEC guarantees very little about the payload shape, so every concept/unit
//! path here is optional and fact lists carry no ordering guarantee.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::EdgarClient;
use super::error::{FundvizError, Result};
use super::traits::FactsOperations;

/// US-GAAP concept tags and units used by the metric and series builders.
pub mod gaap {
    pub const REVENUES: &str = "Revenues";
    pub const COST_OF_REVENUE: &str = "CostOfRevenue";
    pub const GROSS_PROFIT: &str = "GrossProfit";
    pub const OPERATING_INCOME_LOSS: &str = "OperatingIncomeLoss";
    pub const NET_INCOME_LOSS: &str = "NetIncomeLoss";
    pub const SHARES_OUTSTANDING: &str = "CommonStockSharesOutstanding";
    pub const DEPRECIATION: &str = "Depreciation";

    pub const USD: &str = "USD";
    pub const SHARES: &str = "shares";
}

/// A filer's Central Index Key.
///
/// The SEC identifies reporting entities by CIK rather than ticker. The data API
/// expects the 10-digit zero-padded form, which is what `Display` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cik(pub u64);

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

/// One entry of the SEC's ticker → CIK registry.
///
/// Companies can appear multiple times when listed under several tickers; the
/// registry is a JSON object keyed by arbitrary index strings, so consumers scan
/// all values rather than looking up a key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanyTicker {
    #[serde(rename = "cik_str")]
    pub cik: u64,
    pub ticker: String,
    pub title: String,
}

/// Complete set of XBRL facts reported by a company across all filings.
///
/// Facts are organized by taxonomy (US-GAAP, DEI) and then by concept tag. Each
/// concept holds data points for one or more units of measure, covering different
/// periods and source filings. Either taxonomy group may be entirely absent for
/// filers without structured financial data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyFacts {
    pub cik: u64,
    #[serde(rename = "entityName", default)]
    pub entity_name: Option<String>,
    #[serde(rename = "facts", default)]
    pub taxonomies: Taxonomies,
}

/// Container for facts grouped by taxonomy standard.
///
/// US-GAAP holds financial statement data; DEI holds document and entity
/// metadata. Both default to empty maps because the SEC omits whole groups
/// for some filers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxonomies {
    #[serde(rename = "us-gaap", default)]
    pub us_gaap: HashMap<String, Concept>,
    #[serde(default)]
    pub dei: HashMap<String, Concept>,
}

/// A single XBRL concept with its data points grouped by unit of measure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub units: HashMap<String, Vec<Fact>>,
}

/// One reported data point for a concept and unit.
///
/// Instantaneous concepts (balance sheet items) carry only `end`; duration
/// concepts also carry `start`. `val` can be a number or a string depending on
/// the concept, so numeric consumers go through [`Fact::numeric_val`]. The order
/// of facts within a unit list is whatever the SEC emitted; callers must sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    pub end: String,
    pub val: serde_json::Value,
    #[serde(default)]
    pub accn: Option<String>,
    #[serde(default)]
    pub fy: Option<i32>,
    #[serde(default)]
    pub fp: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub filed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

impl Fact {
    /// The reported value as a float, or `None` for non-numeric concepts.
    pub fn numeric_val(&self) -> Option<f64> {
        self.val.as_f64()
    }

    /// Period-end date parsed from the ISO `end` string.
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.end, "%Y-%m-%d").ok()
    }
}

impl CompanyFacts {
    /// Facts for a US-GAAP concept in a given unit, if that path exists.
    pub fn gaap_units(&self, concept: &str, unit: &str) -> Option<&[Fact]> {
        self.taxonomies
            .us_gaap
            .get(concept)?
            .units
            .get(unit)
            .map(Vec::as_slice)
    }

    /// Whether a US-GAAP concept is present at all, in any unit.
    pub fn has_gaap_concept(&self, concept: &str) -> bool {
        self.taxonomies.us_gaap.contains_key(concept)
    }
}

/// Scans registry entries for the first case-insensitive ticker match.
///
/// Leading/trailing whitespace in the query is ignored. When a ticker appears
/// more than once, which entry wins is unspecified: the registry arrives as an
/// unordered JSON object, so the slice order here is arbitrary per fetch.
pub fn find_ticker<'a>(entries: &'a [CompanyTicker], ticker: &str) -> Option<&'a CompanyTicker> {
    let wanted = ticker.trim();
    entries
        .iter()
        .find(|entry| entry.ticker.eq_ignore_ascii_case(wanted))
}

impl EdgarClient {
    fn registry_url(&self) -> String {
        format!("{}/company_tickers.json", self.files_url)
    }

    fn facts_url(&self, cik: Cik) -> String {
        format!("{}/api/xbrl/companyfacts/CIK{}.json", self.data_url, cik)
    }
}

#[async_trait]
impl FactsOperations for EdgarClient {
    /// Fetches the full ticker registry from the SEC.
    ///
    /// The registry is a single large JSON object; it is re-fetched on every call
    /// rather than cached, matching the one-lookup-per-request model.
    async fn company_tickers(&self) -> Result<Vec<CompanyTicker>> {
        let response = self.get(&self.registry_url()).await?;
        let map: HashMap<String, CompanyTicker> = serde_json::from_str(&response)?;
        Ok(map.into_values().collect())
    }

    /// Resolves a ticker symbol to a CIK via the registry.
    ///
    /// The match is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `FundvizError::TickerNotFound` when no registry entry matches, and
    /// the usual transport/parse errors when the registry itself cannot be read.
    async fn resolve_cik(&self, ticker: &str) -> Result<Cik> {
        let tickers = self.company_tickers().await?;

        let company = find_ticker(&tickers, ticker).ok_or(FundvizError::TickerNotFound)?;

        Ok(Cik(company.cik))
    }

    /// Fetches the complete facts document for a filer.
    ///
    /// Only basic parseability is validated here; individual concept and unit
    /// paths may still be absent and downstream consumers handle that per metric.
    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts> {
        let response = self.get(&self.facts_url(cik)).await?;
        Ok(serde_json::from_str(&response)?)
    }
}
