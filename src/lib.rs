//! # fundviz - SEC XBRL fundamentals, charted
//!
//! fundviz fetches a company's structured financial disclosures from the SEC's
//! EDGAR XBRL API, derives a small set of fundamental metrics (revenue, gross
//! profit, operating income, net income, EPS, EBITDA, shares outstanding) and
//! renders them as SVG time-series charts.
//!
//! ## Pipeline
//!
//! One report request runs a strictly sequential pipeline:
//!
//! 1. **Resolve** - map a ticker symbol to a CIK via the SEC ticker registry
//! 2. **Fetch** - pull the filer's complete companyfacts document
//! 3. **Extract** - per metric, build a date-ordered series or latest value
//! 4. **Chart** - render each series as an SVG line chart
//!
//! Metric attempts are isolated: a concept missing from one filer's facts marks
//! that single chart unavailable and the rest of the report still completes.
//!
//! ## Requirements
//!
//! fundviz is an async library and requires a runtime such as
//! [tokio](https://tokio.rs). The SEC requires an identifying user agent with
//! contact information on every request; anonymous clients get blocked.
//!
//! ## Basic Usage
//!
//! ```ignore
//! use fundviz::{EdgarClient, run_report};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new("YourAppName contact@example.com")?;
//!
//!     let report = run_report(&client, "GOOG").await?;
//!
//!     if let Some(eps) = report.latest_eps {
//!         println!("Latest EPS: {:.2}", eps);
//!     }
//!     for chart in &report.charts {
//!         match &chart.svg {
//!             Some(svg) => println!("{}: {} bytes of SVG", chart.metric.label(), svg.len()),
//!             None => println!("{}: unavailable", chart.metric.label()),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod chart;
mod client;
mod config;
mod error;
mod facts;
mod report;
mod traits;

pub mod metrics;
pub mod series;

pub use chart::{ChartOptions, render_line_chart};
pub use client::EdgarClient;
pub use config::Config;
pub use error::{FundvizError, Result};
pub use facts::{Cik, CompanyFacts, CompanyTicker, Concept, Fact, Taxonomies, find_ticker, gaap};
pub use report::{Metric, MetricChart, Report, run_report};
pub use series::{MetricSeries, SeriesPoint};
pub use traits::FactsOperations;

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
