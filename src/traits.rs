//! Trait definition for the EDGAR lookups this crate performs.
//!
//! The [`FactsOperations`] trait groups the two network-facing steps of the
//! pipeline (ticker resolution and the facts fetch) behind one seam. The
//! `EdgarClient` struct implements it; tests and alternative transports can
//! provide their own implementation without touching the analysis modules,
//! which are pure functions over [`CompanyFacts`](crate::CompanyFacts).

use super::error::Result;
use super::facts::{Cik, CompanyFacts, CompanyTicker};
use async_trait::async_trait;

/// Operations for resolving tickers and retrieving XBRL company facts.
///
/// Both calls hit SEC endpoints and are subject to the client's rate limiting
/// and retry policy. Neither caches: the registry is re-fetched per resolution.
#[async_trait]
pub trait FactsOperations {
    /// Retrieves the full ticker → CIK registry.
    async fn company_tickers(&self) -> Result<Vec<CompanyTicker>>;
    /// Resolves a ticker symbol (case-insensitive) to a CIK.
    async fn resolve_cik(&self, ticker: &str) -> Result<Cik>;
    /// Retrieves the complete facts document for a filer.
    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts>;
}
