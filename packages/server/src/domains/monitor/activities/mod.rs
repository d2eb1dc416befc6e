//! Monitor activities - the run orchestrator and the manual check

pub mod check;
pub mod run;

pub use check::run_manual_check;
pub use run::run_monitor;

use anyhow::Result;
use tracing::warn;

use extraction::Record;

use crate::domains::monitor::fixtures::fixture_records;
use crate::kernel::ServerDeps;

/// Page content for one cycle.
pub(crate) enum Fetched {
    Page(String),
    /// The fetch failed in development mode; already-extracted fixture records
    Fixture(Vec<Record>),
}

impl Fetched {
    pub(crate) fn into_records(self, deps: &ServerDeps) -> Vec<Record> {
        match self {
            Self::Page(html) => deps.extractor.extract(&html),
            Self::Fixture(records) => records,
        }
    }
}

/// Fetch the source page, falling back to the fixture in development mode.
pub(crate) async fn fetch_source(deps: &ServerDeps) -> Result<Fetched> {
    match deps.fetcher.fetch(&deps.settings.source_url).await {
        Ok(html) => Ok(Fetched::Page(html)),
        Err(e) if deps.settings.development => {
            warn!(error = %e, "Fetch failed, using development fixture page");
            Ok(Fetched::Fixture(fixture_records(&deps.extractor)))
        }
        Err(e) => Err(e),
    }
}
