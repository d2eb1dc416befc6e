use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::domains::monitor::activities::fetch_source;
use crate::domains::monitor::formatter::format_manual_summary;
use crate::domains::monitor::models::ManualCheck;
use crate::kernel::ServerDeps;

/// Fetch and extract, then send one digest when anything was found.
///
/// Nothing is committed to the seen-set and no stats are recorded.
pub async fn run_manual_check(deps: &ServerDeps) -> Result<ManualCheck> {
    info!(url = %deps.settings.source_url, "Manual check");

    let records = fetch_source(deps).await?.into_records(deps);
    let checked_at = Utc::now();

    let notified = if records.is_empty() {
        false
    } else {
        match deps
            .notifier
            .send(&format_manual_summary(&records, checked_at))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Manual check summary failed to send");
                false
            }
        }
    };

    info!(found = records.len(), notified, "Manual check finished");
    Ok(ManualCheck {
        checked_at,
        records,
        notified,
    })
}
