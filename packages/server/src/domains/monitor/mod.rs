//! Monitor domain - one fetch/extract/filter/notify cycle plus its stats

pub mod activities;
pub mod data;
pub mod fixtures;
pub mod formatter;
pub mod models;

pub use activities::{run_manual_check, run_monitor};
pub use data::{ExecutionLog, StatsSnapshot, StatsStore};
pub use formatter::{escape_markdown, format_manual_summary, format_record};
pub use models::{ManualCheck, RunSettings, RunState, RunSummary};
