pub mod run;
pub mod settings;

pub use run::{ManualCheck, RunState, RunSummary};
pub use settings::RunSettings;
