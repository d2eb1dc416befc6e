pub mod stats;

pub use stats::{ExecutionLog, StatsSnapshot, StatsStore};
