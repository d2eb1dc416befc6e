//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod page_fetcher;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, TelegramAdapter};
pub use page_fetcher::PageFetcher;
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::{MockNotifier, MockPageFetcher, TestDependencies};
pub use traits::*;
