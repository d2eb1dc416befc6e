// Business domains
pub mod monitor;
