pub mod alarm;
pub mod config;
pub mod dispatch;
pub mod inventory;
pub mod output;
pub mod peer;
pub mod rebalance;
pub mod snapshot;
