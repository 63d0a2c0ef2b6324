pub mod units;

use serde::{Deserialize, Serialize};

/// combined stats of every instance managed by a panel.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelReport {
    /// memory used by all reporting instances, e.g. `"1.50GB"`.
    pub mem: String,
    /// storage used by all reporting instances.
    pub world_size: String,
    pub players: u64,
    pub max_players: u64,
    // summed percentage, can exceed 100.
    pub cpu: f32,
    pub server_running: u64,
    pub server_crashed: u64,
    pub server_total: u64,
    /// instances that are not marked running, reporting or not.
    pub server_offline: u64,
}

/// a snapshot of web log analytics.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub total_requests: u64,
    pub valid_requests: u64,
    pub failed_requests: u64,
    pub unique_visitors: u64,
    pub unique_files: u64,
    /// transferred data, e.g. `"3.00MB"`.
    pub bandwidth: String,
    pub unique_referrers: u64,
    pub unique_not_found: u64,
}
