use super::environmental::Trend;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub used: f64,
    pub efficiency: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageDelta {
    pub difference: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageComparison {
    pub vs_yesterday: UsageDelta,
    pub vs_average: UsageDelta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyUsage {
    pub total: f64,
    pub average: f64,
    pub trend: Trend,
    pub efficiency: f64,
}

/// Water-use summary handed to the analytics dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub today: DailyUsage,
    pub comparison: UsageComparison,
    pub weekly: WeeklyUsage,
}
