use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Score at which a tier begins. The exact threshold value belongs to the
/// tier above it (a score of 30 is already MEDIUM).
pub const MEDIUM_FROM: i64 = 30;
pub const HIGH_FROM: i64 = 60;
pub const CRITICAL_FROM: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DangerClass {
    Low,
    Medium,
    High,
    Critical,
}

/// Map an accumulated score to its danger tier.
pub fn classify(score: i64) -> DangerClass {
    if score < MEDIUM_FROM {
        DangerClass::Low
    } else if score < HIGH_FROM {
        DangerClass::Medium
    } else if score < CRITICAL_FROM {
        DangerClass::High
    } else {
        DangerClass::Critical
    }
}

/// Apply a point delta to a score, floored at zero.
pub fn apply_delta(score: i64, delta: i64) -> i64 {
    (score + delta).max(0)
}
