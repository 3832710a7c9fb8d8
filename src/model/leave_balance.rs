use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Remaining and total days for the leave types backed by an allowance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "paid": 18.0, "paid_total": 26.0, "rtt": 5.0, "rtt_total": 10.0 }))]
pub struct LeaveBalance {
    pub paid: f64,
    pub paid_total: f64,
    pub rtt: f64,
    pub rtt_total: f64,
}

impl LeaveBalance {
    pub fn full(paid_total: f64, rtt_total: f64) -> Self {
        Self {
            paid: paid_total,
            paid_total,
            rtt: rtt_total,
            rtt_total,
        }
    }
}
