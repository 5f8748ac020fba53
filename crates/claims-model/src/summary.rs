use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregates over a mapped claim table. Never written back into the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSummary {
    pub total_count: usize,
    pub total_billed: Decimal,
    pub total_accepted: Decimal,
    pub total_excess: Decimal,
    pub total_unpaid: Decimal,
}
