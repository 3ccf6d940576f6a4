//! High-risk-item aggregation over a date range

use std::collections::HashMap;

use crate::store::HighRiskDaily;

/// How many items the digest ranking lists.
pub const HIGH_RISK_RANK_LIMIT: usize = 5;

/// One high-risk item with detections summed across the period.
#[derive(Debug, Clone, PartialEq)]
pub struct HighRiskItem {
    pub code: Option<String>,
    pub name_ja: Option<String>,
    pub category: Option<String>,
    pub risk_level: Option<i64>,
    pub total_count: i64,
}

/// Group daily detection rows by item identity, sum their counts, and return
/// the top `limit` items by total, descending. Ties break on code so the
/// ranking is deterministic.
pub fn aggregate_high_risk(rows: Vec<HighRiskDaily>, limit: usize) -> Vec<HighRiskItem> {
    type Key = (Option<String>, Option<String>, Option<String>, Option<i64>);
    let mut totals: HashMap<Key, i64> = HashMap::new();

    for row in rows {
        let key = (row.code, row.name_ja, row.category, row.risk_level);
        *totals.entry(key).or_insert(0) += row.detect_count;
    }

    let mut items: Vec<HighRiskItem> = totals
        .into_iter()
        .map(|((code, name_ja, category, risk_level), total_count)| HighRiskItem {
            code,
            name_ja,
            category,
            risk_level,
            total_count,
        })
        .collect();

    items.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| a.code.cmp(&b.code))
    });
    items.truncate(limit);
    items
}
