use crate::metrics::{click_through_rate, cost_per_click, round2};
use crate::models::{CampaignRecord, ChartResponse, SummaryResponse};

/// Bar chart series keyed by campaign name, in list order.
pub fn build_chart(records: &[CampaignRecord]) -> ChartResponse {
    let mut labels = Vec::with_capacity(records.len());
    let mut ctr = Vec::with_capacity(records.len());
    let mut cpc = Vec::with_capacity(records.len());

    for record in records {
        labels.push(record.name.clone());
        ctr.push(record.ctr);
        cpc.push(record.cpc);
    }

    ChartResponse { labels, ctr, cpc }
}

/// Portfolio totals. Overall ratios come from the summed counts, not from
/// averaging each campaign's ratio.
pub fn build_summary(records: &[CampaignRecord]) -> SummaryResponse {
    let mut impressions = 0i64;
    let mut clicks = 0i64;
    let mut budget = 0.0f64;
    for record in records {
        impressions = impressions.saturating_add(record.impressions);
        clicks = clicks.saturating_add(record.clicks);
        budget += record.budget;
    }

    SummaryResponse {
        campaigns: records.len(),
        impressions,
        clicks,
        budget: round2(budget),
        ctr: click_through_rate(clicks, impressions),
        cpc: cost_per_click(budget, clicks),
    }
}
