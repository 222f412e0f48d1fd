use crate::models::CampaignInput;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub ctr: f64,
    pub cpc: f64,
}

/// Derive CTR and CPC. Expects validated input; absent numbers count as zero.
pub fn compute_metrics(input: &CampaignInput) -> Metrics {
    let impressions = input.impressions.unwrap_or(0);
    let clicks = input.clicks.unwrap_or(0);
    let budget = input.budget.unwrap_or(0.0);

    Metrics {
        ctr: click_through_rate(clicks, impressions),
        cpc: cost_per_click(budget, clicks),
    }
}

pub fn click_through_rate(clicks: i64, impressions: i64) -> f64 {
    if impressions > 0 {
        round2(clicks as f64 / impressions as f64 * 100.0)
    } else {
        0.0
    }
}

pub fn cost_per_click(budget: f64, clicks: i64) -> f64 {
    if clicks > 0 {
        round2(budget / clicks as f64)
    } else {
        0.0
    }
}

/// Two fractional digits, halves away from zero. Values too large to scale
/// have no fractional part left and are returned as they are.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
