use crate::models::{CampaignForm, CampaignInput};

impl CampaignForm {
    /// Parse the raw form strings. Blank or unparseable numbers become `None`
    /// and are rejected later by validation.
    pub fn to_input(&self) -> CampaignInput {
        CampaignInput {
            name: self.campaign_name.trim().to_string(),
            impressions: parse_whole(&self.impressions),
            clicks: parse_whole(&self.clicks),
            budget: parse_amount(&self.budget),
        }
    }
}

/// Whole numbers, including whole-valued decimals such as `1000.0`.
fn parse_whole(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    // i64::MAX is not exact in f64, so stay strictly below 2^63.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.fract() == 0.0)
        .filter(|value| (-LIMIT..LIMIT).contains(value))
        .map(|value| value as i64)
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
