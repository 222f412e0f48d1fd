use serde::{Deserialize, Deserializer, Serialize};

/// Numbers as entered on the form. Missing or unparseable fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignInput {
    pub name: String,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub budget: Option<f64>,
}

/// A stored campaign. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignRecord {
    pub id: u64,
    pub name: String,
    pub impressions: i64,
    pub clicks: i64,
    pub budget: f64,
    pub ctr: f64,
    pub cpc: f64,
}

/// Raw form fields, named the way the dashboard form posts them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignForm {
    #[serde(rename = "campaignName", default, deserialize_with = "text_or_number")]
    pub campaign_name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub impressions: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub clicks: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub budget: String,
}

/// JSON clients may send bare numbers or null; keep them as form text.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
        Raw::Missing(()) => String::new(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignCreatedResponse {
    pub campaign: CampaignRecord,
    pub persisted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignDeletedResponse {
    pub deleted: bool,
    pub persisted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChartResponse {
    pub labels: Vec<String>,
    pub ctr: Vec<f64>,
    pub cpc: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SummaryResponse {
    pub campaigns: usize,
    pub impressions: i64,
    pub clicks: i64,
    pub budget: f64,
    pub ctr: f64,
    pub cpc: f64,
}
