//! Request file format accepted by the CLI.

use chrono::NaiveDate;
use serde::Deserialize;

use adplan_core::{CampaignId, DomainResult};
use adplan_forecast::{ForecastRequest, TargetingCriteria, timeline::next_monday};

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequestDto {
    /// Generated when absent so every forecast can be correlated in logs.
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
    pub budget: f64,
    /// Free text such as `"6 weeks"`.
    #[serde(default = "default_timeline")]
    pub timeline: String,
    #[serde(default)]
    pub criteria: TargetingCriteria,
    #[serde(default)]
    pub target_frequency: Option<f64>,
    /// Defaults to the Monday after `today`.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn default_timeline() -> String {
    "4 weeks".to_string()
}

impl ForecastRequestDto {
    pub fn into_request(self, today: NaiveDate) -> DomainResult<ForecastRequest> {
        let mut request = ForecastRequest::from_timeline_text(self.budget, &self.timeline, self.criteria)?
            .with_start_date(self.start_date.unwrap_or_else(|| next_monday(today)))
            .with_campaign_id(self.campaign_id.unwrap_or_default());
        if let Some(f) = self.target_frequency {
            request = request.with_target_frequency(f)?;
        }
        Ok(request)
    }
}
