use chrono::NaiveDate;
use serde::Serialize;

use adplan_core::{CampaignId, DomainError, DomainResult, ValueObject};

use crate::targeting::TargetingCriteria;
use crate::timeline::{DEFAULT_TIMELINE_WEEKS, parse_timeline_weeks};

/// A validated forecast request.
///
/// Construction enforces the engine's input contract (positive budget, at least
/// one week, positive frequency target); the engine itself never rejects a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRequest {
    campaign_id: Option<CampaignId>,
    budget: f64,
    timeline_weeks: u32,
    criteria: TargetingCriteria,
    target_frequency: Option<f64>,
    start_date: Option<NaiveDate>,
}

impl ValueObject for ForecastRequest {}

impl ForecastRequest {
    pub fn new(budget: f64, timeline_weeks: u32, criteria: TargetingCriteria) -> DomainResult<Self> {
        if !(budget.is_finite() && budget > 0.0) {
            return Err(DomainError::validation(format!(
                "budget must be a finite positive amount (got {budget})"
            )));
        }
        if timeline_weeks == 0 {
            return Err(DomainError::validation("timeline must span at least one week"));
        }
        Ok(Self {
            campaign_id: None,
            budget,
            timeline_weeks,
            criteria,
            target_frequency: None,
            start_date: None,
        })
    }

    /// Request whose duration comes from free text (`"6 weeks"`); unparsable text means 4 weeks.
    pub fn from_timeline_text(
        budget: f64,
        timeline: &str,
        criteria: TargetingCriteria,
    ) -> DomainResult<Self> {
        Self::new(
            budget,
            parse_timeline_weeks(timeline, DEFAULT_TIMELINE_WEEKS),
            criteria,
        )
    }

    pub fn with_target_frequency(mut self, target_frequency: f64) -> DomainResult<Self> {
        if !(target_frequency.is_finite() && target_frequency > 0.0) {
            return Err(DomainError::validation(format!(
                "target frequency must be a finite positive number (got {target_frequency})"
            )));
        }
        self.target_frequency = Some(target_frequency);
        Ok(self)
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_campaign_id(mut self, campaign_id: CampaignId) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }

    pub fn campaign_id(&self) -> Option<CampaignId> {
        self.campaign_id
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn timeline_weeks(&self) -> u32 {
        self.timeline_weeks
    }

    pub fn criteria(&self) -> &TargetingCriteria {
        &self.criteria
    }

    pub fn target_frequency(&self) -> Option<f64> {
        self.target_frequency
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }
}
