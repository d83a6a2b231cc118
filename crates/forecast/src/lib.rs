//! `adplan-forecast`
//!
//! **Responsibility:** campaign delivery forecasting.
//!
//! Turns (targeting criteria, budget, timeline) into a deterministic, bounded and
//! confidence-scored projection of impressions, cost, reach and frequency.
//!
//! - The [`AggregateIndex`] is built once from pre-parsed source tables and is
//!   read-only afterwards; share it behind an `Arc`.
//! - Every other component is a pure function of its inputs plus the index.
//! - Nothing here performs IO beyond asking a [`TableSource`] for rows at load time.

pub mod calculator;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod pacing;
pub mod record;
pub mod request;
pub mod result;
pub mod source;
pub mod targeting;
pub mod timeline;

pub use calculator::{Projection, ProjectionInput, ReachModel};
pub use config::ForecastConfig;
pub use engine::ForecastEngine;
pub use error::SourceError;
pub use index::{AggregateIndex, DataSource, DimensionAggregate, IndexSummary, InventoryAggregate};
pub use record::{DimensionRecord, FillRateRow, InventoryRecord, InventoryRow};
pub use request::ForecastRequest;
pub use result::{CampaignForecast, ForecastResult, PerformanceBreakdown, PeriodForecast};
pub use source::{InMemoryTables, TableSource};
pub use targeting::{DimensionBreakdown, DimensionKind, Resolution, TargetingCriteria, TargetingResolver};
pub use timeline::{DEFAULT_TIMELINE_WEEKS, parse_timeline_weeks};
