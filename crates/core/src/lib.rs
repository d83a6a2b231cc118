//! `adplan-core`: shared building blocks for the campaign planner.
//!
//! This crate contains **pure** primitives (no IO, no logging setup): the
//! validation error model, typed identifiers and the value object marker.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::CampaignId;
pub use value_object::ValueObject;
