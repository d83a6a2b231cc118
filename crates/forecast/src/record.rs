//! Source rows (as delivered by ingestion) and the validated records built from them.

use serde::{Deserialize, Serialize};

use adplan_core::{DomainError, DomainResult, ValueObject};

/// Aggregate row present in some inventory exports; never a real dimension.
pub const SUMMARY_ROW_KEY: &str = "SUMMARY_TOTAL";

/// Row of the fill-rate table: `{dimension_value_key, request_count, fill_rate}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillRateRow {
    pub dimension_value_key: String,
    pub request_count: u64,
    pub fill_rate: f64,
}

impl FillRateRow {
    pub fn new(key: impl Into<String>, request_count: u64, fill_rate: f64) -> Self {
        Self {
            dimension_value_key: key.into(),
            request_count,
            fill_rate,
        }
    }
}

/// Row of the inventory table: `{dimension_value_key, count}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub dimension_value_key: String,
    pub count: u64,
}

impl InventoryRow {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            dimension_value_key: key.into(),
            count,
        }
    }

    pub fn is_summary(&self) -> bool {
        self.dimension_value_key.trim() == SUMMARY_ROW_KEY
    }
}

/// Split a `"dimension:value"` key at its first colon.
///
/// The value keeps any further colons (`"geo:us:ca"` is dimension `geo`, value `us:ca`).
pub fn split_dimension_key(key: &str) -> DomainResult<(&str, &str)> {
    let (dimension, value) = key
        .split_once(':')
        .ok_or_else(|| DomainError::validation(format!("key {key:?} is not `dimension:value`")))?;

    let (dimension, value) = (dimension.trim(), value.trim());
    if dimension.is_empty() || value.is_empty() {
        return Err(DomainError::validation(format!(
            "key {key:?} has an empty dimension or value"
        )));
    }
    Ok((dimension, value))
}

/// Historical fill-rate observation for one dimension value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionRecord {
    dimension: String,
    value: String,
    request_count: u64,
    fill_rate: f64,
}

impl ValueObject for DimensionRecord {}

impl DimensionRecord {
    pub fn new(
        dimension: impl Into<String>,
        value: impl Into<String>,
        request_count: u64,
        fill_rate: f64,
    ) -> DomainResult<Self> {
        if !(fill_rate.is_finite() && (0.0..=1.0).contains(&fill_rate)) {
            return Err(DomainError::validation(format!(
                "fill_rate must be within [0, 1] (got {fill_rate})"
            )));
        }
        Ok(Self {
            dimension: dimension.into(),
            value: value.into(),
            request_count,
            fill_rate,
        })
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn fill_rate(&self) -> f64 {
        self.fill_rate
    }
}

impl TryFrom<&FillRateRow> for DimensionRecord {
    type Error = DomainError;

    fn try_from(row: &FillRateRow) -> Result<Self, Self::Error> {
        let (dimension, value) = split_dimension_key(&row.dimension_value_key)?;
        Self::new(dimension, value, row.request_count, row.fill_rate)
    }
}

/// Available inventory for one dimension value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    dimension: String,
    value: String,
    available_units: u64,
}

impl ValueObject for InventoryRecord {}

impl InventoryRecord {
    pub fn new(dimension: impl Into<String>, value: impl Into<String>, available_units: u64) -> Self {
        Self {
            dimension: dimension.into(),
            value: value.into(),
            available_units,
        }
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn available_units(&self) -> u64 {
        self.available_units
    }
}

impl TryFrom<&InventoryRow> for InventoryRecord {
    type Error = DomainError;

    fn try_from(row: &InventoryRow) -> Result<Self, Self::Error> {
        let (dimension, value) = split_dimension_key(&row.dimension_value_key)?;
        Ok(Self::new(dimension, value, row.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_colon() {
        assert_eq!(split_dimension_key("network:hulu").unwrap(), ("network", "hulu"));
        assert_eq!(split_dimension_key("geo:us:ca").unwrap(), ("geo", "us:ca"));
        assert_eq!(split_dimension_key(" zip : 90210 ").unwrap(), ("zip", "90210"));
    }

    #[test]
    fn rejects_keys_without_both_parts() {
        assert!(split_dimension_key("network").is_err());
        assert!(split_dimension_key(":hulu").is_err());
        assert!(split_dimension_key("network:").is_err());
    }

    #[test]
    fn fill_rate_must_be_a_fraction() {
        assert!(DimensionRecord::new("network", "hulu", 10, 0.0).is_ok());
        assert!(DimensionRecord::new("network", "hulu", 10, 1.0).is_ok());
        assert!(DimensionRecord::new("network", "hulu", 10, 1.01).is_err());
        assert!(DimensionRecord::new("network", "hulu", 10, -0.1).is_err());
        assert!(DimensionRecord::new("network", "hulu", 10, f64::NAN).is_err());
    }

    #[test]
    fn converts_rows_into_records() {
        let record = DimensionRecord::try_from(&FillRateRow::new("network:roku", 500, 0.2)).unwrap();
        assert_eq!(record.dimension(), "network");
        assert_eq!(record.value(), "roku");
        assert_eq!(record.request_count(), 500);

        let record = InventoryRecord::try_from(&InventoryRow::new("zip:10001", 42)).unwrap();
        assert_eq!(record.dimension(), "zip");
        assert_eq!(record.available_units(), 42);
    }

    #[test]
    fn recognizes_summary_row() {
        assert!(InventoryRow::new("SUMMARY_TOTAL", 1).is_summary());
        assert!(!InventoryRow::new("network:hulu", 1).is_summary());
    }
}
