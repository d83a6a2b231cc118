//! Per-dimension statistical summaries of the source tables.
//!
//! Built once per data load, then read-only. Every lookup has a defined
//! fallback so callers never see a missing-data error:
//!
//! - fill rate: value → dimension weighted mean → global weighted mean
//! - inventory: value → dimension average per value → 1% of total inventory
//! - whole-dimension inventory: dimension total → total inventory

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SourceError;
use crate::record::{DimensionRecord, FillRateRow, InventoryRecord, InventoryRow};
use crate::source::TableSource;

pub const SYNTHETIC_FILL_RATE: f64 = 0.12;
pub const SYNTHETIC_TOTAL_INVENTORY: u64 = 1_000_000_000;
pub const SYNTHETIC_BASE_PRICE: f64 = 15.0;

/// Share of total inventory assumed for a dimension absent from the inventory table.
pub const UNKNOWN_DIMENSION_INVENTORY_SHARE: f64 = 0.01;

/// Where the index statistics came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Built from the historical fill-rate and inventory tables.
    Real,
    /// Documented defaults used when the tables could not be obtained.
    Synthetic,
}

/// Fill-rate summary of one targeting dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionAggregate {
    weighted_fill_rate: f64,
    mean_fill_rate: f64,
    total_requests: u64,
    record_count: usize,
    min_fill_rate: f64,
    max_fill_rate: f64,
    by_value: BTreeMap<String, f64>,
}

impl DimensionAggregate {
    /// Request-count-weighted mean fill rate.
    pub fn weighted_fill_rate(&self) -> f64 {
        self.weighted_fill_rate
    }

    /// Unweighted mean fill rate.
    pub fn mean_fill_rate(&self) -> f64 {
        self.mean_fill_rate
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn min_fill_rate(&self) -> f64 {
        self.min_fill_rate
    }

    pub fn max_fill_rate(&self) -> f64 {
        self.max_fill_rate
    }

    pub fn value_fill_rate(&self, value: &str) -> Option<f64> {
        self.by_value.get(value).copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.by_value.keys().map(String::as_str)
    }
}

/// Inventory summary of one targeting dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryAggregate {
    total_inventory: u64,
    average_per_value: f64,
    value_count: usize,
    min_units: u64,
    max_units: u64,
    by_value: BTreeMap<String, u64>,
}

impl InventoryAggregate {
    pub fn total_inventory(&self) -> u64 {
        self.total_inventory
    }

    pub fn average_per_value(&self) -> f64 {
        self.average_per_value
    }

    pub fn value_count(&self) -> usize {
        self.value_count
    }

    pub fn min_units(&self) -> u64 {
        self.min_units
    }

    pub fn max_units(&self) -> u64 {
        self.max_units
    }

    pub fn value_inventory(&self, value: &str) -> Option<u64> {
        self.by_value.get(value).copied()
    }
}

/// Load report, for logging and monitoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    pub data_source: DataSource,
    pub fill_records: usize,
    pub inventory_records: usize,
    pub fill_dimensions: usize,
    pub inventory_dimensions: usize,
    pub global_fill_rate: f64,
    pub total_inventory: u64,
    pub rejected_rows: usize,
}

/// Immutable lookup structure over the historical delivery statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateIndex {
    source: DataSource,
    fill: BTreeMap<String, DimensionAggregate>,
    inventory: BTreeMap<String, InventoryAggregate>,
    global_fill_rate: f64,
    total_inventory: u64,
    fill_records: usize,
    inventory_records: usize,
    rejected_rows: usize,
}

impl AggregateIndex {
    /// Build the index from a table source, falling back to [`AggregateIndex::synthetic`]
    /// if either table is unavailable or contains no usable rows.
    pub fn load<S>(source: &S) -> Self
    where
        S: TableSource + ?Sized,
    {
        let tables = source
            .fill_rates()
            .and_then(|fill| source.inventory().map(|inventory| (fill, inventory)));

        let built = tables.and_then(|(fill, inventory)| Self::from_rows(&fill, &inventory));
        match built {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "source tables unusable; falling back to synthetic index");
                Self::synthetic()
            }
        }
    }

    /// Build from raw rows. Invalid rows are skipped and counted; the summary row
    /// of the inventory table is ignored.
    pub fn from_rows(
        fill_rows: &[FillRateRow],
        inventory_rows: &[InventoryRow],
    ) -> Result<Self, SourceError> {
        let mut rejected = 0usize;

        let mut fill = Vec::with_capacity(fill_rows.len());
        for row in fill_rows {
            match DimensionRecord::try_from(row) {
                Ok(record) => fill.push(record),
                Err(e) => {
                    warn!(key = %row.dimension_value_key, error = %e, "rejecting fill rate row");
                    rejected += 1;
                }
            }
        }

        let mut inventory = Vec::with_capacity(inventory_rows.len());
        for row in inventory_rows.iter().filter(|r| !r.is_summary()) {
            match InventoryRecord::try_from(row) {
                Ok(record) => inventory.push(record),
                Err(e) => {
                    warn!(key = %row.dimension_value_key, error = %e, "rejecting inventory row");
                    rejected += 1;
                }
            }
        }

        if fill.is_empty() {
            return Err(SourceError::malformed("fill rate table has no valid rows"));
        }
        if inventory.is_empty() {
            return Err(SourceError::malformed("inventory table has no valid rows"));
        }

        let mut index = Self::from_records(&fill, &inventory);
        index.rejected_rows = rejected;

        info!(
            fill_records = index.fill_records,
            inventory_records = index.inventory_records,
            fill_dimensions = index.fill.len(),
            inventory_dimensions = index.inventory.len(),
            rejected_rows = rejected,
            global_fill_rate = index.global_fill_rate,
            total_inventory = index.total_inventory,
            "aggregate index built from source tables"
        );

        Ok(index)
    }

    /// Build from validated records in a single pass over each table.
    pub fn from_records(fill: &[DimensionRecord], inventory: &[InventoryRecord]) -> Self {
        let mut fill_acc: BTreeMap<&str, FillAccumulator> = BTreeMap::new();
        let mut global = FillAccumulator::default();
        for record in fill {
            fill_acc.entry(record.dimension()).or_default().push(record);
            global.push(record);
        }

        let mut inventory_acc: BTreeMap<&str, InventoryAccumulator> = BTreeMap::new();
        let mut total_inventory = 0u64;
        for record in inventory {
            inventory_acc.entry(record.dimension()).or_default().push(record);
            total_inventory = total_inventory.saturating_add(record.available_units());
        }

        Self {
            source: DataSource::Real,
            fill: fill_acc
                .into_iter()
                .map(|(dimension, acc)| (dimension.to_string(), acc.finish()))
                .collect(),
            inventory: inventory_acc
                .into_iter()
                .map(|(dimension, acc)| (dimension.to_string(), acc.finish()))
                .collect(),
            global_fill_rate: global.weighted_mean().unwrap_or(SYNTHETIC_FILL_RATE),
            total_inventory,
            fill_records: fill.len(),
            inventory_records: inventory.len(),
            rejected_rows: 0,
        }
    }

    /// Documented defaults: fill rate 12%, one billion units of inventory, no dimensions.
    pub fn synthetic() -> Self {
        Self {
            source: DataSource::Synthetic,
            fill: BTreeMap::new(),
            inventory: BTreeMap::new(),
            global_fill_rate: SYNTHETIC_FILL_RATE,
            total_inventory: SYNTHETIC_TOTAL_INVENTORY,
            fill_records: 0,
            inventory_records: 0,
            rejected_rows: 0,
        }
    }

    pub fn data_source(&self) -> DataSource {
        self.source
    }

    /// Request-count-weighted mean fill rate across every record.
    pub fn global_fill_rate(&self) -> f64 {
        self.global_fill_rate
    }

    /// Sum of inventory across every record of every dimension.
    pub fn total_inventory(&self) -> u64 {
        self.total_inventory
    }

    pub fn dimension(&self, name: &str) -> Option<&DimensionAggregate> {
        self.fill.get(name)
    }

    pub fn inventory_dimension(&self, name: &str) -> Option<&InventoryAggregate> {
        self.inventory.get(name)
    }

    /// Fill rate for a dimension, optionally narrowed to one value.
    pub fn fill_rate_for(&self, dimension: &str, value: Option<&str>) -> f64 {
        let Some(agg) = self.fill.get(dimension) else {
            return self.global_fill_rate;
        };
        value
            .and_then(|v| agg.value_fill_rate(v))
            .unwrap_or(agg.weighted_fill_rate)
    }

    /// Available inventory for a dimension, optionally narrowed to one value.
    pub fn inventory_for(&self, dimension: &str, value: Option<&str>) -> u64 {
        let Some(agg) = self.inventory.get(dimension) else {
            return self.unknown_dimension_inventory();
        };
        value
            .and_then(|v| agg.value_inventory(v))
            .unwrap_or(agg.average_per_value as u64)
    }

    /// Whole-dimension inventory. An unknown dimension does not narrow supply,
    /// so it reports the total across all dimensions.
    pub fn dimension_inventory(&self, dimension: &str) -> u64 {
        self.inventory
            .get(dimension)
            .map(InventoryAggregate::total_inventory)
            .unwrap_or(self.total_inventory)
    }

    fn unknown_dimension_inventory(&self) -> u64 {
        (self.total_inventory as f64 * UNKNOWN_DIMENSION_INVENTORY_SHARE) as u64
    }

    /// Targetable values per dimension, as observed in the fill-rate table.
    pub fn targeting_options(&self) -> BTreeMap<String, Vec<String>> {
        self.fill
            .iter()
            .map(|(dimension, agg)| (dimension.clone(), agg.values().map(str::to_string).collect()))
            .collect()
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            data_source: self.source,
            fill_records: self.fill_records,
            inventory_records: self.inventory_records,
            fill_dimensions: self.fill.len(),
            inventory_dimensions: self.inventory.len(),
            global_fill_rate: self.global_fill_rate,
            total_inventory: self.total_inventory,
            rejected_rows: self.rejected_rows,
        }
    }
}

#[derive(Debug, Default)]
struct FillAccumulator {
    weighted_sum: f64,
    rate_sum: f64,
    total_requests: u64,
    count: usize,
    min: f64,
    max: f64,
    by_value: BTreeMap<String, f64>,
}

impl FillAccumulator {
    fn push(&mut self, record: &DimensionRecord) {
        let rate = record.fill_rate();
        if self.count == 0 {
            self.min = rate;
            self.max = rate;
        } else {
            self.min = self.min.min(rate);
            self.max = self.max.max(rate);
        }
        self.weighted_sum += rate * record.request_count() as f64;
        self.rate_sum += rate;
        self.total_requests = self.total_requests.saturating_add(record.request_count());
        self.count += 1;
        // Duplicate values: the last row wins.
        self.by_value.insert(record.value().to_string(), rate);
    }

    /// Request-weighted mean; plain mean when no record carries any requests.
    fn weighted_mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        if self.total_requests > 0 {
            Some(self.weighted_sum / self.total_requests as f64)
        } else {
            Some(self.rate_sum / self.count as f64)
        }
    }

    fn finish(self) -> DimensionAggregate {
        let weighted_fill_rate = self.weighted_mean().unwrap_or(SYNTHETIC_FILL_RATE);
        let mean_fill_rate = if self.count == 0 {
            weighted_fill_rate
        } else {
            self.rate_sum / self.count as f64
        };
        DimensionAggregate {
            weighted_fill_rate,
            mean_fill_rate,
            total_requests: self.total_requests,
            record_count: self.count,
            min_fill_rate: self.min,
            max_fill_rate: self.max,
            by_value: self.by_value,
        }
    }
}

#[derive(Debug, Default)]
struct InventoryAccumulator {
    total: u64,
    count: usize,
    min: u64,
    max: u64,
    by_value: BTreeMap<String, u64>,
}

impl InventoryAccumulator {
    fn push(&mut self, record: &InventoryRecord) {
        let units = record.available_units();
        if self.count == 0 {
            self.min = units;
            self.max = units;
        } else {
            self.min = self.min.min(units);
            self.max = self.max.max(units);
        }
        self.total = self.total.saturating_add(units);
        self.count += 1;
        self.by_value.insert(record.value().to_string(), units);
    }

    fn finish(self) -> InventoryAggregate {
        let average_per_value = if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        };
        InventoryAggregate {
            total_inventory: self.total,
            average_per_value,
            value_count: self.count,
            min_units: self.min,
            max_units: self.max,
            by_value: self.by_value,
        }
    }
}
