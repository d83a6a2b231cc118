use std::sync::Arc;

use crate::error::SourceError;
use crate::record::{FillRateRow, InventoryRow};

/// Provider of the two pre-parsed source tables.
///
/// This crate stays storage-agnostic: file/columnar ingestion lives with the
/// caller, which hands over rows through this trait.
pub trait TableSource: Send + Sync {
    fn fill_rates(&self) -> Result<Vec<FillRateRow>, SourceError>;

    fn inventory(&self) -> Result<Vec<InventoryRow>, SourceError>;
}

impl<S> TableSource for Arc<S>
where
    S: TableSource + ?Sized,
{
    fn fill_rates(&self) -> Result<Vec<FillRateRow>, SourceError> {
        (**self).fill_rates()
    }

    fn inventory(&self) -> Result<Vec<InventoryRow>, SourceError> {
        (**self).inventory()
    }
}

/// In-memory tables for tests/dev. A `None` table reports as unavailable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTables {
    fill_rates: Option<Vec<FillRateRow>>,
    inventory: Option<Vec<InventoryRow>>,
}

impl InMemoryTables {
    pub fn new(fill_rates: Vec<FillRateRow>, inventory: Vec<InventoryRow>) -> Self {
        Self {
            fill_rates: Some(fill_rates),
            inventory: Some(inventory),
        }
    }

    /// Both tables unavailable.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn without_inventory(mut self) -> Self {
        self.inventory = None;
        self
    }

    pub fn without_fill_rates(mut self) -> Self {
        self.fill_rates = None;
        self
    }
}

impl TableSource for InMemoryTables {
    fn fill_rates(&self) -> Result<Vec<FillRateRow>, SourceError> {
        self.fill_rates
            .clone()
            .ok_or_else(|| SourceError::unavailable("fill rate table"))
    }

    fn inventory(&self) -> Result<Vec<InventoryRow>, SourceError> {
        self.inventory
            .clone()
            .ok_or_else(|| SourceError::unavailable("inventory table"))
    }
}
