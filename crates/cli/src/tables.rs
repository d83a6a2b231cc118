//! Source tables stored as JSON arrays of rows.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use adplan_forecast::{FillRateRow, InventoryRow, SourceError, TableSource};

pub const FILL_RATES_FILE: &str = "fill_rates.json";
pub const INVENTORY_FILE: &str = "inventory.json";

/// Reads `fill_rates.json` and `inventory.json` from a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileTables {
    dir: PathBuf,
}

impl JsonFileTables {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableSource for JsonFileTables {
    fn fill_rates(&self) -> Result<Vec<FillRateRow>, SourceError> {
        read_rows(&self.dir.join(FILL_RATES_FILE))
    }

    fn inventory(&self) -> Result<Vec<InventoryRow>, SourceError> {
        read_rows(&self.dir.join(INVENTORY_FILE))
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SourceError::unavailable(format!("{} not found", path.display())),
        _ => SourceError::unavailable(format!("{}: {e}", path.display())),
    })?;
    serde_json::from_str(&raw).map_err(|e| SourceError::malformed(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_rows_from_json_files() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(FILL_RATES_FILE),
            r#"[{"dimension_value_key":"network:hulu","request_count":10,"fill_rate":0.2}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(INVENTORY_FILE),
            r#"[{"dimension_value_key":"network:hulu","count":500}]"#,
        )
        .unwrap();

        let tables = JsonFileTables::new(dir.path());
        assert_eq!(tables.dir(), dir.path());
        assert_eq!(tables.fill_rates().unwrap(), vec![FillRateRow::new("network:hulu", 10, 0.2)]);
        assert_eq!(tables.inventory().unwrap(), vec![InventoryRow::new("network:hulu", 500)]);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let err = JsonFileTables::new(dir.path()).fill_rates().unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(INVENTORY_FILE), "{not json").unwrap();
        let err = JsonFileTables::new(dir.path()).inventory().unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }
}
