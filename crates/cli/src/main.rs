//! `adplan` command line.
//!
//! ```text
//! adplan [--data-dir DIR] [REQUEST.json | -]   forecast a campaign (stdin when omitted)
//! adplan [--data-dir DIR] --summary            print the index load report and targeting options
//! ```

mod cli;
mod dto;
mod tables;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use adplan_forecast::{AggregateIndex, ForecastConfig, ForecastEngine, IndexSummary};

use crate::cli::Cli;
use crate::dto::ForecastRequestDto;
use crate::tables::JsonFileTables;

#[derive(Serialize)]
struct IndexReport {
    summary: IndexSummary,
    targeting_options: BTreeMap<String, Vec<String>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    adplan_observability::init();

    let config = ForecastConfig::from_env();
    config.validate().context("invalid forecast configuration")?;

    let tables = JsonFileTables::new(&cli.data_dir);
    tracing::info!(data_dir = %tables.dir().display(), "loading source tables");
    let index = Arc::new(AggregateIndex::load(&tables));

    let output = if cli.summary {
        serde_json::to_string_pretty(&IndexReport {
            summary: index.summary(),
            targeting_options: index.targeting_options(),
        })?
    } else {
        let engine = ForecastEngine::new(Arc::clone(&index), config);
        let raw = read_request(cli.request_path().map(|p| p.as_path()))?;
        let dto: ForecastRequestDto =
            serde_json::from_str(&raw).context("request is not valid JSON")?;
        let request = dto
            .into_request(Utc::now().date_naive())
            .context("invalid forecast request")?;
        serde_json::to_string_pretty(&engine.forecast(&request))?
    };

    println!("{output}");
    Ok(())
}

fn read_request(path: Option<&Path>) -> Result<String> {
    match path {
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read request from stdin")?;
            Ok(raw)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
    }
}
