//! Dashboard rendering for the command line
//!
//! JSON prints the dashboard as the browser receives it. CSV prints three
//! tables separated by a blank line: the summary row, farms per state and
//! crop associations.

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::DashboardData;

use crate::config::{OutputConfig, OutputFormat};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRow {
    total_farms: u64,
    total_hectares: Decimal,
    arable: Decimal,
    vegetation: Decimal,
}

impl From<&DashboardData> for SummaryRow {
    fn from(data: &DashboardData) -> Self {
        Self {
            total_farms: data.total_farms,
            total_hectares: data.total_hectares,
            arable: data.land_use.arable,
            vegetation: data.land_use.vegetation,
        }
    }
}

pub fn render(data: &DashboardData, output: &OutputConfig) -> anyhow::Result<String> {
    match output.format {
        OutputFormat::Json if output.pretty => {
            serde_json::to_string_pretty(data).context("JSON serialization error")
        }
        OutputFormat::Json => serde_json::to_string(data).context("JSON serialization error"),
        OutputFormat::Csv => {
            let tables = [
                export_to_csv(&[SummaryRow::from(data)])?,
                export_to_csv(&data.farms_by_state)?,
                export_to_csv(&data.crops_grouped)?,
            ];
            Ok(tables.join("\n"))
        }
    }
}

/// Export rows to CSV format, header first. An empty slice gives an empty
/// string since the header comes from the first record.
pub fn export_to_csv<T: Serialize>(data: &[T]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record).context("CSV serialization error")?;
    }
    let bytes = wtr.into_inner().context("CSV writer error")?;
    String::from_utf8(bytes).context("UTF-8 conversion error")
}
