//! Load the asset inventory from a CSV export of the ABAR spreadsheet

use super::RawAsset;
use crate::error::{ModelError, ModelResult};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

pub const COL_NAME: &str = "ATIVO";
pub const COL_VNR: &str = "VNR";
pub const COL_USEFUL_LIFE: &str = "VIDA ÚTIL [ANOS]";
pub const COL_VMU: &str = "VMU";

/// Spreadsheets exported without accents
const COL_USEFUL_LIFE_ALIAS: &str = "VIDA UTIL [ANOS]";

/// Header names are matched trimmed and upper-cased
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    name: usize,
    vnr: usize,
    useful_life: usize,
    vmu: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> ModelResult<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_column_name).collect();
        let find = |wanted: &[&str]| -> ModelResult<usize> {
            normalized
                .iter()
                .position(|h| wanted.contains(&h.as_str()))
                .ok_or_else(|| ModelError::MissingColumn {
                    column: wanted[0].to_string(),
                })
        };

        Ok(Self {
            name: find(&[COL_NAME])?,
            vnr: find(&[COL_VNR])?,
            useful_life: find(&[COL_USEFUL_LIFE, COL_USEFUL_LIFE_ALIAS])?,
            vmu: find(&[COL_VMU])?,
        })
    }

    fn to_raw(&self, row: usize, record: &StringRecord) -> ModelResult<RawAsset> {
        let name = record.get(self.name).unwrap_or("").trim().to_string();
        let number = |idx: usize, column: &str| -> ModelResult<f64> {
            let cell = record.get(idx).unwrap_or("").trim();
            cell.parse::<f64>().map_err(|_| {
                ModelError::data_quality(
                    row,
                    &name,
                    format!("column {} is not a number: '{}'", column, cell),
                )
            })
        };

        Ok(RawAsset {
            replacement_value: number(self.vnr, COL_VNR)?,
            useful_life_years: number(self.useful_life, COL_USEFUL_LIFE)?,
            market_value_in_use: number(self.vmu, COL_VMU)?,
            name,
        })
    }
}

/// Load raw asset rows from a CSV file
pub fn load_assets<P: AsRef<Path>>(path: P) -> ModelResult<Vec<RawAsset>> {
    let file = std::fs::File::open(path)?;
    load_assets_from_reader(file)
}

/// Load raw asset rows from any reader (e.g., string buffer, network stream)
pub fn load_assets_from_reader<R: std::io::Read>(reader: R) -> ModelResult<Vec<RawAsset>> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = ColumnMap::from_headers(csv_reader.headers()?)?;
    let mut assets = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        assets.push(columns.to_raw(row, &record)?);
    }

    log::debug!("Loaded {} asset rows", assets.len());
    Ok(assets)
}
