//! Asset records and the year-0 normalizer

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Reserved name of the aggregate row in every snapshot
pub const TOTAL_LABEL: &str = "TOTAL";

/// Divide, resolving a zero denominator or a non-finite quotient to 0
pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Raw input row as delivered by the spreadsheet export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAsset {
    /// Asset name (ATIVO)
    pub name: String,

    /// Replacement value, VNR
    pub replacement_value: f64,

    /// Useful life in years, VIDA ÚTIL [ANOS]
    pub useful_life_years: f64,

    /// Market value in use, VMU
    pub market_value_in_use: f64,
}

impl RawAsset {
    pub fn new(
        name: impl Into<String>,
        replacement_value: f64,
        useful_life_years: f64,
        market_value_in_use: f64,
    ) -> Self {
        Self {
            name: name.into(),
            replacement_value,
            useful_life_years,
            market_value_in_use,
        }
    }
}

/// Financial state of one asset (or the TOTAL row) in one projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// ATIVO
    pub name: String,

    /// VNR
    pub replacement_value: f64,

    /// VIDA ÚTIL [ANOS], carried unchanged through the projection
    pub useful_life_years: f64,

    /// TAXA_DEP[R$/ANO]
    pub depreciation_rate_value: f64,

    /// TAXA_DEP[%A.A.]
    pub depreciation_rate_pct: f64,

    /// DEP_ACUM[R$]
    pub accumulated_depreciation_value: f64,

    /// DEP_ACUM[%]
    pub accumulated_depreciation_pct: f64,

    /// VIDA_UTIL_REM[%]
    pub remaining_life_pct: f64,

    /// VIDA_UTIL_REM[ANOS]
    pub remaining_life_years: f64,

    /// VMU
    pub market_value_in_use: f64,
}

impl AssetRecord {
    /// Derive the year-0 record from a raw row, without validation
    pub fn from_raw(raw: &RawAsset) -> Self {
        let vnr = raw.replacement_value;
        let life = raw.useful_life_years;
        let accumulated = vnr - raw.market_value_in_use;
        let accumulated_pct = ratio_or_zero(accumulated, vnr);
        // A retired asset (VNR = 0) has no remaining life
        let remaining_pct = if vnr > 0.0 { 1.0 - accumulated_pct } else { 0.0 };

        Self {
            name: raw.name.clone(),
            replacement_value: vnr,
            useful_life_years: life,
            depreciation_rate_value: ratio_or_zero(vnr, life),
            depreciation_rate_pct: ratio_or_zero(1.0, life),
            accumulated_depreciation_value: accumulated,
            accumulated_depreciation_pct: accumulated_pct,
            remaining_life_pct: remaining_pct,
            remaining_life_years: life * remaining_pct,
            market_value_in_use: raw.market_value_in_use,
        }
    }

    /// Whether this is the synthetic aggregate row
    pub fn is_total(&self) -> bool {
        self.name == TOTAL_LABEL
    }
}

/// Reject rows that indicate upstream data corruption
fn validate_raw(row: usize, raw: &RawAsset) -> ModelResult<()> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(ModelError::data_quality(row, &raw.name, "asset name is empty"));
    }
    if name.eq_ignore_ascii_case(TOTAL_LABEL) {
        return Err(ModelError::data_quality(
            row,
            &raw.name,
            "asset name TOTAL is reserved for the aggregate row",
        ));
    }

    let vnr = raw.replacement_value;
    if !vnr.is_finite() || vnr < 0.0 {
        return Err(ModelError::data_quality(
            row,
            &raw.name,
            format!("VNR must be a non-negative number, got {}", vnr),
        ));
    }

    let vmu = raw.market_value_in_use;
    if !vmu.is_finite() || vmu < 0.0 {
        return Err(ModelError::data_quality(
            row,
            &raw.name,
            format!("VMU must be a non-negative number, got {}", vmu),
        ));
    }
    if vmu > vnr {
        return Err(ModelError::data_quality(
            row,
            &raw.name,
            format!("VMU ({}) exceeds VNR ({})", vmu, vnr),
        ));
    }

    let life = raw.useful_life_years;
    if !life.is_finite() || life < 0.0 {
        return Err(ModelError::data_quality(
            row,
            &raw.name,
            format!("useful life must be a non-negative number, got {}", life),
        ));
    }
    // Life only becomes irrelevant once the asset has no replacement value
    if life == 0.0 && vnr > 0.0 {
        return Err(ModelError::data_quality(
            row,
            &raw.name,
            "useful life must be positive for an asset with VNR > 0",
        ));
    }

    Ok(())
}

/// Validate the raw portfolio and derive every year-0 record
///
/// Fails on the first malformed row; input order is preserved.
pub fn normalize_portfolio(raw: &[RawAsset]) -> ModelResult<Vec<AssetRecord>> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut records = Vec::with_capacity(raw.len());

    for (row, asset) in raw.iter().enumerate() {
        validate_raw(row, asset)?;
        if !seen.insert(asset.name.trim().to_string()) {
            return Err(ModelError::data_quality(row, &asset.name, "duplicate asset name"));
        }
        records.push(AssetRecord::from_raw(asset));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_year_zero_derivation() {
        let raw = RawAsset::new("Rede Coletora", 1000.0, 10.0, 600.0);
        let rec = AssetRecord::from_raw(&raw);

        assert_relative_eq!(rec.depreciation_rate_value, 100.0, epsilon = 1e-9);
        assert_relative_eq!(rec.depreciation_rate_pct, 0.1, epsilon = 1e-9);
        assert_relative_eq!(rec.accumulated_depreciation_value, 400.0, epsilon = 1e-9);
        assert_relative_eq!(rec.accumulated_depreciation_pct, 0.4, epsilon = 1e-9);
        assert_relative_eq!(rec.remaining_life_pct, 0.6, epsilon = 1e-9);
        assert_relative_eq!(rec.remaining_life_years, 6.0, epsilon = 1e-9);
        assert_relative_eq!(rec.market_value_in_use, 600.0, epsilon = 1e-9);
    }

    #[test]
    fn test_retired_asset_zero_guards() {
        let raw = RawAsset::new("Poço Desativado", 0.0, 0.0, 0.0);
        let records = normalize_portfolio(&[raw]).unwrap();
        let rec = &records[0];

        assert_eq!(rec.depreciation_rate_value, 0.0);
        assert_eq!(rec.depreciation_rate_pct, 0.0);
        assert_eq!(rec.accumulated_depreciation_pct, 0.0);
        assert_eq!(rec.remaining_life_pct, 0.0);
        assert_eq!(rec.remaining_life_years, 0.0);
    }

    #[test]
    fn test_rejects_negative_vnr() {
        let err = normalize_portfolio(&[RawAsset::new("A", -1.0, 10.0, 0.0)]).unwrap_err();
        assert!(matches!(err, ModelError::DataQuality { row: 0, .. }));
    }

    #[test]
    fn test_rejects_vmu_above_vnr() {
        let raw = vec![
            RawAsset::new("A", 100.0, 10.0, 50.0),
            RawAsset::new("B", 100.0, 10.0, 150.0),
        ];
        match normalize_portfolio(&raw).unwrap_err() {
            ModelError::DataQuality { row, asset, .. } => {
                assert_eq!(row, 1);
                assert_eq!(asset, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_zero_life_with_value() {
        let err = normalize_portfolio(&[RawAsset::new("A", 100.0, 0.0, 100.0)]).unwrap_err();
        assert!(matches!(err, ModelError::DataQuality { .. }));
    }

    #[test]
    fn test_rejects_reserved_and_duplicate_names() {
        assert!(normalize_portfolio(&[RawAsset::new(" total ", 1.0, 1.0, 1.0)]).is_err());

        let dup = vec![
            RawAsset::new("A", 1.0, 1.0, 1.0),
            RawAsset::new("A", 2.0, 1.0, 1.0),
        ];
        assert!(normalize_portfolio(&dup).is_err());
    }

    #[test]
    fn test_ratio_or_zero() {
        assert_eq!(ratio_or_zero(5.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(0.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(f64::MAX, 1e-300), 0.0);
        assert_relative_eq!(ratio_or_zero(1.0, 4.0), 0.25, epsilon = 1e-9);
    }
}
