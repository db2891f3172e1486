//! Portfolio totals and VNR-weighted averages

use crate::asset::{ratio_or_zero, AssetRecord, TOTAL_LABEL};
use serde::{Deserialize, Serialize};

/// VNR-weighted average of one field over the assets
fn vnr_weighted(assets: &[AssetRecord], total_vnr: f64, field: impl Fn(&AssetRecord) -> f64) -> f64 {
    let weighted: f64 = assets.iter().map(|a| a.replacement_value * field(a)).sum();
    ratio_or_zero(weighted, total_vnr)
}

/// Build the TOTAL row for a set of asset records
///
/// Additive fields are summed. Intensive fields are VNR-weighted averages,
/// zeroed when the total VNR is 0. The remaining-life percentage is gated on
/// the aggregate depreciation rate instead of the total VNR.
pub fn aggregate(assets: &[AssetRecord]) -> AssetRecord {
    let total_vnr: f64 = assets.iter().map(|a| a.replacement_value).sum();
    let total_vmu: f64 = assets.iter().map(|a| a.market_value_in_use).sum();
    let total_rate_value: f64 = assets.iter().map(|a| a.depreciation_rate_value).sum();
    let total_accumulated: f64 = assets.iter().map(|a| a.accumulated_depreciation_value).sum();

    let (useful_life, accumulated_pct, rate_pct, remaining_years) = if total_vnr > 0.0 {
        (
            vnr_weighted(assets, total_vnr, |a| a.useful_life_years),
            vnr_weighted(assets, total_vnr, |a| a.accumulated_depreciation_pct),
            vnr_weighted(assets, total_vnr, |a| a.depreciation_rate_pct),
            vnr_weighted(assets, total_vnr, |a| a.remaining_life_years),
        )
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };

    let remaining_pct = if rate_pct > 0.0 {
        vnr_weighted(assets, total_vnr, |a| a.remaining_life_pct)
    } else {
        0.0
    };

    AssetRecord {
        name: TOTAL_LABEL.to_string(),
        replacement_value: total_vnr,
        useful_life_years: useful_life,
        depreciation_rate_value: total_rate_value,
        depreciation_rate_pct: rate_pct,
        accumulated_depreciation_value: total_accumulated,
        accumulated_depreciation_pct: accumulated_pct,
        remaining_life_pct: remaining_pct,
        remaining_life_years: remaining_years,
        market_value_in_use: total_vmu,
    }
}

/// All asset records of one projection year plus their TOTAL row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Projection year (0 = input position)
    pub year: u32,

    /// Per-asset records, in input order
    pub assets: Vec<AssetRecord>,

    /// Aggregate row
    pub total: AssetRecord,
}

impl PortfolioSnapshot {
    /// Aggregate the records of one year into a snapshot
    pub fn new(year: u32, assets: Vec<AssetRecord>) -> Self {
        let total = aggregate(&assets);
        Self { year, assets, total }
    }

    /// Asset rows followed by the TOTAL row, in output order
    pub fn rows(&self) -> impl Iterator<Item = &AssetRecord> {
        self.assets.iter().chain(std::iter::once(&self.total))
    }

    /// Look up an asset by name
    pub fn asset(&self, name: &str) -> Option<&AssetRecord> {
        self.assets.iter().find(|a| a.name == name)
    }

    /// Regulatory amortization quota, QRR = VNR × TAXA_DEP[%]
    pub fn amortization_quota(&self) -> f64 {
        self.total.replacement_value * self.total.depreciation_rate_pct
    }

    /// Return on capital, JCP = VMU × discount rate
    pub fn capital_interest(&self, discount_rate: f64) -> f64 {
        self.total.market_value_in_use * discount_rate
    }
}
