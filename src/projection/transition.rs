//! Year-over-year recurrence for asset depreciation state

use super::aggregate::PortfolioSnapshot;
use crate::asset::{ratio_or_zero, AssetRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Portfolios at least this large are transitioned with rayon
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Policy for the replacement value of assets near the end of their life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmortizationMode {
    /// VNR is scaled down by the remaining life once it drops below one year
    Adjusted,
    /// VNR is kept until the asset is fully depreciated
    Unadjusted,
}

impl AmortizationMode {
    pub const ALL: [AmortizationMode; 2] = [AmortizationMode::Adjusted, AmortizationMode::Unadjusted];

    pub fn as_str(&self) -> &'static str {
        match self {
            AmortizationMode::Adjusted => "adjusted",
            AmortizationMode::Unadjusted => "unadjusted",
        }
    }

    /// Replacement value for year n given the year n-1 value and the
    /// year n accumulated depreciation and remaining life
    pub fn next_replacement_value(
        &self,
        prior_vnr: f64,
        accumulated: f64,
        remaining_life_years: f64,
    ) -> f64 {
        if prior_vnr == accumulated {
            return 0.0;
        }
        match self {
            AmortizationMode::Adjusted if remaining_life_years < 1.0 => remaining_life_years * prior_vnr,
            _ => prior_vnr,
        }
    }
}

impl std::fmt::Display for AmortizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advance one asset from year n-1 to year n
///
/// The evaluation order matters: VNR(n) depends on this year's accumulated
/// depreciation and remaining life (both computed from VNR(n-1)), and
/// DEP_ACUM[%](n) is taken against the new VNR(n).
pub fn transition_asset(prior: &AssetRecord, mode: AmortizationMode) -> AssetRecord {
    let prior_vnr = prior.replacement_value;
    let life = prior.useful_life_years;

    let rate_value = ratio_or_zero(prior_vnr, life);
    let rate_pct = ratio_or_zero(1.0, life);
    let accumulated = (prior.accumulated_depreciation_value + rate_value).min(prior_vnr);
    let market_value = prior_vnr - accumulated;
    let remaining_pct = ratio_or_zero(market_value, prior_vnr);
    let remaining_years = life * remaining_pct;

    let vnr = mode.next_replacement_value(prior_vnr, accumulated, remaining_years);

    AssetRecord {
        name: prior.name.clone(),
        replacement_value: vnr,
        useful_life_years: life,
        depreciation_rate_value: rate_value,
        depreciation_rate_pct: rate_pct,
        accumulated_depreciation_value: accumulated,
        accumulated_depreciation_pct: ratio_or_zero(accumulated, vnr),
        remaining_life_pct: remaining_pct,
        remaining_life_years: remaining_years,
        market_value_in_use: market_value,
    }
}

/// Build year n's snapshot from year n-1's (TOTAL row excluded from the recurrence)
pub fn advance_year(prior: &PortfolioSnapshot, mode: AmortizationMode) -> PortfolioSnapshot {
    let assets: Vec<AssetRecord> = if prior.assets.len() >= PARALLEL_THRESHOLD {
        prior.assets.par_iter().map(|a| transition_asset(a, mode)).collect()
    } else {
        prior.assets.iter().map(|a| transition_asset(a, mode)).collect()
    };

    PortfolioSnapshot::new(prior.year + 1, assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{normalize_portfolio, RawAsset};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn record(vnr: f64, life: f64, vmu: f64) -> AssetRecord {
        normalize_portfolio(&[RawAsset::new("A", vnr, life, vmu)]).unwrap().remove(0)
    }

    #[test]
    fn test_new_asset_first_year() {
        let prior = record(1000.0, 10.0, 1000.0);
        for mode in AmortizationMode::ALL {
            let next = transition_asset(&prior, mode);
            assert_relative_eq!(next.depreciation_rate_value, 100.0, epsilon = 1e-9);
            assert_relative_eq!(next.depreciation_rate_pct, 0.1, epsilon = 1e-9);
            assert_relative_eq!(next.accumulated_depreciation_value, 100.0, epsilon = 1e-9);
            assert_relative_eq!(next.market_value_in_use, 900.0, epsilon = 1e-9);
            assert_relative_eq!(next.remaining_life_pct, 0.9, epsilon = 1e-9);
            assert_relative_eq!(next.remaining_life_years, 9.0, epsilon = 1e-9);
            assert_relative_eq!(next.replacement_value, 1000.0, epsilon = 1e-9);
            assert_relative_eq!(next.accumulated_depreciation_pct, 0.1, epsilon = 1e-9);
            assert_eq!(next.useful_life_years, 10.0);
            assert_eq!(next.name, "A");
        }
    }

    #[test]
    fn test_full_depreciation_zeroes_vnr_in_both_modes() {
        // 950 accumulated + 100 rate clamps at VNR
        let prior = record(1000.0, 10.0, 50.0);
        for mode in AmortizationMode::ALL {
            let next = transition_asset(&prior, mode);
            assert_eq!(next.accumulated_depreciation_value, 1000.0);
            assert_eq!(next.replacement_value, 0.0);
            assert_eq!(next.market_value_in_use, 0.0);
            assert_eq!(next.accumulated_depreciation_pct, 0.0);
            assert_eq!(next.remaining_life_pct, 0.0);
        }
    }

    #[test]
    fn test_adjusted_scales_vnr_below_one_year() {
        // 850 accumulated: year 1 leaves VMU 50 < rate 100, remaining life 0.5 years
        let prior = record(1000.0, 10.0, 150.0);
        let adjusted = transition_asset(&prior, AmortizationMode::Adjusted);
        let unadjusted = transition_asset(&prior, AmortizationMode::Unadjusted);

        assert_relative_eq!(adjusted.remaining_life_years, 0.5, epsilon = 1e-9);
        assert_relative_eq!(adjusted.replacement_value, 500.0, epsilon = 1e-9);
        assert_relative_eq!(unadjusted.replacement_value, 1000.0, epsilon = 1e-9);
        assert!(adjusted.replacement_value < unadjusted.replacement_value);

        // DEP_ACUM[%] uses the new VNR, not the prior one
        assert_relative_eq!(adjusted.accumulated_depreciation_pct, 950.0 / 500.0, epsilon = 1e-9);
        assert_relative_eq!(unadjusted.accumulated_depreciation_pct, 0.95, epsilon = 1e-9);

        // VMU and remaining life are computed before the VNR branch
        assert_relative_eq!(adjusted.market_value_in_use, unadjusted.market_value_in_use, epsilon = 1e-9);
    }

    #[test]
    fn test_retired_asset_stays_at_zero() {
        let mut prior = record(1000.0, 10.0, 0.0);
        prior.replacement_value = 0.0;
        for mode in AmortizationMode::ALL {
            let next = transition_asset(&prior, mode);
            assert_eq!(next.replacement_value, 0.0);
            assert_eq!(next.depreciation_rate_value, 0.0);
            assert_eq!(next.accumulated_depreciation_value, 0.0);
            assert_eq!(next.accumulated_depreciation_pct, 0.0);
            assert_eq!(next.remaining_life_pct, 0.0);
            assert_eq!(next.market_value_in_use, 0.0);
        }
    }

    #[test]
    fn test_zero_life_guard() {
        let mut prior = record(0.0, 0.0, 0.0);
        prior.replacement_value = 500.0;
        let next = transition_asset(&prior, AmortizationMode::Unadjusted);

        assert_eq!(next.depreciation_rate_value, 0.0);
        assert_eq!(next.depreciation_rate_pct, 0.0);
        assert!(next.accumulated_depreciation_pct.is_finite());
        assert!(next.remaining_life_pct.is_finite());
    }

    #[test]
    fn test_mode_branch() {
        let m = AmortizationMode::Adjusted;
        assert_eq!(m.next_replacement_value(100.0, 100.0, 0.0), 0.0);
        assert_abs_diff_eq!(m.next_replacement_value(100.0, 95.0, 0.5), 50.0);
        assert_eq!(m.next_replacement_value(100.0, 50.0, 5.0), 100.0);
        assert_eq!(AmortizationMode::Unadjusted.next_replacement_value(100.0, 95.0, 0.5), 100.0);
    }

    #[test]
    fn test_advance_year_keeps_order_and_conserves_value() {
        let assets = normalize_portfolio(&[
            RawAsset::new("A", 1000.0, 10.0, 700.0),
            RawAsset::new("B", 400.0, 4.0, 100.0),
            RawAsset::new("C", 0.0, 0.0, 0.0),
        ])
        .unwrap();
        let year0 = PortfolioSnapshot::new(0, assets);
        let year1 = advance_year(&year0, AmortizationMode::Unadjusted);

        assert_eq!(year1.year, 1);
        let names: Vec<_> = year1.assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_abs_diff_eq!(
            year1.total.market_value_in_use,
            year0.total.replacement_value - year1.total.accumulated_depreciation_value,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_parallel_path_matches_sequential() {
        let raw: Vec<RawAsset> = (0..PARALLEL_THRESHOLD + 10)
            .map(|i| RawAsset::new(format!("A{i}"), 100.0 + i as f64, 1.0 + (i % 40) as f64, 50.0))
            .collect();
        let year0 = PortfolioSnapshot::new(0, normalize_portfolio(&raw).unwrap());
        let parallel = advance_year(&year0, AmortizationMode::Adjusted);
        let sequential: Vec<AssetRecord> = year0
            .assets
            .iter()
            .map(|a| transition_asset(a, AmortizationMode::Adjusted))
            .collect();

        assert_eq!(parallel.assets, sequential);
    }
}
