//! Cash-flow builder: drives the yearly recurrence over the horizon

use super::aggregate::PortfolioSnapshot;
use super::cashflows::{ProjectionResult, YearFlow, YearFlowTable};
use super::discount::CashFlowSeries;
use super::transition::{advance_year, AmortizationMode};
use crate::asset::{normalize_portfolio, AssetRecord, RawAsset};
use crate::error::{ModelError, ModelResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default discount rate (TMA)
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.10;

/// Default projection horizon in years
pub const DEFAULT_HORIZON_YEARS: u32 = 9;

/// Placement of each year's fair return in the nominal cash flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowTiming {
    /// flow(n) = JR(n) for n = 1..=horizon
    #[default]
    SameYear,
    /// flow(n) = JR(n-1) for n = 1..=horizon+1 (JR earned on the position at
    /// the start of the year, received at its end)
    Lagged,
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Discount rate (TMA) as a fraction, also the JCP interest rate
    pub discount_rate: f64,

    /// Number of year transitions to project
    pub horizon_years: u32,

    /// How JR maps onto cash-flow periods
    pub flow_timing: FlowTiming,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            discount_rate: DEFAULT_DISCOUNT_RATE,
            horizon_years: DEFAULT_HORIZON_YEARS,
            flow_timing: FlowTiming::SameYear,
        }
    }
}

impl ProjectionConfig {
    pub fn new(discount_rate: f64, horizon_years: u32) -> Self {
        Self {
            discount_rate,
            horizon_years,
            ..Default::default()
        }
    }

    pub fn with_flow_timing(mut self, flow_timing: FlowTiming) -> Self {
        self.flow_timing = flow_timing;
        self
    }

    /// Load a configuration from a JSON file; absent fields take defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let file = std::fs::File::open(path)?;
        let config: ProjectionConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(ModelError::invalid_config(
                "discount_rate",
                format!("must be a finite rate greater than -100%, got {}", self.discount_rate),
            ));
        }
        if self.horizon_years == 0 {
            return Err(ModelError::invalid_config("horizon_years", "must be at least 1"));
        }
        Ok(())
    }
}

/// Nominal cash flow: the year-0 capital outlay followed by the yearly JR
pub fn nominal_flows(initial_vmu: f64, flows: &YearFlowTable, timing: FlowTiming) -> Vec<f64> {
    let outlay = std::iter::once(-initial_vmu);
    let returns = flows.rows.iter().map(|r| r.jr);
    match timing {
        FlowTiming::SameYear => outlay.chain(returns.skip(1)).collect(),
        FlowTiming::Lagged => outlay.chain(returns).collect(),
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create an engine, rejecting invalid parameters
    pub fn new(config: ProjectionConfig) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Validate raw input rows and project them
    pub fn project_raw(&self, raw: &[RawAsset], mode: AmortizationMode) -> ModelResult<ProjectionResult> {
        let initial = normalize_portfolio(raw)?;
        Ok(self.project(&initial, mode))
    }

    /// Project normalized year-0 records over the horizon
    pub fn project(&self, initial: &[AssetRecord], mode: AmortizationMode) -> ProjectionResult {
        let rate = self.config.discount_rate;
        let horizon = self.config.horizon_years;
        info!(
            "Projecting {} assets over {} years ({} mode, TMA {})",
            initial.len(),
            horizon,
            mode,
            rate
        );

        let mut snapshots = Vec::with_capacity(horizon as usize + 1);
        let mut flows = YearFlowTable::new();

        let mut current = PortfolioSnapshot::new(0, initial.to_vec());
        flows.add_row(YearFlow::from_snapshot(&current, rate));

        for _ in 0..horizon {
            let next = advance_year(&current, mode);
            let row = YearFlow::from_snapshot(&next, rate);
            debug!(
                "Year {}: VNR={:.2} VMU={:.2} QRR={:.2} JCP={:.2}",
                next.year, next.total.replacement_value, next.total.market_value_in_use, row.qrr, row.jcp
            );
            if current.total.replacement_value > 0.0 && next.total.replacement_value == 0.0 {
                warn!(
                    "Portfolio fully depreciated in year {} of {} ({} mode)",
                    next.year, horizon, mode
                );
            }
            flows.add_row(row);
            snapshots.push(std::mem::replace(&mut current, next));
        }
        snapshots.push(current);
        flows.finalize();

        let initial_vmu = snapshots[0].total.market_value_in_use;
        let cash_flow = CashFlowSeries::from_flows(
            &nominal_flows(initial_vmu, &flows, self.config.flow_timing),
            rate,
        );

        info!("Projection complete ({} mode): VPL={:.2}", mode, cash_flow.npv);

        ProjectionResult {
            mode,
            snapshots,
            flows,
            cash_flow,
        }
    }
}
