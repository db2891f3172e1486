//! Scenario runner for the adjusted and unadjusted amortization policies
//!
//! Holds one validated configuration and runs projections for each mode
//! over the same year-0 records. The two runs share only immutable input.

use crate::asset::{normalize_portfolio, AssetRecord, RawAsset};
use crate::error::ModelResult;
use crate::projection::{AmortizationMode, ProjectionConfig, ProjectionEngine, ProjectionResult};
use serde::Serialize;

/// Results of both amortization policies for one portfolio
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub config: ProjectionConfig,
    pub adjusted: ProjectionResult,
    pub unadjusted: ProjectionResult,
}

impl ScenarioResult {
    pub fn get(&self, mode: AmortizationMode) -> &ProjectionResult {
        match mode {
            AmortizationMode::Adjusted => &self.adjusted,
            AmortizationMode::Unadjusted => &self.unadjusted,
        }
    }

    /// NPV difference, adjusted minus unadjusted
    pub fn npv_spread(&self) -> f64 {
        self.adjusted.npv() - self.unadjusted.npv()
    }
}

/// Pre-configured runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ProjectionConfig::new(0.10, 9))?;
/// let result = runner.run_both_raw(&raw_assets)?;
/// println!("VPL adjusted: {:.2}", result.adjusted.npv());
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(config: ProjectionConfig) -> ModelResult<Self> {
        Ok(Self {
            engine: ProjectionEngine::new(config)?,
        })
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }

    /// Run a single mode
    pub fn run(&self, initial: &[AssetRecord], mode: AmortizationMode) -> ProjectionResult {
        self.engine.project(initial, mode)
    }

    /// Run both modes concurrently over the same year-0 records
    pub fn run_both(&self, initial: &[AssetRecord]) -> ScenarioResult {
        let (adjusted, unadjusted) = rayon::join(
            || self.engine.project(initial, AmortizationMode::Adjusted),
            || self.engine.project(initial, AmortizationMode::Unadjusted),
        );

        ScenarioResult {
            config: self.engine.config().clone(),
            adjusted,
            unadjusted,
        }
    }

    /// Validate raw rows, then run both modes
    pub fn run_both_raw(&self, raw: &[RawAsset]) -> ModelResult<ScenarioResult> {
        let initial = normalize_portfolio(raw)?;
        Ok(self.run_both(&initial))
    }

    /// Run one mode for several discount rates, keeping the horizon and timing
    pub fn run_rates(
        &self,
        initial: &[AssetRecord],
        mode: AmortizationMode,
        rates: &[f64],
    ) -> ModelResult<Vec<ProjectionResult>> {
        rates
            .iter()
            .map(|&rate| {
                let config = ProjectionConfig {
                    discount_rate: rate,
                    ..self.config().clone()
                };
                Ok(ProjectionEngine::new(config)?.project(initial, mode))
            })
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self {
            engine: ProjectionEngine::default(),
        }
    }
}
