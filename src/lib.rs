//! Asset Remuneration - regulatory depreciation and fair-return cash-flow model
//!
//! This library provides:
//! - Year-0 normalization of a fixed-asset inventory (VNR, useful life, VMU)
//! - Portfolio totals with VNR-weighted averages
//! - Year-by-year depreciation projection under adjusted and unadjusted policies
//! - QRR/JCP/JR flows, present values and NPV
//! - CSV/JSON export of snapshots and flows

pub mod error;
pub mod asset;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{ModelError, ModelResult};
pub use asset::{AssetRecord, RawAsset};
pub use projection::{
    AmortizationMode, CashFlowSeries, FlowTiming, PortfolioSnapshot, ProjectionConfig,
    ProjectionEngine, ProjectionResult, YearFlow,
};
pub use scenario::{ScenarioResult, ScenarioRunner};
