//! Year-by-year projection of asset state and remuneration cash flow

mod aggregate;
mod transition;
mod engine;
mod cashflows;
pub mod discount;

pub use aggregate::{aggregate, PortfolioSnapshot};
pub use transition::{advance_year, transition_asset, AmortizationMode, PARALLEL_THRESHOLD};
pub use engine::{
    nominal_flows, FlowTiming, ProjectionConfig, ProjectionEngine, DEFAULT_DISCOUNT_RATE,
    DEFAULT_HORIZON_YEARS,
};
pub use cashflows::{FlowTotals, ProjectionResult, ProjectionSummary, YearFlow, YearFlowTable};
pub use discount::{CashFlowPoint, CashFlowSeries};
