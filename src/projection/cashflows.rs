//! Yearly remuneration flows and projection output structures

use super::aggregate::PortfolioSnapshot;
use super::discount::CashFlowSeries;
use super::transition::AmortizationMode;
use serde::{Deserialize, Serialize};

/// Remuneration components of one projection year, taken from its TOTAL row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearFlow {
    pub year: u32,
    /// Regulatory amortization quota, VNR × TAXA_DEP[%A.A.]
    pub qrr: f64,
    /// Interest on capital, VMU × TMA
    pub jcp: f64,
    /// Fair return, QRR + JCP
    pub jr: f64,
}

impl YearFlow {
    pub fn from_snapshot(snapshot: &PortfolioSnapshot, discount_rate: f64) -> Self {
        let qrr = snapshot.amortization_quota();
        let jcp = snapshot.capital_interest(discount_rate);
        Self {
            year: snapshot.year,
            qrr,
            jcp,
            jr: qrr + jcp,
        }
    }
}

/// TOTAL row of the yearly flow table
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowTotals {
    /// QRR over years 0..=period
    pub qrr: f64,
    /// JCP over years 1..=period; year 0 is the baseline accrual
    pub jcp: f64,
    pub jr: f64,
}

/// QRR/JCP/JR per year plus totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearFlowTable {
    pub rows: Vec<YearFlow>,
    pub total: FlowTotals,
}

impl YearFlowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a year; rows are expected in year order starting at 0
    pub fn add_row(&mut self, row: YearFlow) {
        self.rows.push(row);
    }

    /// Recompute the TOTAL row from the current rows
    pub fn finalize(&mut self) {
        let qrr: f64 = self.rows.iter().map(|r| r.qrr).sum();
        let jcp: f64 = self.rows.iter().skip(1).map(|r| r.jcp).sum();
        self.total = FlowTotals { qrr, jcp, jr: qrr + jcp };
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, year: u32) -> Option<&YearFlow> {
        self.rows.get(year as usize)
    }
}

/// Complete result of one projection run for one amortization mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub mode: AmortizationMode,

    /// Snapshots for years 0..=horizon
    pub snapshots: Vec<PortfolioSnapshot>,

    /// Yearly QRR/JCP/JR
    pub flows: YearFlowTable,

    /// Discounted cash flow and NPV
    pub cash_flow: CashFlowSeries,
}

impl ProjectionResult {
    /// Net present value (VPL) of the run
    pub fn npv(&self) -> f64 {
        self.cash_flow.npv
    }

    /// Snapshot for a given year
    pub fn snapshot(&self, year: u32) -> Option<&PortfolioSnapshot> {
        self.snapshots.get(year as usize)
    }

    pub fn summary(&self) -> ProjectionSummary {
        let initial = self.snapshots.first().map(|s| &s.total);
        let last = self.snapshots.last().map(|s| &s.total);

        ProjectionSummary {
            mode: self.mode,
            years: self.snapshots.len().saturating_sub(1) as u32,
            initial_vnr: initial.map(|t| t.replacement_value).unwrap_or(0.0),
            initial_vmu: initial.map(|t| t.market_value_in_use).unwrap_or(0.0),
            final_vnr: last.map(|t| t.replacement_value).unwrap_or(0.0),
            final_vmu: last.map(|t| t.market_value_in_use).unwrap_or(0.0),
            total_qrr: self.flows.total.qrr,
            total_jcp: self.flows.total.jcp,
            total_jr: self.flows.total.jr,
            npv: self.cash_flow.npv,
        }
    }
}

/// Headline figures for a projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub mode: AmortizationMode,
    pub years: u32,
    pub initial_vnr: f64,
    pub initial_vmu: f64,
    pub final_vnr: f64,
    pub final_vmu: f64,
    pub total_qrr: f64,
    pub total_jcp: f64,
    pub total_jr: f64,
    pub npv: f64,
}
