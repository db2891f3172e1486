//! Present-value discounting of the remuneration cash flow
//!
//! Flows are annual and discounted at a single rate:
//! - `VP(n) = flow(n) / (1 + rate)^n`
//! - `VP_ACUM(n) = VP(0) + ... + VP(n)`
//! - `VPL = sum of all VP(n)`
//!
//! Cumulative values and the NPV are snapped to exactly 0 below
//! [`SNAP_TOLERANCE`] so that exact cancellations do not show float residue.

use serde::{Deserialize, Serialize};

/// Magnitude below which cumulative present values and the NPV read as 0
pub const SNAP_TOLERANCE: f64 = 1e-4;

/// Replace float residue around zero with exactly 0
pub fn snap_to_zero(value: f64) -> f64 {
    if value.abs() < SNAP_TOLERANCE {
        0.0
    } else {
        value
    }
}

/// Annual discount factor to period `n`
pub fn discount_factor(rate: f64, period: u32) -> f64 {
    1.0 / (1.0 + rate).powi(period as i32)
}

/// Present value of a single flow at period `n`
pub fn present_value(flow: f64, rate: f64, period: u32) -> f64 {
    flow / (1.0 + rate).powi(period as i32)
}

/// One period of the discounted cash flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPoint {
    pub period: u32,
    /// Nominal flow (FLUXO)
    pub flow: f64,
    /// Present value (VP)
    pub present_value: f64,
    /// Cumulative present value (VP_ACUM), snapped
    pub cumulative_present_value: f64,
}

/// Discounted cash-flow series with its net present value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSeries {
    /// Annual discount rate (TMA)
    pub discount_rate: f64,

    pub points: Vec<CashFlowPoint>,

    /// Net present value (VPL), snapped
    pub npv: f64,
}

impl CashFlowSeries {
    /// Discount a nominal flow series indexed from period 0
    pub fn from_flows(flows: &[f64], discount_rate: f64) -> Self {
        let mut points = Vec::with_capacity(flows.len());
        let mut cumulative = 0.0;

        for (period, &flow) in flows.iter().enumerate() {
            let period = period as u32;
            let pv = present_value(flow, discount_rate, period);
            cumulative += pv;
            points.push(CashFlowPoint {
                period,
                flow,
                present_value: pv,
                cumulative_present_value: snap_to_zero(cumulative),
            });
        }

        let npv: f64 = points.iter().map(|p| p.present_value).sum();

        Self {
            discount_rate,
            points,
            npv: snap_to_zero(npv),
        }
    }

    /// Nominal flows in period order
    pub fn flows(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.flow).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
