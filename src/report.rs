//! CSV and JSON export of projection results
//!
//! Column names follow the ABAR spreadsheet layout so the files can be
//! pasted back into the regulatory workbook.

use crate::error::ModelResult;
use crate::projection::{CashFlowSeries, PortfolioSnapshot, ProjectionResult, YearFlowTable};
use crate::asset::TOTAL_LABEL;
use crate::scenario::ScenarioResult;
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Snapshot columns, in output order
pub const SNAPSHOT_COLUMNS: [&str; 10] = [
    "ATIVO",
    "VNR",
    "VIDA ÚTIL [ANOS]",
    "TAXA_DEP[R$/ANO]",
    "TAXA_DEP[%A.A.]",
    "DEP_ACUM[R$]",
    "DEP_ACUM[%]",
    "VIDA_UTIL_REM[%]",
    "VIDA_UTIL_REM[ANOS]",
    "VMU",
];

pub const YEAR_FLOW_COLUMNS: [&str; 4] = ["ANO", "QRR", "JCP", "JR"];

pub const CASH_FLOW_COLUMNS: [&str; 4] = ["PERIODO", "FLUXO", "VP", "VP_ACUM"];

/// Write one year's asset table with its TOTAL row
pub fn write_snapshot_csv<W: Write>(writer: W, snapshot: &PortfolioSnapshot) -> ModelResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(SNAPSHOT_COLUMNS)?;

    for row in snapshot.rows() {
        wtr.write_record([
            row.name.clone(),
            row.replacement_value.to_string(),
            row.useful_life_years.to_string(),
            row.depreciation_rate_value.to_string(),
            row.depreciation_rate_pct.to_string(),
            row.accumulated_depreciation_value.to_string(),
            row.accumulated_depreciation_pct.to_string(),
            row.remaining_life_pct.to_string(),
            row.remaining_life_years.to_string(),
            row.market_value_in_use.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write QRR/JCP/JR per year plus the TOTAL row
pub fn write_year_flows_csv<W: Write>(writer: W, flows: &YearFlowTable) -> ModelResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(YEAR_FLOW_COLUMNS)?;

    for row in &flows.rows {
        wtr.write_record([
            row.year.to_string(),
            row.qrr.to_string(),
            row.jcp.to_string(),
            row.jr.to_string(),
        ])?;
    }
    wtr.write_record([
        TOTAL_LABEL.to_string(),
        flows.total.qrr.to_string(),
        flows.total.jcp.to_string(),
        flows.total.jr.to_string(),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// Write the discounted cash flow; the NPV goes in a trailing VPL row
pub fn write_cash_flow_csv<W: Write>(writer: W, series: &CashFlowSeries) -> ModelResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(CASH_FLOW_COLUMNS)?;

    for point in &series.points {
        wtr.write_record([
            point.period.to_string(),
            point.flow.to_string(),
            point.present_value.to_string(),
            point.cumulative_present_value.to_string(),
        ])?;
    }
    wtr.write_record(["VPL".to_string(), String::new(), String::new(), series.npv.to_string()])?;

    wtr.flush()?;
    Ok(())
}

/// Write every table of one mode's run under `dir`
///
/// Layout: `ano_<n>.csv` per snapshot, `fluxo_dados.csv`, `fluxo_caixa.csv`.
pub fn write_projection_dir(dir: &Path, result: &ProjectionResult) -> ModelResult<()> {
    fs::create_dir_all(dir)?;

    for snapshot in &result.snapshots {
        let file = fs::File::create(dir.join(format!("ano_{}.csv", snapshot.year)))?;
        write_snapshot_csv(file, snapshot)?;
    }
    write_year_flows_csv(fs::File::create(dir.join("fluxo_dados.csv"))?, &result.flows)?;
    write_cash_flow_csv(fs::File::create(dir.join("fluxo_caixa.csv"))?, &result.cash_flow)?;

    log::info!("Wrote {} mode tables to {}", result.mode, dir.display());
    Ok(())
}

/// Write both modes, each under `<dir>/<mode>/`
pub fn write_run_directory(dir: &Path, scenario: &ScenarioResult) -> ModelResult<()> {
    for result in [&scenario.adjusted, &scenario.unadjusted] {
        write_projection_dir(&dir.join(result.mode.as_str()), result)?;
    }
    Ok(())
}

/// Pretty-printed JSON of any result type
pub fn write_json<W: Write, T: Serialize>(writer: W, value: &T) -> ModelResult<()> {
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::RawAsset;
    use crate::projection::{AmortizationMode, ProjectionConfig, ProjectionEngine};

    fn result() -> ProjectionResult {
        ProjectionEngine::new(ProjectionConfig::new(0.10, 2))
            .unwrap()
            .project_raw(
                &[
                    RawAsset::new("Adutora", 1000.0, 10.0, 1000.0),
                    RawAsset::new("Bomba", 200.0, 4.0, 100.0),
                ],
                AmortizationMode::Adjusted,
            )
            .unwrap()
    }

    #[test]
    fn test_snapshot_csv_layout() {
        let mut buf = Vec::new();
        write_snapshot_csv(&mut buf, &result().snapshots[0]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], SNAPSHOT_COLUMNS.join(","));
        assert!(lines[1].starts_with("Adutora,1000,10,100,0.1,0,0,1,10,1000"));
        assert!(lines[3].starts_with("TOTAL,1200,"));
    }

    #[test]
    fn test_year_flows_csv_has_total() {
        let mut buf = Vec::new();
        write_year_flows_csv(&mut buf, &result().flows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ANO,QRR,JCP,JR");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("0,"));
        assert!(lines[4].starts_with("TOTAL,"));
    }

    #[test]
    fn test_cash_flow_csv() {
        let mut buf = Vec::new();
        write_cash_flow_csv(&mut buf, &CashFlowSeries::from_flows(&[-100.0, 110.0], 0.10)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "PERIODO,FLUXO,VP,VP_ACUM");
        assert!(lines[1].starts_with("0,-100,-100,-100"));
        assert!(lines[2].ends_with(",0"));
        assert_eq!(lines[3], "VPL,,,0");
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        write_json(&mut buf, &result().summary()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["mode"], "adjusted");
        assert_eq!(value["years"], 2);
    }
}
