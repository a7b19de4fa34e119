//! Evidence artifacts for an acceptance run.
//!
//! Every run gets its own directory named after the run id. Each scenario
//! writes the exact input, the encoded payload, and the check-by-check
//! result, so a reviewer can replay any verdict from disk alone.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use efile_transport::codes::RejectCode;
use serde::Serialize;

use crate::runner::{CHECK_STRUCTURE, CHECK_TRANSMISSION, ScenarioResult, TransmissionMode};
use crate::scenarios::Scenario;

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub environment: String,
    pub transmission_mode: TransmissionMode,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<ScenarioResult>,
    pub evidence_path: String,
}

/// Run ids sort chronologically and stay filesystem-safe: the epoch
/// millisecond count rendered in base 36.
pub fn new_run_id(now: DateTime<Utc>) -> String {
    format!("ATS-{}", base36_upper(now.timestamp_millis() as u128))
}

fn base36_upper(mut value: u128) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Writes `input.json`, `return.xml`, and `result.json` for one scenario
/// under the run directory. Returns the scenario's evidence directory.
pub fn write_scenario_evidence(
    run_dir: &Path,
    scenario: &Scenario,
    result: &ScenarioResult,
) -> anyhow::Result<PathBuf> {
    let scenario_dir = run_dir.join(&result.scenario_id);
    fs::create_dir_all(&scenario_dir)
        .with_context(|| format!("failed to create {}", scenario_dir.display()))?;

    let input = serde_json::to_string_pretty(&scenario.tax_return)
        .context("failed to serialize scenario input")?;
    let input_path = scenario_dir.join("input.json");
    fs::write(&input_path, input)
        .with_context(|| format!("failed to write {}", input_path.display()))?;

    if let Some(xml) = &result.xml {
        let xml_path = scenario_dir.join("return.xml");
        fs::write(&xml_path, xml)
            .with_context(|| format!("failed to write {}", xml_path.display()))?;
    }

    let detail = serde_json::to_string_pretty(result)
        .context("failed to serialize scenario result")?;
    let result_path = scenario_dir.join("result.json");
    fs::write(&result_path, detail)
        .with_context(|| format!("failed to write {}", result_path.display()))?;

    tracing::debug!(scenario = %result.scenario_id, dir = %scenario_dir.display(), "evidence saved");
    Ok(scenario_dir)
}

/// Writes the run-level `report.json` and `report.md`.
pub fn write_run_report(run_dir: &Path, report: &RunReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize run report")?;
    let json_path = run_dir.join("report.json");
    fs::write(&json_path, json)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    let md_path = run_dir.join("report.md");
    fs::write(&md_path, markdown_report(report))
        .with_context(|| format!("failed to write {}", md_path.display()))?;

    tracing::info!(dir = %run_dir.display(), "run report saved");
    Ok(())
}

fn mark(passed: Option<bool>) -> &'static str {
    match passed {
        Some(true) => "✓",
        _ => "✗",
    }
}

fn markdown_report(report: &RunReport) -> String {
    let pass_rate = if report.total == 0 {
        0.0
    } else {
        report.passed as f64 / report.total as f64 * 100.0
    };

    let mut md = format!(
        "# ATS Test Run Report\n\n\
         **Run ID:** {}  \n\
         **Timestamp:** {}  \n\
         **Environment:** {}  \n\
         **Transmission Mode:** {}  \n\n\
         ## Summary\n\n\
         | Metric | Value |\n\
         |--------|-------|\n\
         | Total Scenarios | {} |\n\
         | Passed | {} |\n\
         | Failed | {} |\n\
         | Pass Rate | {:.1}% |\n\n\
         ## Results\n\n\
         | Scenario | Name | Structural | Transmitted | ACK | Status | Duration |\n\
         |----------|------|------------|-------------|-----|--------|----------|\n",
        report.run_id,
        report.started_at.to_rfc3339(),
        report.environment,
        report.transmission_mode.as_str(),
        report.total,
        report.passed,
        report.failed,
        pass_rate,
    );

    for result in &report.results {
        let ack = result
            .acknowledgment
            .as_ref()
            .map(|a| a.status.as_str())
            .unwrap_or("N/A");
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {}ms |\n",
            result.scenario_id,
            result.scenario_name,
            mark(result.check_passed(CHECK_STRUCTURE)),
            mark(result.check_passed(CHECK_TRANSMISSION)),
            ack,
            if result.passed { "**PASS**" } else { "**FAIL**" },
            result.duration_ms,
        ));
    }

    md.push_str("\n## Detailed Results\n\n");

    for result in &report.results {
        md.push_str(&format!(
            "### {}: {}\n\n\
             - **Timestamp:** {}\n\
             - **Submission ID:** {}\n\
             - **Receipt ID:** {}\n\
             - **DCN:** {}\n\
             - **XML Hash:** {}\n\n\
             **Checks:**\n",
            result.scenario_id,
            result.scenario_name,
            result.started_at.to_rfc3339(),
            result.submission_id.as_deref().unwrap_or("N/A"),
            result
                .outcome
                .as_ref()
                .and_then(|o| o.receipt_id.as_deref())
                .unwrap_or("N/A"),
            result
                .acknowledgment
                .as_ref()
                .and_then(|a| a.dcn.as_deref())
                .unwrap_or("N/A"),
            result.xml_hash.as_deref().unwrap_or("N/A"),
        ));
        for check in &result.checks {
            md.push_str(&format!(
                "- {} {}: {}\n",
                mark(Some(check.passed)),
                check.name,
                check.detail
            ));
        }

        if let Some(structural) = &result.structural {
            if !structural.errors.is_empty() || !structural.warnings.is_empty() {
                md.push_str("\n**Structural Findings:**\n");
                for issue in &structural.errors {
                    md.push_str(&format!("- error {}: {}\n", issue.code, issue.message));
                }
                for issue in &structural.warnings {
                    md.push_str(&format!("- warning {}: {}\n", issue.code, issue.message));
                }
            }
        }

        if let Some(ack) = &result.acknowledgment {
            if !ack.errors.is_empty() {
                md.push_str("\n**Acknowledgment Errors:**\n");
                for error in &ack.errors {
                    md.push_str(&format!("- {}: {}\n", error.code, error.message));
                    md.push_str(&format!(
                        "  - Remediation: {}\n",
                        RejectCode::parse(&error.code).remediation()
                    ));
                }
            }
        }

        md.push_str("\n---\n\n");
    }

    md.push_str(&format!(
        "\n## Evidence Files\n\n\
         All evidence artifacts are stored in: `{}`\n\n\
         Each scenario folder contains:\n\
         - `input.json` - Tax return input data\n\
         - `return.xml` - Generated MeF XML\n\
         - `result.json` - Detailed result data\n",
        report.evidence_path
    ));

    md
}
