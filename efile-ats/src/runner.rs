//! Drives one scenario through the full pipeline and records every check.
//!
//! The pipeline stops at the first failed check. A return that fails
//! business rules is never encoded, and one that fails structural checks
//! is never transmitted, mirroring how a production filing would halt.

use std::time::Instant;

use chrono::{DateTime, Utc};
use efile_core::calc::ReturnCalculator;
use efile_core::encode::{self, EncodeContext};
use efile_core::model::{Acknowledgment, ComputedResult, SubmissionStatus};
use efile_core::params::TaxParameters;
use efile_core::rules;
use efile_core::structure::{StructuralReport, StructuralValidator};
use efile_transport::gateway::{MefGateway, TransmitOutcome};
use efile_transport::tracker::SubmissionTracker;
use serde::Serialize;

use crate::scenarios::Scenario;

pub const CHECK_BUSINESS_RULES: &str = "business-rules";
pub const CHECK_COMPUTATION: &str = "computation";
pub const CHECK_STRUCTURE: &str = "structural-validity";
pub const CHECK_TRANSMISSION: &str = "transmission";
pub const CHECK_ACKNOWLEDGMENT: &str = "acknowledgment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransmissionMode {
    Simulated,
    Real,
}

impl TransmissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Real => "real",
        }
    }
}

/// Everything a scenario run needs that outlives a single scenario.
pub struct RunContext<'a> {
    pub params: &'a TaxParameters,
    pub gateway: &'a dyn MefGateway,
    pub efin: String,
    pub software_id: String,
    pub mode: TransmissionMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

/// Record of one scenario run. Serialized as-is into the evidence
/// directory, except for the payload which is written to its own file.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_id: String,
    pub scenario_name: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub transmission_mode: TransmissionMode,
    pub passed: bool,
    pub checks: Vec<CheckResult>,
    pub submission_id: Option<String>,
    pub xml_hash: Option<String>,
    pub computed: Option<ComputedResult>,
    pub structural: Option<StructuralReport>,
    pub outcome: Option<TransmitOutcome>,
    pub acknowledgment: Option<Acknowledgment>,
    #[serde(skip)]
    pub xml: Option<String>,
}

impl ScenarioResult {
    fn begin(scenario: &Scenario, mode: TransmissionMode) -> Self {
        Self {
            scenario_id: scenario.id.to_string(),
            scenario_name: scenario.name.to_string(),
            started_at: Utc::now(),
            duration_ms: 0,
            transmission_mode: mode,
            passed: false,
            checks: Vec::new(),
            submission_id: None,
            xml_hash: None,
            computed: None,
            structural: None,
            outcome: None,
            acknowledgment: None,
            xml: None,
        }
    }

    fn check(&mut self, name: &'static str, passed: bool, detail: String) -> bool {
        if !passed {
            tracing::warn!(scenario = %self.scenario_id, check = name, %detail, "check failed");
        }
        self.checks.push(CheckResult {
            name,
            passed,
            detail,
        });
        passed
    }

    fn finish(mut self, started: Instant) -> Self {
        self.duration_ms = started.elapsed().as_millis() as u64;
        self.passed = !self.checks.is_empty() && self.checks.iter().all(|c| c.passed);
        tracing::info!(
            scenario = %self.scenario_id,
            passed = self.passed,
            duration_ms = self.duration_ms,
            "scenario finished"
        );
        self
    }

    pub fn check_passed(&self, name: &str) -> Option<bool> {
        self.checks.iter().find(|c| c.name == name).map(|c| c.passed)
    }
}

pub async fn run_scenario(ctx: &RunContext<'_>, scenario: &Scenario) -> ScenarioResult {
    let started = Instant::now();
    let mut result = ScenarioResult::begin(scenario, ctx.mode);
    tracing::info!(
        scenario = scenario.id,
        name = scenario.name,
        description = scenario.description,
        mode = ctx.mode.as_str(),
        "running scenario"
    );

    // Business rules gate everything else.
    let outcome = rules::validate(&scenario.tax_return, ctx.params);
    let detail = if outcome.is_valid() {
        match outcome.warnings.len() {
            0 => "no findings".to_string(),
            n => format!("{n} advisory warnings"),
        }
    } else {
        let codes: Vec<&str> = outcome.errors.iter().map(|e| e.code.as_str()).collect();
        format!("blocked by {}", codes.join(", "))
    };
    if !result.check(CHECK_BUSINESS_RULES, outcome.is_valid(), detail) {
        return result.finish(started);
    }

    let computed = match ReturnCalculator::new(ctx.params).compute(&scenario.tax_return) {
        Ok(computed) => computed,
        Err(err) => {
            result.check(CHECK_COMPUTATION, false, err.to_string());
            return result.finish(started);
        }
    };
    let expected = &scenario.expected;
    let mut mismatches = Vec::new();
    if computed.taxable_income != expected.taxable_income {
        mismatches.push(format!(
            "taxable income {} != expected {}",
            computed.taxable_income, expected.taxable_income
        ));
    }
    if computed.total_tax != expected.total_tax {
        mismatches.push(format!(
            "total tax {} != expected {}",
            computed.total_tax, expected.total_tax
        ));
    }
    if computed.refund != expected.refund {
        mismatches.push(format!(
            "refund {} != expected {}",
            computed.refund, expected.refund
        ));
    }
    if computed.amount_owed != expected.amount_owed {
        mismatches.push(format!(
            "amount owed {} != expected {}",
            computed.amount_owed, expected.amount_owed
        ));
    }
    let detail = if mismatches.is_empty() {
        format!(
            "total tax {}, refund {}, amount owed {}",
            computed.total_tax, computed.refund, computed.amount_owed
        )
    } else {
        mismatches.join("; ")
    };
    let figures_match = mismatches.is_empty();
    result.computed = Some(computed.clone());
    if !result.check(CHECK_COMPUTATION, figures_match, detail) {
        return result.finish(started);
    }

    let encode_ctx = EncodeContext {
        efin: ctx.efin.clone(),
        software_id: ctx.software_id.clone(),
        software_version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };
    let mut submission =
        match encode::build_submission(&scenario.tax_return, &computed, ctx.params, &encode_ctx) {
            Ok(submission) => submission,
            Err(err) => {
                result.check(CHECK_STRUCTURE, false, err.to_string());
                return result.finish(started);
            }
        };
    result.submission_id = Some(submission.submission_id.clone());
    result.xml = Some(submission.xml_payload.clone());

    let report = StructuralValidator::for_year(scenario.tax_return.tax_year)
        .validate(&submission.xml_payload);
    result.xml_hash = Some(report.xml_hash.clone());
    let detail = if report.valid {
        format!("schema {}", report.schema_version)
    } else {
        let messages: Vec<&str> = report.errors.iter().map(|e| e.message.as_str()).collect();
        messages.join("; ")
    };
    let structurally_valid = report.valid;
    result.structural = Some(report);
    if !result.check(CHECK_STRUCTURE, structurally_valid, detail) {
        return result.finish(started);
    }

    let mut tracker = SubmissionTracker::new();
    if let Err(err) = SubmissionTracker::try_transition(&mut submission, SubmissionStatus::Transmitting)
    {
        result.check(CHECK_TRANSMISSION, false, err.to_string());
        return result.finish(started);
    }
    match ctx.gateway.transmit(&submission).await {
        Ok(outcome) => {
            if let Err(err) =
                SubmissionTracker::try_transition(&mut submission, SubmissionStatus::Transmitted)
            {
                result.check(CHECK_TRANSMISSION, false, err.to_string());
                return result.finish(started);
            }
            let detail = match &outcome.receipt_id {
                Some(receipt) => format!("receipt {receipt}"),
                None => "transmitted, no receipt id".to_string(),
            };
            result.outcome = Some(outcome);
            result.check(CHECK_TRANSMISSION, true, detail);
        }
        Err(err) => {
            let _ = SubmissionTracker::try_transition(&mut submission, SubmissionStatus::Error);
            result.check(CHECK_TRANSMISSION, false, err.to_string());
            return result.finish(started);
        }
    }

    let ack = match ctx.gateway.get_acknowledgment(&submission.submission_id).await {
        Ok(ack) => ack,
        Err(err) => {
            result.check(CHECK_ACKNOWLEDGMENT, false, err.to_string());
            return result.finish(started);
        }
    };
    if let Err(err) = tracker.apply_acknowledgment(&mut submission, &ack) {
        result.acknowledgment = Some(ack);
        result.check(CHECK_ACKNOWLEDGMENT, false, err.to_string());
        return result.finish(started);
    }
    let matches_expected = ack.status == expected.acknowledgment;
    let detail = if matches_expected {
        match &ack.dcn {
            Some(dcn) => format!("{} (DCN {dcn})", ack.status.as_str()),
            None => ack.status.as_str().to_string(),
        }
    } else {
        let codes: Vec<&str> = ack.errors.iter().map(|e| e.code.as_str()).collect();
        format!(
            "expected {}, got {} [{}]",
            expected.acknowledgment.as_str(),
            ack.status.as_str(),
            codes.join(", ")
        )
    };
    result.acknowledgment = Some(ack);
    result.check(CHECK_ACKNOWLEDGMENT, matches_expected, detail);

    result.finish(started)
}
