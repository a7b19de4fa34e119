//! Acceptance-run harness for the e-file pipeline.
//!
//! Runs each scenario through business rules, computation, encoding,
//! structural checks, and transmission, then saves a reviewable evidence
//! folder per run. Transmission goes to the built-in simulator unless
//! `--real` is passed, in which case the gateway client reads its
//! certificates and endpoints from the environment.

mod evidence;
mod logging;
mod runner;
mod scenarios;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use efile_transport::client::MefClient;
use efile_transport::config::TransportConfig;
use efile_transport::gateway::MefGateway;
use efile_transport::simulate::SimulatedGateway;

use crate::evidence::{new_run_id, write_run_report, write_scenario_evidence, RunReport};
use crate::runner::{run_scenario, RunContext, TransmissionMode};

/// Run the acceptance scenarios end to end and save the evidence.
#[derive(Parser, Debug)]
#[command(name = "efile-ats")]
#[command(version, about, long_about = None)]
struct Args {
    /// Transmit to the live test gateway instead of the built-in simulator
    #[arg(long)]
    real: bool,

    /// Run a single scenario by id, for example ATS-003
    #[arg(long)]
    scenario: Option<String>,

    /// Root directory holding one parameter subdirectory per tax year
    #[arg(long, default_value = "params")]
    params_dir: PathBuf,

    /// Directory that receives one evidence folder per run
    #[arg(long, default_value = "reports/ats-evidence")]
    evidence_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init();
    let args = Args::parse();

    let year_dir = args.params_dir.join(scenarios::TAX_YEAR.to_string());
    let params = efile_params::load_tax_parameters(&year_dir, scenarios::TAX_YEAR)
        .with_context(|| format!("failed to load parameters from {}", year_dir.display()))?;

    let mode = if args.real {
        TransmissionMode::Real
    } else {
        TransmissionMode::Simulated
    };
    let (gateway, efin, software_id, environment): (Box<dyn MefGateway>, _, _, String) =
        if args.real {
            let config = TransportConfig::from_env().context("transport configuration")?;
            let efin = config.efin.clone();
            let software_id = config.software_id.clone();
            let environment = config.environment.as_str().to_string();
            let client = MefClient::new(config).context("failed to build the gateway client")?;
            (Box::new(client), efin, software_id, environment)
        } else {
            let efin = std::env::var("IRS_EFIN").unwrap_or_else(|_| "358459".to_string());
            let software_id =
                std::env::var("IRS_SOFTWARE_ID").unwrap_or_else(|_| "EFRS2024".to_string());
            (
                Box::new(SimulatedGateway::new()),
                efin,
                software_id,
                "test".to_string(),
            )
        };

    let run_id = new_run_id(Utc::now());
    let run_dir = args.evidence_dir.join(&run_id);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create {}", run_dir.display()))?;
    logging::enable_file_logging(&run_dir.join("run.log"))?;

    let selected = match &args.scenario {
        Some(id) => match scenarios::by_id(id) {
            Some(scenario) => vec![scenario],
            None => bail!("unknown scenario {id:?}"),
        },
        None => scenarios::all(),
    };

    println!(
        "ATS run {run_id}: {} scenario(s), {} transmission",
        selected.len(),
        mode.as_str()
    );

    let ctx = RunContext {
        params: &params,
        gateway: gateway.as_ref(),
        efin,
        software_id,
        mode,
    };
    let started_at = Utc::now();
    let mut results = Vec::with_capacity(selected.len());
    for scenario in &selected {
        let result = run_scenario(&ctx, scenario).await;
        println!(
            "  [{}] {}: {} ({}ms)",
            if result.passed { "✓" } else { "✗" },
            result.scenario_id,
            if result.passed { "PASSED" } else { "FAILED" },
            result.duration_ms
        );
        write_scenario_evidence(&run_dir, scenario, &result)?;
        results.push(result);
    }

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;
    let report = RunReport {
        run_id,
        started_at,
        environment,
        transmission_mode: mode,
        total: results.len(),
        passed,
        failed,
        results,
        evidence_path: run_dir.display().to_string(),
    };
    write_run_report(&run_dir, &report)?;

    println!();
    println!(
        "{passed} passed, {failed} failed. Evidence: {}",
        run_dir.display()
    );

    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
