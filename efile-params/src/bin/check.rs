use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use efile_core::model::FilingStatus;
use efile_params::load_tax_parameters;

/// Load and validate the parameter files for one tax year.
///
/// Reads the five CSV files under `<params-dir>/<year>/`, assembles the
/// parameter set, runs the bracket-coverage checks, and prints a summary.
/// Exits non-zero if anything fails to load or validate.
#[derive(Parser, Debug)]
#[command(name = "efile-params-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Root directory holding one subdirectory per tax year
    #[arg(short, long, default_value = "params")]
    params_dir: PathBuf,

    /// Tax year to check
    #[arg(short, long, default_value_t = 2024)]
    year: i32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let year_dir = args.params_dir.join(args.year.to_string());

    println!("Checking parameter files in: {}", year_dir.display());

    let params = load_tax_parameters(&year_dir, args.year)
        .with_context(|| format!("failed to load parameters for tax year {}", args.year))?;

    println!("Tax year {} loaded and validated.", params.tax_year);
    println!();
    println!("{:<6} {:>10} {:>14} {:>12}", "status", "brackets", "std deduction", "top rate");
    for status in FilingStatus::ALL {
        let schedule = params.brackets.get(status);
        let top_rate = schedule.last().map(|b| b.rate).unwrap_or_default();
        println!(
            "{:<6} {:>10} {:>14} {:>12}",
            status.as_str(),
            schedule.len(),
            params.standard_deduction.get(status),
            top_rate,
        );
    }
    println!();
    println!("EITC maxima: {} / {} / {} / {} (joint adjustment {})",
        params.eitc.row(0).max_credit,
        params.eitc.row(1).max_credit,
        params.eitc.row(2).max_credit,
        params.eitc.row(3).max_credit,
        params.eitc.joint_adjustment,
    );
    println!("SE tax: wage base {}, rates {} + {}",
        params.se_tax.ss_wage_max,
        params.se_tax.ss_tax_rate,
        params.se_tax.medicare_tax_rate,
    );
    println!("SALT cap {}, CTC {}/{}, ACTC cap {}",
        params.salt_cap,
        params.ctc.credit_per_child,
        params.ctc.credit_per_other_dependent,
        params.actc.max_refundable_per_child,
    );

    Ok(())
}
