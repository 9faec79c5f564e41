use anyhow::{Result, anyhow};
use console::style;
use hubsmoke_core::config::Config;
use hubsmoke_core::suite::SmokeSuite;

use crate::ux::{SuiteSpinner, format_check_line};

pub async fn execute(config: &Config) -> Result<()> {
    let suite = SmokeSuite::new(config.clone())?;
    println!(
        "Running smoke checks against {}",
        style(config.server.base_url.as_str()).blue().bold()
    );

    let spinner = SuiteSpinner::new("Running checks...".to_string());
    let result = suite.run().await;
    spinner.clear();

    // Setup failures surface here; check mismatches live in the report
    let report = result?;

    for check in &report.checks {
        println!("{}", format_check_line(check));
    }

    let failed = report.failed_count();
    if failed > 0 {
        return Err(anyhow!("{failed} of {} checks failed", report.total()));
    }

    println!(
        "{}",
        style(format!("All {} checks passed.", report.total()))
            .green()
            .bold()
    );
    Ok(())
}
