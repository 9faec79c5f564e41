use anyhow::{Context, Result};
use console::style;
use hubsmoke_core::client::RegisterOutcome;
use hubsmoke_core::config::Config;
use hubsmoke_core::suite::SmokeSuite;

/// One-off fixture registration, for seeding a fresh service instance
/// without running any checks.
pub async fn execute(config: &Config) -> Result<()> {
    let suite = SmokeSuite::new(config.clone())?;
    let outcomes = suite
        .register_fixtures()
        .await
        .context("Fixture registration failed")?;

    for (username, outcome) in &outcomes {
        match outcome {
            RegisterOutcome::Created => {
                println!("User {username} registered successfully.");
            }
            RegisterOutcome::AlreadyExists => {
                println!("User {username} already exists.");
            }
            RegisterOutcome::Unexpected { status, body } => {
                println!(
                    "{}",
                    style(format!(
                        "Failed to register user {username}. Status code: {status}, Error: {body}"
                    ))
                    .red()
                );
            }
        }
    }
    Ok(())
}
