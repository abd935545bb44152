//! Rotate command.
//!
//! Builds every job from the config, shows the plan, asks for confirmation
//! and runs the rotation. Every recorded failure is printed; any failure
//! makes the command exit non-zero.

use std::io::{self, BufRead, IsTerminal};
use std::path::Path;
use std::time::Duration;

use dialoguer::Input;
use tracing::info;

use crate::cli::{output, plan};
use crate::core::config::Config;
use crate::core::{rotate_secrets, Context};
use crate::error::Result;

const CONFIRMATION: &str = "yes";

/// Rotate all secrets in `file`.
pub fn execute(file: &Path, yes: bool, timeout: Option<u64>) -> Result<()> {
    let config = Config::load(file)?;
    let jobs = config.build_jobs()?;
    plan::print(&config);
    println!();

    if !yes && !confirm()? {
        output::warn("rotation cancelled");
        return Ok(());
    }

    let ctx = match timeout {
        Some(secs) => Context::with_timeout(Duration::from_secs(secs)),
        None => Context::new(),
    };

    info!(jobs = jobs.len(), "starting rotation");
    if let Err(errors) = rotate_secrets(&ctx, &jobs) {
        for failure in &errors {
            output::error(&failure.to_string());
        }
        return Err(errors.into());
    }

    output::success(&format!(
        "rotated {} secret{}",
        jobs.len(),
        if jobs.len() == 1 { "" } else { "s" }
    ));
    Ok(())
}

/// Ask the operator to type `yes`. Anything else declines.
fn confirm() -> Result<bool> {
    let prompt = "Do you want to continue? Only 'yes' will be accepted";

    let answer = if io::stdin().is_terminal() {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?
    } else {
        println!("{}:", prompt);
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line
    };

    Ok(answer.trim() == CONFIRMATION)
}
