//! Plan command.
//!
//! Prints each configured secret with its source and sinks. Reads only the
//! config file; no provider tokens or credentials are needed.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Config;
use crate::error::Result;

/// Show the rotation plan for a config file.
pub fn execute(file: &Path) -> Result<()> {
    let config = Config::load(file)?;
    print(&config);
    Ok(())
}

/// Print the rotation plan.
pub fn print(config: &Config) {
    output::section("Rotation plan");

    if config.secrets.is_empty() {
        output::dimmed("no secrets configured");
        return;
    }

    for secret in &config.secrets {
        println!("{}", output::name(&secret.name));
        output::kv("source", secret.source.kind());

        let sinks: Vec<_> = secret
            .sinks
            .iter()
            .map(|sink| {
                let names: Vec<_> = sink.key_to_name().values().map(String::as_str).collect();
                format!("{} ({})", sink.kind(), names.join(", "))
            })
            .collect();
        output::kv("sinks", sinks.join(", "));
    }
}
