//! Rotator - rotate credentials and publish them to the systems that use them.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rotator::cli::output;
use rotator::cli::{execute, Cli};
use rotator::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("ROTATOR_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("rotator=debug")
        } else {
            EnvFilter::new("rotator=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command) {
        // Individual rotation failures were already printed.
        let message = match &e {
            Error::Rotation(errors) => format!(
                "{} rotation error{}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ),
            other => other.to_string(),
        };
        let suggestion = match &e {
            Error::Config(ConfigError::ReadFile { .. }) => {
                Some("pass --file or set ROTATOR_CONFIG".to_string())
            }
            Error::Config(ConfigError::MissingEnv(var)) => Some(format!("export {}", var)),
            _ => None,
        };

        output::error(&message);
        if let Some(hint) = suggestion {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
