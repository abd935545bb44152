//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: secret names, sink kinds
//! - Bold: headers
//! - Dimmed: labels

use std::fmt::Display;

use console::{style, StyledObject};

const RULE_WIDTH: usize = 56;

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn styled<D>(value: D) -> StyledObject<D> {
    let styled = style(value);
    if colors_enabled() {
        styled
    } else {
        styled.force_styling(false)
    }
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ rotated 3 secrets`
pub fn success(msg: &str) {
    println!("{} {}", styled("✓").green(), msg);
}

/// Print an error message to stderr (red).
///
/// Example: `✗ deploy-key: unable to write accessKeyId to heroku sink`
pub fn error(msg: &str) {
    eprintln!("{} {}", styled("✗").red(), msg);
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    println!("{} {}", styled("⚠").yellow(), msg);
}

/// Print a hint message (cyan).
pub fn hint(msg: &str) {
    println!("{} {}", styled("→").cyan(), styled(msg).cyan());
}

/// Print a bold section header followed by a rule.
pub fn section(title: &str) {
    println!();
    println!("{}", styled(title).bold());
    println!("{}", styled("─".repeat(RULE_WIDTH)).dim());
}

/// Print a key-value pair (label dimmed).
///
/// Example: `  source  aws-iam`
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", styled(format!("{:<7}", label)).dim(), value);
}

/// Format a secret or sink name in cyan.
pub fn name(n: &str) -> String {
    styled(n).cyan().to_string()
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    println!("{}", styled(msg).dim());
}
