//! Shared CLI helpers — version banner and credential display.

use colored::Colorize;

/// Print the startup banner.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🦀 Relaybot".cyan().bold(), version.dimmed());
    println!();
}

/// Render a configured/missing marker for a credential.
pub fn credential_status(configured: bool) -> String {
    if configured {
        format!("{} (set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_status_configured() {
        assert!(credential_status(true).contains("set"));
    }

    #[test]
    fn credential_status_missing() {
        assert!(credential_status(false).contains("not configured"));
    }
}
