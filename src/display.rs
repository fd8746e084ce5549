//! Pairing display - surfaces the pairing uri to the user

use crate::config::AppConfig;
use std::io::Write;

/// Shows and hides the pairing uri. Must not fail in a way the controller handles.
pub trait PairingDisplay: Send + Sync {
    fn show(&self, uri: &str);
    fn hide(&self);
}

/// Logs the uri; for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDisplay;

impl PairingDisplay for TracingDisplay {
    fn show(&self, uri: &str) { tracing::info!(uri, "pairing offered"); }
    fn hide(&self) { tracing::debug!("pairing closed"); }
}

/// Prints the uri to stdout along with the wallet picker hints.
#[derive(Debug, Clone, Default)]
pub struct TerminalDisplay {
    chains: Vec<String>,
    recommended_wallets: Vec<String>,
    exclude_other_wallets: bool,
}

impl TerminalDisplay {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chains: vec![config.default_chain.clone()],
            recommended_wallets: config.recommended_wallet_ids.clone(),
            exclude_other_wallets: config.exclude_other_wallets,
        }
    }

    /// Lines printed by `show`.
    pub fn render(&self, uri: &str) -> Vec<String> {
        let mut lines = vec![format!("Pair with your wallet: {}", uri)];
        if !self.chains.is_empty() {
            lines.push(format!("  chains: {}", self.chains.join(", ")));
        }
        for id in &self.recommended_wallets {
            lines.push(format!("  recommended wallet: {}", id));
        }
        if self.exclude_other_wallets {
            lines.push("  other wallets: excluded".into());
        }
        lines
    }
}

impl PairingDisplay for TerminalDisplay {
    fn show(&self, uri: &str) {
        let mut out = std::io::stdout().lock();
        for line in self.render(uri) {
            let _ = writeln!(out, "{}", line);
        }
        let _ = out.flush();
    }

    fn hide(&self) {
        tracing::debug!("pairing closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_display_renders_picker_hints() {
        let display = TerminalDisplay::from_config(&AppConfig::default());
        let lines = display.render("wc:abc");
        assert_eq!(lines[0], "Pair with your wallet: wc:abc");
        assert!(lines.contains(&"  chains: eip155:1001".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("  recommended wallet: b956da90")));
        assert_eq!(lines.last().map(String::as_str), Some("  other wallets: excluded"));
    }
}
