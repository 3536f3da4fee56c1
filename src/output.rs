//! Colored console output for govsim.
//!
//! Color scheme: blue+bold headers, cyan values, green success,
//! yellow warnings, dimmed secondary text.

use alloy_primitives::U256;
use colored::Colorize;
use std::path::Path;

use crate::accounts::{AccountPool, Role};
use crate::config::{ExecutionMode, Settings};
use crate::network::{NetworkHandle, NetworkRegistry, SignerMode};
use crate::simulation::SimulationReport;

// ── Helpers ────────────────────────────────────────────────────────

/// Format a wei amount.
///
/// - Whole ether amounts → `"100000000000000 ETH"`
/// - Anything else → `"1500 wei"`
pub fn format_balance(wei: U256) -> String {
    let unit = U256::from(10u64).pow(U256::from(18u64));
    if !wei.is_zero() && (wei % unit).is_zero() {
        format!("{} ETH", wei / unit)
    } else {
        format!("{wei} wei")
    }
}

fn role_label(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Deployer) => "deployer",
        Some(Role::Corpus) => "corpus",
        Some(Role::GenesisGovernance) => "genesis-gov",
        Some(Role::Governance) => "governance",
        None => "-",
    }
}

fn signer_mode_label(mode: SignerMode) -> &'static str {
    match mode {
        SignerMode::PrivateKeys => "private keys",
        SignerMode::Accounts => "accounts",
        SignerMode::NodeManaged => "node-managed",
    }
}

// ── Banner & Settings ──────────────────────────────────────────────

/// Print the startup banner with the execution mode.
pub fn print_banner(settings: &Settings) {
    println!();
    println!("{}", "=== govsim ===".blue().bold());
    let mode = match settings.execution_mode {
        ExecutionMode::Local => "local",
        ExecutionMode::RemoteFork => "remote-fork",
    };
    println!("  Mode:         {}", mode.cyan());
    println!("  Corpus:       {}", settings.corpus_path.display().to_string().cyan());
    println!("  Corpus limit: {}", settings.corpus_limit().to_string().cyan());
}

// ── Account Pool ───────────────────────────────────────────────────

/// Print the pool composition.
pub fn print_pool_summary(pool: &AccountPool) {
    let layout = pool.layout();
    println!();
    println!("{}", "Account pool:".blue().bold());
    println!("  {} {}", "Accounts:   ".dimmed(), pool.len().to_string().cyan());
    println!(
        "  {} {}",
        "Deployer:   ".dimmed(),
        if layout.deployer.is_some() { "yes".green() } else { "no".normal() }
    );
    println!("  {} {}", "Corpus:     ".dimmed(), layout.corpus.len().to_string().cyan());
    println!(
        "  {} {}",
        "Governance: ".dimmed(),
        (usize::from(layout.genesis_governance.is_some()) + usize::from(layout.governance.is_some()))
            .to_string()
            .cyan()
    );
    println!("  {} {}", "Voters:     ".dimmed(), pool.eligible_voters().to_string().cyan());
}

/// Print every account with its role and balance. Keys are never printed.
pub fn print_accounts(pool: &AccountPool) {
    println!();
    println!("{}", "Accounts:".blue().bold());
    for (i, account) in pool.accounts().iter().enumerate() {
        println!(
            "  {} {} {} {}",
            format!("{i:>4}.").dimmed(),
            format!("{:<12}", role_label(pool.role_of(i))).normal(),
            format!("{}", account.address()).cyan(),
            format_balance(account.balance).dimmed()
        );
    }
}

// ── Networks ───────────────────────────────────────────────────────

/// Print the network table.
pub fn print_networks(registry: &NetworkRegistry, default_network: &str) {
    println!();
    println!("{}", "Networks:".blue().bold());
    for profile in registry.profiles() {
        let Ok(handle) = registry.resolve(profile.name) else { continue };
        let marker = if profile.name == default_network { "*" } else { " " };
        println!(
            "  {} {} {} {}",
            marker.green().bold(),
            format!("{:<10}", profile.name).cyan(),
            profile.endpoint.as_deref().unwrap_or("in-process").normal(),
            format!(
                "({}, {} signers{})",
                signer_mode_label(profile.signer_mode),
                handle.signers().len(),
                profile.timeout_ms.map(|t| format!(", timeout {t}ms")).unwrap_or_default()
            )
            .dimmed()
        );
        if let Some(local) = &profile.local_chain {
            println!(
                "      {} chain {} from {} · gas limit {} · same-timestamp blocks {}",
                "└".dimmed(),
                local.chain_id.to_string().cyan(),
                local.initial_date.cyan(),
                local.block_gas_limit.to_string().cyan(),
                if local.allow_blocks_with_same_timestamp { "on".green() } else { "off".normal() }
            );
        }
    }
}

/// Print the selected network.
pub fn print_network_selected(network: &NetworkHandle) {
    println!(
        "  {} Network: {} ({} signers)",
        "OK".green().bold(),
        network.name().cyan(),
        network.signers().len().to_string().cyan()
    );
}

// ── Simulation ─────────────────────────────────────────────────────

/// Print the simulation outcome.
pub fn print_report(report: &SimulationReport) {
    println!();
    println!("{}", "Simulation complete!".green().bold());
    println!("  {} {}", "Proposer:   ".dimmed(), format!("{}", report.proposer).cyan());
    println!("  {} {}", "Proposal:   ".dimmed(), format!("{}", report.proposal_id).cyan());
    println!("  {} {}", "Epoch:      ".dimmed(), report.proposal_epoch.to_string().cyan());
    println!(
        "  {} {} for / {} against ({} voters)",
        "Votes:      ".dimmed(),
        report.votes_for.to_string().green(),
        report.votes_against.to_string().yellow(),
        report.voters.to_string().cyan()
    );
    println!(
        "  {} {} (timestamps {}..{})",
        "Blocks:     ".dimmed(),
        report.blocks_mined.to_string().cyan(),
        report.first_block_timestamp,
        report.last_block_timestamp
    );
}

// ── Genesis ────────────────────────────────────────────────────────

/// Print that a genesis file was written.
pub fn print_genesis_written(path: &Path, accounts: usize) {
    println!(
        "  {} Genesis written to {} ({} funded accounts)",
        "OK".green().bold(),
        path.display().to_string().cyan(),
        accounts.to_string().cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_whole_ether() {
        let wei = U256::from(10u64).pow(U256::from(32u64));
        assert_eq!(format_balance(wei), "100000000000000 ETH");
    }

    #[test]
    fn test_format_fractional_and_zero() {
        assert_eq!(format_balance(U256::from(1500u64)), "1500 wei");
        assert_eq!(format_balance(U256::ZERO), "0 wei");
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(role_label(Some(Role::Deployer)), "deployer");
        assert_eq!(role_label(None), "-");
    }
}
