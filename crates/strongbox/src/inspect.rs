// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox inspect` command implementation.
//!
//! Imports an exchange document and prints what it contains. Entry contents
//! are never printed, only counts and per-entry failures.

use std::io::IsTerminal;
use std::path::Path;

use serde::Serialize;
use strongbox_config::model::StrongboxConfig;
use strongbox_core::{StrongboxError, VaultId};
use strongbox_exchange::{ImportCredentials, ImportedVault};
use strongbox_vault::prompt;
use tokio_util::sync::CancellationToken;

use crate::vault_cmd::VaultContext;

/// Where the key for an encrypted document comes from.
pub enum CredentialSource {
    /// Document is expected to be plain.
    None,
    /// Recovery words of the exporting vault, with its password.
    Words(String),
    /// This device's vault, unlocked with its password.
    LocalVault,
}

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectSummary {
    pub vault_id: VaultId,
    pub name: String,
    pub encrypted: bool,
    pub origin_os: String,
    pub origin_device: String,
    pub app_version: String,
    pub logins: usize,
    pub tags: usize,
    pub deleted: usize,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub section: String,
    pub index: usize,
    pub reason: String,
}

impl From<&ImportedVault> for InspectSummary {
    fn from(imported: &ImportedVault) -> Self {
        Self {
            vault_id: imported.state.vault_id,
            name: imported.state.name.clone(),
            encrypted: imported.encrypted,
            origin_os: imported.origin.os.clone(),
            origin_device: imported.origin.device_name.clone(),
            app_version: imported.origin.app_version_name.clone(),
            logins: imported.state.logins.len(),
            tags: imported.state.tags.len(),
            deleted: imported.state.deleted.len(),
            failures: imported
                .failures
                .iter()
                .map(|f| FailureSummary {
                    section: f.section.to_string(),
                    index: f.index,
                    reason: f.reason.to_string(),
                })
                .collect(),
        }
    }
}

/// Run the `strongbox inspect` command.
pub async fn run_inspect(
    config: &StrongboxConfig,
    path: &Path,
    source: CredentialSource,
    json: bool,
    cancel: &CancellationToken,
) -> Result<(), StrongboxError> {
    let content = std::fs::read_to_string(path).map_err(|e| StrongboxError::Storage {
        source: Box::new(e),
    })?;
    let ctx = VaultContext::open(config).await?;

    let credentials = match source {
        CredentialSource::None => None,
        CredentialSource::Words(phrase) => Some(ImportCredentials::Recovery {
            words: phrase.split_whitespace().map(str::to_string).collect(),
            password: prompt::read_master_secret()?,
        }),
        CredentialSource::LocalVault => {
            let document = strongbox_exchange::parse(&content)?;
            ctx.unlock_with_password(cancel).await?;
            Some(
                ctx.interactor
                    .own_import_credentials(document.vault.id)
                    .await?,
            )
        }
    };

    let imported = ctx.interactor.import_vault(content, credentials).await?;
    ctx.interactor.key_vault().lock().await;

    let summary = InspectSummary::from(&imported);
    if json {
        let out = serde_json::to_string_pretty(&summary)
            .map_err(|e| StrongboxError::Internal(format!("failed to serialize summary: {e}")))?;
        println!("{out}");
    } else {
        print_summary(&summary, std::io::stdout().is_terminal());
    }
    Ok(())
}

fn print_summary(summary: &InspectSummary, use_color: bool) {
    println!();
    println!("  {} ({})", summary.name, summary.vault_id);
    println!("  {}", "-".repeat(40));
    println!(
        "    Origin:     {} on {} (v{})",
        summary.origin_device, summary.origin_os, summary.app_version
    );
    println!(
        "    Encrypted:  {}",
        if summary.encrypted { "yes" } else { "no" }
    );
    println!("    Logins:     {}", summary.logins);
    println!("    Tags:       {}", summary.tags);
    println!("    Deleted:    {}", summary.deleted);

    if summary.failures.is_empty() {
        return;
    }
    println!();
    for failure in &summary.failures {
        let line = format!(
            "{}[{}] could not be read: {}",
            failure.section, failure.index, failure.reason
        );
        if use_color {
            use colored::Colorize;
            println!("    {} {line}", "✗".red());
        } else {
            println!("    [FAIL] {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongbox_core::{ItemId, Timestamp};
    use strongbox_exchange::{Login, Origin, VaultState};

    #[test]
    fn summary_counts_without_contents() {
        let mut state = VaultState::new(VaultId::new_v4(), "Work");
        let mut login = Login::new(ItemId::new_v4(), Timestamp::from_millis(1));
        login.password = Some("hunter2".into());
        state.logins.push(login);

        let imported = ImportedVault {
            state,
            origin: Origin::current("laptop", None),
            encrypted: false,
            failures: Vec::new(),
        };
        let summary = InspectSummary::from(&imported);
        assert_eq!(summary.logins, 1);
        assert_eq!(summary.origin_device, "laptop");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"originDevice\":\"laptop\""));
    }
}
