// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox init`, `unlock`, `words`, `change-password` and `reset`.
//!
//! Each command opens the shared secure store, so running one while another
//! process holds the vault is safe: batches land atomically or not at all.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use strongbox::{VaultInteractor, descriptor_path, load_descriptor, remove_descriptor, save_descriptor};
use strongbox_config::model::StrongboxConfig;
use strongbox_core::{KdfError, SecureStore, StrongboxError};
use strongbox_storage::SqliteSecureStore;
use strongbox_vault::prompt::{self, NEW_PASSWORD_ENV_VAR, PASSWORD_ENV_VAR};
use strongbox_vault::{KdfSpec, KeyVault, Presence, RecoveryWords, SoftwareBiometry, VaultDescriptor};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const UNLOCK_REASON: &str = "Unlock your Strongbox vault";

/// The secure store, key vault and descriptor location for one invocation.
pub struct VaultContext {
    pub interactor: VaultInteractor,
    descriptor_path: PathBuf,
}

impl VaultContext {
    pub async fn open(config: &StrongboxConfig) -> Result<Self, StrongboxError> {
        let store: Arc<dyn SecureStore> = Arc::new(SqliteSecureStore::open(&config.storage).await?);
        let biometry = Arc::new(SoftwareBiometry::new(
            store.clone(),
            terminal_presence,
            config.biometry.max_failed_attempts,
        ));
        let key_vault = Arc::new(KeyVault::new(store, biometry));
        Ok(Self {
            interactor: VaultInteractor::new(key_vault, config.device.name.clone()),
            descriptor_path: descriptor_path(&config.storage.secure_store_path),
        })
    }

    fn key_vault(&self) -> &KeyVault {
        self.interactor.key_vault()
    }

    pub fn descriptor(&self) -> Result<VaultDescriptor, StrongboxError> {
        load_descriptor(&self.descriptor_path)?.ok_or_else(|| {
            StrongboxError::Vault("no vault on this device; run `strongbox init` first".to_string())
        })
    }

    /// Prompt for the master password and unlock.
    pub async fn unlock_with_password(
        &self,
        cancel: &CancellationToken,
    ) -> Result<VaultDescriptor, StrongboxError> {
        let descriptor = self.descriptor()?;
        let secret = prompt::read_master_secret()?;
        self.interactor
            .derive_and_unlock(secret, &descriptor, cancel)
            .await?;
        Ok(descriptor)
    }
}

/// Presence check for the software biometry fallback: a y/N prompt on the
/// terminal. Without a terminal the check is declined.
fn terminal_presence(reason: &str) -> Presence {
    if !std::io::stdin().is_terminal() {
        return Presence::Declined;
    }
    eprint!("{reason}. Confirm [y/N]: ");
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return Presence::Declined;
    }
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Presence::Confirmed,
        "" | "n" | "no" => Presence::Declined,
        _ => Presence::Failed,
    }
}

/// Run the `strongbox init` command.
pub async fn run_init(
    config: &StrongboxConfig,
    cancel: &CancellationToken,
) -> Result<(), StrongboxError> {
    let ctx = VaultContext::open(config).await?;
    if ctx.key_vault().exists().await? || load_descriptor(&ctx.descriptor_path)?.is_some() {
        return Err(StrongboxError::Vault(
            "a vault already exists on this device; run `strongbox reset --yes` to start over"
                .to_string(),
        ));
    }

    let spec = KdfSpec::from_config(&config.kdf)?;
    let descriptor = VaultDescriptor::new(spec);
    let secret = prompt::read_new_master_secret(PASSWORD_ENV_VAR)?;

    eprintln!("Deriving master key ({} MiB, {} iterations)...", spec.memory_mb, spec.iterations);
    let words = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(KdfError::Cancelled.into()),
        created = ctx.key_vault().create(secret, &descriptor, config.recovery.entropy_bytes) => created?,
    };
    save_descriptor(&ctx.descriptor_path, &descriptor)?;
    info!(vault_id = %descriptor.vault_id, "vault initialized");

    println!("Vault {} created.", descriptor.vault_id);
    println!();
    print_words(&words);
    println!();
    println!("Write these words down. They are shown only on request after unlocking,");
    println!("and with your password they are the only way to restore this vault.");
    Ok(())
}

/// Run the `strongbox unlock` command.
pub async fn run_unlock(
    config: &StrongboxConfig,
    biometry: bool,
    enable_biometry: bool,
    cancel: &CancellationToken,
) -> Result<(), StrongboxError> {
    let ctx = VaultContext::open(config).await?;
    let descriptor = ctx.descriptor()?;

    let mut unlocked = false;
    if biometry {
        match ctx.key_vault().unlock_with_biometry(UNLOCK_REASON).await {
            Ok(_) => unlocked = true,
            Err(StrongboxError::Biometry(e)) => {
                warn!(error = %e, "biometric unlock failed, falling back to password");
                eprintln!("Biometric unlock unavailable ({e}); enter your password.");
            }
            Err(e) => return Err(e),
        }
    }
    if !unlocked {
        ctx.unlock_with_password(cancel).await?;
    }

    if enable_biometry {
        ctx.key_vault().enable_biometry().await?;
    }
    let biometry_state = if ctx.key_vault().is_biometry_enabled().await? {
        "enabled"
    } else {
        "disabled"
    };

    if std::io::stdout().is_terminal() {
        use colored::Colorize;
        println!("{} vault {} unlocked", "✓".green(), descriptor.vault_id);
    } else {
        println!("[OK] vault {} unlocked", descriptor.vault_id);
    }
    println!("    biometric unlock: {biometry_state}");
    ctx.key_vault().lock().await;
    Ok(())
}

/// Run the `strongbox words` command.
pub async fn run_words(
    config: &StrongboxConfig,
    cancel: &CancellationToken,
) -> Result<(), StrongboxError> {
    let ctx = VaultContext::open(config).await?;
    ctx.unlock_with_password(cancel).await?;
    let words = ctx.key_vault().recovery_words().await?;
    print_words(&words);
    ctx.key_vault().lock().await;
    Ok(())
}

/// Run the `strongbox change-password` command.
pub async fn run_change_password(
    config: &StrongboxConfig,
    cancel: &CancellationToken,
) -> Result<(), StrongboxError> {
    let ctx = VaultContext::open(config).await?;
    let descriptor = ctx.unlock_with_password(cancel).await?;
    let new_secret = prompt::read_new_master_secret(NEW_PASSWORD_ENV_VAR)?;

    tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(KdfError::Cancelled.into()),
        changed = ctx.key_vault().change_password(new_secret, &descriptor) => { changed?; }
    }
    ctx.key_vault().lock().await;
    println!("Master password changed. Your recovery words are unchanged.");
    Ok(())
}

/// Run the `strongbox reset` command.
pub async fn run_reset(config: &StrongboxConfig, yes: bool) -> Result<(), StrongboxError> {
    if !yes {
        return Err(StrongboxError::Vault(
            "reset erases every key on this device; pass --yes to confirm".to_string(),
        ));
    }
    let ctx = VaultContext::open(config).await?;
    ctx.key_vault().reset_app().await?;
    remove_descriptor(&ctx.descriptor_path)?;
    println!("All key material on this device has been erased.");
    Ok(())
}

fn print_words(words: &RecoveryWords) {
    let use_color = std::io::stdout().is_terminal();
    for (row, chunk) in words.words().chunks(3).enumerate() {
        let line: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(col, word)| {
                let number = row * 3 + col + 1;
                if use_color {
                    use colored::Colorize;
                    format!("{number:>2}. {:<12}", word.bold())
                } else {
                    format!("{number:>2}. {word:<12}")
                }
            })
            .collect();
        println!("  {}", line.join("  "));
    }
}
