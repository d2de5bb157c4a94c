// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongbox - password vault key management and sync tooling.
//!
//! This is the binary entry point for the `strongbox` command.

mod inspect;
mod merge_cmd;
mod shutdown;
mod vault_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::inspect::CredentialSource;
use crate::merge_cmd::HeaderPaths;

/// Strongbox - password vault key management and sync tooling.
#[derive(Parser, Debug)]
#[command(name = "strongbox", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new vault on this device and print its recovery words.
    Init,
    /// Check the master password (or biometry) against this device's vault.
    Unlock {
        /// Try biometric unlock first, falling back to the password.
        #[arg(long)]
        biometry: bool,
        /// Enable biometric unlock after a successful unlock.
        #[arg(long)]
        enable_biometry: bool,
    },
    /// Show the recovery words of this device's vault.
    Words,
    /// Change the master password, keeping the recovery words.
    ChangePassword,
    /// Import an exchange document and summarize what it holds.
    Inspect {
        /// Path to the exchange document.
        file: PathBuf,
        /// Recovery words of the exporting vault, space separated.
        #[arg(long, conflicts_with = "local")]
        words: Option<String>,
        /// Open the document with this device's vault.
        #[arg(long)]
        local: bool,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compute the merge plan for a local and a cloud snapshot.
    Merge {
        /// Local snapshot JSON.
        local: PathBuf,
        /// Cloud snapshot JSON.
        cloud: PathBuf,
        /// Local vault header JSON, checked against --cloud-header.
        #[arg(long, requires = "cloud_header")]
        local_header: Option<PathBuf>,
        /// Cloud vault header JSON.
        #[arg(long, requires = "local_header")]
        cloud_header: Option<PathBuf>,
        /// Take over a cloud vault owned by another device.
        #[arg(long, requires = "cloud_header")]
        multi_device: bool,
        /// Write the plan here instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Erase every key on this device.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match strongbox_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            strongbox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.level);

    let cancel = shutdown::install_signal_handler();

    let result = match cli.command {
        Some(Commands::Init) => vault_cmd::run_init(&config, &cancel).await,
        Some(Commands::Unlock {
            biometry,
            enable_biometry,
        }) => vault_cmd::run_unlock(&config, biometry, enable_biometry, &cancel).await,
        Some(Commands::Words) => vault_cmd::run_words(&config, &cancel).await,
        Some(Commands::ChangePassword) => vault_cmd::run_change_password(&config, &cancel).await,
        Some(Commands::Inspect {
            file,
            words,
            local,
            json,
        }) => {
            let source = match (words, local) {
                (Some(words), _) => CredentialSource::Words(words),
                (None, true) => CredentialSource::LocalVault,
                (None, false) => CredentialSource::None,
            };
            inspect::run_inspect(&config, &file, source, json, &cancel).await
        }
        Some(Commands::Merge {
            local,
            cloud,
            local_header,
            cloud_header,
            multi_device,
            out,
        }) => {
            let headers = match (local_header, cloud_header) {
                (Some(local), Some(cloud)) => Some(HeaderPaths { local, cloud }),
                _ => None,
            };
            let multi_device = multi_device || config.sync.multi_device;
            merge_cmd::run_merge(&local, &cloud, headers, multi_device, out.as_deref())
        }
        Some(Commands::Reset { yes }) => vault_cmd::run_reset(&config, yes).await,
        Some(Commands::Config) => match strongbox_config::render_toml(&config) {
            Ok(toml) => {
                print!("{toml}");
                Ok(())
            }
            Err(e) => {
                strongbox_config::render_errors(&[e]);
                std::process::exit(1);
            }
        },
        None => {
            println!("strongbox: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        use colored::Colorize;
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strongbox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn inspect_rejects_words_with_local() {
        let parsed = Cli::try_parse_from([
            "strongbox", "inspect", "vault.json", "--words", "a b c", "--local",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn merge_headers_come_in_pairs() {
        let parsed =
            Cli::try_parse_from(["strongbox", "merge", "l.json", "c.json", "--local-header", "h.json"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "strongbox",
            "merge",
            "l.json",
            "c.json",
            "--local-header",
            "lh.json",
            "--cloud-header",
            "ch.json",
        ])
        .unwrap();
        assert!(matches!(
            parsed.command,
            Some(Commands::Merge {
                local_header: Some(_),
                cloud_header: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = strongbox_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.logging.level, "info");
    }
}
