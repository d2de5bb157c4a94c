// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password acquisition via TTY prompt or STRONGBOX_PASSWORD.

use strongbox_core::StrongboxError;

use crate::kdf::MasterSecret;

/// The environment variable name for providing the master password.
pub const PASSWORD_ENV_VAR: &str = "STRONGBOX_PASSWORD";

/// Environment variable holding a new password for `change-password`.
pub const NEW_PASSWORD_ENV_VAR: &str = "STRONGBOX_NEW_PASSWORD";

fn from_env(var: &str) -> Option<MasterSecret> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Some(MasterSecret::new(value)),
        _ => None,
    }
}

fn read_line(prompt: &str) -> Result<String, StrongboxError> {
    eprint!("{prompt}");
    rpassword::read_password()
        .map_err(|e| StrongboxError::Vault(format!("failed to read password: {e}")))
}

fn no_password(var: &str) -> StrongboxError {
    StrongboxError::Vault(format!(
        "No password provided. Set {var} or run interactively."
    ))
}

/// Get the master password from the environment or an interactive prompt.
///
/// Priority:
/// 1. `STRONGBOX_PASSWORD` (headless use and scripted tests)
/// 2. Interactive TTY prompt via `rpassword`
pub fn read_master_secret() -> Result<MasterSecret, StrongboxError> {
    if let Some(secret) = from_env(PASSWORD_ENV_VAR) {
        return Ok(secret);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let password = read_line("Master password: ")?;
        if password.is_empty() {
            return Err(StrongboxError::Vault("empty password not allowed".to_string()));
        }
        return Ok(MasterSecret::new(password));
    }

    Err(no_password(PASSWORD_ENV_VAR))
}

/// Get a new master password, prompting twice on a terminal.
///
/// `env_var` is checked first and needs no confirmation.
pub fn read_new_master_secret(env_var: &str) -> Result<MasterSecret, StrongboxError> {
    if let Some(secret) = from_env(env_var) {
        return Ok(secret);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let first = read_line("New master password: ")?;
        let second = read_line("Confirm master password: ")?;
        if first != second {
            return Err(StrongboxError::Vault("passwords do not match".to_string()));
        }
        if first.is_empty() {
            return Err(StrongboxError::Vault("empty password not allowed".to_string()));
        }
        return Ok(MasterSecret::new(first));
    }

    Err(no_password(env_var))
}
