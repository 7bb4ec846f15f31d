pub mod prompt;

use std::fmt;

/// Environment variable name for providing a GitHub token without a prompt
pub const ENV_TOKEN_VAR: &str = "SEASON_BOARD_GH_TOKEN";

/// Environment variable name for supplying the admin secret non-interactively
pub const ENV_ADMIN_SECRET_VAR: &str = "SEASON_BOARD_ADMIN_SECRET";

// Re-export prompt functions for convenience
pub use prompt::{prompt_for_secret, prompt_for_token, resolve_token};

/// Read a non-empty, trimmed value from an environment variable.
fn read_env(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Check for a GitHub token in the SEASON_BOARD_GH_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    read_env(ENV_TOKEN_VAR)
}

/// Check for an admin secret in the SEASON_BOARD_ADMIN_SECRET environment variable.
pub fn get_secret_from_env() -> Option<String> {
    read_env(ENV_ADMIN_SECRET_VAR)
}

#[derive(Debug, PartialEq, Eq)]
pub enum CredentialError {
    AdminDisabled,
    AccessDenied,
    TokenMissing,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::AdminDisabled => {
                write!(f, "No admin_secret configured; admin commands are disabled")
            }
            CredentialError::AccessDenied => write!(f, "Access denied: wrong admin secret"),
            CredentialError::TokenMissing => write!(f, "GitHub token not provided"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// The configured admin secret. Admin actions compare a supplied secret to it.
#[derive(Clone)]
pub struct AdminGate {
    secret: Option<String>,
}

impl fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

impl AdminGate {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Plain equality check. Any number of attempts is allowed.
    pub fn verify(&self, supplied: &str) -> Result<(), CredentialError> {
        match &self.secret {
            None => Err(CredentialError::AdminDisabled),
            Some(secret) if secret == supplied => Ok(()),
            Some(_) => Err(CredentialError::AccessDenied),
        }
    }
}
