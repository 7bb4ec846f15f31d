use anyhow::Result;

use super::{get_secret_from_env, get_token_from_env, CredentialError, ENV_TOKEN_VAR};
use crate::ranking::InputError;

/// Prompts user to enter a GitHub personal access token
pub fn prompt_for_token() -> Result<String> {
    eprintln!("GitHub personal access token required to read and write the score table.");
    eprintln!("Create one at: https://github.com/settings/tokens");
    eprintln!("Required scope: repo (contents read/write)");
    eprintln!("Set {} to skip this prompt.", ENV_TOKEN_VAR);
    eprintln!();

    let token = rpassword::prompt_password("Enter token: ")
        .map_err(|e| InputError::Prompt(format!("failed to read token: {}", e)))?;

    let token = token.trim();

    if token.is_empty() {
        return Err(CredentialError::TokenMissing.into());
    }

    Ok(token.to_string())
}

/// Token from the environment, falling back to an interactive prompt
pub fn resolve_token() -> Result<String> {
    match get_token_from_env() {
        Some(token) => {
            tracing::debug!("GitHub token taken from {}", ENV_TOKEN_VAR);
            Ok(token)
        }
        None => prompt_for_token(),
    }
}

/// Admin secret from the command line, the environment, or a hidden prompt, in that order
pub fn prompt_for_secret(supplied: Option<String>) -> Result<String> {
    if let Some(secret) = supplied {
        return Ok(secret);
    }
    if let Some(secret) = get_secret_from_env() {
        return Ok(secret);
    }
    let secret = rpassword::prompt_password("Admin secret: ")
        .map_err(|e| InputError::Prompt(format!("failed to read admin secret: {}", e)))?;
    Ok(secret)
}
