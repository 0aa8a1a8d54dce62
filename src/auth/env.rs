//! Credential resolution from the process environment.

use super::types::Credential;
use crate::error::{Error, Result};
use std::env;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "ANTHROPIC_API_URL";
/// Environment variable holding the model identifier.
pub const MODEL_VAR: &str = "ANTHROPIC_MODEL";

/// Required variables, in the order missing names are reported.
const REQUIRED_VARS: &[&str] = &[API_KEY_VAR, API_URL_VAR, MODEL_VAR];

/// Source of credentials for the managers in this crate.
pub trait CredentialResolver {
    /// Resolve a credential. Pure read, no side effects.
    fn resolve(&self) -> Result<Credential>;
}

/// Resolves credentials from process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvResolver;

impl EnvResolver {
    /// Configured API base URL, if set to a non-empty value.
    #[must_use]
    pub fn api_url() -> Option<String> {
        env::var(API_URL_VAR).ok().filter(|v| !v.is_empty())
    }

    /// Configured model identifier, if set to a non-empty value.
    #[must_use]
    pub fn model() -> Option<String> {
        env::var(MODEL_VAR).ok().filter(|v| !v.is_empty())
    }
}

impl CredentialResolver for EnvResolver {
    fn resolve(&self) -> Result<Credential> {
        resolve_with(|name| env::var(name).ok())
    }
}

/// Resolve a credential from the given lookup.
///
/// Completeness is checked in bulk first: every unset variable is reported
/// in one error. The secret is then checked on its own, where an empty
/// value is as unusable as a missing one.
fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Credential> {
    let missing: Vec<String> = REQUIRED_VARS
        .iter()
        .copied()
        .filter(|name| lookup(name).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingEnvVars(missing));
    }

    match lookup(API_KEY_VAR) {
        Some(key) if !key.is_empty() => Ok(Credential::api_key(key)),
        _ => Err(Error::authentication("API key not found in environment")),
    }
}
