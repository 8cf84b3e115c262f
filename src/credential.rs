//! Where the GitHub API token comes from.

use crate::error::{OrgStatsError, Result};
use tracing::debug;

pub const KEYRING_SERVICE: &str = "github-read-org";
pub const KEYRING_ACCOUNT: &str = "may-read-org";

pub trait CredentialSource {
    fn token(&self) -> Result<String>;
}

/// A token handed over on the command line or through the environment.
pub struct ExplicitToken(pub String);

impl CredentialSource for ExplicitToken {
    fn token(&self) -> Result<String> {
        let token = self.0.trim();
        if token.is_empty() {
            return Err(missing(KEYRING_SERVICE, KEYRING_ACCOUNT));
        }
        Ok(token.to_string())
    }
}

/// Secret stored in the platform keyring under a fixed service/account pair.
pub struct KeyringSecret {
    service: String,
    account: String,
}

impl KeyringSecret {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }
}

impl Default for KeyringSecret {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
    }
}

impl CredentialSource for KeyringSecret {
    fn token(&self) -> Result<String> {
        debug!(service = %self.service, account = %self.account, "looking up keyring credential");
        let entry = keyring::Entry::new(&self.service, &self.account)
            .map_err(|e| OrgStatsError::Credential(e.to_string()))?;
        match entry.get_password() {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Ok(_) | Err(keyring::Error::NoEntry) => Err(missing(&self.service, &self.account)),
            Err(e) => Err(OrgStatsError::Credential(e.to_string())),
        }
    }
}

/// Explicit token when given, keyring otherwise.
pub fn resolve(explicit: Option<&str>) -> Result<String> {
    match explicit {
        Some(token) => ExplicitToken(token.to_string()).token(),
        None => KeyringSecret::default().token(),
    }
}

fn missing(service: &str, account: &str) -> OrgStatsError {
    OrgStatsError::CredentialMissing {
        service: service.to_string(),
        account: account.to_string(),
    }
}
