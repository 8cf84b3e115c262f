use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrgStatsError>;

#[derive(Error, Debug)]
pub enum OrgStatsError {
    #[error("GitHub GraphQL query failed{}: {context}", status_suffix(.status))]
    RemoteQuery { status: Option<u16>, context: String },
    #[error("Organization https://github.com/{0} does not exist")]
    OrganizationNotFound(String),
    #[error("Repo https://github.com/{owner}/{name} does not exist")]
    RepositoryNotFound { owner: String, name: String },
    #[error("Branch '{reference}' not found in https://github.com/{owner}/{name}")]
    RefNotFound {
        owner: String,
        name: String,
        reference: String,
    },
    #[error("No GitHub credential found (keyring service '{service}', account '{account}'); pass --token or set GITHUB_TOKEN")]
    CredentialMissing { service: String, account: String },
    #[error("Failed to read GitHub credential: {0}")]
    Credential(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with code {s}")).unwrap_or_default()
}

impl OrgStatsError {
    pub fn remote(status: Option<u16>, context: impl Into<String>) -> Self {
        OrgStatsError::RemoteQuery {
            status,
            context: context.into(),
        }
    }

    /// True for the organization/repository/ref resolution failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            OrgStatsError::OrganizationNotFound(_)
                | OrgStatsError::RepositoryNotFound { .. }
                | OrgStatsError::RefNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_query_message_includes_status() {
        let err = OrgStatsError::remote(Some(502), "bad gateway");
        assert_eq!(
            err.to_string(),
            "GitHub GraphQL query failed with code 502: bad gateway"
        );

        let err = OrgStatsError::remote(None, "missing data");
        assert_eq!(err.to_string(), "GitHub GraphQL query failed: missing data");
    }

    #[test]
    fn not_found_classification() {
        assert!(OrgStatsError::OrganizationNotFound("acme".into()).is_not_found());
        assert!(OrgStatsError::RepositoryNotFound {
            owner: "acme".into(),
            name: "rocket".into()
        }
        .is_not_found());
        assert!(!OrgStatsError::remote(Some(500), "boom").is_not_found());
    }
}
