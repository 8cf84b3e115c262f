use super::client::{decode, PageFetcher};
use super::query::{self, PAGE_SIZE};
use super::types::{OrganizationData, RepositoryNode};
use crate::error::{OrgStatsError, Result};
use crate::model::{Cursor, RepositoryRef};
use tracing::{debug, info};

/// Every non-archived, non-empty repository of `org`, in API order.
pub fn list_repositories(fetcher: &dyn PageFetcher, org: &str) -> Result<Vec<RepositoryRef>> {
    list_repositories_paged(fetcher, org, PAGE_SIZE)
}

pub fn list_repositories_paged(
    fetcher: &dyn PageFetcher,
    org: &str,
    page_size: u32,
) -> Result<Vec<RepositoryRef>> {
    let mut repos: Vec<RepositoryRef> = Vec::new();
    let mut cursor = Cursor::start();
    let mut skipped = 0usize;

    loop {
        let data = fetcher.fetch(&query::org_repositories(org, page_size, &cursor))?;
        let page: OrganizationData = decode(data, "organization repositories")?;
        let organization = page
            .organization
            .ok_or_else(|| OrgStatsError::OrganizationNotFound(org.to_string()))?;
        let connection = organization.repositories;

        for node in connection.items() {
            match active_repository(node) {
                Some(repo) => repos.push(repo),
                None => skipped += 1,
            }
        }
        debug!(org, listed = repos.len(), skipped, "repository page");

        match connection.page_info.next_cursor("repositories")? {
            Some(next) => cursor = next,
            None => break,
        }
    }

    info!(org, repositories = repos.len(), skipped, "listed organization repositories");
    Ok(repos)
}

/// Archived repositories and empty ones (no default branch) are left out.
fn active_repository(node: &RepositoryNode) -> Option<RepositoryRef> {
    if node.is_archived {
        return None;
    }
    let branch = node.default_branch_ref.as_ref()?;
    Some(RepositoryRef {
        name: node.name.clone(),
        default_branch: branch.name.clone(),
    })
}
