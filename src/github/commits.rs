use super::client::{decode, PageFetcher};
use super::query::{self, PAGE_SIZE};
use super::types::{CommitNode, RefLookup, RepositoryData};
use crate::error::{OrgStatsError, Result};
use crate::model::{CommitEvent, Cursor, Identity};
use crate::util::parse_timestamp;
use tracing::debug;

/// Attributed to commits that carry neither a linked account nor a name.
pub const UNKNOWN_AUTHOR: &str = "(unknown)";

/// Every commit reachable from `branch` in `owner/name`.
pub fn collect_commits(
    fetcher: &dyn PageFetcher,
    owner: &str,
    name: &str,
    branch: &str,
) -> Result<Vec<CommitEvent>> {
    collect_commits_paged(fetcher, owner, name, branch, PAGE_SIZE)
}

pub fn collect_commits_paged(
    fetcher: &dyn PageFetcher,
    owner: &str,
    name: &str,
    branch: &str,
    page_size: u32,
) -> Result<Vec<CommitEvent>> {
    let mut commits = Vec::new();
    let mut cursor = Cursor::start();

    loop {
        let request = query::commit_history(owner, name, branch, page_size, &cursor);
        let page: RepositoryData<RefLookup> = decode(fetcher.fetch(&request)?, "commit history")?;

        let repository = page.repository.ok_or_else(|| OrgStatsError::RepositoryNotFound {
            owner: owner.to_string(),
            name: name.to_string(),
        })?;
        let history = repository
            .reference
            .and_then(|r| r.target)
            .and_then(|t| t.history)
            .ok_or_else(|| OrgStatsError::RefNotFound {
                owner: owner.to_string(),
                name: name.to_string(),
                reference: branch.to_string(),
            })?;

        for node in history.items() {
            commits.push(commit_event(node)?);
        }
        debug!(repo = name, commits = commits.len(), "commit history page");

        match history.page_info.next_cursor("commit history")? {
            Some(next) => cursor = next,
            None => break,
        }
    }

    Ok(commits)
}

/// Prefer the linked account; GitHub can't always match the commit email to
/// one, in which case the raw author name is used.
fn commit_author(node: &CommitNode) -> Identity {
    let actor = node.author.as_ref();
    if let Some(user) = actor.and_then(|a| a.user.as_ref()) {
        return Identity::Login(user.login.clone());
    }
    let name = actor
        .and_then(|a| a.name.clone())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    Identity::Name(name)
}

fn commit_event(node: &CommitNode) -> Result<CommitEvent> {
    Ok(CommitEvent {
        author: commit_author(node),
        authored_at: parse_timestamp(&node.authored_date)?,
    })
}
