//! Response shapes for the GraphQL documents in [`super::query`].
//!
//! Every field GitHub documents as nullable is an `Option` here.

use crate::error::{OrgStatsError, Result};
use crate::model::Cursor;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Cursor for the following page, `None` once the connection is exhausted.
    pub fn next_cursor(&self, what: &str) -> Result<Option<Cursor>> {
        if !self.has_next_page {
            return Ok(None);
        }
        match &self.end_cursor {
            Some(token) => Ok(Some(Cursor::at(token.clone()))),
            None => Err(OrgStatsError::remote(
                None,
                format!("{what} page reports more results but no end cursor"),
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub page_info: PageInfo,
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
}

impl<T> Connection<T> {
    /// Non-null nodes in API order.
    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes.iter().flatten()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub login: String,
}

// organization(login:) { repositories }

#[derive(Debug, Deserialize)]
pub struct OrganizationData {
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    pub repositories: Connection<RepositoryNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
    pub default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    pub name: String,
}

// repository(owner:, name:) { ... }

#[derive(Debug, Deserialize)]
pub struct RepositoryData<T> {
    pub repository: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct RefLookup {
    #[serde(rename = "ref")]
    pub reference: Option<RefTarget>,
}

#[derive(Debug, Deserialize)]
pub struct RefTarget {
    pub target: Option<CommitTarget>,
}

/// `history` is absent when the ref points at something other than a commit.
#[derive(Debug, Deserialize)]
pub struct CommitTarget {
    pub history: Option<Connection<CommitNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    pub authored_date: String,
    pub author: Option<GitActor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitActor {
    pub name: Option<String>,
    pub user: Option<Actor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestsLookup {
    pub pull_requests: Connection<PullRequestNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestNode {
    pub id: String,
    pub number: u64,
    pub author: Option<Actor>,
    pub reviews: Option<Connection<ReviewNode>>,
}

impl PullRequestNode {
    /// Deleted or anonymized authors become the empty login.
    pub fn author_login(&self) -> &str {
        self.author.as_ref().map(|a| a.login.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNode {
    pub author: Option<Actor>,
    pub submitted_at: Option<String>,
}
