//! GraphQL documents. Cursors travel as variables, never spliced into the text.

use super::client::GraphQlRequest;
use crate::model::Cursor;
use serde_json::json;

pub const PAGE_SIZE: u32 = 100;

pub const ORG_REPOSITORIES: &str = r#"
query($login: String!, $first: Int!, $after: String) {
  organization(login: $login) {
    repositories(first: $first, after: $after) {
      pageInfo { hasNextPage endCursor }
      nodes {
        name
        isArchived
        defaultBranchRef { name }
      }
    }
  }
}"#;

pub const COMMIT_HISTORY: &str = r#"
query($owner: String!, $name: String!, $qualifiedName: String!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    ref(qualifiedName: $qualifiedName) {
      target {
        ... on Commit {
          history(first: $first, after: $after) {
            pageInfo { hasNextPage endCursor }
            nodes {
              authoredDate
              author {
                name
                user { login }
              }
            }
          }
        }
      }
    }
  }
}"#;

pub const PULL_REQUEST_REVIEWS: &str = r#"
query($owner: String!, $name: String!, $first: Int!, $after: String, $reviewsFirst: Int!, $reviewsAfter: String) {
  repository(owner: $owner, name: $name) {
    pullRequests(first: $first, after: $after) {
      pageInfo { hasNextPage endCursor }
      nodes {
        id
        number
        author { login }
        reviews(first: $reviewsFirst, after: $reviewsAfter) {
          pageInfo { hasNextPage endCursor }
          nodes {
            author { login }
            submittedAt
          }
        }
      }
    }
  }
}"#;

pub fn org_repositories(login: &str, first: u32, after: &Cursor) -> GraphQlRequest {
    GraphQlRequest::new(
        ORG_REPOSITORIES,
        json!({ "login": login, "first": first, "after": after.as_deref() }),
    )
}

pub fn commit_history(
    owner: &str,
    name: &str,
    branch: &str,
    first: u32,
    after: &Cursor,
) -> GraphQlRequest {
    GraphQlRequest::new(
        COMMIT_HISTORY,
        json!({
            "owner": owner,
            "name": name,
            "qualifiedName": branch,
            "first": first,
            "after": after.as_deref(),
        }),
    )
}

pub fn pull_request_reviews(
    owner: &str,
    name: &str,
    first: u32,
    after: &Cursor,
    reviews_after: &Cursor,
) -> GraphQlRequest {
    GraphQlRequest::new(
        PULL_REQUEST_REVIEWS,
        json!({
            "owner": owner,
            "name": name,
            "first": first,
            "after": after.as_deref(),
            "reviewsFirst": first,
            "reviewsAfter": reviews_after.as_deref(),
        }),
    )
}
