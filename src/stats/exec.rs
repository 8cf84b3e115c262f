use super::aggregate::aggregate_repository;
use super::output::{write_report, ReportOptions};
use crate::error::Result;
use crate::github::{collect_commits, collect_reviews, list_repositories, PageFetcher};
use crate::model::{RepositoryRef, RepositoryReport, WindowBoundary};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

/// Reviews then commits for one repository, folded into its own table.
pub fn collect_repository(
    fetcher: &dyn PageFetcher,
    org: &str,
    repository: &RepositoryRef,
    boundary: &WindowBoundary,
) -> Result<RepositoryReport> {
    let reviews = collect_reviews(fetcher, org, &repository.name)?;
    let commits = collect_commits(fetcher, org, &repository.name, &repository.default_branch)?;
    let authors = aggregate_repository(boundary, &reviews, &commits);

    info!(
        repo = %repository.name,
        reviews = reviews.len(),
        commits = commits.len(),
        authors = authors.len(),
        "repository aggregated"
    );

    Ok(RepositoryReport {
        repository: repository.clone(),
        authors,
    })
}

/// Walk the whole organization. The first failure aborts the run.
pub fn collect_organization(
    fetcher: &dyn PageFetcher,
    org: &str,
    boundary: &WindowBoundary,
    show_progress: bool,
) -> Result<Vec<RepositoryReport>> {
    let repositories = list_repositories(fetcher, org)?;

    let pb = if show_progress {
        let pb = ProgressBar::new(repositories.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut reports = Vec::with_capacity(repositories.len());
    for repository in &repositories {
        pb.set_message(format!("{org}/{}", repository.name));
        match collect_repository(fetcher, org, repository, boundary) {
            Ok(report) => reports.push(report),
            Err(e) => {
                if e.is_not_found() {
                    warn!(repo = %repository.name, "listed repository could not be resolved");
                }
                pb.abandon_with_message(format!("{org}/{} failed", repository.name));
                return Err(e);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(reports)
}

/// Collect everything first so a failure never leaves a partial report behind.
pub fn exec<W: Write>(
    fetcher: &dyn PageFetcher,
    org: &str,
    boundary: &WindowBoundary,
    options: ReportOptions,
    show_progress: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let reports = collect_organization(fetcher, org, boundary, show_progress)
        .with_context(|| format!("Failed to collect statistics for organization '{org}'"))?;
    write_report(out, &reports, boundary, options).context("Failed to write report")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrgStatsError;
    use crate::github::query::{COMMIT_HISTORY, ORG_REPOSITORIES, PULL_REQUEST_REVIEWS};
    use crate::github::testing::ScriptedFetcher;
    use crate::github::GraphQlRequest;
    use crate::model::{AuthorStats, Identity};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn boundary() -> WindowBoundary {
        WindowBoundary::trailing_year(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
    }

    fn days_ago(days: i64) -> String {
        (boundary().captured_at - ChronoDuration::days(days))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string()
    }

    fn organization() -> Value {
        json!({
            "organization": {
                "repositories": {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "nodes": [
                        { "name": "rocket", "isArchived": false, "defaultBranchRef": { "name": "main" } },
                        { "name": "attic", "isArchived": true, "defaultBranchRef": { "name": "main" } }
                    ]
                }
            }
        })
    }

    fn pull_requests() -> Value {
        json!({
            "repository": {
                "pullRequests": {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "nodes": [{
                        "id": "PR_1",
                        "number": 1,
                        "author": { "login": "bob" },
                        "reviews": {
                            "pageInfo": { "hasNextPage": false, "endCursor": null },
                            "nodes": [{ "author": { "login": "alice" }, "submittedAt": days_ago(5) }]
                        }
                    }]
                }
            }
        })
    }

    fn history() -> Value {
        json!({
            "repository": {
                "ref": {
                    "target": {
                        "history": {
                            "pageInfo": { "hasNextPage": false, "endCursor": null },
                            "nodes": [
                                { "authoredDate": days_ago(10), "author": { "name": "Alice", "user": { "login": "alice" } } },
                                { "authoredDate": days_ago(400), "author": { "name": "Bob", "user": { "login": "bob" } } }
                            ]
                        }
                    }
                }
            }
        })
    }

    fn respond(req: &GraphQlRequest) -> crate::error::Result<Value> {
        match req.query {
            q if q == ORG_REPOSITORIES => Ok(organization()),
            q if q == PULL_REQUEST_REVIEWS => Ok(pull_requests()),
            q if q == COMMIT_HISTORY => Ok(history()),
            _ => panic!("unexpected query"),
        }
    }

    #[test]
    fn organization_end_to_end() {
        let fetcher = ScriptedFetcher::new(respond);
        let reports = collect_organization(&fetcher, "acme", &boundary(), false).unwrap();

        assert_eq!(reports.len(), 1);
        let authors = &reports[0].authors;
        assert_eq!(
            authors.get(&Identity::Login("alice".into())),
            Some(&AuthorStats {
                total_commits: 1,
                commits_in_window: 1,
                total_reviews: 1,
                reviews_in_window: 1,
            })
        );
        assert_eq!(
            authors.get(&Identity::Login("bob".into())),
            Some(&AuthorStats {
                total_commits: 1,
                commits_in_window: 0,
                total_reviews: 0,
                reviews_in_window: 0,
            })
        );

        // repositories, reviews, commits
        let queries: Vec<_> = fetcher.requests().iter().map(|r| r.query).collect();
        assert_eq!(queries, vec![ORG_REPOSITORIES, PULL_REQUEST_REVIEWS, COMMIT_HISTORY]);
    }

    #[test]
    fn failure_prints_nothing() {
        let fetcher = ScriptedFetcher::new(|req: &GraphQlRequest| {
            if req.query == COMMIT_HISTORY {
                Ok(json!({ "repository": { "ref": null } }))
            } else {
                respond(req)
            }
        });

        let mut out = Vec::new();
        let options = ReportOptions::from_flags(false, false);
        let err = exec(&fetcher, "acme", &boundary(), options, false, &mut out).unwrap_err();

        assert!(out.is_empty());
        let root = err.downcast_ref::<OrgStatsError>().unwrap();
        assert!(matches!(root, OrgStatsError::RefNotFound { .. }));
    }

    #[test]
    fn report_contains_windowed_rows() {
        let fetcher = ScriptedFetcher::new(respond);
        let mut out = Vec::new();
        exec(
            &fetcher,
            "acme",
            &boundary(),
            ReportOptions::from_flags(false, true),
            false,
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Author,Commits in last year,Reviews in last year\nalice,1,1\n"));
        assert!(!text.contains("bob,"));
        assert!(!text.contains("attic"));
    }
}
