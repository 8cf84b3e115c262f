use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;

pub const WINDOW_DAYS: i64 = 365;

/// Who an event is attributed to.
///
/// Commits whose author email GitHub cannot match to an account only carry the
/// free-text author name. The two namespaces are never unified, so `Login("ada")`
/// and `Name("ada")` are distinct authors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Login(String),
    Name(String),
}

impl Identity {
    pub fn as_str(&self) -> &str {
        match self {
            Identity::Login(s) | Identity::Name(s) => s,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEvent {
    pub author: Identity,
    pub authored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEvent {
    pub author: Identity,
    pub submitted_at: DateTime<Utc>,
}

/// Anything the aggregator can fold into an author's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributionEvent {
    Commit(CommitEvent),
    Review(ReviewEvent),
}

impl From<CommitEvent> for ContributionEvent {
    fn from(event: CommitEvent) -> Self {
        ContributionEvent::Commit(event)
    }
}

impl From<ReviewEvent> for ContributionEvent {
    fn from(event: ReviewEvent) -> Self {
        ContributionEvent::Review(event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub name: String,
    pub default_branch: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorStats {
    pub total_commits: u64,
    pub commits_in_window: u64,
    pub total_reviews: u64,
    pub reviews_in_window: u64,
}

impl AuthorStats {
    pub fn add_commit(&mut self, in_window: bool) {
        self.total_commits += 1;
        if in_window {
            self.commits_in_window += 1;
        }
    }

    pub fn add_review(&mut self, in_window: bool) {
        self.total_reviews += 1;
        if in_window {
            self.reviews_in_window += 1;
        }
    }

    /// Sort key used by the report.
    pub fn window_activity(&self) -> u64 {
        self.commits_in_window + self.reviews_in_window
    }

    pub fn is_active_in_window(&self) -> bool {
        self.window_activity() > 0
    }
}

/// Per-repository author table that remembers first-seen order.
///
/// Equality ignores insertion order: two tables are equal when they hold the
/// same counters for the same authors.
#[derive(Debug, Clone, Default)]
pub struct AuthorTable {
    order: Vec<Identity>,
    stats: HashMap<Identity, AuthorStats>,
}

impl AuthorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&mut self, author: &Identity) -> &mut AuthorStats {
        if !self.stats.contains_key(author) {
            self.order.push(author.clone());
        }
        self.stats.entry(author.clone()).or_default()
    }

    pub fn get(&self, author: &Identity) -> Option<&AuthorStats> {
        self.stats.get(author)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Authors in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &AuthorStats)> + '_ {
        self.order
            .iter()
            .filter_map(move |author| self.stats.get(author).map(|s| (author, s)))
    }
}

impl PartialEq for AuthorTable {
    fn eq(&self, other: &Self) -> bool {
        self.stats == other.stats
    }
}

impl Eq for AuthorTable {}

/// Start of the trailing window, captured once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBoundary {
    pub captured_at: DateTime<Utc>,
    pub start: DateTime<Utc>,
}

impl WindowBoundary {
    pub fn trailing_year(now: DateTime<Utc>) -> Self {
        Self {
            captured_at: now,
            start: now - Duration::days(WINDOW_DAYS),
        }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        instant >= &self.start
    }
}

/// Position in one paginated connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub after: Option<String>,
}

impl Cursor {
    pub fn start() -> Self {
        Self { after: None }
    }

    pub fn at(token: impl Into<String>) -> Self {
        Self {
            after: Some(token.into()),
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.after.as_deref()
    }
}

/// Aggregated statistics for one repository, ready for the reporter.
#[derive(Debug, Clone)]
pub struct RepositoryReport {
    pub repository: RepositoryRef,
    pub authors: AuthorTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn identity_namespaces_are_distinct() {
        let login = Identity::Login("ada".into());
        let name = Identity::Name("ada".into());
        assert_ne!(login, name);
        assert_eq!(login.to_string(), name.to_string());
    }

    #[test]
    fn table_keeps_first_seen_order() {
        let mut table = AuthorTable::new();
        table.entry(&Identity::Login("zed".into())).add_review(true);
        table.entry(&Identity::Login("amy".into())).add_commit(false);
        table.entry(&Identity::Login("zed".into())).add_commit(true);

        let order: Vec<_> = table.iter().map(|(a, _)| a.as_str().to_string()).collect();
        assert_eq!(order, vec!["zed", "amy"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn boundary_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let boundary = WindowBoundary::trailing_year(now);
        assert!(boundary.contains(&boundary.start));
        assert!(!boundary.contains(&(boundary.start - Duration::seconds(1))));
        assert!(boundary.contains(&now));
    }
}
