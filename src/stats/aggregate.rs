use crate::model::{AuthorTable, CommitEvent, ContributionEvent, ReviewEvent, WindowBoundary};

pub fn fold_event(table: &mut AuthorTable, boundary: &WindowBoundary, event: &ContributionEvent) {
    match event {
        ContributionEvent::Commit(commit) => table
            .entry(&commit.author)
            .add_commit(boundary.contains(&commit.authored_at)),
        ContributionEvent::Review(review) => table
            .entry(&review.author)
            .add_review(boundary.contains(&review.submitted_at)),
    }
}

/// Fold events into a fresh table. Counts don't depend on event order.
pub fn aggregate<I>(boundary: &WindowBoundary, events: I) -> AuthorTable
where
    I: IntoIterator<Item = ContributionEvent>,
{
    events.into_iter().fold(AuthorTable::new(), |mut table, event| {
        fold_event(&mut table, boundary, &event);
        table
    })
}

/// One repository's table. Reviews are folded first, which fixes the
/// first-seen order the report uses to break ties.
pub fn aggregate_repository(
    boundary: &WindowBoundary,
    reviews: &[ReviewEvent],
    commits: &[CommitEvent],
) -> AuthorTable {
    let events = reviews
        .iter()
        .cloned()
        .map(ContributionEvent::from)
        .chain(commits.iter().cloned().map(ContributionEvent::from));
    aggregate(boundary, events)
}
