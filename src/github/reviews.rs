//! Review history: pull requests outer, reviews-per-pull-request inner.
//!
//! GitHub only exposes a pull request's reviews embedded in the pull request
//! page, so a pull request with more than one page of reviews is drained by
//! re-querying the *same* outer page with the inner cursor advanced. The
//! remaining pull requests of that page are then scanned from the page as it
//! was first fetched (inner cursor empty), because a re-fetched page applies
//! the inner cursor to every pull request it embeds.
//!
//! | state                 | condition                               | next state                          |
//! |-----------------------|-----------------------------------------|-------------------------------------|
//! | `Fetch(O)`            | page fetched with `(O, start)`          | `Scan(O, page, 0)`                  |
//! | `Scan(O, page, i)`    | `i` past the last pull request, more    | `Fetch(O.end_cursor)`               |
//! | `Scan(O, page, i)`    | `i` past the last pull request, no more | `Done`                              |
//! | `Scan(O, page, i)`    | pr `i` reviews have another page        | emit page, `Drain(O, I, page, i)`   |
//! | `Scan(O, page, i)`    | otherwise                               | emit page, `Scan(O, page, i + 1)`   |
//! | `Drain(O, I, page, i)`| re-fetch `(O, I)`, more reviews remain  | emit page, `Drain(O, I', page, i)`  |
//! | `Drain(O, I, page, i)`| re-fetch `(O, I)`, reviews exhausted    | emit page, `Scan(O, page, i + 1)`   |

use super::client::{decode, PageFetcher};
use super::query::{self, PAGE_SIZE};
use super::types::{Connection, PullRequestNode, PullRequestsLookup, RepositoryData, ReviewNode};
use crate::error::{OrgStatsError, Result};
use crate::model::{Cursor, Identity, ReviewEvent};
use crate::util::parse_timestamp;
use tracing::debug;

/// Outer (pull request) and inner (review) positions of the walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewCursor {
    pub pull_requests: Cursor,
    pub reviews: Cursor,
}

impl ReviewCursor {
    fn outer(pull_requests: Cursor) -> Self {
        Self {
            pull_requests,
            reviews: Cursor::start(),
        }
    }

    fn with_reviews(&self, reviews: Cursor) -> Self {
        Self {
            pull_requests: self.pull_requests.clone(),
            reviews,
        }
    }
}

type PullRequestPage = Connection<PullRequestNode>;

enum WalkState {
    Fetch(ReviewCursor),
    Scan {
        cursor: ReviewCursor,
        page: PullRequestPage,
        next: usize,
    },
    Drain {
        cursor: ReviewCursor,
        page: PullRequestPage,
        index: usize,
    },
    Done,
}

pub struct ReviewWalk<'a> {
    fetcher: &'a dyn PageFetcher,
    owner: &'a str,
    name: &'a str,
    page_size: u32,
    requests: usize,
}

impl<'a> ReviewWalk<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, owner: &'a str, name: &'a str) -> Self {
        Self {
            fetcher,
            owner,
            name,
            page_size: PAGE_SIZE,
            requests: 0,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Requests issued so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Walk every pull request and return its qualifying reviews.
    pub fn collect(&mut self) -> Result<Vec<ReviewEvent>> {
        let mut events = Vec::new();
        let mut state = WalkState::Fetch(ReviewCursor::default());
        loop {
            state = match state {
                WalkState::Done => break,
                other => self.step(other, &mut events)?,
            };
        }
        debug!(repo = self.name, reviews = events.len(), requests = self.requests, "review walk finished");
        Ok(events)
    }

    fn step(&mut self, state: WalkState, events: &mut Vec<ReviewEvent>) -> Result<WalkState> {
        match state {
            WalkState::Fetch(cursor) => {
                let page = self.fetch_page(&cursor)?;
                Ok(WalkState::Scan {
                    cursor,
                    page,
                    next: 0,
                })
            }
            WalkState::Scan { cursor, page, next } => {
                let Some(slot) = page.nodes.get(next) else {
                    return Ok(match page.page_info.next_cursor("pull requests")? {
                        Some(after) => WalkState::Fetch(ReviewCursor::outer(after)),
                        None => WalkState::Done,
                    });
                };
                let Some((pr, reviews)) = slot
                    .as_ref()
                    .and_then(|pr| pr.reviews.as_ref().map(|r| (pr, r)))
                else {
                    return Ok(WalkState::Scan {
                        cursor,
                        page,
                        next: next + 1,
                    });
                };
                extend_events(events, pr.author_login(), reviews.items())?;
                let more = reviews.page_info.next_cursor("reviews")?;

                Ok(match more {
                    Some(inner) => WalkState::Drain {
                        cursor: cursor.with_reviews(inner),
                        page,
                        index: next,
                    },
                    None => WalkState::Scan {
                        cursor,
                        page,
                        next: next + 1,
                    },
                })
            }
            WalkState::Drain {
                cursor,
                page,
                index,
            } => {
                let refetched = self.fetch_page(&cursor)?;
                let Some(Some(pr)) = page.nodes.get(index) else {
                    return Err(OrgStatsError::remote(None, "review drain lost its pull request"));
                };
                let current = refetched
                    .items()
                    .find(|candidate| candidate.id == pr.id)
                    .ok_or_else(|| {
                        OrgStatsError::remote(
                            None,
                            format!(
                                "pull request #{} left its page while paging reviews of {}/{}",
                                pr.number, self.owner, self.name
                            ),
                        )
                    })?;
                let reviews = current.reviews.as_ref().ok_or_else(|| {
                    OrgStatsError::remote(None, format!("pull request #{} lost its reviews", pr.number))
                })?;
                extend_events(events, pr.author_login(), reviews.items())?;
                let more = reviews.page_info.next_cursor("reviews")?;

                Ok(match more {
                    Some(inner) => WalkState::Drain {
                        cursor: cursor.with_reviews(inner),
                        page,
                        index,
                    },
                    None => WalkState::Scan {
                        cursor: ReviewCursor::outer(cursor.pull_requests),
                        page,
                        next: index + 1,
                    },
                })
            }
            WalkState::Done => Ok(WalkState::Done),
        }
    }

    fn fetch_page(&mut self, cursor: &ReviewCursor) -> Result<PullRequestPage> {
        let request = query::pull_request_reviews(
            self.owner,
            self.name,
            self.page_size,
            &cursor.pull_requests,
            &cursor.reviews,
        );
        self.requests += 1;
        debug!(
            repo = self.name,
            after = ?cursor.pull_requests.as_deref(),
            reviews_after = ?cursor.reviews.as_deref(),
            "pull request page"
        );

        let page: RepositoryData<PullRequestsLookup> =
            decode(self.fetcher.fetch(&request)?, "pull request reviews")?;
        let repository = page.repository.ok_or_else(|| OrgStatsError::RepositoryNotFound {
            owner: self.owner.to_string(),
            name: self.name.to_string(),
        })?;
        Ok(repository.pull_requests)
    }
}

/// Every qualifying review of every pull request in `owner/name`.
pub fn collect_reviews(fetcher: &dyn PageFetcher, owner: &str, name: &str) -> Result<Vec<ReviewEvent>> {
    ReviewWalk::new(fetcher, owner, name).collect()
}

fn extend_events<'r>(
    events: &mut Vec<ReviewEvent>,
    pr_author: &str,
    reviews: impl Iterator<Item = &'r ReviewNode>,
) -> Result<()> {
    for review in reviews {
        if let Some(event) = review_event(pr_author, review)? {
            events.push(event);
        }
    }
    Ok(())
}

/// Reviews by deleted accounts or by the pull request's author don't count,
/// nor do reviews that were started but never submitted.
fn review_event(pr_author: &str, review: &ReviewNode) -> Result<Option<ReviewEvent>> {
    let Some(author) = review.author.as_ref() else {
        return Ok(None);
    };
    if author.login == pr_author {
        return Ok(None);
    }
    let Some(submitted_at) = review.submitted_at.as_deref() else {
        return Ok(None);
    };
    Ok(Some(ReviewEvent {
        author: Identity::Login(author.login.clone()),
        submitted_at: parse_timestamp(submitted_at)?,
    }))
}
