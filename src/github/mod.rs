//! GitHub GraphQL access.
//!
//! - [`client`] - the page fetcher seam and the blocking HTTP client
//! - [`query`] - GraphQL documents and request builders
//! - [`types`] - response shapes
//! - [`repos`], [`commits`], [`reviews`] - the paginated walkers

pub mod client;
pub mod commits;
pub mod query;
pub mod repos;
pub mod reviews;
pub mod types;

pub use client::{GraphQlClient, GraphQlRequest, PageFetcher, DEFAULT_API_URL};
pub use commits::collect_commits;
pub use repos::list_repositories;
pub use reviews::{collect_reviews, ReviewCursor, ReviewWalk};

#[cfg(test)]
pub(crate) mod testing {
    use super::{GraphQlRequest, PageFetcher};
    use crate::error::Result;
    use serde_json::Value;
    use std::cell::RefCell;

    /// In-memory fetcher answering each request from a closure.
    pub struct ScriptedFetcher<F> {
        respond: F,
        requests: RefCell<Vec<GraphQlRequest>>,
    }

    impl<F> ScriptedFetcher<F>
    where
        F: Fn(&GraphQlRequest) -> Result<Value>,
    {
        pub fn new(respond: F) -> Self {
            Self {
                respond,
                requests: RefCell::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.borrow().len()
        }

        pub fn requests(&self) -> Vec<GraphQlRequest> {
            self.requests.borrow().clone()
        }
    }

    impl<F> PageFetcher for ScriptedFetcher<F>
    where
        F: Fn(&GraphQlRequest) -> Result<Value>,
    {
        fn fetch(&self, request: &GraphQlRequest) -> Result<Value> {
            self.requests.borrow_mut().push(request.clone());
            (self.respond)(request)
        }
    }
}
