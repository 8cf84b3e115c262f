pub mod cli;
pub mod credential;
pub mod error;
pub mod github;
pub mod model;
pub mod stats;
pub mod util;
