//! API endpoint implementations.

mod auth;
mod bookmarks;
mod bounties;
mod projects;

pub use auth::AuthApi;
pub use bookmarks::BookmarksApi;
pub use bounties::BountiesApi;
pub use projects::ProjectsApi;
