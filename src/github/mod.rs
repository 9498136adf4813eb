// github module: REST access to the hosting provider

pub mod auth;
pub mod client;
pub mod issues;
pub mod types;

pub use client::GitHubClient;
pub use types::IssueContent;
