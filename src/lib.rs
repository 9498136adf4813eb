// Pedantic: suppress noise for internal crate code.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod actions;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod pypi;
pub mod tracker;
pub mod url;
