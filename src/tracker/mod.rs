// tracker module: the issue-tracker seam used by the broadcast pipeline

pub mod github;
mod interface;
pub mod stub;

pub use github::GitHubTracker;
pub use interface::IssueTracker;
pub use stub::{StubTracker, TrackerCall};
