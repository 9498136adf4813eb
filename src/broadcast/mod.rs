// broadcast module: issue fetch, target resolution and fan-out

pub mod candidates;
pub mod dispatch;
pub mod fetch;
pub mod repo_info;
pub mod resolve;

pub use candidates::{CandidateIndex, load_candidate_index};
pub use dispatch::{BroadcastMode, BroadcastOutcome, TargetOutcome, broadcast};
pub use fetch::{FetchedIssue, fetch_issue};
pub use repo_info::{GroupsMap, RepoInfo, ReposMap, load_repo_maps, load_repo_maps_in};
pub use resolve::resolve_targets;
