use serde::{Deserialize, Serialize};

/// Title and body of the issue being broadcast.
///
/// Fetched once per invocation and reused for every target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueContent {
    pub title: String,
    pub body: String,
}

// ---------------------------------------------------------------------------
// REST payloads
// ---------------------------------------------------------------------------

/// `GET /repos/{owner}/{repo}/issues/{number}` (only the fields we use).
#[derive(Debug, Deserialize)]
pub(crate) struct RawIssue {
    pub title: String,
    /// GitHub sends `null` for issues created without a description.
    #[serde(default)]
    pub body: Option<String>,
}

impl From<RawIssue> for IssueContent {
    fn from(raw: RawIssue) -> Self {
        Self {
            title: raw.title,
            body: raw.body.unwrap_or_default(),
        }
    }
}

/// `GET /repos/{owner}/{repo}`; a reachable repository always reports its owner.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRepository {
    pub owner: RawOwner,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOwner {
    pub login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_body_becomes_empty() {
        let raw: RawIssue = serde_json::from_str(r#"{"title": "t", "body": null}"#).unwrap();
        let issue = IssueContent::from(raw);
        assert_eq!(issue.title, "t");
        assert_eq!(issue.body, "");
    }

    #[test]
    fn missing_title_is_rejected() {
        let raw: Result<RawIssue, _> = serde_json::from_str(r#"{"body": "b"}"#);
        assert!(raw.is_err());
    }

    #[test]
    fn repository_requires_owner() {
        let ok: Result<RawRepository, _> =
            serde_json::from_str(r#"{"name": "r", "owner": {"login": "o"}}"#);
        assert_eq!(ok.unwrap().owner.login, "o");
        let missing: Result<RawRepository, _> = serde_json::from_str(r#"{"name": "r"}"#);
        assert!(missing.is_err());
    }
}
