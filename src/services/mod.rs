//! Backend Service Bindings
//!
//! Typed wrappers over the REST surface, organized by resource. Nothing here
//! does more than shape a request; failures come back untouched.

mod auth;
mod boards;
mod cards;
mod github;
mod members;
mod notifications;
mod tasks;

// Re-export all public items
pub use auth::*;
pub use boards::*;
pub use cards::*;
pub use github::*;
pub use members::*;
pub use notifications::*;
pub use tasks::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::models::{GitHubBranch, GitHubInfo, GitHubItemKind};
    use crate::testing::{card, harness, member, task};

    #[tokio::test]
    async fn test_single_resource_reads() {
        let h = harness("/boards/b1");
        h.backend.seed_card("b1", card("c1", "Todo"));
        h.backend.seed_task("b1", task("t1", "c1"));

        let fetched_card = get_card(&h.api, "b1", "c1").await.unwrap();
        let fetched_task = get_task(&h.api, "b1", "c1", "t1").await.unwrap();

        assert_eq!(fetched_card.name, "Todo");
        assert_eq!(fetched_task.card_id, "c1");
        let urls: Vec<String> = h.backend.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["http://api.test/boards/b1/cards/c1", "http://api.test/boards/b1/cards/c1/tasks/t1"]);
    }

    #[tokio::test]
    async fn test_assignment_endpoints() {
        let h = harness("/boards/b1");
        h.backend.seed_task("b1", task("t1", "c1"));
        h.backend.seed_member("b1", member("m1", "grace"));

        let assignment = assign_member(&h.api, "b1", "c1", "t1", "m1").await.unwrap();
        let listed = list_assignments(&h.api, "b1", "c1", "t1").await.unwrap();

        assert_eq!(assignment.member_id, "m1");
        assert_eq!(listed, vec![assignment]);
        assert_eq!(h.backend.requests()[0].body, Some(serde_json::json!({ "memberId": "m1" })));
    }

    #[tokio::test]
    async fn test_ids_are_escaped_in_paths() {
        let h = harness("/boards");
        let _ = get_board(&h.api, "a/b").await;
        assert_eq!(h.backend.requests()[0].url, "http://api.test/boards/a%2Fb");
    }

    #[tokio::test]
    async fn test_mark_read_is_bodyless_put() {
        let h = harness("/boards");
        let _ = mark_notification_read(&h.api, "n1").await;
        let sent = &h.backend.requests()[0];
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.url, "http://api.test/notifications/n1/read");
        assert_eq!(sent.body, None);
    }

    #[tokio::test]
    async fn test_github_attachments_lifecycle() {
        let h = harness("/boards/b1");
        h.backend.seed_task("b1", task("t1", "c1"));

        let pull = attach_github_item(&h.api, "b1", "c1", "t1", &GitHubItemRef::pull_request("42")).await.unwrap();
        let commit = attach_github_item(&h.api, "b1", "c1", "t1", &GitHubItemRef::commit("9fceb02")).await.unwrap();

        assert_eq!(pull.kind, GitHubItemKind::PullRequest);
        assert_eq!(commit.sha.as_deref(), Some("9fceb02"));
        assert_eq!(h.backend.requests()[0].url, "http://api.test/boards/b1/cards/c1/tasks/t1/github-attach");
        assert_eq!(h.backend.requests()[1].body, Some(serde_json::json!({ "type": "commit", "sha": "9fceb02" })));

        remove_github_attachment(&h.api, "b1", "c1", "t1", &pull.attachment_id).await.unwrap();
        let remaining = list_github_attachments(&h.api, "b1", "c1", "t1").await.unwrap();

        assert_eq!(remaining, vec![commit]);
    }

    #[tokio::test]
    async fn test_repository_info() {
        let h = harness("/boards");
        h.backend.seed_repository(GitHubInfo {
            repository_id: "r1".to_string(),
            branches: vec![GitHubBranch { name: "main".to_string(), last_commit_sha: "9fceb02".to_string() }],
            pulls: Vec::new(),
            issues: Vec::new(),
            commits: Vec::new(),
        });

        let info = repository_info(&h.api, "r1").await.unwrap();
        let missing = repository_info(&h.api, "r2").await;

        assert_eq!(info.branches[0].name, "main");
        assert_eq!(h.backend.requests()[0].url, "http://api.test/repositories/r1/github-info");
        assert!(matches!(missing, Err(crate::error::ApiError::Status { status: 404, .. })));
    }
}
