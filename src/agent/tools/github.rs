//! GitHub tool.
//!
//! Actions return canned sample data; no request is made to the GitHub
//! API. Parameter problems are reported as structured `{"error": ...}`
//! values so the model can read them — this tool only fails upward when
//! the parameters are not valid JSON for the schema at all.

use super::registry::{AgentTool, ToolDefinition, ToolError};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DEFAULT_REPO: &str = "user/repo";
const SAMPLE_COMMENT_ID: u64 = 12345;

/// Parameters for the GitHub tool, discriminated by `action`.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum GithubParams {
    SummarizePr {
        #[serde(default)]
        repo: Option<String>,
        #[serde(default)]
        pr_number: Option<u64>,
    },
    ListIssues {
        #[serde(default)]
        repo: Option<String>,
    },
    CheckRepo {
        #[serde(default)]
        repo: Option<String>,
    },
    CommentIssue {
        #[serde(default)]
        issue_number: Option<u64>,
        #[serde(default)]
        comment: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct PrSummary {
    title: String,
    number: u64,
    author: &'static str,
    changes: &'static str,
    files_changed: u32,
    summary: &'static str,
    reviewers: Vec<&'static str>,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct IssueSummary {
    number: u64,
    title: &'static str,
    author: &'static str,
    labels: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct IssueList {
    total_count: usize,
    open_issues: Vec<IssueSummary>,
}

#[derive(Debug, Serialize)]
struct CommentAck {
    success: bool,
    issue_number: u64,
    comment_id: u64,
    timestamp: String,
}

/// The GitHub tool implementation.
#[derive(Default)]
pub struct GithubTool;

impl GithubTool {
    pub fn new() -> Self {
        Self
    }

    fn error(message: &str) -> Value {
        json!({ "error": message })
    }

    fn summarize_pr(pr_number: Option<u64>) -> Value {
        let Some(pr_number) = pr_number else {
            return Self::error("PR number is required");
        };

        let summary = PrSummary {
            title: format!("Example PR #{}", pr_number),
            number: pr_number,
            author: "github-user",
            changes: "+100/-50",
            files_changed: 5,
            summary: "This is a sample PR summary. In production, this would contain actual PR data.",
            reviewers: vec!["reviewer1", "reviewer2"],
            status: "open",
        };
        json!(summary)
    }

    fn list_issues() -> Value {
        let issues = vec![
            IssueSummary {
                number: 42,
                title: "Example issue 1",
                author: "user1",
                labels: vec!["bug"],
            },
            IssueSummary {
                number: 43,
                title: "Example issue 2",
                author: "user2",
                labels: vec!["enhancement"],
            },
            IssueSummary {
                number: 44,
                title: "Example issue 3",
                author: "user3",
                labels: vec!["documentation"],
            },
        ];
        json!(IssueList {
            total_count: issues.len(),
            open_issues: issues,
        })
    }

    fn check_repo(repo: Option<String>) -> Value {
        let repo = repo.unwrap_or_else(|| DEFAULT_REPO.to_string());
        json!({
            "name": repo,
            "description": "Example repository description",
            "open_prs": 5,
            "open_issues": 10,
            "stars": 100,
            "forks": 20,
            "latest_commit": {
                "message": "Example commit message",
                "author": "github-user",
                "timestamp": Utc::now().to_rfc3339(),
            },
        })
    }

    fn comment_issue(issue_number: Option<u64>, comment: Option<String>) -> Value {
        let Some(issue_number) = issue_number else {
            return Self::error("Issue number is required");
        };
        if comment.map(|c| c.is_empty()).unwrap_or(true) {
            return Self::error("Comment text is required");
        }

        json!(CommentAck {
            success: true,
            issue_number,
            comment_id: SAMPLE_COMMENT_ID,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[async_trait]
impl AgentTool for GithubTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "github".to_string(),
            description: "Interact with GitHub repositories, PRs, and issues".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["summarize_pr", "list_issues", "check_repo", "comment_issue"],
                        "description": "The GitHub action to perform"
                    },
                    "repo": {
                        "type": "string",
                        "description": "Repository name in format owner/repo"
                    },
                    "pr_number": {
                        "type": "integer",
                        "description": "PR number to summarize"
                    },
                    "issue_number": {
                        "type": "integer",
                        "description": "Issue number to interact with"
                    },
                    "comment": {
                        "type": "string",
                        "description": "Comment text to add to an issue"
                    }
                },
                "required": ["action"]
            }),
        }
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: GithubParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let result = match params {
            GithubParams::SummarizePr { pr_number, .. } => Self::summarize_pr(pr_number),
            GithubParams::ListIssues { .. } => Self::list_issues(),
            GithubParams::CheckRepo { repo } => Self::check_repo(repo),
            GithubParams::CommentIssue {
                issue_number,
                comment,
            } => Self::comment_issue(issue_number, comment),
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(params: Value) -> Value {
        GithubTool::new().execute(params).await.unwrap()
    }

    #[tokio::test]
    async fn test_summarize_pr_requires_pr_number() {
        let result = run(json!({"action": "summarize_pr"})).await;
        assert_eq!(result, json!({"error": "PR number is required"}));
    }

    #[tokio::test]
    async fn test_summarize_pr_returns_sample_data() {
        let result = run(json!({"action": "summarize_pr", "pr_number": 123})).await;
        assert_eq!(result["number"], 123);
        assert_eq!(result["title"], "Example PR #123");
        assert_eq!(result["status"], "open");
    }

    #[tokio::test]
    async fn test_list_issues_ignores_input() {
        let result = run(json!({"action": "list_issues", "repo": "someone/else"})).await;
        assert_eq!(result["total_count"], 3);
        assert_eq!(result["open_issues"][0]["number"], 42);
        assert_eq!(result["open_issues"][2]["labels"][0], "documentation");
    }

    #[tokio::test]
    async fn test_check_repo_echoes_repo_name() {
        let result = run(json!({"action": "check_repo", "repo": "octo/calculator"})).await;
        assert_eq!(result["name"], "octo/calculator");
        assert_eq!(result["stars"], 100);

        let result = run(json!({"action": "check_repo"})).await;
        assert_eq!(result["name"], "user/repo");
    }

    #[tokio::test]
    async fn test_comment_issue_success() {
        let result =
            run(json!({"action": "comment_issue", "issue_number": 45, "comment": "lgtm"})).await;
        assert_eq!(result["success"], true);
        assert_eq!(result["issue_number"], 45);
        assert_eq!(result["comment_id"], 12345);
    }

    #[tokio::test]
    async fn test_comment_issue_missing_fields() {
        let result = run(json!({"action": "comment_issue", "comment": "lgtm"})).await;
        assert_eq!(result, json!({"error": "Issue number is required"}));

        let result = run(json!({"action": "comment_issue", "issue_number": 45})).await;
        assert_eq!(result, json!({"error": "Comment text is required"}));
    }

    #[tokio::test]
    async fn test_unknown_action_is_invalid_params() {
        let result = GithubTool::new()
            .execute(json!({"action": "delete_repo"}))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }
}
