use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use super::{IssueTracker, NewIssue, TrackedItem};
use crate::config::Credentials;
use crate::errors::SyncError;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = "todo-sync";
const PER_PAGE: usize = 100;

const LIST_OPERATION: &str = "fetch open issues";
const CREATE_OPERATION: &str = "create issue";

/// A GitHub issue as returned by the issues endpoint (subset of fields).
#[derive(Debug, Deserialize)]
struct GitHubIssue {
    title: String,
    /// Pull requests also come through the issues endpoint; filter them out.
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

/// GitHub REST client for a single repository.
pub struct GitHubTracker {
    client: reqwest::Client,
    api_base: String,
    owner: String,
    repository: String,
    token: String,
}

impl GitHubTracker {
    pub fn new(api_base: &str, credentials: &Credentials) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| SyncError::Transport {
                operation: "build HTTP client",
                source,
            })?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            owner: credentials.owner.clone(),
            repository: credentials.repository.clone(),
            token: credentials.token.clone(),
        })
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_base, self.owner, self.repository
        )
    }
}

/// Pass through 2xx responses; turn anything else into a `Tracker` error
/// carrying the raw body.
async fn check_status(
    resp: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    // A body that cannot be read is a transport failure, not an empty reply.
    let body = resp
        .text()
        .await
        .map_err(|source| SyncError::Transport { operation, source })?;
    Err(SyncError::Tracker {
        operation,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    /// Paginates through all pages automatically.
    async fn list_open(&self, label: &str) -> Result<Vec<TrackedItem>, SyncError> {
        let transport = |source| SyncError::Transport {
            operation: LIST_OPERATION,
            source,
        };
        let url = self.issues_url();
        let per_page = PER_PAGE.to_string();
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let page_param = page.to_string();
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .header(ACCEPT, GITHUB_ACCEPT)
                .query(&[
                    ("state", "open"),
                    ("labels", label),
                    ("per_page", per_page.as_str()),
                    ("page", page_param.as_str()),
                ])
                .send()
                .await
                .map_err(transport)?;

            let batch: Vec<GitHubIssue> = check_status(resp, LIST_OPERATION)
                .await?
                .json()
                .await
                .map_err(transport)?;

            let count = batch.len();
            items.extend(
                batch
                    .into_iter()
                    .filter(|issue| issue.pull_request.is_none())
                    .map(|issue| TrackedItem { title: issue.title }),
            );

            tracing::debug!(page, count, "fetched issues page");
            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    async fn create(&self, issue: &NewIssue) -> Result<(), SyncError> {
        let resp = self
            .client
            .post(self.issues_url())
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(issue)
            .send()
            .await
            .map_err(|source| SyncError::Transport {
                operation: CREATE_OPERATION,
                source,
            })?;

        check_status(resp, CREATE_OPERATION).await?;
        Ok(())
    }
}
