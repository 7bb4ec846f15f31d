use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use http::StatusCode;
use octocrab::Octocrab;
use std::fmt;

use super::{Backend, StoreError, Stored};

/// Create an authenticated GitHub client using a personal access token
pub fn create_client(token: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .context("Failed to create GitHub client")
}

/// Score table kept as a file in a GitHub repository, read and written
/// through the contents API.
#[derive(Clone)]
pub struct GitHubBackend {
    client: Octocrab,
    owner: String,
    repo: String,
    path: String,
    branch: String,
}

impl fmt::Debug for GitHubBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubBackend")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("branch", &self.branch)
            .finish_non_exhaustive()
    }
}

impl GitHubBackend {
    /// `repo` is in "owner/name" format.
    pub fn new(client: Octocrab, repo: &str, path: &str, branch: &str) -> Result<Self> {
        let (owner, name) = split_repo(repo)?;
        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: name.to_string(),
            path: path.trim_start_matches('/').to_string(),
            branch: branch.to_string(),
        })
    }

    /// Fetch the file, returning its decoded text and blob sha.
    async fn fetch(&self) -> Result<Option<(String, String)>> {
        let result = self
            .client
            .repos(&self.owner, &self.repo)
            .get_content()
            .path(&self.path)
            .r#ref(&self.branch)
            .send()
            .await;

        let items = match result {
            Ok(items) => items,
            Err(e) if status_of(&e) == Some(StatusCode::NOT_FOUND) => return Ok(None),
            Err(e) => return Err(classify(e)),
        };

        let Some(item) = items.items.into_iter().next() else {
            return Ok(None);
        };
        let text = item
            .decoded_content()
            .ok_or_else(|| anyhow!("{} has no decodable content", self.describe()))?;
        Ok(Some((text, item.sha)))
    }
}

impl Backend for GitHubBackend {
    async fn read(&self) -> Result<Option<Stored>> {
        Ok(self.fetch().await?.map(|(content, sha)| Stored {
            content,
            version: Some(sha),
        }))
    }

    /// `base` is the blob sha from the read this write is based on. GitHub
    /// rejects the update if the file has moved on since.
    async fn write(&self, content: &str, message: &str, base: Option<&str>) -> Result<()> {
        let message = format!("{} ({})", message, Utc::now().format("%Y-%m-%d %H:%M UTC"));
        let repos = self.client.repos(&self.owner, &self.repo);

        let result = match base {
            Some(sha) => {
                repos
                    .update_file(&self.path, &message, content, sha)
                    .branch(&self.branch)
                    .send()
                    .await
            }
            None => {
                repos
                    .create_file(&self.path, &message, content)
                    .branch(&self.branch)
                    .send()
                    .await
            }
        };

        match result {
            Ok(_) => {
                tracing::debug!(repo = %self.repo, path = %self.path, "score table committed");
                Ok(())
            }
            Err(e) => Err(classify(e)),
        }
    }

    fn describe(&self) -> String {
        format!(
            "github {}/{}:{}@{}",
            self.owner, self.repo, self.path, self.branch
        )
    }
}

fn split_repo(repo: &str) -> Result<(&str, &str)> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(anyhow!("Invalid repo format '{}', expected owner/name", repo)),
    }
}

fn status_of(e: &octocrab::Error) -> Option<StatusCode> {
    match e {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code),
        _ => None,
    }
}

/// Map a contents API status to the `StoreError` the caller branches on.
/// `None` means no HTTP response came back at all.
fn store_error_for(status: Option<StatusCode>, detail: &str) -> StoreError {
    match status {
        Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => {
            StoreError::Unauthorized("GitHub token is invalid, expired or lacks repo access".to_string())
        }
        // 409 is a stale sha on update; 422 is a create racing an existing file.
        Some(StatusCode::CONFLICT) | Some(StatusCode::UNPROCESSABLE_ENTITY) => {
            StoreError::WriteRejected(format!("GitHub refused the update: {}", detail))
        }
        _ => StoreError::Unreachable(format!("GitHub API error: {}", detail)),
    }
}

fn classify(e: octocrab::Error) -> anyhow::Error {
    anyhow::Error::new(store_error_for(status_of(&e), &e.to_string()))
}
