//! Live adapter for the Gitee v5 REST API.

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{check_status, read_json};
use crate::ports::source_host::{CreatedRepo, NewRepo, RemoteRepo, RepoScope, SourceHost};
use crate::ports::{PortError, PortFuture};

/// Source-host client authenticated with a personal access token.
pub struct LiveSourceHost {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

/// Body of a repository creation request.
#[derive(Serialize)]
struct CreateRepoBody<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
}

/// Body of a repository update request.
#[derive(Serialize)]
struct PatchRepoBody<'a> {
    name: &'a str,
    private: bool,
}

/// Fields of a created repository the pipeline needs.
#[derive(Deserialize)]
struct CreatedRepoResponse {
    full_name: String,
    ssh_url: String,
    html_url: String,
}

impl LiveSourceHost {
    /// Creates a client for the API rooted at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Decode`] if `api_base` is not a usable base URL.
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self, PortError> {
        let api_base = Url::parse(api_base).map_err(PortError::decode)?;
        if api_base.cannot_be_a_base() {
            return Err(PortError::decode(format!("{api_base} cannot be used as an API base")));
        }
        Ok(Self { client: Client::new(), api_base, token })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("token {token}")),
            None => request,
        }
    }
}

impl SourceHost for LiveSourceHost {
    fn list_repos<'a>(
        &'a self,
        scope: &'a RepoScope,
        page: u32,
        per_page: u32,
    ) -> PortFuture<'a, Vec<RemoteRepo>> {
        Box::pin(async move {
            let url = match scope {
                RepoScope::User(user) => self.endpoint(&["users", user.as_str(), "repos"]),
                RepoScope::Authenticated => self.endpoint(&["user", "repos"]),
                RepoScope::Org(org) => self.endpoint(&["orgs", org.as_str(), "repos"]),
            };
            let request = self
                .client
                .get(url)
                .query(&[("page", page.to_string()), ("per_page", per_page.to_string())]);
            let response =
                self.authorized(request).send().await.map_err(PortError::transport)?;
            read_json(response).await
        })
    }

    fn branch_exists<'a>(&'a self, full_name: &'a str, branch: &'a str) -> PortFuture<'a, bool> {
        Box::pin(async move {
            let mut segments = vec!["repos"];
            segments.extend(full_name.split('/'));
            segments.extend(["branches", branch]);
            let request = self.client.get(self.endpoint(&segments));
            let response =
                self.authorized(request).send().await.map_err(PortError::transport)?;
            Ok(response.status().is_success())
        })
    }

    fn create_repo<'a>(&'a self, request: &'a NewRepo) -> PortFuture<'a, CreatedRepo> {
        Box::pin(async move {
            let url = match &request.org {
                Some(org) => self.endpoint(&["orgs", org.as_str(), "repos"]),
                None => self.endpoint(&["user", "repos"]),
            };
            let body = CreateRepoBody {
                name: &request.name,
                description: &request.description,
                private: request.private,
                auto_init: false,
            };
            let response = self
                .authorized(self.client.post(url).json(&body))
                .send()
                .await
                .map_err(PortError::transport)?;
            let created: CreatedRepoResponse = read_json(response).await?;
            Ok(CreatedRepo {
                full_name: created.full_name,
                push_url: created.ssh_url,
                html_url: created.html_url,
            })
        })
    }

    fn set_private<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        private: bool,
    ) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let url = self.endpoint(&["repos", owner, repo]);
            let body = PatchRepoBody { name: repo, private };
            let response = self
                .authorized(self.client.patch(url).json(&body))
                .send()
                .await
                .map_err(PortError::transport)?;
            check_status(response).await.map(|_| ())
        })
    }
}
