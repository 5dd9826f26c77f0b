//! Live adapter for the Copr (EUR) API v3.

use reqwest::Client;

use super::read_json;
use crate::ports::build_farm::{BuildFarm, FarmProject, ScmSource, SubmittedPackage};
use crate::ports::{PortError, PortFuture};
use crate::settings::CoprCredentials;

/// Build-farm client authenticated with the login/token pair from the copr
/// config file.
pub struct LiveBuildFarm {
    client: Client,
    credentials: Option<CoprCredentials>,
}

impl LiveBuildFarm {
    /// Creates a client; without credentials every call fails with
    /// [`PortError::NotFound`].
    #[must_use]
    pub fn new(credentials: Option<CoprCredentials>) -> Self {
        Self { client: Client::new(), credentials }
    }

    fn credentials(&self) -> Result<&CoprCredentials, PortError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| PortError::NotFound { what: "build-farm credentials".to_string() })
    }
}

impl BuildFarm for LiveBuildFarm {
    fn get_project<'a>(&'a self, owner: &'a str, project: &'a str) -> PortFuture<'a, FarmProject> {
        Box::pin(async move {
            let creds = self.credentials()?;
            let response = self
                .client
                .get(format!("{}/api_3/project", creds.copr_url))
                .query(&[("ownername", owner), ("projectname", project)])
                .basic_auth(&creds.login, Some(&creds.token))
                .send()
                .await
                .map_err(PortError::transport)?;
            match read_json(response).await {
                Err(PortError::Status { code: 404, .. }) => {
                    Err(PortError::NotFound { what: format!("project {owner}/{project}") })
                }
                other => other,
            }
        })
    }

    fn add_package<'a>(
        &'a self,
        owner: &'a str,
        project: &'a str,
        package: &'a str,
        source: &'a ScmSource,
    ) -> PortFuture<'a, SubmittedPackage> {
        Box::pin(async move {
            let creds = self.credentials()?;
            let url =
                format!("{}/api_3/package/add/{owner}/{project}/{package}/scm", creds.copr_url);
            let response = self
                .client
                .post(url)
                .basic_auth(&creds.login, Some(&creds.token))
                .json(source)
                .send()
                .await
                .map_err(PortError::transport)?;
            read_json(response).await
        })
    }
}
