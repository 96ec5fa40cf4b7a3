// ABOUTME: HTTP implementation of SpringService against the resource management API.
// ABOUTME: Handles bearer auth, artifact upload via pre-signed URL, and build polling.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use snafu::{OptionExt, ResultExt};
use std::path::Path;
use std::time::{Duration, Instant};

use super::error::{
    BuildClientSnafu, BuildFailedSnafu, BuildTimeoutSnafu, DecodeSnafu, MissingFieldSnafu,
    ReadArtifactSnafu, RemoteError, TransportSnafu,
};
use super::types::{AppProperties, BuildRequest, BuildResult, InstanceRef, SpringDeployment, Tier};
use super::SpringService;
use crate::types::{BuildResultId, SPRING_RESOURCE_TYPE, UploadReference};

/// Default management endpoint.
pub const DEFAULT_MANAGEMENT_URL: &str = "https://management.azure.com";
const API_VERSION: &str = "2023-05-01-preview";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Slowest upload rate tolerated before a blob upload times out.
const UPLOAD_MIN_BYTES_PER_SEC: u64 = 64 * 1024;

/// How the client waits for a build result to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildPollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for BuildPollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Spring service client speaking the resource management REST API.
pub struct HttpSpringService {
    client: Client,
    base_url: String,
    token: String,
    poll: BuildPollSettings,
}

impl std::fmt::Debug for HttpSpringService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSpringService")
            .field("base_url", &self.base_url)
            .field("poll", &self.poll)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrl {
    relative_path: String,
    upload_url: String,
}

impl HttpSpringService {
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        poll: BuildPollSettings,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context(BuildClientSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            poll,
        })
    }

    /// Absolute URL of a path below the service instance.
    fn instance_url(&self, instance: &InstanceRef, segments: &[&str]) -> String {
        let mut url = format!("{}{}", self.base_url, instance_path(instance));
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url.push_str("?api-version=");
        url.push_str(API_VERSION);
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<T, RemoteError> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.context(TransportSnafu { url })?;
        let status = response.status();
        let text = response.text().await.context(TransportSnafu { url })?;

        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound {
                resource: strip_query(url).to_string(),
            });
        }

        if !status.is_success() {
            tracing::warn!("{} {} failed: {}", method, url, status);
            return Err(RemoteError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        serde_json::from_str(&text).context(DecodeSnafu { url })
    }
}

#[async_trait]
impl SpringService for HttpSpringService {
    async fn get_deployment(
        &self,
        instance: &InstanceRef,
        app: &str,
        deployment: &str,
    ) -> Result<SpringDeployment, RemoteError> {
        let url = self.instance_url(instance, &["apps", app, "deployments", deployment]);
        let body: Value = self.send(Method::GET, &url, None).await?;

        let name = body["name"]
            .as_str()
            .context(MissingFieldSnafu {
                url: &url,
                field: "name",
            })?
            .to_string();

        Ok(SpringDeployment {
            name,
            provisioning_state: body["properties"]["provisioningState"]
                .as_str()
                .map(str::to_string),
        })
    }

    async fn upload_artifact(
        &self,
        instance: &InstanceRef,
        app: &str,
        local_path: &Path,
    ) -> Result<UploadReference, RemoteError> {
        let url = self.instance_url(instance, &["apps", app, "getResourceUploadUrl"]);
        let target: UploadUrl = self.send(Method::POST, &url, None).await?;

        let bytes = tokio::fs::read(local_path)
            .await
            .context(ReadArtifactSnafu { path: local_path })?;

        tracing::debug!(
            "Uploading {} ({} bytes) to {}",
            local_path.display(),
            bytes.len(),
            target.relative_path
        );

        let upload_url = target.upload_url.as_str();
        let response = self
            .client
            .put(upload_url)
            .header("x-ms-blob-type", "BlockBlob")
            .timeout(upload_timeout(bytes.len()))
            .body(bytes)
            .send()
            .await
            .context(TransportSnafu {
                url: strip_query(upload_url),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                method: "PUT".to_string(),
                url: strip_query(upload_url).to_string(),
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(UploadReference::new(target.relative_path))
    }

    async fn get_service_tier(&self, instance: &InstanceRef) -> Result<Tier, RemoteError> {
        let url = self.instance_url(instance, &[]);
        let body: Value = self.send(Method::GET, &url, None).await?;

        let tier = body["sku"]["tier"].as_str().context(MissingFieldSnafu {
            url: &url,
            field: "sku.tier",
        })?;
        Ok(Tier::from_name(tier))
    }

    async fn create_build(
        &self,
        instance: &InstanceRef,
        request: &BuildRequest,
    ) -> Result<BuildResultId, RemoteError> {
        let url = self.instance_url(
            instance,
            &[
                "buildServices",
                &request.build_service,
                "builds",
                &request.build_name,
            ],
        );
        let service_path = format!(
            "{}/buildServices/{}",
            instance_path(instance),
            request.build_service
        );
        let payload = json!({
            "properties": {
                "relativePath": request.relative_path.as_str(),
                "builder": format!("{}/builders/{}", service_path, request.builder),
                "agentPool": format!("{}/agentPools/{}", service_path, request.agent_pool),
                "env": { "BP_JVM_VERSION": request.jvm_version },
            }
        });

        let body: Value = self.send(Method::PUT, &url, Some(&payload)).await?;
        let id = body["properties"]["triggeredBuildResult"]["id"]
            .as_str()
            .context(MissingFieldSnafu {
                url: &url,
                field: "properties.triggeredBuildResult.id",
            })?;
        Ok(BuildResultId::new(id))
    }

    async fn get_build_result(
        &self,
        instance: &InstanceRef,
        build_service: &str,
        build_name: &str,
        build_result_id: &BuildResultId,
    ) -> Result<BuildResult, RemoteError> {
        let result_name = last_segment(build_result_id.as_str());
        let url = self.instance_url(
            instance,
            &[
                "buildServices",
                build_service,
                "builds",
                build_name,
                "results",
                result_name,
            ],
        );

        let started = Instant::now();
        loop {
            let body: Value = self.send(Method::GET, &url, None).await?;
            let state = body["properties"]["provisioningState"]
                .as_str()
                .unwrap_or("Unknown")
                .to_string();

            match state.as_str() {
                "Succeeded" => {
                    return Ok(BuildResult {
                        name: result_name.to_string(),
                        provisioning_state: state,
                    });
                }
                "Failed" | "Canceled" | "Deleting" => {
                    return BuildFailedSnafu {
                        build_result_id: build_result_id.as_str(),
                        state,
                    }
                    .fail();
                }
                _ => {}
            }

            let waited = started.elapsed();
            if waited >= self.poll.timeout {
                return BuildTimeoutSnafu {
                    build_result_id: build_result_id.as_str(),
                    waited,
                }
                .fail();
            }

            tracing::debug!("Build result {} is {}, waiting", result_name, state);
            tokio::time::sleep(self.poll.interval).await;
        }
    }

    async fn deploy_build_result(
        &self,
        instance: &InstanceRef,
        app: &str,
        build_result_id: &BuildResultId,
        deployment: &str,
    ) -> Result<String, RemoteError> {
        let source = json!({
            "type": "BuildResult",
            "buildResultId": build_result_id.as_str(),
        });
        self.put_deployment_source(instance, app, deployment, source)
            .await
    }

    async fn deploy_artifact(
        &self,
        instance: &InstanceRef,
        app: &str,
        relative_path: &UploadReference,
        deployment: &str,
    ) -> Result<String, RemoteError> {
        let source = json!({
            "type": "Jar",
            "relativePath": relative_path.as_str(),
        });
        self.put_deployment_source(instance, app, deployment, source)
            .await
    }

    async fn get_app_properties(
        &self,
        instance: &InstanceRef,
        app: &str,
    ) -> Result<AppProperties, RemoteError> {
        let url = self.instance_url(instance, &["apps", app]);
        let body: Value = self.send(Method::GET, &url, None).await?;

        let urls = body["properties"]["url"]
            .as_str()
            .filter(|u| !u.is_empty())
            .map(|u| vec![u.to_string()])
            .unwrap_or_default();
        Ok(AppProperties { urls })
    }
}

impl HttpSpringService {
    async fn put_deployment_source(
        &self,
        instance: &InstanceRef,
        app: &str,
        deployment: &str,
        source: Value,
    ) -> Result<String, RemoteError> {
        let url = self.instance_url(instance, &["apps", app, "deployments", deployment]);
        let payload = json!({ "properties": { "source": source } });

        let body: Value = self.send(Method::PUT, &url, Some(&payload)).await?;
        let name = body["name"].as_str().context(MissingFieldSnafu {
            url: &url,
            field: "name",
        })?;
        Ok(name.to_string())
    }
}

fn instance_path(instance: &InstanceRef) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/{}/{}",
        urlencoding::encode(&instance.subscription_id),
        urlencoding::encode(&instance.resource_group),
        SPRING_RESOURCE_TYPE,
        urlencoding::encode(&instance.resource_name)
    )
}

fn last_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Drop query strings so pre-signed tokens never reach logs or errors.
/// Upload deadline for an artifact of `len` bytes.
fn upload_timeout(len: usize) -> Duration {
    REQUEST_TIMEOUT + Duration::from_secs(len as u64 / UPLOAD_MIN_BYTES_PER_SEC)
}

fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Pull the message out of a management API error body, if it has one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
