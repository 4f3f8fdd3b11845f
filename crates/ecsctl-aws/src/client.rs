//! Signed HTTP client for AWS JSON-protocol services.
//!
//! Each call is sent exactly once; a failed call is reported to the caller
//! rather than retried.

use crate::config::{AwsCredentials, AwsRegion, SdkConfig};
use crate::error::{AwsError, AwsResult};
use crate::signing::SigV4Signer;
use chrono::Utc;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AwsClient {
    http: Client,
    credentials: AwsCredentials,
    region: AwsRegion,
    /// Custom endpoint URL override (for LocalStack and similar emulators).
    endpoint_override: Option<String>,
    user_agent: String,
}

/// Response from an AWS API call.
#[derive(Debug, Clone)]
pub struct AwsResponse {
    pub status: u16,
    pub body: String,
    pub request_id: Option<String>,
}

impl AwsClient {
    pub fn new(config: &SdkConfig) -> AwsResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(AwsError::from)?;

        Ok(Self {
            http,
            credentials: config.credentials.clone(),
            region: config.region.clone(),
            endpoint_override: config.endpoint_url.clone(),
            user_agent: config.app_name.clone(),
        })
    }

    /// Base endpoint for a service.
    pub fn endpoint(&self, service: &str) -> String {
        match self.endpoint_override {
            Some(ref url) => url.clone(),
            None => self.region.endpoint(service),
        }
    }

    /// Execute a signed AWS JSON API request: `POST /` with the operation
    /// named in `x-amz-target`. Non-2xx replies become an [`AwsError`]
    /// parsed from the JSON error body.
    pub async fn json_request(
        &self,
        service: &str,
        target: &str,
        json_body: &str,
    ) -> AwsResult<AwsResponse> {
        let endpoint = self.endpoint(service);
        let url = url::Url::parse(&endpoint).map_err(|e| {
            AwsError::validation(service, &format!("invalid endpoint URL '{endpoint}': {e}"))
        })?;

        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), host_header(&url));
        headers.insert(
            "content-type".to_string(),
            "application/x-amz-json-1.1".to_string(),
        );
        headers.insert("x-amz-target".to_string(), target.to_string());

        log::debug!("AWS {} POST {} target={}", service, url, target);
        let response = self.execute_signed(service, &url, &headers, json_body).await?;
        if (200..300).contains(&response.status) {
            return Ok(response);
        }

        let mut error = AwsError::parse_json_error(service, response.status, &response.body);
        if let Some(id) = response.request_id {
            error = error.with_request_id(id);
        }
        log::warn!("AWS {} call {} failed: {}", service, target, error.code);
        Err(error)
    }

    async fn execute_signed(
        &self,
        service: &str,
        url: &url::Url,
        headers: &BTreeMap<String, String>,
        body: &str,
    ) -> AwsResult<AwsResponse> {
        let signer = SigV4Signer::new(&self.credentials, &self.region.name, service);
        let signed = signer.sign("POST", url, headers, body, Utc::now());

        let mut req = self.http.post(url.clone());
        for (key, value) in &signed {
            req = req.header(key.as_str(), value.as_str());
        }
        req = req.header("user-agent", &self.user_agent).body(body.to_string());

        let resp = req.send().await.map_err(AwsError::from)?;

        let status = resp.status().as_u16();
        let request_id = ["x-amzn-requestid", "x-amz-request-id"]
            .iter()
            .find_map(|name| resp.headers().get(*name)?.to_str().ok())
            .map(str::to_string);
        let resp_body = resp.text().await.map_err(AwsError::from)?;
        log::debug!(
            "AWS {} replied HTTP {} ({} bytes, request id {:?})",
            service,
            status,
            resp_body.len(),
            request_id
        );

        Ok(AwsResponse {
            status,
            body: resp_body,
            request_id,
        })
    }
}

/// `host[:port]`, with the port only when it is not the scheme default.
fn host_header(url: &url::Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
