//! reqwest-backed transport.

#![forbid(unsafe_code)]

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::{ApiError, ApiResult, HttpResponse, Transport};

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(cfg: &ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = cfg.token.as_deref() {
            let v = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::Transport(format!("invalid token header: {}", e)))?;
            headers.insert(AUTHORIZATION, v);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, base_url: cfg.base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn map_err(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(e.to_string())
        }
    }

    async fn read(resp: reqwest::Response) -> ApiResult<HttpResponse> {
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(Self::map_err)?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Ok(HttpResponse { status, body })
    }
}

#[async_trait::async_trait]
impl Transport for HttpApi {
    async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<HttpResponse> {
        let url = self.url(path);
        debug!(url = %url, params = query.len(), "http: GET");
        let resp = self.client.get(&url).query(query).send().await.map_err(Self::map_err)?;
        Self::read(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> ApiResult<HttpResponse> {
        let url = self.url(path);
        debug!(url = %url, "http: POST");
        let resp = self.client.post(&url).json(body).send().await.map_err(Self::map_err)?;
        Self::read(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_with_one_slash() {
        let cfg = ClientConfig { base_url: "http://h/api/".into(), ..Default::default() };
        let api = HttpApi::new(&cfg).unwrap();
        assert_eq!(api.url("/elements/1"), "http://h/api/elements/1");
        assert_eq!(api.url("elements/1"), "http://h/api/elements/1");
    }

    #[test]
    fn rejects_token_with_control_chars() {
        let cfg = ClientConfig { token: Some("a\nb".into()), ..Default::default() };
        assert!(matches!(HttpApi::new(&cfg), Err(ApiError::Transport(_))));
    }
}
