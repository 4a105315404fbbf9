use std::time::Duration;

use log::{debug, trace};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::{
    api::{Method, Transport},
    error::{ApiError, MalformedResponseError},
};

#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        trace!("{status}: {body}");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Auth);
        }
        if !status.is_success() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| MalformedResponseError::Json(e).into())
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str, token: &str) -> Result<Value, ApiError> {
        debug!("GET {path}");
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;

        Self::read(response).await
    }

    async fn mutate(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
        token: &str,
    ) -> Result<Value, ApiError> {
        debug!("{method} {path}");
        let request = match method {
            Method::Post => self.client.post(self.url(path)),
            Method::Put => self.client.put(self.url(path)),
            Method::Delete => self.client.delete(self.url(path)),
        };
        let response = request.bearer_auth(token).json(body).send().await?;

        Self::read(response).await
    }
}
