use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, header};
use serde_json::Value;

use crate::{ClientConfig, Error, Result};

/// Outbound access to the timetable backend.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Base URL requests are resolved against, for user-facing messages.
    fn base_url(&self) -> &str;

    /// Issue one request and return the raw response text.
    ///
    /// The payload is only sent for methods other than `GET`.
    async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> Result<String>;
}

pub struct HttpGatewayBuilder {
    pub client_builder: ClientBuilder,
    pub config: ClientConfig,
}

/// `reqwest`-backed gateway. No retries and no backoff.
pub struct HttpGateway {
    client: Client,
    config: ClientConfig,
}

impl HttpGatewayBuilder {
    pub fn new(config: ClientConfig) -> Self {
        let mut client_builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    header::ACCEPT,
                    header::HeaderValue::from_static("application/json"),
                );
                headers
            });

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        Self {
            client_builder,
            config,
        }
    }

    pub fn build(self) -> Result<HttpGateway> {
        let client = self
            .client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpGateway {
            client,
            config: self.config,
        })
    }
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Result<Self> {
        HttpGatewayBuilder::new(config).build()
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> Result<String> {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = payload.filter(|_| method != Method::GET) {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.map_err(Error::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
