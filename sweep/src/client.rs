use crate::config::StoreConfig;
use crate::error::{Result, SweepError};
use crate::rate_limit::FixedDelay;
use crate::traits::StoreApi;
use crate::types::{HttpResponse, ProductEnvelope, ProductId, ProductPage, RawProduct};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

/// reqwest-backed client for the store Admin API
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    base_url: String,
    credentials: Option<(String, Option<String>)>,
    limiter: FixedDelay,
}

impl StoreClient {
    /// Create a new client with configuration
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(build_headers(&config)?)
            .build()?;

        let (base_url, credentials) = split_credentials(&config.url_base)?;
        let limiter = FixedDelay::new(config.delay());

        Ok(Self {
            client,
            base_url,
            credentials,
            limiter,
        })
    }

    async fn send(
        &self,
        method: Method,
        relative: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse> {
        self.limiter.pause().await;

        let url = format!("{}{relative}", self.base_url);
        debug!(method = %method, url = %url, "sending request");

        let mut request = self.client.request(method.clone(), &url);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, password.as_ref());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            SweepError::request_failed(method.to_string(), url.clone(), e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(status, url = %url, "received response");

        Ok(HttpResponse::new(method.to_string(), url, status, text))
    }

    async fn get_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T> {
        let response = self.send(Method::GET, relative, None).await?;
        if !response.is_success() {
            return Err(SweepError::UnexpectedStatus {
                status: response.status,
                url: response.url,
                body: response.body,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}

impl StoreApi for StoreClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<RawProduct>> {
        let page: ProductPage = self
            .get_json(&format!("/products.json?page={page}"))
            .await?;
        Ok(page.products)
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<RawProduct> {
        let envelope: ProductEnvelope = self.get_json(&format!("/products/{id}.json")).await?;
        Ok(envelope.product)
    }

    async fn unpublish(&self, id: &ProductId) -> Result<HttpResponse> {
        let body = json!({
            "product": {
                "id": id.to_json(),
                "published": false,
            }
        });
        self.send(Method::PUT, &format!("/products/{id}.json"), Some(body))
            .await
    }
}

fn build_headers(config: &StoreConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    if let Some(extra) = &config.headers {
        for (key, value) in extra {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| SweepError::invalid_config(format!("Invalid header name: {key}")))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                SweepError::invalid_config(format!("Invalid value for header {key}"))
            })?;
            headers.insert(name, value);
        }
    }

    Ok(headers)
}

/// Split basic-auth credentials out of the base URL.
///
/// The returned base has no trailing slash and never carries credentials, so
/// request URLs built from it are safe to log and report.
fn split_credentials(url_base: &str) -> Result<(String, Option<(String, Option<String>)>)> {
    let mut url = url::Url::parse(url_base)?;

    let credentials = if url.username().is_empty() {
        None
    } else {
        Some((
            url.username().to_string(),
            url.password().map(str::to_string),
        ))
    };

    if credentials.is_some() {
        url.set_username("")
            .and_then(|_| url.set_password(None))
            .map_err(|_| SweepError::invalid_config("url_base cannot carry credentials"))?;
    }

    Ok((url.as_str().trim_end_matches('/').to_string(), credentials))
}
