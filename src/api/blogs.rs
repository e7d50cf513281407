use log::{debug, log_enabled, trace};
use reqwest::{header, Response, StatusCode};
use reqwest_middleware::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    post::{NewPost, Post, PostId},
    timed,
};

use super::{ApiClient, ApiError, BlogBackend, Page, PageQuery};

const TOTAL_COUNT: &str = "x-total-count";

/// HTTP implementation of [`BlogBackend`] against a json-server style
/// `/blogs` collection.
#[derive(Debug, Clone)]
pub struct BlogsClient {
    inner: ApiClient,
    base: String,
}

impl BlogsClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let inner = ApiClient::new(config)?;
        let base = config.api().as_str().trim_end_matches('/').to_string();
        Ok(Self { inner, base })
    }

    fn item_url(&self, id: &PostId) -> String {
        format!("{}/{}", self.base, urlencoding::encode(&id.to_string()))
    }

    fn wrap_request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(header::ACCEPT, "application/json")
    }

    async fn send(&self, name: String, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = self.wrap_request(builder);
        let response = timed!(name, request.send().await?);

        let status = response.status();
        if !status.is_success() {
            debug!("{} returned {}", response.url(), status);
            return Err(ApiError::Status {
                status,
                url: response.url().clone(),
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.bytes().await.map_err(ApiError::Body)?;
        if log_enabled!(log::Level::Trace) {
            trace!("{}", String::from_utf8_lossy(&body));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

// Single-resource calls report a 404 as a missing post rather than a bare status.
fn not_found(id: &PostId) -> impl FnOnce(ApiError) -> ApiError + '_ {
    move |error| match error {
        ApiError::Status { status: StatusCode::NOT_FOUND, .. } => ApiError::NotFound(id.clone()),
        other => other,
    }
}

impl BlogBackend for BlogsClient {
    async fn list_all(&self) -> Result<Vec<Post>, ApiError> {
        let client = self.inner.client();
        let response = self
            .send(format!("GET {}", self.base), client.get(self.base.as_str()))
            .await?;
        Self::decode(response).await
    }

    async fn list_page(&self, query: &PageQuery) -> Result<Page, ApiError> {
        let client = self.inner.client();
        let mut params = vec![
            ("_page", query.page.to_string()),
            ("_limit", query.limit.to_string()),
        ];
        let search = query.search.trim();
        if !search.is_empty() {
            params.push(("q", search.to_string()));
        }

        let builder = client.get(self.base.as_str()).query(&params);
        let response = self
            .send(format!("GET {} page {}", self.base, query.page), builder)
            .await?;

        let total = response
            .headers()
            .get(TOTAL_COUNT)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<usize>().ok());
        let items: Vec<Post> = Self::decode(response).await?;
        let total = total.unwrap_or(items.len());

        Ok(Page { items, total })
    }

    async fn get(&self, id: &PostId) -> Result<Post, ApiError> {
        let client = self.inner.client();
        let url = self.item_url(id);
        let response = self
            .send(format!("GET {}", url), client.get(url.as_str()))
            .await
            .map_err(not_found(id))?;
        Self::decode(response).await
    }

    async fn create(&self, post: &NewPost) -> Result<Post, ApiError> {
        let client = self.inner.client();
        let response = self
            .send(format!("POST {}", self.base), client.post(self.base.as_str()).json(post))
            .await?;
        Self::decode(response).await
    }

    async fn replace(&self, post: &Post) -> Result<Post, ApiError> {
        let client = self.inner.client();
        let url = self.item_url(&post.id);
        let response = self
            .send(format!("PUT {}", url), client.put(url.as_str()).json(post))
            .await
            .map_err(not_found(&post.id))?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &PostId) -> Result<(), ApiError> {
        let client = self.inner.client();
        let url = self.item_url(id);
        self.send(format!("DELETE {}", url), client.delete(url.as_str()))
            .await
            .map_err(not_found(id))?;
        Ok(())
    }
}
