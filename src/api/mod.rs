pub mod blogs;
mod error;

pub use blogs::BlogsClient;
pub use error::ApiError;

use std::{future::Future, time::Duration};

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::{
    config::Config,
    post::{NewPost, Post, PostId},
};

/// Server-side page request (`_page`, `_limit`, `q`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: usize,
    pub limit: usize,
    pub search: String,
}

/// One server-side page plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Post>,
    pub total: usize,
}

/// CRUD operations over the `blogs` resource.
pub trait BlogBackend {
    fn list_all(&self) -> impl Future<Output = Result<Vec<Post>, ApiError>> + Send;
    fn list_page(&self, query: &PageQuery) -> impl Future<Output = Result<Page, ApiError>> + Send;
    fn get(&self, id: &PostId) -> impl Future<Output = Result<Post, ApiError>> + Send;
    fn create(&self, post: &NewPost) -> impl Future<Output = Result<Post, ApiError>> + Send;
    fn replace(&self, post: &Post) -> impl Future<Output = Result<Post, ApiError>> + Send;
    fn delete(&self, id: &PostId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl<T: BlogBackend + Sync> BlogBackend for &T {
    fn list_all(&self) -> impl Future<Output = Result<Vec<Post>, ApiError>> + Send {
        (**self).list_all()
    }
    fn list_page(&self, query: &PageQuery) -> impl Future<Output = Result<Page, ApiError>> + Send {
        (**self).list_page(query)
    }
    fn get(&self, id: &PostId) -> impl Future<Output = Result<Post, ApiError>> + Send {
        (**self).get(id)
    }
    fn create(&self, post: &NewPost) -> impl Future<Output = Result<Post, ApiError>> + Send {
        (**self).create(post)
    }
    fn replace(&self, post: &Post) -> impl Future<Output = Result<Post, ApiError>> + Send {
        (**self).replace(post)
    }
    fn delete(&self, id: &PostId) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).delete(id)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: ClientWithMiddleware,
}

impl ApiClient {
    fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout()))
            .build()
            .map_err(ApiError::Client)?;

        let builder = ClientBuilder::new(client);
        let client = match config.retries() {
            0 => builder.build(),
            retries => {
                let retry_policy = ExponentialBackoff::builder().build_with_max_retries(retries);
                builder
                    .with(RetryTransientMiddleware::new_with_policy(retry_policy))
                    .build()
            }
        };

        Ok(Self { client })
    }

    fn client(&self) -> &ClientWithMiddleware {
        &self.client
    }
}
