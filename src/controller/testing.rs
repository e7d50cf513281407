use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use chrono::{TimeZone, Utc};
use reqwest::{StatusCode, Url};
use tokio::time::sleep;

use crate::{
    api::{ApiError, BlogBackend, Page, PageQuery},
    post::{NewPost, Post, PostId},
};

pub fn post(id: u64, title: &str, author: &str, content: &str, day: u32) -> Post {
    Post {
        id: PostId::Number(id),
        title: title.to_string(),
        author: author.to_string(),
        content: content.to_string(),
        profile: None,
        date: Some(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()),
    }
}

/// `count` posts, one per day of January, ids starting at 1.
pub fn posts(count: u64) -> Vec<Post> {
    (1..=count)
        .map(|id| post(id, &format!("Post {}", id), "Ann", "Some content", id as u32))
        .collect()
}

/// In-memory backend counting every call it serves.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    posts: Mutex<Vec<Post>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    next_id: AtomicU64,
    latency: Mutex<HashMap<PostId, Duration>>,
}

impl MemoryBackend {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let next_id = posts.len() as u64 + 1;
        Self {
            posts: Mutex::new(posts),
            next_id: AtomicU64::new(next_id),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every fetch of `id` take `by` before answering.
    pub fn slow_down(&self, id: PostId, by: Duration) {
        self.latency.lock().unwrap().insert(id, by);
    }

    pub fn stored(&self, id: &PostId) -> Option<Post> {
        self.posts.lock().unwrap().iter().find(|p| &p.id == id).cloned()
    }

    fn call(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                url: Url::parse("http://memory.test/blogs").unwrap(),
            });
        }
        Ok(())
    }
}

impl BlogBackend for MemoryBackend {
    async fn list_all(&self) -> Result<Vec<Post>, ApiError> {
        self.call()?;
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn list_page(&self, query: &PageQuery) -> Result<Page, ApiError> {
        self.call()?;
        let term = query.search.trim().to_lowercase();
        let matching: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.matches(&term))
            .cloned()
            .collect();
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(query.page.saturating_sub(1) * query.limit)
            .take(query.limit)
            .collect();
        Ok(Page { items, total })
    }

    async fn get(&self, id: &PostId) -> Result<Post, ApiError> {
        self.call()?;
        let latency = self.latency.lock().unwrap().get(id).copied();
        if let Some(latency) = latency {
            sleep(latency).await;
        }
        self.stored(id).ok_or_else(|| ApiError::NotFound(id.clone()))
    }

    async fn create(&self, post: &NewPost) -> Result<Post, ApiError> {
        self.call()?;
        let created = Post {
            id: PostId::Number(self.next_id.fetch_add(1, Ordering::SeqCst)),
            title: post.title.clone(),
            author: post.author.clone(),
            content: post.content.clone(),
            profile: Some(post.profile.clone()),
            date: Some(post.date),
        };
        self.posts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn replace(&self, post: &Post) -> Result<Post, ApiError> {
        self.call()?;
        let mut posts = self.posts.lock().unwrap();
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(|| ApiError::NotFound(post.id.clone()))?;
        *slot = post.clone();
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<(), ApiError> {
        self.call()?;
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| &p.id != id);
        if posts.len() == before {
            return Err(ApiError::NotFound(id.clone()));
        }
        Ok(())
    }
}
