use chrono::Utc;
use log::{debug, error, info};

use crate::{
    api::BlogBackend,
    post::{Post, PostId},
    route::Route,
    view::{EditForm, Effect},
};

use super::{tagged, Generation, Request, Response, Step};

pub const MIN_TITLE_LENGTH: usize = 3;
pub const MIN_CONTENT_LENGTH: usize = 10;

const LOAD_FAILED: &str = "Failed to fetch post details. Please try again later.";
const UPDATE_FAILED: &str = "Failed to update post. Please try again later.";

pub fn validation_message() -> String {
    format!(
        "Please ensure all fields are valid:\n- Title: At least {} characters\n- Content: At least {} characters",
        MIN_TITLE_LENGTH, MIN_CONTENT_LENGTH
    )
}

/// Checks the trimmed title and content lengths.
pub fn validate(form: &EditForm) -> bool {
    form.title.trim().chars().count() >= MIN_TITLE_LENGTH
        && form.content.trim().chars().count() >= MIN_CONTENT_LENGTH
}

#[derive(Debug)]
pub struct EditController<B> {
    backend: B,
    id: PostId,
    post: Option<Post>,
    generation: Generation,
}

impl<B: BlogBackend + Clone> EditController<B> {
    pub fn new(backend: B, id: PostId) -> Self {
        Self {
            backend,
            id,
            post: None,
            generation: Generation::default(),
        }
    }

    pub fn fetch<'a>(&mut self) -> Request<'a, Post>
    where
        B: 'a,
    {
        let backend = self.backend.clone();
        let id = self.id.clone();
        tagged(self.generation.begin(), async move { backend.get(&id).await })
    }

    /// Fills the form with the fetched title and content.
    pub fn loaded(&mut self, response: Response<Post>) -> Vec<Effect> {
        if !self.generation.is_current(response.ticket) {
            debug!("Dropping stale post {}", self.id);
            return vec![];
        }

        match response.result {
            Ok(post) => {
                let form = EditForm {
                    title: post.title.clone(),
                    content: post.content.clone(),
                };
                self.post = Some(post);
                vec![Effect::FillForm(form)]
            }
            Err(e) => {
                error!("Error fetching post details: {}", e);
                vec![Effect::InlineError(LOAD_FAILED.to_string())]
            }
        }
    }

    pub async fn load(&mut self) -> Vec<Effect> {
        let response = self.fetch().await;
        self.loaded(response)
    }

    /// Requests a replace with the edited title and content. Author and
    /// avatar are carried over from the loaded post.
    pub fn request_save<'a>(&mut self, form: &EditForm) -> Step<'a, Response<Post>>
    where
        B: 'a,
    {
        let Some(loaded) = &self.post else {
            return vec![Effect::InlineError(LOAD_FAILED.to_string())].into();
        };
        if !validate(form) {
            return vec![Effect::InlineError(validation_message())].into();
        }

        let updated = Post {
            title: form.title.trim().to_string(),
            content: form.content.trim().to_string(),
            date: Some(Utc::now()),
            ..loaded.clone()
        };

        let backend = self.backend.clone();
        Step::Wait(tagged(self.generation.begin(), async move {
            backend.replace(&updated).await
        }))
    }

    pub fn saved(&mut self, response: Response<Post>) -> Vec<Effect> {
        if !self.generation.is_current(response.ticket) {
            debug!("Dropping stale update of {}", self.id);
            return vec![];
        }

        match response.result {
            Ok(post) => {
                info!("Updated post {}", self.id);
                self.post = Some(post);
                vec![Effect::navigate(Route::Details(self.id.clone()))]
            }
            Err(e) => {
                error!("Error updating post: {}", e);
                vec![Effect::InlineError(format!("{} ({})", UPDATE_FAILED, e))]
            }
        }
    }

    pub async fn submit(&mut self, form: &EditForm) -> Vec<Effect> {
        match self.request_save(form) {
            Step::Show(effects) => effects,
            Step::Wait(request) => {
                let response = request.await;
                self.saved(response)
            }
        }
    }
}
