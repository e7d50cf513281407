use chrono::Utc;
use log::{debug, error, info};

use crate::{
    api::BlogBackend,
    post::{NewPost, Post, DEFAULT_PROFILE},
    route::Route,
    view::{Effect, NewPostForm},
};

use super::{tagged, Generation, Response, Step};

const MISSING_FIELDS: &str = "Please fill in all fields";
const CREATE_FAILED: &str = "An error occurred. Please try again.";

#[derive(Debug)]
pub struct CreateController<B> {
    backend: B,
    generation: Generation,
}

impl<B: BlogBackend + Clone> CreateController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            generation: Generation::default(),
        }
    }

    /// Requests a new post built from the form, stamped with the current
    /// time and the default avatar.
    pub fn request_create<'a>(&mut self, form: &NewPostForm) -> Step<'a, Response<Post>>
    where
        B: 'a,
    {
        let title = form.title.trim();
        let author = form.author.trim();
        let content = form.content.trim();
        if title.is_empty() || author.is_empty() || content.is_empty() {
            return vec![Effect::Alert(MISSING_FIELDS.to_string())].into();
        }

        let post = NewPost {
            title: title.to_string(),
            author: author.to_string(),
            content: content.to_string(),
            date: Utc::now(),
            profile: DEFAULT_PROFILE.to_string(),
        };

        let backend = self.backend.clone();
        Step::Wait(tagged(self.generation.begin(), async move {
            backend.create(&post).await
        }))
    }

    /// Opens the created post once the backend has assigned an id.
    pub fn created(&mut self, response: Response<Post>) -> Vec<Effect> {
        if !self.generation.is_current(response.ticket) {
            debug!("Dropping stale create response");
            return vec![];
        }

        match response.result {
            Ok(created) => {
                info!("Created post {}", created.id);
                vec![Effect::navigate(Route::Details(created.id))]
            }
            Err(e) => {
                error!("Error creating post: {}", e);
                vec![Effect::Alert(CREATE_FAILED.to_string())]
            }
        }
    }

    pub async fn submit(&mut self, form: &NewPostForm) -> Vec<Effect> {
        match self.request_create(form) {
            Step::Show(effects) => effects,
            Step::Wait(request) => {
                let response = request.await;
                self.created(response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controller::testing::{posts, MemoryBackend},
        post::PostId,
    };

    fn form(title: &str, author: &str, content: &str) -> NewPostForm {
        NewPostForm {
            title: title.to_string(),
            author: author.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn blank_fields_raise_an_alert() {
        let backend = MemoryBackend::default();
        let mut create = CreateController::new(&backend);

        let effects = create.submit(&form("Title", "   ", "Body")).await;
        assert_eq!(effects, vec![Effect::Alert(MISSING_FIELDS.to_string())]);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn created_post_is_opened() {
        let backend = MemoryBackend::with_posts(posts(2));
        let mut create = CreateController::new(&backend);

        let effects = create.submit(&form(" Hello ", "Ann", "First post")).await;
        assert_eq!(effects, vec![Effect::navigate(Route::Details(PostId::Number(3)))]);

        let stored = backend.stored(&PostId::Number(3)).unwrap();
        assert_eq!(stored.title, "Hello");
        assert_eq!(stored.profile.as_deref(), Some(DEFAULT_PROFILE));
        assert!(stored.date.is_some());
    }

    #[tokio::test]
    async fn failure_keeps_the_form() {
        let backend = MemoryBackend::default();
        backend.set_failing(true);
        let mut create = CreateController::new(&backend);

        let effects = create.submit(&form("Hello", "Ann", "First post")).await;
        assert_eq!(effects, vec![Effect::Alert(CREATE_FAILED.to_string())]);
    }

    #[tokio::test]
    async fn double_submit_opens_the_latest_post() {
        let backend = MemoryBackend::default();
        let mut create = CreateController::new(&backend);
        let draft = form("Hello", "Ann", "First post");

        let Step::Wait(first) = create.request_create(&draft) else {
            panic!("expected a create request");
        };
        let Step::Wait(second) = create.request_create(&draft) else {
            panic!("expected a create request");
        };
        let second = second.await;
        let first = first.await;

        let effects = create.created(second);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Navigate { to: Route::Details(_), .. }]
        ));
        assert!(create.created(first).is_empty());
    }
}
