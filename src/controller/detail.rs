use std::time::Duration;

use log::{debug, error, info, warn};

use crate::{
    api::BlogBackend,
    post::{Post, PostId},
    route::Route,
    view::{DetailView, Effect, Notification},
};

use super::{tagged, Generation, Request, Response, Step};

/// Pause between a successful delete and returning to the list.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub struct DetailController<B> {
    backend: B,
    id: PostId,
    post: Option<Post>,
    generation: Generation,
}

impl<B: BlogBackend + Clone> DetailController<B> {
    pub fn new(backend: B, id: PostId) -> Self {
        Self {
            backend,
            id,
            post: None,
            generation: Generation::default(),
        }
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn fetch<'a>(&mut self) -> Request<'a, Post>
    where
        B: 'a,
    {
        let backend = self.backend.clone();
        let id = self.id.clone();
        tagged(self.generation.begin(), async move { backend.get(&id).await })
    }

    pub fn loaded(&mut self, response: Response<Post>) -> Vec<Effect> {
        if !self.generation.is_current(response.ticket) {
            debug!("Dropping stale post {}", self.id);
            return vec![];
        }

        match response.result {
            Ok(post) => {
                let view = DetailView::from(&post);
                self.post = Some(post);
                vec![Effect::Detail(view)]
            }
            Err(e) => {
                error!("Error fetching blog details: {}", e);
                vec![Effect::Notify(Notification::error(
                    "Unable to load blog. Please try again.",
                ))]
            }
        }
    }

    pub async fn load(&mut self) -> Vec<Effect> {
        let response = self.fetch().await;
        self.loaded(response)
    }

    /// Requests deletion of the shown post. Does nothing until the post has
    /// loaded.
    pub fn request_delete<'a>(&mut self) -> Step<'a, Response<()>>
    where
        B: 'a,
    {
        if self.post.is_none() {
            warn!("Nothing to delete, post {} is not loaded", self.id);
            return Step::Show(vec![]);
        }

        let backend = self.backend.clone();
        let id = self.id.clone();
        Step::Wait(tagged(self.generation.begin(), async move {
            backend.delete(&id).await
        }))
    }

    /// On success, notifies and heads back to the list after
    /// [`REDIRECT_DELAY`].
    pub fn deleted(&mut self, response: Response<()>) -> Vec<Effect> {
        if !self.generation.is_current(response.ticket) {
            debug!("Dropping stale delete of {}", self.id);
            return vec![];
        }

        match response.result {
            Ok(()) => {
                info!("Deleted post {}", self.id);
                self.post = None;
                vec![
                    Effect::Notify(Notification::success("Blog successfully deleted.")),
                    Effect::Navigate {
                        to: Route::Index,
                        after: REDIRECT_DELAY,
                    },
                ]
            }
            Err(e) => {
                error!("Error deleting blog: {}", e);
                vec![Effect::Notify(Notification::error(
                    "Unable to delete blog. Please try again.",
                ))]
            }
        }
    }

    pub async fn delete(&mut self) -> Vec<Effect> {
        match self.request_delete() {
            Step::Show(effects) => effects,
            Step::Wait(request) => {
                let response = request.await;
                self.deleted(response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::BlogBackend,
        controller::testing::{posts, MemoryBackend},
        view::NotificationKind,
    };

    #[tokio::test]
    async fn renders_the_requested_post() {
        let backend = MemoryBackend::with_posts(posts(3));
        let mut detail = DetailController::new(&backend, PostId::Number(2));

        let effects = detail.load().await;
        let [Effect::Detail(view)] = effects.as_slice() else {
            panic!("unexpected effects {:?}", effects);
        };
        assert_eq!(view.title, "Post 2");
        assert_eq!(view.edit, Route::Edit(PostId::Number(2)));
    }

    #[tokio::test]
    async fn missing_post_shows_an_error_notification() {
        let backend = MemoryBackend::with_posts(posts(1));
        let mut detail = DetailController::new(&backend, PostId::Number(99));

        let effects = detail.load().await;
        assert_eq!(
            effects,
            vec![Effect::Notify(Notification::error("Unable to load blog. Please try again."))]
        );
        assert!(detail.post().is_none());
    }

    #[tokio::test]
    async fn delete_notifies_and_redirects() {
        let backend = MemoryBackend::with_posts(posts(2));
        let mut detail = DetailController::new(&backend, PostId::Number(1));
        detail.load().await;

        let effects = detail.delete().await;
        assert_eq!(
            effects,
            vec![
                Effect::Notify(Notification::success("Blog successfully deleted.")),
                Effect::Navigate {
                    to: Route::Index,
                    after: REDIRECT_DELAY,
                },
            ]
        );
        assert!(backend.get(&PostId::Number(1)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_post() {
        let backend = MemoryBackend::with_posts(posts(2));
        let mut detail = DetailController::new(&backend, PostId::Number(1));
        detail.load().await;
        backend.set_failing(true);

        let effects = detail.delete().await;
        let [Effect::Notify(notification)] = effects.as_slice() else {
            panic!("unexpected effects {:?}", effects);
        };
        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(detail.post().is_some());
        assert!(backend.stored(&PostId::Number(1)).is_some());
    }

    #[tokio::test]
    async fn delete_before_load_is_ignored() {
        let backend = MemoryBackend::with_posts(posts(1));
        let mut detail = DetailController::new(&backend, PostId::Number(1));

        assert!(detail.delete().await.is_empty());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn superseded_load_is_discarded() {
        let backend = MemoryBackend::with_posts(posts(2));
        let mut detail = DetailController::new(&backend, PostId::Number(2));

        let first = detail.fetch();
        let second = detail.fetch();
        let second = second.await;
        let first = first.await;

        assert!(matches!(detail.loaded(second).as_slice(), [Effect::Detail(_)]));
        assert!(detail.loaded(first).is_empty());
    }

    #[tokio::test]
    async fn repeated_delete_only_reports_the_latest_outcome() {
        let backend = MemoryBackend::with_posts(posts(2));
        let mut detail = DetailController::new(&backend, PostId::Number(1));
        detail.load().await;

        let Step::Wait(first) = detail.request_delete() else {
            panic!("expected a delete request");
        };
        let Step::Wait(second) = detail.request_delete() else {
            panic!("expected a delete request");
        };
        // the first delete succeeds, the repeat finds nothing left
        let first = first.await;
        let second = second.await;

        assert!(detail.deleted(first).is_empty());
        let effects = detail.deleted(second);
        let [Effect::Notify(notification)] = effects.as_slice() else {
            panic!("unexpected effects {:?}", effects);
        };
        assert_eq!(notification.kind, NotificationKind::Error);
    }
}
