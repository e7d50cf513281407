//! Paginated, searchable, sorted post list.
//!
//! The whole collection is fetched once and cached; search, sort and page
//! changes are applied to the cache without going back to the backend.

use log::{debug, error, info};

use crate::{
    api::BlogBackend,
    config::SortKey,
    post::Post,
    view::{Effect, ListBody, ListView, PageControl, PostCard},
};

use super::{tagged, Generation, Request, Response};

pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// 1-based.
    pub page: usize,
    pub search: String,
    pub sort: SortKey,
    pub posts: Vec<Post>,
}

impl ListState {
    pub fn new(sort: SortKey) -> Self {
        Self {
            page: 1,
            search: String::new(),
            sort,
            posts: Vec::new(),
        }
    }

    /// Filtered and sorted view of the cache, before pagination.
    pub fn visible(&self) -> Vec<&Post> {
        let mut posts = filter_posts(&self.posts, &self.search);
        sort_posts(&mut posts, self.sort);
        posts
    }
}

/// Case-insensitive substring search over title, content and author.
pub fn filter_posts<'a>(posts: &'a [Post], search: &str) -> Vec<&'a Post> {
    let term = search.trim().to_lowercase();
    posts.iter().filter(|post| post.matches(&term)).collect()
}

/// Stable sort; posts without a date go last.
pub fn sort_posts(posts: &mut [&Post], sort: SortKey) {
    match sort {
        SortKey::Date => posts.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::None => {}
    }
}

pub fn paginate<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

pub fn total_pages(count: usize, size: usize) -> usize {
    count.div_ceil(size)
}

pub fn page_controls(page: usize, total_pages: usize) -> Vec<PageControl> {
    let mut controls = Vec::with_capacity(total_pages + 2);
    if page > 1 {
        controls.push(PageControl::Prev(page - 1));
    }
    controls.extend((1..=total_pages).map(|number| PageControl::Page {
        number,
        active: number == page,
    }));
    if page < total_pages {
        controls.push(PageControl::Next(page + 1));
    }
    controls
}

pub fn render(state: &ListState) -> ListView {
    let visible = state.visible();
    let cards: Vec<PostCard> = paginate(&visible, state.page, PAGE_SIZE)
        .iter()
        .map(|post| PostCard::from(*post))
        .collect();

    let body = if cards.is_empty() {
        ListBody::Empty
    } else {
        ListBody::Cards(cards)
    };

    ListView {
        body,
        controls: page_controls(state.page, total_pages(visible.len(), PAGE_SIZE)),
    }
}

#[derive(Debug)]
pub struct ListController<B> {
    backend: B,
    state: ListState,
    fetched: bool,
    generation: Generation,
}

impl<B: BlogBackend + Clone> ListController<B> {
    pub fn new(backend: B, sort: SortKey) -> Self {
        Self {
            backend,
            state: ListState::new(sort),
            fetched: false,
            generation: Generation::default(),
        }
    }

    /// Starts on `page` of the posts matching `search`.
    pub fn with_search(mut self, search: &str, page: usize) -> Self {
        self.state.search = search.trim().to_string();
        self.state.page = page.max(1);
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Requests the whole collection.
    pub fn fetch<'a>(&mut self) -> Request<'a, Vec<Post>>
    where
        B: 'a,
    {
        let backend = self.backend.clone();
        tagged(self.generation.begin(), async move { backend.list_all().await })
    }

    /// Caches a fetched collection and renders the current page with it.
    pub fn loaded(&mut self, response: Response<Vec<Post>>) -> Vec<Effect> {
        if !self.generation.is_current(response.ticket) {
            debug!("Dropping stale post list");
            return vec![];
        }

        match response.result {
            Ok(posts) => {
                info!("Loaded {} posts", posts.len());
                self.state.posts = posts;
                self.fetched = true;
                self.refresh()
            }
            Err(e) => {
                error!("Error fetching posts: {}", e);
                vec![Effect::List(ListView {
                    body: ListBody::Error(e.to_string()),
                    controls: vec![],
                })]
            }
        }
    }

    /// Renders the current page, fetching the collection first unless it is
    /// already cached.
    pub async fn load(&mut self) -> Vec<Effect> {
        if self.fetched {
            return self.refresh();
        }
        let response = self.fetch().await;
        self.loaded(response)
    }

    // Nothing is shown before the collection arrives; `loaded` renders
    // whatever page and search are current by then.
    fn refresh(&self) -> Vec<Effect> {
        if !self.fetched {
            return vec![];
        }
        vec![Effect::List(render(&self.state))]
    }

    pub fn set_page(&mut self, page: usize) -> Vec<Effect> {
        self.state.page = page.max(1);
        self.refresh()
    }

    pub fn next(&mut self) -> Vec<Effect> {
        let pages = total_pages(self.state.visible().len(), PAGE_SIZE);
        if self.state.page >= pages {
            return vec![];
        }
        self.set_page(self.state.page + 1)
    }

    pub fn prev(&mut self) -> Vec<Effect> {
        if self.state.page <= 1 {
            return vec![];
        }
        self.set_page(self.state.page - 1)
    }

    /// Applies a new search term and goes back to the first page.
    pub fn set_search(&mut self, search: &str) -> Vec<Effect> {
        self.state.search = search.trim().to_string();
        self.set_page(1)
    }

    /// Navigates to the `index`-th (1-based) card of the current page.
    pub fn open(&self, index: usize) -> Option<Effect> {
        let view = render(&self.state);
        let card = view.cards().get(index.checked_sub(1)?)?;
        Some(Effect::navigate(card.route()))
    }
}
