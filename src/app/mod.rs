//! Page navigation and the interactive event loop.

mod event;

pub use event::{Event, EventError, HELP};

use std::io;

use futures::{
    future::{FutureExt, LocalBoxFuture},
    stream::{FuturesUnordered, StreamExt},
};
use log::{debug, info, warn};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    time::sleep,
};

use crate::{
    api::BlogBackend,
    config::SortKey,
    controller::{
        CreateController, DetailController, EditController, ListController, Response, Step,
    },
    debounce::{Debouncer, SEARCH_DEBOUNCE},
    post::Post,
    route::Route,
    view::{EditForm, Effect, Field, NewPostForm, View},
};

/// The page currently shown, owning its own controller.
#[derive(Debug)]
enum Screen<B> {
    Index(ListController<B>),
    Details(DetailController<B>),
    Edit {
        controller: EditController<B>,
        draft: EditForm,
    },
    New {
        controller: CreateController<B>,
        draft: NewPostForm,
        list: ListController<B>,
    },
}

/// Something the app was waiting on, addressed to the page that asked.
#[derive(Debug)]
enum Reply {
    Listed(Response<Vec<Post>>),
    Shown(Response<Post>),
    Deleted(Response<()>),
    Filled(Response<Post>),
    Saved(Response<Post>),
    Created(Response<Post>),
    /// A delayed navigation is due.
    Arrived(Route),
}

type InFlight<'a> = FuturesUnordered<LocalBoxFuture<'a, Reply>>;

pub struct App<B, V> {
    backend: B,
    view: V,
    sort: SortKey,
    route: Route,
    screen: Screen<B>,
}

impl<B: BlogBackend + Clone, V: View> App<B, V> {
    pub fn new(backend: B, view: V, sort: SortKey) -> Self {
        let screen = Screen::Index(ListController::new(backend.clone(), sort));
        Self {
            backend,
            view,
            sort,
            route: Route::Index,
            screen,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Replaces the current page with a freshly loaded one.
    pub async fn open(&mut self, route: Route) -> io::Result<()> {
        let step = self.enter(route);
        self.complete(step).await
    }

    pub async fn dispatch(&mut self, event: Event) -> io::Result<()> {
        let step = self.handle(event);
        self.complete(step).await
    }

    /// Shows effects, following navigations (after their delay) until
    /// nothing is left to wait for.
    pub async fn apply(&mut self, effects: Vec<Effect>) -> io::Result<()> {
        self.complete(effects.into()).await
    }

    /// Reads one event per line until `quit` or end of input. Searches are
    /// debounced. Requests and delayed navigations resolve in the
    /// background while input keeps being read; at end of input they are
    /// waited for.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> io::Result<()> {
        let mut lines = input.lines();
        let mut search = Debouncer::new(SEARCH_DEBOUNCE);
        let mut pending = InFlight::new();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        if search.is_pending() {
                            let term = search.settled().await;
                            let step = self.handle(Event::Search(term));
                            self.take(step, &mut pending)?;
                        }
                        self.settle(&mut pending).await?;
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Event>() {
                        Ok(Event::Quit) => break,
                        Ok(Event::Help) => self.view.message(HELP)?,
                        Ok(Event::Search(term)) => search.schedule(term),
                        Ok(event) => {
                            let step = self.handle(event);
                            self.take(step, &mut pending)?;
                        }
                        Err(e) => self.view.message(&e.to_string())?,
                    }
                }
                term = search.settled() => {
                    let step = self.handle(Event::Search(term));
                    self.take(step, &mut pending)?;
                }
                Some(reply) = pending.next(), if !pending.is_empty() => {
                    let step = self.receive(reply)?;
                    self.take(step, &mut pending)?;
                }
            }
        }

        if !pending.is_empty() {
            debug!("Abandoning {} pending requests", pending.len());
        }
        info!("Bye");
        Ok(())
    }

    async fn complete<'a>(&mut self, step: Step<'a, Reply>) -> io::Result<()>
    where
        B: 'a,
    {
        let mut pending = InFlight::new();
        self.take(step, &mut pending)?;
        self.settle(&mut pending).await
    }

    async fn settle<'a>(&mut self, pending: &mut InFlight<'a>) -> io::Result<()>
    where
        B: 'a,
    {
        while let Some(reply) = pending.next().await {
            let step = self.receive(reply)?;
            self.take(step, pending)?;
        }
        Ok(())
    }

    fn take<'a>(&mut self, step: Step<'a, Reply>, pending: &mut InFlight<'a>) -> io::Result<()>
    where
        B: 'a,
    {
        match step {
            Step::Show(effects) => self.show(effects, pending),
            Step::Wait(request) => {
                pending.push(request);
                Ok(())
            }
        }
    }

    fn show<'a>(&mut self, effects: Vec<Effect>, pending: &mut InFlight<'a>) -> io::Result<()>
    where
        B: 'a,
    {
        for effect in effects {
            match effect {
                Effect::Navigate { to, after } if after.is_zero() => {
                    // the rest belonged to the page being left
                    let step = self.navigate(to)?;
                    return self.take(step, pending);
                }
                Effect::Navigate { to, after } => pending.push(
                    async move {
                        sleep(after).await;
                        Reply::Arrived(to)
                    }
                    .boxed_local(),
                ),
                effect => self.view.apply(&effect)?,
            }
        }
        Ok(())
    }

    fn navigate<'a>(&mut self, to: Route) -> io::Result<Step<'a, Reply>>
    where
        B: 'a,
    {
        self.view.apply(&Effect::navigate(to.clone()))?;
        Ok(self.enter(to))
    }

    fn enter<'a>(&mut self, route: Route) -> Step<'a, Reply>
    where
        B: 'a,
    {
        info!("Opening {}", route);
        let backend = self.backend.clone();
        let (screen, request) = match &route {
            Route::Index => {
                let mut list = ListController::new(backend, self.sort);
                let request = list.fetch().map(Reply::Listed).boxed_local();
                (Screen::Index(list), request)
            }
            Route::Details(id) => {
                let mut detail = DetailController::new(backend, id.clone());
                let request = detail.fetch().map(Reply::Shown).boxed_local();
                (Screen::Details(detail), request)
            }
            Route::Edit(id) => {
                let mut controller = EditController::new(backend, id.clone());
                let request = controller.fetch().map(Reply::Filled).boxed_local();
                let screen = Screen::Edit {
                    controller,
                    draft: EditForm::default(),
                };
                (screen, request)
            }
            Route::New => {
                let mut list = ListController::new(backend.clone(), self.sort);
                let request = list.fetch().map(Reply::Listed).boxed_local();
                let screen = Screen::New {
                    controller: CreateController::new(backend),
                    draft: NewPostForm::default(),
                    list,
                };
                (screen, request)
            }
        };

        self.route = route;
        self.screen = screen;
        Step::Wait(request)
    }

    fn handle<'a>(&mut self, event: Event) -> Step<'a, Reply>
    where
        B: 'a,
    {
        match (event, &mut self.screen) {
            (Event::Go(route), _) => vec![Effect::navigate(route)].into(),
            (Event::Search(term), Screen::Index(list) | Screen::New { list, .. }) => {
                list.set_search(&term).into()
            }
            (Event::Page(page), Screen::Index(list) | Screen::New { list, .. }) => {
                list.set_page(page).into()
            }
            (Event::Next, Screen::Index(list) | Screen::New { list, .. }) => list.next().into(),
            (Event::Prev, Screen::Index(list) | Screen::New { list, .. }) => list.prev().into(),
            (Event::Open(index), Screen::Index(list) | Screen::New { list, .. }) => {
                list.open(index).into_iter().collect::<Vec<_>>().into()
            }
            (Event::Edit, Screen::Details(detail)) => detail
                .post()
                .map(|post| Effect::navigate(Route::Edit(post.id.clone())))
                .into_iter()
                .collect::<Vec<_>>()
                .into(),
            (Event::Delete, Screen::Details(detail)) => {
                detail.request_delete().map(Reply::Deleted)
            }
            (Event::Set(field, value), Screen::Edit { draft, .. }) => {
                match field {
                    Field::Title => draft.title = value,
                    Field::Content => draft.content = value,
                    Field::Author => warn!("The author cannot be edited"),
                }
                Step::Show(vec![])
            }
            (Event::Set(field, value), Screen::New { draft, .. }) => {
                match field {
                    Field::Title => draft.title = value,
                    Field::Author => draft.author = value,
                    Field::Content => draft.content = value,
                }
                Step::Show(vec![])
            }
            (Event::Save, Screen::Edit { controller, draft }) => {
                controller.request_save(draft).map(Reply::Saved)
            }
            (Event::Save, Screen::New { controller, draft, .. }) => {
                controller.request_create(draft).map(Reply::Created)
            }
            (event, _) => {
                warn!("{:?} does nothing on {}", event, self.route);
                Step::Show(vec![])
            }
        }
    }

    /// Hands a reply to the page that issued it. Replies meant for a page
    /// that has since been left are dropped.
    fn receive<'a>(&mut self, reply: Reply) -> io::Result<Step<'a, Reply>>
    where
        B: 'a,
    {
        let reply = match reply {
            Reply::Arrived(to) => return self.navigate(to),
            reply => reply,
        };

        let effects = match (reply, &mut self.screen) {
            (Reply::Listed(response), Screen::Index(list) | Screen::New { list, .. }) => {
                list.loaded(response)
            }
            (Reply::Shown(response), Screen::Details(detail)) => detail.loaded(response),
            (Reply::Deleted(response), Screen::Details(detail)) => detail.deleted(response),
            (Reply::Filled(response), Screen::Edit { controller, draft }) => {
                let effects = controller.loaded(response);
                for effect in &effects {
                    if let Effect::FillForm(form) = effect {
                        *draft = form.clone();
                    }
                }
                effects
            }
            (Reply::Saved(response), Screen::Edit { controller, .. }) => controller.saved(response),
            (Reply::Created(response), Screen::New { controller, .. }) => {
                controller.created(response)
            }
            (reply, _) => {
                debug!("Dropping {:?}, {} is shown now", reply, self.route);
                vec![]
            }
        };
        Ok(effects.into())
    }
}
