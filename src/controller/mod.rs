pub mod create;
pub mod detail;
pub mod edit;
pub mod list;

#[cfg(test)]
pub(crate) mod testing;

pub use create::CreateController;
pub use detail::DetailController;
pub use edit::EditController;
pub use list::ListController;

use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use futures::future::{FutureExt, LocalBoxFuture};

use crate::{api::ApiError, view::Effect};

static ISSUED: AtomicU64 = AtomicU64::new(0);

/// Tags requests so that a response arriving after a newer request was
/// issued can be told apart and dropped.
///
/// Tickets are unique across controllers, so a response still in flight when
/// its page was replaced never matches the replacement's latest request.
#[derive(Debug, Default)]
pub struct Generation(Option<Ticket>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    pub fn begin(&mut self) -> Ticket {
        let ticket = Ticket(ISSUED.fetch_add(1, Ordering::Relaxed) + 1);
        self.0 = Some(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == Some(ticket)
    }
}

/// A backend result together with the ticket its request was issued under.
#[derive(Debug)]
pub struct Response<T> {
    pub ticket: Ticket,
    pub result: Result<T, ApiError>,
}

/// An issued request. It owns its backend handle and borrows nothing from
/// the controller, so several can be in flight at once.
pub type Request<'a, T> = LocalBoxFuture<'a, Response<T>>;

fn tagged<'a, T: 'a>(
    ticket: Ticket,
    request: impl Future<Output = Result<T, ApiError>> + 'a,
) -> Request<'a, T> {
    async move {
        Response {
            ticket,
            result: request.await,
        }
    }
    .boxed_local()
}

/// What an action leads to: effects shown right away, or a request whose
/// outcome is handed back to the controller once it resolves.
pub enum Step<'a, T> {
    Show(Vec<Effect>),
    Wait(LocalBoxFuture<'a, T>),
}

impl<'a, T: 'a> Step<'a, T> {
    pub fn map<U: 'a>(self, f: fn(T) -> U) -> Step<'a, U> {
        match self {
            Self::Show(effects) => Step::Show(effects),
            Self::Wait(request) => Step::Wait(request.map(f).boxed_local()),
        }
    }
}

impl<T> From<Vec<Effect>> for Step<'_, T> {
    fn from(effects: Vec<Effect>) -> Self {
        Self::Show(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut generation = Generation::default();
        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn tickets_do_not_carry_over_between_controllers() {
        let mut old = Generation::default();
        let mut new = Generation::default();
        let stale = old.begin();
        let fresh = new.begin();

        assert!(!new.is_current(stale));
        assert!(new.is_current(fresh));
    }

    #[tokio::test]
    async fn mapped_steps_keep_their_effects_and_results() {
        let shown: Step<u32> = vec![Effect::Alert("hi".to_string())].into();
        let Step::Show(effects) = shown.map(|n| n + 1) else {
            panic!("expected effects");
        };
        assert_eq!(effects, vec![Effect::Alert("hi".to_string())]);

        let waiting: Step<u32> = Step::Wait(async { 1 }.boxed_local());
        let Step::Wait(request) = waiting.map(|n| n + 1) else {
            panic!("expected a request");
        };
        assert_eq!(request.await, 2);
    }
}
