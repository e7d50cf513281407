//! View models and the effects controllers ask a view to perform.
//!
//! Controllers stay free of I/O: every operation returns a list of
//! [`Effect`]s and a [`View`] decides how to show them.

mod terminal;

pub use terminal::TerminalView;

use std::{io, time::Duration};

use crate::{
    post::{Post, PostId},
    route::Route,
};

/// How long a notification stays up unless dismissed earlier.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub author: String,
    pub date: String,
    pub title: String,
    pub preview: String,
    pub avatar: String,
}

impl PostCard {
    pub fn route(&self) -> Route {
        Route::Details(self.id.clone())
    }
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            author: post.author.clone(),
            date: post.display_date(),
            title: post.title.clone(),
            preview: post.preview(),
            avatar: post.avatar().to_string(),
        }
    }
}

/// A pagination button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Prev(usize),
    Page { number: usize, active: bool },
    Next(usize),
}

impl PageControl {
    pub fn label(&self) -> String {
        match self {
            Self::Prev(_) => "Prev".to_string(),
            Self::Page { number, .. } => number.to_string(),
            Self::Next(_) => "Next".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    Cards(Vec<PostCard>),
    Empty,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub body: ListBody,
    pub controls: Vec<PageControl>,
}

impl ListView {
    pub fn cards(&self) -> &[PostCard] {
        match &self.body {
            ListBody::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn has_prev(&self) -> bool {
        self.controls.iter().any(|c| matches!(c, PageControl::Prev(_)))
    }

    pub fn has_next(&self) -> bool {
        self.controls.iter().any(|c| matches!(c, PageControl::Next(_)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: PostId,
    pub title: String,
    pub avatar: String,
    pub author: String,
    pub date: String,
    pub content: String,
    pub edit: Route,
}

impl From<&Post> for DetailView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            avatar: post.avatar().to_string(),
            author: post.author.clone(),
            date: post.display_date(),
            content: post.content.clone(),
            edit: Route::Edit(post.id.clone()),
        }
    }
}

/// Named fields of the edit and create forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Content,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPostForm {
    pub title: String,
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Toast-style message, auto-dismissed after [`NOTIFICATION_TIMEOUT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    List(ListView),
    Detail(DetailView),
    Notify(Notification),
    /// Error shown in the page's inline error region.
    InlineError(String),
    /// Blocking alert.
    Alert(String),
    FillForm(EditForm),
    Navigate { to: Route, after: Duration },
}

impl Effect {
    pub fn navigate(to: Route) -> Self {
        Self::Navigate {
            to,
            after: Duration::ZERO,
        }
    }
}

/// Binds effects to an output surface.
pub trait View {
    fn apply(&mut self, effect: &Effect) -> io::Result<()>;
    /// Free-form text outside any page region (help, prompts).
    fn message(&mut self, text: &str) -> io::Result<()>;
}
