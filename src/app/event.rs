use std::str::FromStr;

use thiserror::Error;

use crate::{
    route::{Route, RouteError},
    view::Field,
};

pub const HELP: &str = "\
commands:
  search <text> | /<text>   filter the list (empty clears)
  page <n> | next | prev    change page
  open <n>                  open the n-th post on the page
  new | home | go <page>    navigate (e.g. `go details.html?id=3`)
  edit | delete             on a post's page
  title|author|content <t>  fill a form field
  save                      submit the form
  help | quit";

/// A user interaction on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Search(String),
    Page(usize),
    Next,
    Prev,
    Open(usize),
    Go(Route),
    Edit,
    Delete,
    Set(Field, String),
    Save,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a positive number")]
    InvalidNumber(String),
    #[error(transparent)]
    Route(#[from] RouteError),
}

fn number(raw: &str) -> Result<usize, EventError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(EventError::InvalidNumber(raw.to_string())),
    }
}

impl FromStr for Event {
    type Err = EventError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(term) = line.strip_prefix('/') {
            return Ok(Self::Search(term.trim().to_string()));
        }

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(EventError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };

        Ok(match command.to_lowercase().as_str() {
            "search" => Self::Search(rest.to_string()),
            "page" => Self::Page(number(&argument("page")?)?),
            "next" => Self::Next,
            "prev" => Self::Prev,
            "open" => Self::Open(number(&argument("open")?)?),
            "go" => Self::Go(argument("go")?.parse()?),
            "new" => Self::Go(Route::New),
            "home" => Self::Go(Route::Index),
            "edit" => Self::Edit,
            "delete" => Self::Delete,
            "title" => Self::Set(Field::Title, argument("title")?),
            "author" => Self::Set(Field::Author, argument("author")?),
            "content" => Self::Set(Field::Content, argument("content")?),
            "save" => Self::Save,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(EventError::Unknown(other.to_string())),
        })
    }
}
