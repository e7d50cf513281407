use std::{fmt, str::FromStr};

use reqwest::Url;
use thiserror::Error;

use crate::post::PostId;

/// One of the client's four pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    New,
    Details(PostId),
    Edit(PostId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid location `{0}`")]
    Invalid(String),
    #[error("unknown page `{0}`")]
    UnknownPage(String),
    #[error("page `{0}` needs an `id` query parameter")]
    MissingId(&'static str),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Index => write!(f, "index.html"),
            Self::New => write!(f, "new.html"),
            Self::Details(id) => {
                write!(f, "details.html?id={}", urlencoding::encode(&id.to_string()))
            }
            Self::Edit(id) => write!(f, "edit.html?id={}", urlencoding::encode(&id.to_string())),
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(location: &str) -> Result<Self, Self::Err> {
        let base = Url::parse("http://blog.local/")
            .map_err(|_| RouteError::Invalid(location.to_string()))?;
        let url = base
            .join(location.trim())
            .map_err(|_| RouteError::Invalid(location.to_string()))?;

        let page = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        let page = page.strip_suffix(".html").unwrap_or(page);

        let id = url
            .query_pairs()
            .find(|(key, value)| key == "id" && !value.is_empty())
            .map(|(_, value)| value.parse::<PostId>().unwrap_or_else(|never| match never {}));

        match (page, id) {
            ("" | "index", _) => Ok(Self::Index),
            ("new", _) => Ok(Self::New),
            ("details", Some(id)) => Ok(Self::Details(id)),
            ("details", None) => Err(RouteError::MissingId("details")),
            ("edit", Some(id)) => Ok(Self::Edit(id)),
            ("edit", None) => Err(RouteError::MissingId("edit")),
            (other, _) => Err(RouteError::UnknownPage(other.to_string())),
        }
    }
}
