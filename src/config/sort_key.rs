use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Ordering applied to the list view after filtering.
///
/// `Date` orders newest first. `None` keeps the backend's order.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, ValueEnum, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    None,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::None => write!(f, "none"),
        }
    }
}
