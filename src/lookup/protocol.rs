//! Protocol definitions shared between the coordinator and the lookup worker.

use crate::error::LugatError;
use crate::model::{Article, Translation};

/// Monotonically increasing token attached to every query so that a response can be
/// compared against the newest request of its kind.
pub type Generation = u64;

/// Commands sent from the coordinator to the lookup worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCommand {
    /// Prefix query for the suggestion list. `prefix` is already lower-cased.
    Suggest {
        generation: Generation,
        prefix: String,
    },
    /// Article list for a selected headword.
    FetchArticles {
        generation: Generation,
        word: String,
    },
    Shutdown,
}

/// Responses emitted by the lookup worker. Completion order is not guaranteed.
#[derive(Debug)]
pub enum LookupResponse {
    Suggestions {
        generation: Generation,
        result: Result<Vec<Translation>, LugatError>,
    },
    Articles {
        generation: Generation,
        word: String,
        result: Result<Vec<Article>, LugatError>,
    },
}

impl LookupResponse {
    pub fn generation(&self) -> Generation {
        match self {
            LookupResponse::Suggestions { generation, .. }
            | LookupResponse::Articles { generation, .. } => *generation,
        }
    }
}
