//! Error taxonomy for the trainer core.
//!
//! Ignored events (input or ticks while no session is running) are not errors
//! and never show up here; the state machine drops them and logs at debug level.
use thiserror::Error;

use crate::passages::Category;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("reference text must contain at least one character")]
    EmptyReference,

    #[error("time limit must be positive, got {seconds}s")]
    InvalidTimeLimit { seconds: u32 },

    #[error("a session is already running")]
    SessionActive,

    #[error("unknown text category `{0}`")]
    UnknownCategory(String),

    #[error("unknown leaderboard sort field `{0}`")]
    UnknownSortField(String),

    #[error("all credential fields are required")]
    MissingCredentials,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("corpus file `{0}` is not embedded")]
    CorpusMissing(String),

    #[error("corpus file `{file}` is malformed")]
    CorpusParse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("category {0} has no passages")]
    EmptyCategory(Category),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("config could not be encoded")]
    ConfigFormat(#[source] serde_json::Error),
}
