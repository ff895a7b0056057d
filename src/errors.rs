use std::path::PathBuf;

use thiserror::Error;

use crate::hand_history::EventKind;

/// Errors raised while consuming a hand-history log.
///
/// Any of these aborts the whole parse. Partial statistics are never
/// produced since every downstream series assumes the per-player channels
/// were extended in lockstep.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum ParseError {
    #[error("Malformed {kind} line {line_number}: {line:?}")]
    MalformedLine {
        line_number: usize,
        kind: EventKind,
        line: String,
    },

    #[error("{kind} line {line_number} references unknown player {player:?}")]
    UnknownPlayerReference {
        player: String,
        line_number: usize,
        kind: EventKind,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("starting_stack must be positive")]
    NonPositiveStartingStack,

    #[error("big_blind must be positive")]
    NonPositiveBigBlind,

    #[error("Identity {0:?} has no aliases")]
    EmptyAliasList(String),

    #[error("Alias {alias:?} is claimed by both {first:?} and {second:?}")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Invalid log dialect: {field} {reason}")]
    InvalidDialect { field: &'static str, reason: &'static str },

    #[error("Failed to parse session config from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of the collaborators that consume a finished session.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Remote service failure: {0}")]
    Remote(String),
}

/// Top level error for a full session run.
///
/// Keeps "bad log" ([`SessionError::Parse`]) apart from "bad disk, network
/// or credentials" ([`SessionError::Io`], [`SessionError::Sink`]).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No hand history files found in directory: {0}")]
    NoHandHistory(PathBuf),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl SessionError {
    /// True when the failure came from the log content rather than from
    /// the environment around it.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, SessionError::Parse(_))
    }
}
