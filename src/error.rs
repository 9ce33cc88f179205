//! Error types. One enum per concern, `thiserror` only.
//!
//! A domain abort (too many "not sure" answers, too few definite answers) is not
//! an error: it is an [`crate::validator::AbortReason`] carried in the result.

use std::path::PathBuf;

use crate::assessment::Stage;

/// Failure to load or validate the input catalogs. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("required catalog files are missing: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Malformed interactive input. Recoverable: the caller re-prompts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a valid number.")]
    NotANumber(String),

    #[error("Please enter a number between 1 and 5.")]
    RankOutOfRange(i64),

    #[error("This ranking has already been used. Please choose another.")]
    DuplicateRank(u8),

    #[error("Please enter 'y' or 'n'.")]
    NotYesNo(String),

    #[error("Please enter 'y', 'n', or 'not sure'.")]
    NotYesNoUnsure(String),
}

/// A stage-1 ranking that is not a permutation of 1..=5.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("rank {0} is outside 1..=5")]
    OutOfRange(u8),

    #[error("rank {0} is used more than once")]
    Duplicate(u8),
}

/// An assessment transition submitted while the state machine is in another stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("expected stage {expected:?}, assessment is in stage {actual:?}")]
    OutOfOrder { expected: Stage, actual: Stage },

    #[error("assessment is not finished (stage {0:?})")]
    NotFinished(Stage),
}

/// An answer source could not produce an answer.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("I/O error while prompting: {0}")]
    Io(#[from] std::io::Error),

    #[error("input closed before the assessment finished")]
    Closed,

    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Failure to persist a result record.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}
