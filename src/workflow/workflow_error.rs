use crate::catalog::ResolveError;
use crate::foundation::database::RosterError;
use std::fmt;

/// Errors from committing a confirmed preview to the roster.
#[derive(Debug)]
pub enum CommitError {
    /// The store already holds a record for this identity. This is the
    /// authoritative duplicate signal; the preview's advisory flag may have
    /// been stale (e.g. another session committed first).
    Conflict,
    /// The store could not be reached.
    Unavailable(String),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommitError::Conflict => write!(f, "Artist is already on the roster"),
            CommitError::Unavailable(msg) => write!(f, "Roster store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for CommitError {}

impl From<RosterError> for CommitError {
    fn from(error: RosterError) -> Self {
        match error {
            RosterError::Conflict => CommitError::Conflict,
            RosterError::Unavailable(msg) => CommitError::Unavailable(msg),
        }
    }
}

/// The last failure of a workflow run, surfaced verbatim to the caller.
#[derive(Debug)]
pub enum WorkflowError {
    Resolve(ResolveError),
    Commit(CommitError),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WorkflowError::Resolve(e) => write!(f, "{}", e),
            WorkflowError::Commit(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WorkflowError {}
