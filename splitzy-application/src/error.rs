use splitzy_domain::{InvalidInput, SessionId};

/// Failure reported by a [`crate::ports::SessionStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend failed: {0}")]
    Backend(String),
    #[error("Stored value under '{key}' is unreadable: {detail}")]
    Corrupted { key: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Session '{0}' does not exist")]
    SessionNotFound(SessionId),
    #[error("Session '{session_id}' has no expense at index {index}")]
    ExpenseNotFound { session_id: SessionId, index: usize },
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
    #[error("`session` must come before any other statement (line {line})")]
    MisplacedSession { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Line {line}: {source}")]
pub struct ScriptRunError {
    pub line: usize,
    #[source]
    pub source: LedgerError,
}
