use crate::{
    error::{ScriptParseError, StoreError},
    model::Script,
};
use splitzy_domain::{CurrencyCode, Session, SessionId};

/// Key-addressed persistence for sessions.
///
/// Implementations serialize concurrent writes; the ledger itself only
/// loads, mutates a copy and saves it back.
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Returns false when nothing was stored under `id`.
    fn remove(&self, id: &SessionId) -> Result<bool, StoreError>;

    fn session_ids(&self) -> Result<Vec<SessionId>, StoreError>;
}

pub trait ScriptParser: Send + Sync {
    fn parse(
        &self,
        content: &str,
        default_currency: &CurrencyCode,
    ) -> Result<Script, ScriptParseError>;
}
