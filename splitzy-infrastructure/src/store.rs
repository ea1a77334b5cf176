use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use splitzy_application::{SessionStore, StoreError};
use splitzy_domain::{CurrencyCode, ExpenseRecord, Money, Participant, Session, SessionId};

const KEY_PREFIX: &str = "session:";

/// String key-value storage underneath [`KeyValueSessionStore`].
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Returns false when the key was absent.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Process-local backend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.iter().map(|entry| entry.key().clone()).collect())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionDto {
    id: SmolStr,
    #[serde(default)]
    registered: Vec<SmolStr>,
    #[serde(default)]
    expenses: Vec<ExpenseDto>,
}

// Owed amounts are derived data and are recomputed on load.
#[derive(Debug, Serialize, Deserialize)]
struct ExpenseDto {
    kind: SmolStr,
    amount: Decimal,
    currency: SmolStr,
    participants: Vec<SmolStr>,
    payer: SmolStr,
}

impl From<&Session> for SessionDto {
    fn from(session: &Session) -> Self {
        Self {
            id: SmolStr::new(session.id().as_str()),
            registered: session
                .registered_participants()
                .iter()
                .map(|name| SmolStr::new(name.as_str()))
                .collect(),
            expenses: session.expenses().iter().map(ExpenseDto::from).collect(),
        }
    }
}

impl From<&ExpenseRecord> for ExpenseDto {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            kind: SmolStr::new(record.kind()),
            amount: record.amount().as_decimal(),
            currency: SmolStr::new(record.currency().as_str()),
            participants: record
                .participants()
                .iter()
                .map(|name| SmolStr::new(name.as_str()))
                .collect(),
            payer: SmolStr::new(record.payer().as_str()),
        }
    }
}

impl SessionDto {
    fn into_session(self, key: &str) -> Result<Session, StoreError> {
        let expenses = self
            .expenses
            .into_iter()
            .enumerate()
            .map(|(index, dto)| {
                ExpenseRecord::new(
                    dto.kind,
                    Money::from_decimal(dto.amount),
                    CurrencyCode::new(dto.currency),
                    dto.participants.iter().map(Participant::new).collect(),
                    Participant::new(dto.payer),
                )
                .map_err(|err| StoreError::Corrupted {
                    key: key.to_string(),
                    detail: format!("expense {index}: {err}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Session::from_parts(
            SessionId::new(self.id),
            self.registered.iter().map(Participant::new),
            expenses,
        ))
    }
}

/// [`SessionStore`] that keeps each session as a JSON document under
/// `session:<id>`.
pub struct KeyValueSessionStore<B> {
    backend: B,
}

impl<B: KeyValueBackend> KeyValueSessionStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn key(id: &SessionId) -> String {
        format!("{KEY_PREFIX}{id}")
    }
}

impl<B: KeyValueBackend> SessionStore for KeyValueSessionStore<B> {
    fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let key = Self::key(id);
        let Some(raw) = self.backend.get(&key)? else {
            return Ok(None);
        };

        let dto: SessionDto = serde_json::from_str(&raw).map_err(|err| {
            tracing::warn!(key = %key, error = %err, "Stored session is not valid JSON");
            StoreError::Corrupted {
                key: key.clone(),
                detail: err.to_string(),
            }
        })?;
        let session = dto.into_session(&key)?;

        tracing::debug!(
            session_id = %id,
            expense_count = session.expenses().len(),
            "Session loaded"
        );
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let key = Self::key(session.id());
        let raw = serde_json::to_string(&SessionDto::from(session))
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        self.backend.set(&key, raw)?;

        tracing::debug!(
            session_id = %session.id(),
            expense_count = session.expenses().len(),
            "Session saved"
        );
        Ok(())
    }

    fn remove(&self, id: &SessionId) -> Result<bool, StoreError> {
        let removed = self.backend.remove(&Self::key(id))?;
        if removed {
            tracing::info!(session_id = %id, "Session removed");
        }
        Ok(removed)
    }

    fn session_ids(&self) -> Result<Vec<SessionId>, StoreError> {
        let mut ids: Vec<SessionId> = self
            .backend
            .keys()?
            .iter()
            .filter_map(|key| key.strip_prefix(KEY_PREFIX))
            .map(SessionId::new)
            .collect();
        ids.sort();
        Ok(ids)
    }
}
