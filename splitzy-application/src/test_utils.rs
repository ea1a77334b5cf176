//! In-memory port implementations for unit tests

use crate::{error::StoreError, ports::SessionStore};
use dashmap::DashMap;
use splitzy_domain::{Session, SessionId};

#[derive(Default)]
pub struct MapStore {
    sessions: DashMap<SessionId, Session>,
}

impl SessionStore for MapStore {
    fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions.insert(session.id().clone(), session.clone());
        Ok(())
    }

    fn remove(&self, id: &SessionId) -> Result<bool, StoreError> {
        Ok(self.sessions.remove(id).is_some())
    }

    fn session_ids(&self) -> Result<Vec<SessionId>, StoreError> {
        let mut ids: Vec<SessionId> = self
            .sessions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

/// Store whose every call fails with a backend error
pub struct FailingStore;

impl SessionStore for FailingStore {
    fn load(&self, _id: &SessionId) -> Result<Option<Session>, StoreError> {
        Err(offline())
    }

    fn save(&self, _session: &Session) -> Result<(), StoreError> {
        Err(offline())
    }

    fn remove(&self, _id: &SessionId) -> Result<bool, StoreError> {
        Err(offline())
    }

    fn session_ids(&self) -> Result<Vec<SessionId>, StoreError> {
        Err(offline())
    }
}

pub fn offline() -> StoreError {
    StoreError::Backend("offline".to_string())
}

#[test]
fn map_store_is_shared_across_threads() {
    let store = MapStore::default();

    std::thread::scope(|scope| {
        for name in ["b", "a", "c"] {
            let store = &store;
            scope.spawn(move || store.save(&Session::new(SessionId::new(name))).unwrap());
        }
    });

    assert_eq!(
        store.session_ids(),
        Ok(vec![SessionId::new("a"), SessionId::new("b"), SessionId::new("c")])
    );
    assert_eq!(store.remove(&SessionId::new("b")), Ok(true));
    assert_eq!(store.load(&SessionId::new("b")), Ok(None));
}
