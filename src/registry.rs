//! Session registry
//!
//! Owns every live `Session` and hands out ids from a counter that belongs to
//! the registry instance, so two servers in one process never share ids.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::message::Frame;
use crate::session::Session;
use crate::types::SessionId;

/// Live sessions keyed by id
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// All connected sessions: SessionId -> Session
    sessions: HashMap<SessionId, Session>,
    /// Next id to hand out
    next_id: SessionId,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a session, returning its freshly assigned id
    pub fn insert(&mut self, address: String, transport: mpsc::Sender<Frame>) -> SessionId {
        let id = self.next_id;
        self.next_id = id.next();

        let session = Session::new(id, address, transport);
        debug!("Adding session: {}", session);
        self.sessions.insert(id, session);
        id
    }

    /// Remove a session; unknown ids are logged and ignored
    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        match self.sessions.remove(&id) {
            Some(session) => {
                debug!("Removing session: {}", session);
                Some(session)
            }
            None => {
                warn!("Cannot remove session {}: not registered", id);
                None
            }
        }
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Visit every live session (order unspecified)
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&Session),
    {
        for session in self.sessions.values() {
            visitor(session);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Take every session out of the registry, leaving it empty
    ///
    /// The id counter is untouched.
    pub fn drain(&mut self) -> Vec<Session> {
        self.sessions.drain().map(|(_, session)| session).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> mpsc::Sender<Frame> {
        let (tx, _rx) = mpsc::channel(1);
        tx
    }

    #[test]
    fn test_ids_strictly_increase_across_removals() {
        let mut registry = SessionRegistry::new();

        let a = registry.insert("a".to_string(), transport());
        let b = registry.insert("b".to_string(), transport());
        registry.remove(a);
        registry.remove(b);
        let c = registry.insert("c".to_string(), transport());

        assert!(a < b);
        assert!(b < c);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registries_do_not_share_counters() {
        let mut first = SessionRegistry::new();
        let mut second = SessionRegistry::new();

        first.insert("a".to_string(), transport());
        let id = second.insert("b".to_string(), transport());

        assert_eq!(id, SessionId(0));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = SessionRegistry::new();
        let id = registry.insert("a".to_string(), transport());

        assert!(registry.remove(SessionId(99)).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.get(id).is_some());
    }

    #[test]
    fn test_double_remove() {
        let mut registry = SessionRegistry::new();
        let id = registry.insert("a".to_string(), transport());

        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_for_each_visits_all() {
        let mut registry = SessionRegistry::new();
        registry.insert("a".to_string(), transport());
        registry.insert("b".to_string(), transport());

        let mut seen = Vec::new();
        registry.for_each(|s| seen.push(s.address.clone()));
        seen.sort();

        assert_eq!(seen, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_drain_empties_registry() {
        let mut registry = SessionRegistry::new();
        registry.insert("a".to_string(), transport());
        registry.insert("b".to_string(), transport());

        assert_eq!(registry.drain().len(), 2);
        assert!(registry.is_empty());
        assert!(registry.drain().is_empty());

        let next = registry.insert("c".to_string(), transport());
        assert_eq!(next, SessionId(2));
    }
}
