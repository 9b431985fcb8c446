//! Basic type definitions for the chat server
//!
//! Provides newtype wrappers for type safety:
//! - `SessionId`: counter-assigned unique session identifier

/// Unique session identifier (newtype pattern)
///
/// Assigned by the `SessionRegistry` from its own monotonically increasing
/// counter, starting at 0. Never reused for the lifetime of the registry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl SessionId {
    /// The id that follows this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_ordering() {
        let first = SessionId(0);
        let second = first.next();
        assert!(first < second);
        assert_eq!(second, SessionId(1));
    }

    #[test]
    fn test_session_id_display() {
        assert_eq!(SessionId(42).to_string(), "42");
    }
}
