//! Physics error types

use std::fmt;

use crate::body::BodyKey;

/// Error type for physics world operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// The key does not refer to a body in this world (never added, or removed)
    BodyNotFound(BodyKey),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::BodyNotFound(key) => write!(f, "Body not found: {:?}", key),
        }
    }
}

impl std::error::Error for PhysicsError {}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_body_not_found_display() {
        let mut map: SlotMap<BodyKey, ()> = SlotMap::with_key();
        let key = map.insert(());
        let msg = format!("{}", PhysicsError::BodyNotFound(key));
        assert!(msg.contains("Body not found"));
    }

    #[test]
    fn test_is_std_error() {
        let mut map: SlotMap<BodyKey, ()> = SlotMap::with_key();
        let key = map.insert(());
        let err: Box<dyn std::error::Error> = Box::new(PhysicsError::BodyNotFound(key));
        assert!(err.source().is_none());
    }
}
