//! Schema-version envelope for payloads crossing the library boundary.

use serde::{Deserialize, Serialize};

/// Current schema version of every boundary DTO.
///
/// Bump only for a breaking change to an existing field; new optional
/// fields are added without a bump.
pub const SCHEMA_VERSION: u32 = 1;

/// A payload tagged with the schema version it was written with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// Schema version of `payload`.
    pub version: u32,
    /// The wrapped value.
    pub payload: T,
}

impl<T> Versioned<T> {
    /// Wrap a value with the current schema version.
    pub fn new(payload: T) -> Self {
        Self {
            version: SCHEMA_VERSION,
            payload,
        }
    }

    /// Unwrap the value if it was written with a version this build reads.
    pub fn into_current(self) -> Option<T> {
        (self.version <= SCHEMA_VERSION).then_some(self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Color, Panel};

    #[test]
    fn test_versioned_round_trip() {
        let doc = Versioned::new(vec![Panel::new(vec![0, 1, 2], vec![0], Color::palette(4))]);
        let json = serde_json::to_string(&doc).unwrap();
        let back: Versioned<Vec<Panel>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, SCHEMA_VERSION);
        assert_eq!(doc, back);
    }

    #[test]
    fn test_future_version_rejected() {
        let doc = Versioned {
            version: SCHEMA_VERSION + 1,
            payload: 3u8,
        };
        assert_eq!(doc.into_current(), None);
        assert_eq!(Versioned::new(3u8).into_current(), Some(3));
    }
}
