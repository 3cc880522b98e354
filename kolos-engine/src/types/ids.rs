//! Strongly typed entity ids

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh ULID-backed id
            pub fn new() -> Self {
                Self(ulid::Ulid::new().to_string())
            }

            /// Wrap an existing id string
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the inner string value
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifies a team
    TeamId
);
define_id!(
    /// Identifies a board
    BoardId
);
define_id!(
    /// Identifies a column
    ColumnId
);
define_id!(
    /// Identifies a task or subtask
    TaskId
);
define_id!(
    /// Identifies a comment
    CommentId
);
define_id!(
    /// Identifies a user inside the engine (not the external identity token)
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_ulids() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_eq!(a.as_str().len(), 26);
        assert_ne!(a, b);
    }

    #[test]
    fn test_transparent_serde() {
        let id = ColumnId::from_string("col-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"col-1\"");
        let parsed: ColumnId = serde_json::from_str("\"col-1\"").unwrap();
        assert_eq!(parsed, id);
    }
}
