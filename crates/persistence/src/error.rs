// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors surfaced by the `SQLite` store.
#[derive(Debug)]
pub enum PersistenceError {
    /// An underlying database error.
    Sqlite(rusqlite::Error),
    /// A timetable document failed to serialize or deserialize.
    Serialization(serde_json::Error),
    /// No row with the requested identifier.
    NotFound {
        /// The entity kind ("department", "teacher", ..).
        entity: &'static str,
        /// The requested identifier.
        id: i64,
    },
    /// A unique column value is already taken.
    DuplicateValue {
        /// The entity kind.
        entity: &'static str,
        /// The conflicting value.
        value: String,
    },
    /// The entity is still referenced by a stored timetable and cannot be
    /// deleted.
    ReferencedByTimetable {
        /// The entity kind.
        entity: &'static str,
        /// The entity's identifier.
        id: i64,
    },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "Database error: {err}"),
            Self::Serialization(err) => write!(f, "Timetable document serialization error: {err}"),
            Self::NotFound { entity, id } => write!(f, "No {entity} with id {id}"),
            Self::DuplicateValue { entity, value } => {
                write!(f, "A {entity} with value '{value}' already exists")
            }
            Self::ReferencedByTimetable { entity, id } => {
                write!(
                    f,
                    "Cannot delete {entity} {id}: it is referenced by a stored timetable"
                )
            }
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}
