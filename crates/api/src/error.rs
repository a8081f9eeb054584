// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use tabula_domain::DomainError;
use tabula_engine::EngineError;
use tabula_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/engine errors and represent the API
/// contract: every variant maps to a stable `kind` string carried on the
/// wire alongside the human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    Domain(DomainError),
    /// Generation failed or was rejected by the engine.
    Engine(EngineError),
    /// A requested resource was not found.
    NotFound {
        /// The entity kind ("department", "timetable", ..).
        entity: &'static str,
        /// The requested identifier.
        id: i64,
    },
    /// A unique value (teacher code, room number, subject code) is taken.
    Duplicate {
        /// The entity kind.
        entity: &'static str,
        /// The conflicting value.
        value: String,
    },
    /// The entity is referenced by a stored timetable and cannot be
    /// deleted.
    ReferencedByTimetable {
        /// The entity kind.
        entity: &'static str,
        /// The entity's identifier.
        id: i64,
    },
    /// A generation run for this department and academic year is already
    /// in flight.
    GenerationInProgress {
        /// The department being generated for.
        department_id: i64,
        /// The academic year label.
        academic_year: String,
    },
    /// An imported document does not match the expected grid shape.
    ImportSchema {
        /// Path to the offending key, e.g. `"SE_Main.MONDAY"`.
        key: String,
        /// What was wrong at that key.
        message: String,
    },
    /// An imported document references an unknown entity.
    ImportReference {
        /// Path to the offending cell.
        key: String,
        /// What reference was dangling.
        message: String,
    },
    /// An imported document double-books a teacher or room.
    ImportConflict {
        /// Description of the conflict.
        detail: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// The stable machine-readable kind carried on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Domain(_) => "validation",
            Self::Engine(err) => match err {
                EngineError::InfeasibleSchedule { .. } => "infeasible_schedule",
                EngineError::StepBudgetExhausted { .. } => "generation_timeout",
                EngineError::AssemblyInvariant { .. } => "internal",
                _ => "validation",
            },
            Self::NotFound { .. } => "not_found",
            Self::Duplicate { .. } => "duplicate",
            Self::ReferencedByTimetable { .. } => "referenced_by_timetable",
            Self::GenerationInProgress { .. } => "generation_in_progress",
            Self::ImportSchema { .. } => "import_schema",
            Self::ImportReference { .. } => "import_reference",
            Self::ImportConflict { .. } => "import_conflict",
            Self::Internal { .. } => "internal",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "No {entity} with id {id}"),
            Self::Duplicate { entity, value } => {
                write!(f, "A {entity} with value '{value}' already exists")
            }
            Self::ReferencedByTimetable { entity, id } => {
                write!(
                    f,
                    "Cannot delete {entity} {id}: it is referenced by a stored timetable"
                )
            }
            Self::GenerationInProgress {
                department_id,
                academic_year,
            } => {
                write!(
                    f,
                    "A timetable for department {department_id} ({academic_year}) is already being generated"
                )
            }
            Self::ImportSchema { key, message } => {
                write!(f, "Invalid timetable structure at '{key}': {message}")
            }
            Self::ImportReference { key, message } => {
                write!(f, "Unknown reference at '{key}': {message}")
            }
            Self::ImportConflict { detail } => {
                write!(f, "Imported timetable is inconsistent: {detail}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Domain(domain) => Self::Domain(domain),
            other => Self::Engine(other),
        }
    }
}

/// Maps store errors onto the API contract.
///
/// Database and serialization failures collapse into `Internal`; the
/// remaining variants carry through with their identifiers intact.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound { entity, id } => ApiError::NotFound { entity, id },
        PersistenceError::DuplicateValue { entity, value } => {
            ApiError::Duplicate { entity, value }
        }
        PersistenceError::ReferencedByTimetable { entity, id } => {
            ApiError::ReferencedByTimetable { entity, id }
        }
        PersistenceError::Sqlite(_) | PersistenceError::Serialization(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
