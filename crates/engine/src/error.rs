// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tabula_domain::{DomainError, Year};

/// Errors that can occur during timetable generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A domain rule was violated (invalid field, invalid grid range).
    Domain(DomainError),
    /// A snapshot entity lacks a persisted identifier.
    MissingEntityId {
        /// The entity kind ("teacher", "room", ..).
        entity: &'static str,
        /// A human-readable description of the entity.
        detail: String,
    },
    /// Two snapshot entities carry the same unique code.
    DuplicateCode {
        /// The entity kind ("teacher", "room", "subject").
        entity: &'static str,
        /// The duplicated code.
        code: String,
    },
    /// A subject does not belong to the snapshot's department.
    ForeignSubject {
        /// The subject code.
        subject: String,
        /// The department the subject claims.
        department_id: i64,
    },
    /// A subject pins a teacher that is not in the snapshot.
    UnknownPinnedTeacher {
        /// The subject code.
        subject: String,
        /// The dangling teacher identifier.
        teacher_id: i64,
    },
    /// The department has no subjects to schedule.
    NoSubjects,
    /// The snapshot contains no teachers.
    NoTeachers,
    /// The snapshot contains no rooms.
    NoRooms,
    /// The search exhausted every candidate for a required occurrence.
    InfeasibleSchedule {
        /// The year being scheduled.
        year: Year,
        /// The section key being scheduled.
        section: String,
        /// The subject that could not be placed.
        subject: String,
        /// The 1-based occurrence index that could not be placed.
        occurrence: u8,
    },
    /// The backtracking step budget ran out before a decision was reached.
    ///
    /// Distinct from genuine infeasibility: the configuration may still be
    /// solvable with a larger budget.
    StepBudgetExhausted {
        /// The configured budget.
        budget: u64,
    },
    /// The merged document violated a cross-section invariant.
    ///
    /// This indicates a solver or assembler bug, never a caller mistake.
    AssemblyInvariant {
        /// Description of the violated invariant.
        detail: String,
    },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::MissingEntityId { entity, detail } => {
                write!(f, "Snapshot {entity} '{detail}' has no persisted identifier")
            }
            Self::DuplicateCode { entity, code } => {
                write!(f, "Duplicate {entity} code '{code}' in snapshot")
            }
            Self::ForeignSubject {
                subject,
                department_id,
            } => {
                write!(
                    f,
                    "Subject '{subject}' belongs to department {department_id}, not the snapshot department"
                )
            }
            Self::UnknownPinnedTeacher {
                subject,
                teacher_id,
            } => {
                write!(
                    f,
                    "Subject '{subject}' pins teacher {teacher_id}, which is not in the snapshot"
                )
            }
            Self::NoSubjects => {
                write!(f, "No subjects found for this department. Please add subjects first")
            }
            Self::NoTeachers => write!(f, "No teachers found. Please add teachers first"),
            Self::NoRooms => write!(f, "No rooms found. Please add rooms first"),
            Self::InfeasibleSchedule {
                year,
                section,
                subject,
                occurrence,
            } => {
                write!(
                    f,
                    "No feasible placement for subject '{subject}' (occurrence {occurrence}) in {year} {section}"
                )
            }
            Self::StepBudgetExhausted { budget } => {
                write!(
                    f,
                    "Generation exceeded its step budget of {budget} candidate attempts"
                )
            }
            Self::AssemblyInvariant { detail } => {
                write!(f, "Assembled timetable violates an invariant: {detail}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}
