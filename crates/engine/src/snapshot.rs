// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::EngineError;
use tabula_domain::{
    Department, Room, Subject, Teacher, Year, validate_department, validate_room,
    validate_subject, validate_teacher,
};

/// An immutable, validated copy of everything the solver needs for one
/// department.
///
/// The snapshot is taken once at the start of a generation run so that
/// concurrent edits to the store cannot change the inputs mid-search.
/// Entities are sorted by identifier at construction, which together with
/// the solver's stable candidate ordering makes generation deterministic.
#[derive(Debug, Clone)]
pub struct DepartmentSnapshot {
    department: Department,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    subjects: Vec<Subject>,
}

impl DepartmentSnapshot {
    /// Validates and assembles a snapshot from store entities.
    ///
    /// # Errors
    ///
    /// * `EngineError::Domain` if any entity fails field validation
    /// * `EngineError::MissingEntityId` if any entity lacks an identifier
    /// * `EngineError::DuplicateCode` for duplicate teacher codes, room
    ///   numbers, or subject codes
    /// * `EngineError::ForeignSubject` if a subject belongs to another
    ///   department
    /// * `EngineError::UnknownPinnedTeacher` if a subject pins a teacher
    ///   that is not present
    /// * `EngineError::NoSubjects` / `NoTeachers` / `NoRooms` when a
    ///   required entity list is empty
    pub fn new(
        department: Department,
        mut teachers: Vec<Teacher>,
        mut rooms: Vec<Room>,
        mut subjects: Vec<Subject>,
    ) -> Result<Self, EngineError> {
        validate_department(&department)?;
        let department_id: i64 =
            department
                .id
                .ok_or_else(|| EngineError::MissingEntityId {
                    entity: "department",
                    detail: department.name.clone(),
                })?;

        if subjects.is_empty() {
            return Err(EngineError::NoSubjects);
        }
        if teachers.is_empty() {
            return Err(EngineError::NoTeachers);
        }
        if rooms.is_empty() {
            return Err(EngineError::NoRooms);
        }

        for teacher in &teachers {
            validate_teacher(teacher)?;
            if teacher.id.is_none() {
                return Err(EngineError::MissingEntityId {
                    entity: "teacher",
                    detail: teacher.code.clone(),
                });
            }
        }
        for room in &rooms {
            validate_room(room)?;
            if room.id.is_none() {
                return Err(EngineError::MissingEntityId {
                    entity: "room",
                    detail: room.number.clone(),
                });
            }
        }
        for subject in &subjects {
            validate_subject(subject)?;
            if subject.id.is_none() {
                return Err(EngineError::MissingEntityId {
                    entity: "subject",
                    detail: subject.code.clone(),
                });
            }
            if subject.department_id != department_id {
                return Err(EngineError::ForeignSubject {
                    subject: subject.code.clone(),
                    department_id: subject.department_id,
                });
            }
            if let Some(teacher_id) = subject.teacher_id
                && !teachers.iter().any(|t| t.id == Some(teacher_id))
            {
                return Err(EngineError::UnknownPinnedTeacher {
                    subject: subject.code.clone(),
                    teacher_id,
                });
            }
        }

        check_unique("teacher", teachers.iter().map(|t| t.code.as_str()))?;
        check_unique("room", rooms.iter().map(|r| r.number.as_str()))?;
        check_unique("subject", subjects.iter().map(|s| s.code.as_str()))?;

        // Identifier order fixes the candidate enumeration order.
        teachers.sort_by_key(|t| t.id);
        rooms.sort_by_key(|r| r.id);
        subjects.sort_by_key(|s| s.id);

        Ok(Self {
            department,
            teachers,
            rooms,
            subjects,
        })
    }

    /// The snapshotted department.
    #[must_use]
    pub const fn department(&self) -> &Department {
        &self.department
    }

    /// All teachers, sorted by identifier.
    #[must_use]
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// All rooms, sorted by identifier.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All subjects, sorted by identifier.
    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Subjects taught in the given year, in identifier order.
    pub fn subjects_for_year(&self, year: Year) -> impl Iterator<Item = &Subject> {
        self.subjects.iter().filter(move |s| s.year == year)
    }

    /// Looks up a teacher by identifier.
    #[must_use]
    pub fn teacher_by_id(&self, id: i64) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == Some(id))
    }

    /// Looks up a room by identifier.
    #[must_use]
    pub fn room_by_id(&self, id: i64) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == Some(id))
    }
}

fn check_unique<'a>(
    entity: &'static str,
    codes: impl Iterator<Item = &'a str>,
) -> Result<(), EngineError> {
    let mut seen: Vec<&str> = Vec::new();
    for code in codes {
        if seen.contains(&code) {
            return Err(EngineError::DuplicateCode {
                entity,
                code: code.to_string(),
            });
        }
        seen.push(code);
    }
    Ok(())
}
