// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Department, Room, Subject, Teacher};

/// Largest supported number of practical batches per year.
pub const MAX_BRANCHES: u8 = 4;

/// Validates a department's field constraints.
///
/// # Errors
///
/// Returns an error if the name or academic year is empty, the batch count
/// is outside `1..=MAX_BRANCHES`, or the class size is zero.
pub fn validate_department(department: &Department) -> Result<(), DomainError> {
    if department.name.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "name" });
    }
    if department.academic_year.trim().is_empty() {
        return Err(DomainError::EmptyField {
            field: "academic_year",
        });
    }
    if department.num_branches == 0 || department.num_branches > MAX_BRANCHES {
        return Err(DomainError::InvalidBatchCount {
            count: department.num_branches,
        });
    }
    if department.class_size == 0 {
        return Err(DomainError::InvalidClassSize {
            size: department.class_size,
        });
    }
    Ok(())
}

/// Validates a teacher's field constraints.
///
/// # Errors
///
/// Returns an error if the code or name is empty.
pub fn validate_teacher(teacher: &Teacher) -> Result<(), DomainError> {
    if teacher.code.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "code" });
    }
    if teacher.name.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "name" });
    }
    Ok(())
}

/// Validates a room's field constraints.
///
/// # Errors
///
/// Returns an error if the number is empty or the capacity is zero.
pub fn validate_room(room: &Room) -> Result<(), DomainError> {
    if room.number.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "number" });
    }
    if room.capacity == 0 {
        return Err(DomainError::InvalidCapacity {
            capacity: room.capacity,
        });
    }
    Ok(())
}

/// Validates a subject's field constraints.
///
/// # Errors
///
/// Returns an error if the code or name is empty, or an explicit weekly
/// occurrence count is zero.
pub fn validate_subject(subject: &Subject) -> Result<(), DomainError> {
    if subject.code.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "code" });
    }
    if subject.name.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "name" });
    }
    if let Some(count) = subject.occurrences_per_week
        && count == 0
    {
        return Err(DomainError::InvalidOccurrences {
            subject: subject.code.clone(),
            count,
        });
    }
    Ok(())
}
