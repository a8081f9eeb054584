// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A wall-clock time string could not be parsed.
    InvalidTimeFormat {
        /// The value that failed to parse.
        value: String,
        /// The parsing error message.
        reason: String,
    },
    /// The day end time is not after the day start time.
    InvalidTimeRange {
        /// The day start time.
        start: String,
        /// The day end time.
        end: String,
    },
    /// The day range cannot fit a single assignable slot.
    GridTooSmall {
        /// The day start time.
        start: String,
        /// The day end time.
        end: String,
    },
    /// Academic year string is not a recognized year value.
    InvalidYear(String),
    /// Subject type is not a recognized value.
    InvalidSubjectKind(String),
    /// Room type is not a recognized value.
    InvalidRoomKind(String),
    /// Day string is not a recognized weekday.
    InvalidDay(String),
    /// Section key does not match `Main` or a valid batch for the department.
    InvalidSectionKey {
        /// The offending key.
        key: String,
        /// The number of batches the department declares.
        num_branches: u8,
    },
    /// A required text field is empty.
    EmptyField {
        /// The name of the field.
        field: &'static str,
    },
    /// Room capacity must be greater than zero.
    InvalidCapacity {
        /// The invalid capacity value.
        capacity: u32,
    },
    /// Department batch count is outside the supported range.
    InvalidBatchCount {
        /// The invalid count value.
        count: u8,
    },
    /// Department class size must be greater than zero.
    InvalidClassSize {
        /// The invalid size value.
        size: u32,
    },
    /// Weekly occurrence count must be greater than zero.
    InvalidOccurrences {
        /// The subject code.
        subject: String,
        /// The invalid count value.
        count: u8,
    },
    /// A cell was addressed at a day/slot key the grid does not contain.
    UnknownGridKey {
        /// The day key.
        day: String,
        /// The slot label.
        slot: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeFormat { value, reason } => {
                write!(f, "Failed to parse time '{value}': {reason}")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "Day end time '{end}' must be after start time '{start}'")
            }
            Self::GridTooSmall { start, end } => {
                write!(
                    f,
                    "Day range '{start}' to '{end}' does not fit a single assignable slot"
                )
            }
            Self::InvalidYear(value) => {
                write!(f, "Invalid year '{value}': must be one of SE, TE, BE")
            }
            Self::InvalidSubjectKind(value) => {
                write!(
                    f,
                    "Invalid subject type '{value}': must be 'lecture' or 'practical'"
                )
            }
            Self::InvalidRoomKind(value) => {
                write!(
                    f,
                    "Invalid room type '{value}': must be one of classroom, lecture_hall, lab, computer_lab"
                )
            }
            Self::InvalidDay(value) => write!(f, "Invalid day '{value}'"),
            Self::InvalidSectionKey { key, num_branches } => {
                write!(
                    f,
                    "Invalid section key '{key}': expected 'Main' or 'B1'..'B{num_branches}'"
                )
            }
            Self::EmptyField { field } => write!(f, "Field '{field}' must not be empty"),
            Self::InvalidCapacity { capacity } => {
                write!(f, "Invalid room capacity: {capacity}. Must be greater than 0")
            }
            Self::InvalidBatchCount { count } => {
                write!(f, "Invalid batch count: {count}. Must be between 1 and 4")
            }
            Self::InvalidClassSize { size } => {
                write!(f, "Invalid class size: {size}. Must be greater than 0")
            }
            Self::InvalidOccurrences { subject, count } => {
                write!(
                    f,
                    "Invalid weekly occurrences for subject '{subject}': {count}. Must be greater than 0"
                )
            }
            Self::UnknownGridKey { day, slot } => {
                write!(f, "Grid has no cell at day '{day}', slot '{slot}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
