// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents an academic year level within a department.
///
/// Every subject belongs to exactly one year, and timetables are generated
/// per year for the whole department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Year {
    /// Second year engineering.
    SE,
    /// Third year engineering.
    TE,
    /// Final year engineering.
    BE,
}

impl Year {
    /// All year levels, in generation order.
    pub const ALL: [Self; 3] = [Self::SE, Self::TE, Self::BE];

    /// Returns the string representation of this year.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SE => "SE",
            Self::TE => "TE",
            Self::BE => "BE",
        }
    }
}

impl FromStr for Year {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SE" => Ok(Self::SE),
            "TE" => Ok(Self::TE),
            "BE" => Ok(Self::BE),
            _ => Err(DomainError::InvalidYear(s.to_string())),
        }
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the kind of teaching a subject requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// Whole-class lecture, held in a classroom or lecture hall.
    Lecture,
    /// Batch-wise practical, held in a lab.
    Practical,
}

impl SubjectKind {
    /// Returns the string representation of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Practical => "practical",
        }
    }

    /// Default weekly occurrences when a subject does not override them.
    ///
    /// Lectures run three times a week, practicals once per batch, matching
    /// the department conventions the system was built around.
    #[must_use]
    pub const fn default_weekly_occurrences(&self) -> u8 {
        match self {
            Self::Lecture => 3,
            Self::Practical => 1,
        }
    }
}

impl FromStr for SubjectKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lecture" => Ok(Self::Lecture),
            "practical" => Ok(Self::Practical),
            _ => Err(DomainError::InvalidSubjectKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the kind of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// Regular classroom.
    Classroom,
    /// Large lecture hall.
    LectureHall,
    /// General laboratory.
    Lab,
    /// Computer laboratory.
    ComputerLab,
}

impl RoomKind {
    /// Returns the string representation of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Classroom => "classroom",
            Self::LectureHall => "lecture_hall",
            Self::Lab => "lab",
            Self::ComputerLab => "computer_lab",
        }
    }

    /// Checks whether a room of this kind can host the given subject kind.
    ///
    /// Lectures require a classroom or lecture hall; practicals require a
    /// lab of either kind. This is a hard constraint for the solver.
    #[must_use]
    pub const fn suits(&self, subject_kind: SubjectKind) -> bool {
        match subject_kind {
            SubjectKind::Lecture => matches!(self, Self::Classroom | Self::LectureHall),
            SubjectKind::Practical => matches!(self, Self::Lab | Self::ComputerLab),
        }
    }
}

impl FromStr for RoomKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classroom" => Ok(Self::Classroom),
            "lecture_hall" => Ok(Self::LectureHall),
            "lab" => Ok(Self::Lab),
            "computer_lab" => Ok(Self::ComputerLab),
            _ => Err(DomainError::InvalidRoomKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for RoomKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a working day in the weekly grid.
///
/// The derived ordering is chronological, which the grid and the solver
/// both rely on for stable iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All working days, Monday first.
    pub const ALL: [Self; 5] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    /// Returns the string representation of this day.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "MONDAY",
            Self::Tuesday => "TUESDAY",
            Self::Wednesday => "WEDNESDAY",
            Self::Thursday => "THURSDAY",
            Self::Friday => "FRIDAY",
        }
    }
}

impl FromStr for Day {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MONDAY" => Ok(Self::Monday),
            "TUESDAY" => Ok(Self::Tuesday),
            "WEDNESDAY" => Ok(Self::Wednesday),
            "THURSDAY" => Ok(Self::Thursday),
            "FRIDAY" => Ok(Self::Friday),
            _ => Err(DomainError::InvalidDay(s.to_string())),
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a schedulable grouping within a year.
///
/// Either the whole class (`Main`, which receives lectures) or one of the
/// department's practical batches (`B1`..`Bk`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    /// The whole class.
    Main,
    /// A practical batch, numbered from 1.
    Batch(u8),
}

impl Section {
    /// Returns the document key for this section (`"Main"` or `"B1"`).
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Main => String::from("Main"),
            Self::Batch(n) => format!("B{n}"),
        }
    }

    /// Returns whether this section is a practical batch.
    #[must_use]
    pub const fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Parses a section key against a department's batch count.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is neither `Main` nor `B1`..`Bk` for the
    /// given `num_branches`.
    pub fn parse_key(key: &str, num_branches: u8) -> Result<Self, DomainError> {
        if key == "Main" {
            return Ok(Self::Main);
        }
        if let Some(num) = key.strip_prefix('B')
            && let Ok(n) = num.parse::<u8>()
            && n >= 1
            && n <= num_branches
        {
            return Ok(Self::Batch(n));
        }
        Err(DomainError::InvalidSectionKey {
            key: key.to_string(),
            num_branches,
        })
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Represents a department offering subjects and owning timetables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Canonical identifier assigned by the store. `None` before first save.
    pub id: Option<i64>,
    /// The department name.
    pub name: String,
    /// The academic year label this department is configured for (e.g. "2025-2026").
    pub academic_year: String,
    /// Number of practical batches per year (`B1`..`Bk`).
    pub num_branches: u8,
    /// Full-class headcount, used for room capacity checks.
    pub class_size: u32,
}

impl Department {
    /// Creates a new `Department` without a persisted identifier.
    #[must_use]
    pub const fn new(name: String, academic_year: String, num_branches: u8, class_size: u32) -> Self {
        Self {
            id: None,
            name,
            academic_year,
            num_branches,
            class_size,
        }
    }

    /// Creates a `Department` with an identifier assigned by the store.
    #[must_use]
    pub const fn with_id(
        id: i64,
        name: String,
        academic_year: String,
        num_branches: u8,
        class_size: u32,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            academic_year,
            num_branches,
            class_size,
        }
    }

    /// Headcount of one practical batch (class size split across batches,
    /// rounded up).
    #[must_use]
    pub const fn batch_size(&self) -> u32 {
        self.class_size.div_ceil(self.num_branches as u32)
    }

    /// The sections a year of this department schedules: `Main` plus one
    /// batch per branch, in order.
    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        let mut sections: Vec<Section> = vec![Section::Main];
        for n in 1..=self.num_branches {
            sections.push(Section::Batch(n));
        }
        sections
    }
}

/// Represents a teacher.
///
/// The `code` is the short human-readable identifier shown in timetable
/// cells; it is unique and normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Canonical identifier assigned by the store. `None` before first save.
    pub id: Option<i64>,
    /// Short unique code (e.g. "SBR"), uppercased.
    pub code: String,
    /// The teacher's full name.
    pub name: String,
    /// Optional specialization, used as a soft-constraint scoring hint only.
    pub specialization: Option<String>,
}

impl Teacher {
    /// Creates a new `Teacher` without a persisted identifier.
    ///
    /// The code is normalized to uppercase to ensure case-insensitive
    /// uniqueness.
    #[must_use]
    pub fn new(code: &str, name: String, specialization: Option<String>) -> Self {
        Self {
            id: None,
            code: code.to_uppercase(),
            name,
            specialization,
        }
    }

    /// Creates a `Teacher` with an identifier assigned by the store.
    #[must_use]
    pub fn with_id(id: i64, code: &str, name: String, specialization: Option<String>) -> Self {
        Self {
            id: Some(id),
            code: code.to_uppercase(),
            name,
            specialization,
        }
    }
}

/// Represents a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Canonical identifier assigned by the store. `None` before first save.
    pub id: Option<i64>,
    /// Unique room number (e.g. "204", "LAB-2").
    pub number: String,
    /// Seating capacity. Must be greater than zero.
    pub capacity: u32,
    /// The room kind, matched against subject kinds as a hard constraint.
    pub kind: RoomKind,
}

impl Room {
    /// Creates a new `Room` without a persisted identifier.
    #[must_use]
    pub const fn new(number: String, capacity: u32, kind: RoomKind) -> Self {
        Self {
            id: None,
            number,
            capacity,
            kind,
        }
    }

    /// Creates a `Room` with an identifier assigned by the store.
    #[must_use]
    pub const fn with_id(id: i64, number: String, capacity: u32, kind: RoomKind) -> Self {
        Self {
            id: Some(id),
            number,
            capacity,
            kind,
        }
    }
}

/// Represents a subject taught by a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Canonical identifier assigned by the store. `None` before first save.
    pub id: Option<i64>,
    /// Short unique code shown in timetable cells (e.g. "ML").
    pub code: String,
    /// The subject's full name.
    pub name: String,
    /// The owning department.
    pub department_id: i64,
    /// The year level this subject is taught in.
    pub year: Year,
    /// Lecture or practical.
    pub kind: SubjectKind,
    /// Optional pinned teacher; a strong soft preference, not a hard filter.
    pub teacher_id: Option<i64>,
    /// Weekly occurrences override. `None` uses the kind's default.
    pub occurrences_per_week: Option<u8>,
}

impl Subject {
    /// Creates a new `Subject` without a persisted identifier.
    #[must_use]
    pub fn new(
        code: &str,
        name: String,
        department_id: i64,
        year: Year,
        kind: SubjectKind,
        teacher_id: Option<i64>,
        occurrences_per_week: Option<u8>,
    ) -> Self {
        Self {
            id: None,
            code: code.to_uppercase(),
            name,
            department_id,
            year,
            kind,
            teacher_id,
            occurrences_per_week,
        }
    }

    /// Creates a `Subject` with an identifier assigned by the store.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn with_id(
        id: i64,
        code: &str,
        name: String,
        department_id: i64,
        year: Year,
        kind: SubjectKind,
        teacher_id: Option<i64>,
        occurrences_per_week: Option<u8>,
    ) -> Self {
        Self {
            id: Some(id),
            code: code.to_uppercase(),
            name,
            department_id,
            year,
            kind,
            teacher_id,
            occurrences_per_week,
        }
    }

    /// Number of grid cells this subject requires per week, per section.
    #[must_use]
    pub fn weekly_occurrences(&self) -> u8 {
        self.occurrences_per_week
            .unwrap_or_else(|| self.kind.default_weekly_occurrences())
    }
}
