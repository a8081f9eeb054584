// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to generate the timetable for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateTimetableRequest {
    /// The department to generate for.
    pub department_id: i64,
    /// The academic year label the generated document covers.
    pub academic_year: String,
    /// Wall-clock day start override, e.g. `"9:00 am"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_start_time: Option<String>,
    /// Wall-clock day end override, e.g. `"4:45 pm"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_end_time: Option<String>,
}

/// Request to import an externally authored timetable document.
///
/// The `timetable` value is validated against the expected grid (standard
/// bounds unless overridden) and the stored entities before anything is
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTimetableRequest {
    /// The owning department.
    pub department_id: i64,
    /// The academic year label the document covers.
    pub academic_year: String,
    /// Wall-clock day start the document was built with, e.g. `"9:00 am"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_start_time: Option<String>,
    /// Wall-clock day end the document was built with, e.g. `"4:45 pm"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_end_time: Option<String>,
    /// Section key -> day -> slot label -> cell, as raw `JSON`.
    pub timetable: Value,
}

/// Department fields as accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentPayload {
    /// The department name.
    pub name: String,
    /// The academic year label, e.g. `"2025-2026"`.
    pub academic_year: String,
    /// Number of practical batches per year.
    pub num_branches: u8,
    /// Full-class headcount.
    pub class_size: u32,
}

/// Teacher fields as accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherPayload {
    /// Short unique code, normalized to uppercase on save.
    pub code: String,
    /// The teacher's full name.
    pub name: String,
    /// Optional specialization hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

/// Room fields as accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPayload {
    /// Unique room number.
    pub number: String,
    /// Seating capacity.
    pub capacity: u32,
    /// `"classroom"`, `"lecture_hall"`, `"lab"`, or `"computer_lab"`.
    pub kind: String,
}

/// Subject fields as accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPayload {
    /// Short unique code, normalized to uppercase on save.
    pub code: String,
    /// The subject's full name.
    pub name: String,
    /// The owning department.
    pub department_id: i64,
    /// `"SE"`, `"TE"`, or `"BE"`.
    pub year: String,
    /// `"lecture"` or `"practical"`.
    pub kind: String,
    /// Optional pinned teacher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
    /// Weekly occurrences override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences_per_week: Option<u8>,
}
