// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application service layer for Tabula.
//!
//! Sits between the `HTTP` server and the engine/persistence crates:
//! request validation, generation orchestration (including the one-run-per
//! department guard), timetable import checks, and the formatted view used
//! by timetable viewers.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod format;
mod guard;
mod import;
mod request_response;
mod service;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::{ApiError, translate_persistence_error};
pub use format::{FormattedTimetable, format_document, formatted_sections};
pub use guard::{GenerationGuard, GenerationPermit};
pub use import::validate_import;
pub use request_response::{
    DepartmentPayload, GenerateTimetableRequest, ImportTimetableRequest, RoomPayload,
    SubjectPayload, TeacherPayload,
};
pub use service::{
    acquire_generation_permit, create_department, create_room, create_subject, create_teacher,
    delete_department, delete_room, delete_subject, delete_teacher, generate_timetable,
    import_timetable, load_generation_snapshot, run_generation, store_generated_document,
    update_department, update_room, update_subject, update_teacher,
};
