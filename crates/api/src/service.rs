// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity operations and generation orchestration.
//!
//! Every mutation validates domain rules before touching the store, so
//! the store never sees an entity the domain would reject.

use crate::error::{ApiError, translate_persistence_error};
use crate::guard::{GenerationGuard, GenerationPermit};
use crate::import::validate_import;
use crate::request_response::{
    DepartmentPayload, GenerateTimetableRequest, ImportTimetableRequest, RoomPayload,
    SubjectPayload, TeacherPayload,
};
use std::str::FromStr;
use std::sync::Arc;
use tabula_domain::{
    Department, Room, RoomKind, Subject, SubjectKind, Teacher, TimetableDocument, Year,
    validate_department, validate_room, validate_subject, validate_teacher,
};
use tabula_engine::{DepartmentSnapshot, GenerateOptions, generate};
use tabula_persistence::SqliteStore;
use tracing::info;

/// Creates a department after domain validation.
///
/// # Errors
///
/// Returns `ApiError::Domain` for invalid fields, `ApiError::Internal` on
/// store failure.
pub fn create_department(
    store: &SqliteStore,
    payload: &DepartmentPayload,
) -> Result<Department, ApiError> {
    let department: Department = department_from_payload(payload);
    validate_department(&department)?;
    store
        .create_department(&department)
        .map_err(translate_persistence_error)
}

/// Replaces a department's fields after domain validation.
///
/// # Errors
///
/// Returns `ApiError::Domain`, `ApiError::NotFound`, or `ApiError::Internal`.
pub fn update_department(
    store: &SqliteStore,
    id: i64,
    payload: &DepartmentPayload,
) -> Result<Department, ApiError> {
    let department: Department = department_from_payload(payload);
    validate_department(&department)?;
    store
        .update_department(id, &department)
        .map_err(translate_persistence_error)
}

/// Deletes a department.
///
/// # Errors
///
/// Returns `ApiError::ReferencedByTimetable` if the department owns a
/// stored timetable, `ApiError::NotFound` if it does not exist.
pub fn delete_department(store: &SqliteStore, id: i64) -> Result<(), ApiError> {
    store
        .delete_department(id)
        .map_err(translate_persistence_error)
}

/// Creates a teacher after domain validation.
///
/// # Errors
///
/// Returns `ApiError::Domain`, `ApiError::Duplicate`, or `ApiError::Internal`.
pub fn create_teacher(
    store: &SqliteStore,
    payload: &TeacherPayload,
) -> Result<Teacher, ApiError> {
    let teacher: Teacher = Teacher::new(
        &payload.code,
        payload.name.clone(),
        payload.specialization.clone(),
    );
    validate_teacher(&teacher)?;
    store
        .create_teacher(&teacher)
        .map_err(translate_persistence_error)
}

/// Replaces a teacher's fields after domain validation.
///
/// # Errors
///
/// Returns `ApiError::Domain`, `ApiError::Duplicate`, `ApiError::NotFound`,
/// or `ApiError::Internal`.
pub fn update_teacher(
    store: &SqliteStore,
    id: i64,
    payload: &TeacherPayload,
) -> Result<Teacher, ApiError> {
    let teacher: Teacher = Teacher::new(
        &payload.code,
        payload.name.clone(),
        payload.specialization.clone(),
    );
    validate_teacher(&teacher)?;
    store
        .update_teacher(id, &teacher)
        .map_err(translate_persistence_error)
}

/// Deletes a teacher, unpinning any subjects that referenced it.
///
/// # Errors
///
/// Returns `ApiError::ReferencedByTimetable` if the teacher appears in a
/// stored timetable.
pub fn delete_teacher(store: &SqliteStore, id: i64) -> Result<(), ApiError> {
    store.delete_teacher(id).map_err(translate_persistence_error)
}

/// Creates a room after domain validation.
///
/// # Errors
///
/// Returns `ApiError::Domain`, `ApiError::Duplicate`, or `ApiError::Internal`.
pub fn create_room(store: &SqliteStore, payload: &RoomPayload) -> Result<Room, ApiError> {
    let room: Room = room_from_payload(payload)?;
    validate_room(&room)?;
    store.create_room(&room).map_err(translate_persistence_error)
}

/// Replaces a room's fields after domain validation.
///
/// # Errors
///
/// Returns `ApiError::Domain`, `ApiError::Duplicate`, `ApiError::NotFound`,
/// or `ApiError::Internal`.
pub fn update_room(store: &SqliteStore, id: i64, payload: &RoomPayload) -> Result<Room, ApiError> {
    let room: Room = room_from_payload(payload)?;
    validate_room(&room)?;
    store
        .update_room(id, &room)
        .map_err(translate_persistence_error)
}

/// Deletes a room.
///
/// # Errors
///
/// Returns `ApiError::ReferencedByTimetable` if the room appears in a
/// stored timetable.
pub fn delete_room(store: &SqliteStore, id: i64) -> Result<(), ApiError> {
    store.delete_room(id).map_err(translate_persistence_error)
}

/// Creates a subject after domain validation and reference checks.
///
/// # Errors
///
/// Returns `ApiError::Domain`, `ApiError::NotFound` for a dangling
/// department or pinned teacher, `ApiError::Duplicate`, or
/// `ApiError::Internal`.
pub fn create_subject(
    store: &SqliteStore,
    payload: &SubjectPayload,
) -> Result<Subject, ApiError> {
    let subject: Subject = subject_from_payload(store, payload)?;
    store
        .create_subject(&subject)
        .map_err(translate_persistence_error)
}

/// Replaces a subject's fields after domain validation and reference
/// checks.
///
/// # Errors
///
/// Returns `ApiError::Domain`, `ApiError::NotFound`, `ApiError::Duplicate`,
/// or `ApiError::Internal`.
pub fn update_subject(
    store: &SqliteStore,
    id: i64,
    payload: &SubjectPayload,
) -> Result<Subject, ApiError> {
    let subject: Subject = subject_from_payload(store, payload)?;
    store
        .update_subject(id, &subject)
        .map_err(translate_persistence_error)
}

/// Deletes a subject.
///
/// # Errors
///
/// Returns `ApiError::ReferencedByTimetable` if the subject appears in a
/// stored timetable.
pub fn delete_subject(store: &SqliteStore, id: i64) -> Result<(), ApiError> {
    store.delete_subject(id).map_err(translate_persistence_error)
}

/// Generates, stores, and returns the timetable for one department.
///
/// The document is generated and stored under the academic year named in
/// the request, which may differ from the year currently configured on the
/// department row. The generation permit is claimed before the store is
/// touched and held for the duration of the run; a concurrent request for
/// the same department and academic year gets `GenerationInProgress`
/// instead of queuing.
///
/// Callers that hold the store behind a lock can compose the pieces
/// directly: [`acquire_generation_permit`], [`load_generation_snapshot`],
/// [`run_generation`] (which needs no store access), and
/// [`store_generated_document`].
///
/// # Errors
///
/// * `ApiError::NotFound` if the department does not exist
/// * `ApiError::GenerationInProgress` if a run is already in flight
/// * `ApiError::Domain` / `ApiError::Engine` for validation and solver
///   failures
pub fn generate_timetable(
    store: &SqliteStore,
    guard: &Arc<GenerationGuard>,
    request: &GenerateTimetableRequest,
) -> Result<TimetableDocument, ApiError> {
    let _permit: GenerationPermit = acquire_generation_permit(guard, request)?;
    let snapshot: DepartmentSnapshot = load_generation_snapshot(store, request)?;
    let document: TimetableDocument = run_generation(&snapshot, request)?;
    store_generated_document(store, &document)
}

/// Claims the in-flight slot for the request's department and academic
/// year.
///
/// # Errors
///
/// Returns `ApiError::GenerationInProgress` if a run already holds the
/// permit for this pair.
pub fn acquire_generation_permit(
    guard: &Arc<GenerationGuard>,
    request: &GenerateTimetableRequest,
) -> Result<GenerationPermit, ApiError> {
    guard
        .try_acquire(request.department_id, &request.academic_year)
        .ok_or_else(|| ApiError::GenerationInProgress {
            department_id: request.department_id,
            academic_year: request.academic_year.clone(),
        })
}

/// Loads and validates everything a generation run reads from the store.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the department does not exist, or the
/// snapshot's validation errors.
pub fn load_generation_snapshot(
    store: &SqliteStore,
    request: &GenerateTimetableRequest,
) -> Result<DepartmentSnapshot, ApiError> {
    let mut department: Department = store
        .get_department(request.department_id)
        .map_err(translate_persistence_error)?;
    department.academic_year = request.academic_year.clone();

    let snapshot: DepartmentSnapshot = DepartmentSnapshot::new(
        department,
        store.list_teachers().map_err(translate_persistence_error)?,
        store.list_rooms().map_err(translate_persistence_error)?,
        store
            .list_subjects_for_department(request.department_id)
            .map_err(translate_persistence_error)?,
    )?;
    Ok(snapshot)
}

/// Runs the solver over a loaded snapshot. Touches no store state, so it
/// can run outside any store lock.
///
/// # Errors
///
/// Returns `ApiError::Domain` / `ApiError::Engine` for grid and solver
/// failures.
pub fn run_generation(
    snapshot: &DepartmentSnapshot,
    request: &GenerateTimetableRequest,
) -> Result<TimetableDocument, ApiError> {
    let options: GenerateOptions = GenerateOptions {
        day_start: request.day_start_time.clone(),
        day_end: request.day_end_time.clone(),
        ..GenerateOptions::default()
    };
    let document: TimetableDocument = generate(snapshot, &options)?;
    Ok(document)
}

/// Persists a generated document, replacing any previous one for the same
/// department and academic year.
///
/// # Errors
///
/// Returns `ApiError::Internal` on store failure.
pub fn store_generated_document(
    store: &SqliteStore,
    document: &TimetableDocument,
) -> Result<TimetableDocument, ApiError> {
    let stored: TimetableDocument = store
        .upsert_timetable(document)
        .map_err(translate_persistence_error)?;
    info!(
        department_id = stored.department_id,
        academic_year = %stored.academic_year,
        sections = stored.timetable.len(),
        "timetable generated and stored"
    );
    Ok(stored)
}

/// Validates and stores an externally authored timetable document.
///
/// # Errors
///
/// Returns the import validation errors of [`validate_import`], or
/// `ApiError::Internal` on store failure.
pub fn import_timetable(
    store: &SqliteStore,
    request: &ImportTimetableRequest,
) -> Result<TimetableDocument, ApiError> {
    let document: TimetableDocument = validate_import(store, request)?;
    let stored: TimetableDocument = store
        .upsert_timetable(&document)
        .map_err(translate_persistence_error)?;
    info!(
        department_id = stored.department_id,
        academic_year = %stored.academic_year,
        "timetable imported"
    );
    Ok(stored)
}

fn department_from_payload(payload: &DepartmentPayload) -> Department {
    Department::new(
        payload.name.clone(),
        payload.academic_year.clone(),
        payload.num_branches,
        payload.class_size,
    )
}

fn room_from_payload(payload: &RoomPayload) -> Result<Room, ApiError> {
    let kind: RoomKind = RoomKind::from_str(&payload.kind)?;
    Ok(Room::new(payload.number.clone(), payload.capacity, kind))
}

fn subject_from_payload(store: &SqliteStore, payload: &SubjectPayload) -> Result<Subject, ApiError> {
    let year: Year = Year::from_str(&payload.year)?;
    let kind: SubjectKind = SubjectKind::from_str(&payload.kind)?;

    // Referenced rows must exist before the store sees the insert.
    store
        .get_department(payload.department_id)
        .map_err(translate_persistence_error)?;
    if let Some(teacher_id) = payload.teacher_id {
        store
            .get_teacher(teacher_id)
            .map_err(translate_persistence_error)?;
    }

    let subject: Subject = Subject::new(
        &payload.code,
        payload.name.clone(),
        payload.department_id,
        year,
        kind,
        payload.teacher_id,
        payload.occurrences_per_week,
    );
    validate_subject(&subject)?;
    Ok(subject)
}
