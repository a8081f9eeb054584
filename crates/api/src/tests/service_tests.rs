// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ApiError;
use crate::guard::GenerationGuard;
use crate::request_response::{
    DepartmentPayload, GenerateTimetableRequest, RoomPayload, SubjectPayload, TeacherPayload,
};
use crate::service::{
    create_department, create_room, create_subject, create_teacher, generate_timetable,
};
use crate::tests::helpers::seeded_store;
use std::sync::Arc;
use tabula_domain::{DomainError, TimetableDocument};
use tabula_engine::EngineError;
use tabula_persistence::SqliteStore;

fn request(department_id: i64) -> GenerateTimetableRequest {
    GenerateTimetableRequest {
        department_id,
        academic_year: String::from("2025-2026"),
        day_start_time: None,
        day_end_time: None,
    }
}

#[test]
fn test_create_department_validates_fields() {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    let payload: DepartmentPayload = DepartmentPayload {
        name: String::new(),
        academic_year: String::from("2025-2026"),
        num_branches: 3,
        class_size: 72,
    };
    assert!(matches!(
        create_department(&store, &payload),
        Err(ApiError::Domain(DomainError::EmptyField { field: "name" }))
    ));
}

#[test]
fn test_create_room_rejects_unknown_kind() {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    let payload: RoomPayload = RoomPayload {
        number: String::from("204"),
        capacity: 60,
        kind: String::from("auditorium"),
    };
    assert!(matches!(
        create_room(&store, &payload),
        Err(ApiError::Domain(DomainError::InvalidRoomKind(_)))
    ));
}

#[test]
fn test_duplicate_teacher_code_maps_to_duplicate() {
    let (store, _) = seeded_store();
    let payload: TeacherPayload = TeacherPayload {
        code: String::from("sbr"),
        name: String::from("Someone Else"),
        specialization: None,
    };
    assert!(matches!(
        create_teacher(&store, &payload),
        Err(ApiError::Duplicate {
            entity: "teacher",
            ..
        })
    ));
}

#[test]
fn test_create_subject_requires_existing_pinned_teacher() {
    let (store, dept_id) = seeded_store();
    let payload: SubjectPayload = SubjectPayload {
        code: String::from("DL"),
        name: String::from("Deep Learning"),
        department_id: dept_id,
        year: String::from("SE"),
        kind: String::from("lecture"),
        teacher_id: Some(999),
        occurrences_per_week: None,
    };
    assert!(matches!(
        create_subject(&store, &payload),
        Err(ApiError::NotFound {
            entity: "teacher",
            id: 999
        })
    ));
}

#[test]
fn test_generate_stores_and_returns_document() {
    let (store, dept_id) = seeded_store();
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());

    let document: TimetableDocument =
        generate_timetable(&store, &guard, &request(dept_id)).unwrap();
    assert!(document.id.is_some());
    assert!(document.populated_cells().count() > 0);

    // Stored under the requested academic year, replacing on rerun.
    let stored: TimetableDocument = store
        .find_timetable(dept_id, "2025-2026")
        .unwrap()
        .unwrap();
    assert_eq!(stored, document);

    let rerun: TimetableDocument =
        generate_timetable(&store, &guard, &request(dept_id)).unwrap();
    assert_eq!(rerun.id, document.id);
}

#[test]
fn test_generate_stores_under_requested_academic_year() {
    let (store, dept_id) = seeded_store();
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());

    let next_year: GenerateTimetableRequest = GenerateTimetableRequest {
        academic_year: String::from("2026-2027"),
        ..request(dept_id)
    };
    let document: TimetableDocument = generate_timetable(&store, &guard, &next_year).unwrap();
    assert_eq!(document.academic_year, "2026-2027");

    // A separate row from the department's configured year.
    assert!(store.find_timetable(dept_id, "2026-2027").unwrap().is_some());
    assert!(store.find_timetable(dept_id, "2025-2026").unwrap().is_none());
}

#[test]
fn test_generate_unknown_department_is_not_found() {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());
    assert!(matches!(
        generate_timetable(&store, &guard, &request(42)),
        Err(ApiError::NotFound {
            entity: "department",
            id: 42
        })
    ));
}

#[test]
fn test_generate_without_subjects_is_rejected() {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    let dept_id: i64 = store
        .create_department(&tabula_domain::Department::new(
            String::from("Empty"),
            String::from("2025-2026"),
            2,
            60,
        ))
        .unwrap()
        .id
        .unwrap();
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());

    let err: ApiError = generate_timetable(&store, &guard, &request(dept_id)).unwrap_err();
    assert_eq!(err, ApiError::Engine(EngineError::NoSubjects));
    assert_eq!(err.kind(), "validation");
}

#[test]
fn test_generation_permit_blocks_second_run() {
    let (store, dept_id) = seeded_store();
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());

    let held = guard.try_acquire(dept_id, "2025-2026").unwrap();
    let err: ApiError = generate_timetable(&store, &guard, &request(dept_id)).unwrap_err();
    assert!(matches!(err, ApiError::GenerationInProgress { .. }));
    assert_eq!(err.kind(), "generation_in_progress");

    drop(held);
    assert!(generate_timetable(&store, &guard, &request(dept_id)).is_ok());
}

#[test]
fn test_generate_failure_releases_permit() {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    let dept_id: i64 = store
        .create_department(&tabula_domain::Department::new(
            String::from("Empty"),
            String::from("2025-2026"),
            2,
            60,
        ))
        .unwrap()
        .id
        .unwrap();
    let guard: Arc<GenerationGuard> = Arc::new(GenerationGuard::new());

    assert!(generate_timetable(&store, &guard, &request(dept_id)).is_err());
    // The pair is free again despite the failure.
    assert!(guard.try_acquire(dept_id, "2025-2026").is_some());
}
