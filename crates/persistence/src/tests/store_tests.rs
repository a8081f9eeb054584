// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::store::SqliteStore;
use tabula_domain::{Department, Room, RoomKind, Subject, SubjectKind, Teacher, Year};

fn store() -> SqliteStore {
    SqliteStore::new_in_memory().unwrap()
}

fn department() -> Department {
    Department::new(String::from("Computer"), String::from("2025-2026"), 3, 72)
}

#[test]
fn test_department_crud_round_trip() {
    let store: SqliteStore = store();

    let created: Department = store.create_department(&department()).unwrap();
    let id: i64 = created.id.unwrap();
    assert_eq!(created.name, "Computer");

    let fetched: Department = store.get_department(id).unwrap();
    assert_eq!(fetched, created);

    let mut updated: Department = fetched;
    updated.class_size = 80;
    let saved: Department = store.update_department(id, &updated).unwrap();
    assert_eq!(saved.class_size, 80);

    assert_eq!(store.list_departments().unwrap().len(), 1);
    store.delete_department(id).unwrap();
    assert!(store.list_departments().unwrap().is_empty());
}

#[test]
fn test_get_missing_department_is_not_found() {
    assert!(matches!(
        store().get_department(42),
        Err(PersistenceError::NotFound {
            entity: "department",
            id: 42
        })
    ));
}

#[test]
fn test_duplicate_teacher_code_is_rejected() {
    let store: SqliteStore = store();
    store
        .create_teacher(&Teacher::new("SBR", String::from("S. Raskar"), None))
        .unwrap();

    let err: PersistenceError = store
        .create_teacher(&Teacher::new("SBR", String::from("Someone Else"), None))
        .unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::DuplicateValue {
            entity: "teacher",
            ..
        }
    ));
}

#[test]
fn test_duplicate_room_number_is_rejected() {
    let store: SqliteStore = store();
    store
        .create_room(&Room::new(String::from("204"), 60, RoomKind::Classroom))
        .unwrap();

    assert!(matches!(
        store.create_room(&Room::new(String::from("204"), 40, RoomKind::Lab)),
        Err(PersistenceError::DuplicateValue { entity: "room", .. })
    ));
}

#[test]
fn test_room_kind_round_trips_through_storage() {
    let store: SqliteStore = store();
    let created: Room = store
        .create_room(&Room::new(String::from("LAB-2"), 30, RoomKind::ComputerLab))
        .unwrap();

    let fetched: Room = store.get_room(created.id.unwrap()).unwrap();
    assert_eq!(fetched.kind, RoomKind::ComputerLab);
}

#[test]
fn test_subject_round_trips_through_storage() {
    let store: SqliteStore = store();
    let dept: Department = store.create_department(&department()).unwrap();
    let teacher: Teacher = store
        .create_teacher(&Teacher::new("SBR", String::from("S. Raskar"), None))
        .unwrap();

    let subject: Subject = Subject::new(
        "ml",
        String::from("Machine Learning"),
        dept.id.unwrap(),
        Year::BE,
        SubjectKind::Lecture,
        teacher.id,
        Some(4),
    );
    let created: Subject = store.create_subject(&subject).unwrap();
    assert_eq!(created.code, "ML");

    let fetched: Subject = store.get_subject(created.id.unwrap()).unwrap();
    assert_eq!(fetched.year, Year::BE);
    assert_eq!(fetched.kind, SubjectKind::Lecture);
    assert_eq!(fetched.teacher_id, teacher.id);
    assert_eq!(fetched.occurrences_per_week, Some(4));

    let for_dept: Vec<Subject> = store
        .list_subjects_for_department(dept.id.unwrap())
        .unwrap();
    assert_eq!(for_dept.len(), 1);
    assert!(store.list_subjects_for_department(999).unwrap().is_empty());
}

#[test]
fn test_deleting_teacher_unpins_subjects() {
    let store: SqliteStore = store();
    let dept: Department = store.create_department(&department()).unwrap();
    let teacher: Teacher = store
        .create_teacher(&Teacher::new("SBR", String::from("S. Raskar"), None))
        .unwrap();
    let subject: Subject = store
        .create_subject(&Subject::new(
            "ML",
            String::from("Machine Learning"),
            dept.id.unwrap(),
            Year::BE,
            SubjectKind::Lecture,
            teacher.id,
            None,
        ))
        .unwrap();

    store.delete_teacher(teacher.id.unwrap()).unwrap();
    let fetched: Subject = store.get_subject(subject.id.unwrap()).unwrap();
    assert_eq!(fetched.teacher_id, None);
}

#[test]
fn test_update_missing_room_is_not_found() {
    let store: SqliteStore = store();
    let room: Room = Room::new(String::from("204"), 60, RoomKind::Classroom);
    assert!(matches!(
        store.update_room(7, &room),
        Err(PersistenceError::NotFound { entity: "room", id: 7 })
    ));
}
