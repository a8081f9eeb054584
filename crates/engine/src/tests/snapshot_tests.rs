// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::EngineError;
use crate::snapshot::DepartmentSnapshot;
use tabula_domain::{Department, Room, RoomKind, Subject, SubjectKind, Teacher, Year};

fn department() -> Department {
    Department::with_id(1, String::from("Computer"), String::from("2025-2026"), 2, 60)
}

fn teachers() -> Vec<Teacher> {
    vec![
        Teacher::with_id(1, "SBR", String::from("S. Raskar"), None),
        Teacher::with_id(2, "SJN", String::from("S. Jain"), None),
    ]
}

fn rooms() -> Vec<Room> {
    vec![
        Room::with_id(1, String::from("204"), 60, RoomKind::Classroom),
        Room::with_id(2, String::from("LAB-2"), 30, RoomKind::Lab),
    ]
}

fn lecture(id: i64, code: &str) -> Subject {
    Subject::with_id(
        id,
        code,
        String::from("Machine Learning"),
        1,
        Year::SE,
        SubjectKind::Lecture,
        None,
        None,
    )
}

#[test]
fn test_valid_snapshot_sorts_by_id() {
    let unsorted: Vec<Teacher> = vec![
        Teacher::with_id(2, "SJN", String::from("S. Jain"), None),
        Teacher::with_id(1, "SBR", String::from("S. Raskar"), None),
    ];
    let snapshot: DepartmentSnapshot =
        DepartmentSnapshot::new(department(), unsorted, rooms(), vec![lecture(1, "ML")]).unwrap();

    let codes: Vec<&str> = snapshot.teachers().iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes, vec!["SBR", "SJN"]);
}

#[test]
fn test_missing_entity_lists_are_rejected() {
    assert!(matches!(
        DepartmentSnapshot::new(department(), teachers(), rooms(), vec![]),
        Err(EngineError::NoSubjects)
    ));
    assert!(matches!(
        DepartmentSnapshot::new(department(), vec![], rooms(), vec![lecture(1, "ML")]),
        Err(EngineError::NoTeachers)
    ));
    assert!(matches!(
        DepartmentSnapshot::new(department(), teachers(), vec![], vec![lecture(1, "ML")]),
        Err(EngineError::NoRooms)
    ));
}

#[test]
fn test_duplicate_teacher_code_is_rejected() {
    let dupes: Vec<Teacher> = vec![
        Teacher::with_id(1, "SBR", String::from("S. Raskar"), None),
        Teacher::with_id(2, "sbr", String::from("Other"), None),
    ];
    let err: EngineError =
        DepartmentSnapshot::new(department(), dupes, rooms(), vec![lecture(1, "ML")]).unwrap_err();
    assert!(matches!(
        err,
        EngineError::DuplicateCode {
            entity: "teacher",
            ..
        }
    ));
}

#[test]
fn test_foreign_subject_is_rejected() {
    let mut subject: Subject = lecture(1, "ML");
    subject.department_id = 99;
    assert!(matches!(
        DepartmentSnapshot::new(department(), teachers(), rooms(), vec![subject]),
        Err(EngineError::ForeignSubject {
            department_id: 99,
            ..
        })
    ));
}

#[test]
fn test_dangling_pinned_teacher_is_rejected() {
    let mut subject: Subject = lecture(1, "ML");
    subject.teacher_id = Some(99);
    assert!(matches!(
        DepartmentSnapshot::new(department(), teachers(), rooms(), vec![subject]),
        Err(EngineError::UnknownPinnedTeacher { teacher_id: 99, .. })
    ));
}

#[test]
fn test_entity_without_id_is_rejected() {
    let unsaved: Vec<Teacher> = vec![Teacher::new("SBR", String::from("S. Raskar"), None)];
    assert!(matches!(
        DepartmentSnapshot::new(department(), unsaved, rooms(), vec![lecture(1, "ML")]),
        Err(EngineError::MissingEntityId {
            entity: "teacher",
            ..
        })
    ));
}

#[test]
fn test_subjects_for_year_filters() {
    let mut be_subject: Subject = lecture(2, "DL");
    be_subject.year = Year::BE;
    let snapshot: DepartmentSnapshot = DepartmentSnapshot::new(
        department(),
        teachers(),
        rooms(),
        vec![lecture(1, "ML"), be_subject],
    )
    .unwrap();

    assert_eq!(snapshot.subjects_for_year(Year::SE).count(), 1);
    assert_eq!(snapshot.subjects_for_year(Year::BE).count(), 1);
    assert_eq!(snapshot.subjects_for_year(Year::TE).count(), 0);
}
