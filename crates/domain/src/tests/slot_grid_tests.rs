// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::slot_grid::{SlotGrid, default_breaks};

#[test]
fn test_standard_grid_matches_published_layout() {
    let grid: SlotGrid = SlotGrid::standard().unwrap();

    let labels: Vec<&str> = grid.slots().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "9:00 am - 10:00 am",
            "10:00 am - 11:00 am",
            "11:00 am - 11:15 am",
            "11:15 am - 12:15 pm",
            "12:15 pm - 1:15 pm",
            "1:15 pm - 1:45 pm",
            "1:45 pm - 2:45 pm",
            "2:45 pm - 3:45 pm",
            "3:45 pm - 4:45 pm",
        ]
    );
}

#[test]
fn test_standard_grid_marks_breaks() {
    let grid: SlotGrid = SlotGrid::standard().unwrap();

    let break_labels: Vec<&str> = grid
        .slots()
        .iter()
        .filter(|s| s.is_break)
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(
        break_labels,
        vec!["11:00 am - 11:15 am", "1:15 pm - 1:45 pm"]
    );
    assert_eq!(grid.assignable_count(), 7);
}

#[test]
fn test_end_before_start_is_rejected() {
    let result = SlotGrid::build("3:00 pm", "9:00 am", &default_breaks());

    assert!(matches!(result, Err(DomainError::InvalidTimeRange { .. })));
}

#[test]
fn test_end_equal_to_start_is_rejected() {
    let result = SlotGrid::build("9:00 am", "9:00 am", &default_breaks());

    assert!(matches!(result, Err(DomainError::InvalidTimeRange { .. })));
}

#[test]
fn test_range_too_short_for_one_slot_is_rejected() {
    let result = SlotGrid::build("9:00 am", "9:30 am", &default_breaks());

    assert!(matches!(result, Err(DomainError::GridTooSmall { .. })));
}

#[test]
fn test_unparseable_time_is_rejected() {
    let result = SlotGrid::build("nine o'clock", "4:45 pm", &default_breaks());

    assert!(matches!(result, Err(DomainError::InvalidTimeFormat { .. })));
}

#[test]
fn test_grid_without_breaks_is_plain_hour_slots() {
    let grid: SlotGrid = SlotGrid::build("9:00 am", "3:00 pm", &[]).unwrap();

    assert_eq!(grid.slots().len(), 6);
    assert!(grid.slots().iter().all(|s| !s.is_break));
    assert_eq!(grid.slots()[0].label, "9:00 am - 10:00 am");
    assert_eq!(grid.slots()[5].label, "2:00 pm - 3:00 pm");
}

#[test]
fn test_trailing_partial_slot_is_dropped() {
    let grid: SlotGrid = SlotGrid::build("9:00 am", "10:30 am", &[]).unwrap();

    assert_eq!(grid.slots().len(), 1);
    assert_eq!(grid.slots()[0].label, "9:00 am - 10:00 am");
}

#[test]
fn test_identical_inputs_produce_identical_grids() {
    let first: SlotGrid = SlotGrid::standard().unwrap();
    let second: SlotGrid = SlotGrid::standard().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_slot_index_round_trips_labels() {
    let grid: SlotGrid = SlotGrid::standard().unwrap();

    for (idx, slot) in grid.slots().iter().enumerate() {
        assert_eq!(grid.slot_index(&slot.label), Some(idx));
        assert_eq!(grid.label(idx), Some(slot.label.as_str()));
    }
    assert_eq!(grid.slot_index("5:00 am - 6:00 am"), None);
}
