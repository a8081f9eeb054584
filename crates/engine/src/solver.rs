// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::constraints::{ConstraintConfig, required_headcount, specialization_matches};
use crate::error::EngineError;
use crate::ledger::{LedgerOverlay, OccupancyLedger, Placement};
use crate::snapshot::DepartmentSnapshot;
use tabula_domain::{
    Cell, Day, Room, Section, SectionGrid, SlotGrid, Subject, SubjectKind, Teacher, Year,
};
use tracing::trace;

/// The solver's working view of one section grid.
///
/// Cells are addressed as `[day index][slot index]`, where slot indices
/// refer to the full [`SlotGrid`] (breaks included, but never placed into).
#[derive(Debug, Clone)]
pub(crate) struct SectionState {
    cells: Vec<Vec<Option<PlacedCell>>>,
}

/// Codes of the entities placed into one cell.
#[derive(Debug, Clone)]
pub(crate) struct PlacedCell {
    pub(crate) subject: String,
    pub(crate) teacher: String,
    pub(crate) room: String,
}

impl SectionState {
    pub(crate) fn new(grid: &SlotGrid) -> Self {
        Self {
            cells: vec![vec![None; grid.slots().len()]; Day::ALL.len()],
        }
    }

    pub(crate) fn is_free(&self, day_idx: usize, slot_idx: usize) -> bool {
        self.cells[day_idx][slot_idx].is_none()
    }

    fn place(&mut self, day_idx: usize, slot_idx: usize, cell: PlacedCell) {
        self.cells[day_idx][slot_idx] = Some(cell);
    }

    fn clear(&mut self, day_idx: usize, slot_idx: usize) {
        self.cells[day_idx][slot_idx] = None;
    }

    /// Number of placements already made on a day.
    fn day_load(&self, day_idx: usize) -> usize {
        self.cells[day_idx].iter().filter(|c| c.is_some()).count()
    }

    /// How often a subject already appears on a day.
    fn subject_count_on_day(&self, day_idx: usize, subject_code: &str) -> usize {
        self.cells[day_idx]
            .iter()
            .filter(|c| c.as_ref().is_some_and(|p| p.subject == subject_code))
            .count()
    }

    /// Whether the subject sits in an immediately adjacent slot.
    fn has_adjacent(&self, day_idx: usize, slot_idx: usize, subject_code: &str) -> bool {
        let row: &[Option<PlacedCell>] = &self.cells[day_idx];
        let before: bool = slot_idx > 0
            && row[slot_idx - 1]
                .as_ref()
                .is_some_and(|p| p.subject == subject_code);
        let after: bool = row
            .get(slot_idx + 1)
            .and_then(Option::as_ref)
            .is_some_and(|p| p.subject == subject_code);
        before || after
    }

    /// Converts the solved state into a document section grid.
    ///
    /// Break cells are prefilled by [`SectionGrid::empty`]; placed cells
    /// become lectures for `Main` and practicals for a batch.
    pub(crate) fn into_section_grid(
        self,
        grid: &SlotGrid,
        section: Section,
    ) -> Result<SectionGrid, EngineError> {
        let mut out: SectionGrid = SectionGrid::empty(grid);
        for (day_idx, day) in Day::ALL.iter().enumerate() {
            for (slot_idx, placed) in self.cells[day_idx].iter().enumerate() {
                let Some(placed) = placed else { continue };
                let label: &str =
                    grid.label(slot_idx)
                        .ok_or_else(|| EngineError::AssemblyInvariant {
                            detail: format!("slot index {slot_idx} out of grid range"),
                        })?;
                let cell: Cell = match section {
                    Section::Main => Cell::Lecture {
                        subject: placed.subject.clone(),
                        teacher: placed.teacher.clone(),
                        room: placed.room.clone(),
                    },
                    Section::Batch(_) => Cell::Practical {
                        subject: placed.subject.clone(),
                        teacher: placed.teacher.clone(),
                        room: placed.room.clone(),
                        batch: section.key(),
                    },
                };
                out.set_cell(*day, label, cell)?;
            }
        }
        Ok(out)
    }
}

/// One required placement: the n-th weekly occurrence of a subject.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Demand<'a> {
    pub(crate) subject: &'a Subject,
    pub(crate) occurrence: u8,
}

/// Expands a section's subjects into individual occurrence demands.
///
/// `Main` schedules the year's lectures, a batch schedules its practicals.
/// Demand order follows subject identifier order, occurrences ascending,
/// which keeps the search deterministic.
pub(crate) fn build_demands(
    snapshot: &DepartmentSnapshot,
    year: Year,
    section: Section,
) -> Vec<Demand<'_>> {
    let mut demands: Vec<Demand<'_>> = Vec::new();
    for subject in snapshot.subjects_for_year(year) {
        let wanted: bool = if section.is_batch() {
            subject.kind == SubjectKind::Practical
        } else {
            subject.kind == SubjectKind::Lecture
        };
        if !wanted {
            continue;
        }
        for occurrence in 1..=subject.weekly_occurrences() {
            demands.push(Demand {
                subject,
                occurrence,
            });
        }
    }
    demands
}

/// The outcome of a successful section search.
pub(crate) struct SectionSolution {
    pub(crate) state: SectionState,
    pub(crate) placements: Vec<Placement>,
}

struct SearchCtx<'a> {
    grid: &'a SlotGrid,
    year: Year,
    section: Section,
    demands: &'a [Demand<'a>],
    main_state: Option<&'a SectionState>,
    config: &'a ConstraintConfig,
    headcount: u32,
    teachers: Vec<(i64, &'a Teacher)>,
    rooms: Vec<(i64, &'a Room)>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    teacher_idx: usize,
    room_idx: usize,
    day_idx: usize,
    slot_idx: usize,
    score: i32,
}

/// Solves one section with backtracking over its occurrence demands.
///
/// Overload that can never fit is rejected by pigeonhole counting before
/// the search starts, so it is proven infeasible instead of exhausting the
/// step budget. Candidates for each demand are enumerated room, day, slot,
/// teacher in stable input order, then stably sorted by soft score
/// descending, so identical inputs always explore the same tree.
///
/// # Errors
///
/// * `EngineError::InfeasibleSchedule` naming the first demand that cannot
///   fit, or the deepest demand for which every candidate failed
/// * `EngineError::StepBudgetExhausted` when the shared budget runs out
pub(crate) fn solve_section(
    snapshot: &DepartmentSnapshot,
    grid: &SlotGrid,
    year: Year,
    section: Section,
    demands: &[Demand<'_>],
    main_state: Option<&SectionState>,
    ledger: &OccupancyLedger,
    config: &ConstraintConfig,
    steps: &mut u64,
) -> Result<SectionSolution, EngineError> {
    if let Some(failed) = overloaded_demand(grid, demands, main_state, config) {
        return Err(EngineError::InfeasibleSchedule {
            year,
            section: section.key(),
            subject: failed.subject.code.clone(),
            occurrence: failed.occurrence,
        });
    }

    let ctx: SearchCtx<'_> = SearchCtx {
        grid,
        year,
        section,
        demands,
        main_state,
        config,
        headcount: required_headcount(snapshot.department(), section),
        teachers: snapshot
            .teachers()
            .iter()
            .filter_map(|t| t.id.map(|id| (id, t)))
            .collect(),
        rooms: snapshot
            .rooms()
            .iter()
            .filter_map(|r| r.id.map(|id| (id, r)))
            .collect(),
    };

    let mut state: SectionState = SectionState::new(grid);
    let mut overlay: LedgerOverlay<'_> = LedgerOverlay::new(ledger);
    let mut deepest: usize = 0;

    if place(&ctx, 0, &mut state, &mut overlay, steps, &mut deepest)? {
        trace!(
            year = %year,
            section = %section,
            placements = overlay.len(),
            "section solved"
        );
        return Ok(SectionSolution {
            state,
            placements: overlay.into_placements(),
        });
    }

    let failed: &Demand<'_> = &demands[deepest.min(demands.len().saturating_sub(1))];
    Err(EngineError::InfeasibleSchedule {
        year,
        section: section.key(),
        subject: failed.subject.code.clone(),
        occurrence: failed.occurrence,
    })
}

/// Pigeonhole check: the first demand that cannot fit by counting alone.
///
/// A subject's occurrences are capped at one per day times the repeat cap,
/// and a section cannot hold more demands than it has assignable cells
/// (minus the cells the `Main` grid already occupies, for a batch).
fn overloaded_demand<'a>(
    grid: &SlotGrid,
    demands: &'a [Demand<'a>],
    main_state: Option<&SectionState>,
    config: &ConstraintConfig,
) -> Option<&'a Demand<'a>> {
    let per_subject_cap: usize = usize::from(config.max_daily_repeats) * Day::ALL.len();
    if let Some(capped) = demands
        .iter()
        .find(|d| usize::from(d.occurrence) > per_subject_cap)
    {
        return Some(capped);
    }

    let free_cells: usize = Day::ALL
        .iter()
        .enumerate()
        .map(|(day_idx, _)| {
            grid.assignable()
                .filter(|(slot_idx, _)| {
                    main_state.is_none_or(|main| main.is_free(day_idx, *slot_idx))
                })
                .count()
        })
        .sum();
    demands.get(free_cells)
}

fn place(
    ctx: &SearchCtx<'_>,
    idx: usize,
    state: &mut SectionState,
    overlay: &mut LedgerOverlay<'_>,
    steps: &mut u64,
    deepest: &mut usize,
) -> Result<bool, EngineError> {
    let Some(demand) = ctx.demands.get(idx) else {
        return Ok(true);
    };

    let candidates: Vec<Candidate> = enumerate_candidates(ctx, demand, state, overlay);
    for candidate in candidates {
        if *steps == 0 {
            return Err(EngineError::StepBudgetExhausted {
                budget: ctx.config.step_budget,
            });
        }
        *steps -= 1;

        let (teacher_id, teacher) = ctx.teachers[candidate.teacher_idx];
        let (room_id, room) = ctx.rooms[candidate.room_idx];
        let day: Day = Day::ALL[candidate.day_idx];

        state.place(
            candidate.day_idx,
            candidate.slot_idx,
            PlacedCell {
                subject: demand.subject.code.clone(),
                teacher: teacher.code.clone(),
                room: room.number.clone(),
            },
        );
        overlay.push(Placement {
            teacher_id,
            room_id,
            day,
            slot: candidate.slot_idx,
            year: ctx.year,
            section: ctx.section,
            subject_code: demand.subject.code.clone(),
        });

        if place(ctx, idx + 1, state, overlay, steps, deepest)? {
            return Ok(true);
        }

        overlay.pop();
        state.clear(candidate.day_idx, candidate.slot_idx);
    }

    *deepest = (*deepest).max(idx);
    Ok(false)
}

/// Enumerates every admissible candidate for one demand, best-scored first.
fn enumerate_candidates(
    ctx: &SearchCtx<'_>,
    demand: &Demand<'_>,
    state: &SectionState,
    overlay: &LedgerOverlay<'_>,
) -> Vec<Candidate> {
    let subject: &Subject = demand.subject;
    let mut candidates: Vec<Candidate> = Vec::new();

    for (room_idx, &(room_id, room)) in ctx.rooms.iter().enumerate() {
        if !room.kind.suits(subject.kind) || room.capacity < ctx.headcount {
            continue;
        }
        for (day_idx, day) in Day::ALL.iter().enumerate() {
            if state.subject_count_on_day(day_idx, &subject.code)
                >= usize::from(ctx.config.max_daily_repeats)
            {
                continue;
            }
            let day_penalty: i32 = day_load_penalty(state, day_idx);
            for (slot_idx, _) in ctx.grid.assignable() {
                if !state.is_free(day_idx, slot_idx) {
                    continue;
                }
                if ctx
                    .main_state
                    .is_some_and(|main| !main.is_free(day_idx, slot_idx))
                {
                    continue;
                }
                if overlay.room_busy(room_id, *day, slot_idx) {
                    continue;
                }
                let adjacency_penalty: i32 =
                    if state.has_adjacent(day_idx, slot_idx, &subject.code) {
                        -2
                    } else {
                        0
                    };
                for (teacher_idx, &(teacher_id, teacher)) in ctx.teachers.iter().enumerate() {
                    if overlay.teacher_busy(teacher_id, *day, slot_idx) {
                        continue;
                    }
                    let mut score: i32 = day_penalty + adjacency_penalty;
                    if subject.teacher_id == Some(teacher_id) {
                        score += 4;
                    }
                    if specialization_matches(teacher, subject) {
                        score += 2;
                    }
                    candidates.push(Candidate {
                        teacher_idx,
                        room_idx,
                        day_idx,
                        slot_idx,
                        score,
                    });
                }
            }
        }
    }

    // Stable sort preserves enumeration order between equal scores.
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates
}

#[allow(clippy::cast_possible_wrap)]
fn day_load_penalty(state: &SectionState, day_idx: usize) -> i32 {
    -(state.day_load(day_idx) as i32)
}
