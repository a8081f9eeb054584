// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assembler::assemble;
use crate::constraints::ConstraintConfig;
use crate::error::EngineError;
use crate::ledger::OccupancyLedger;
use crate::snapshot::DepartmentSnapshot;
use crate::solver::{Demand, SectionSolution, build_demands, solve_section};
use tabula_domain::{
    DEFAULT_DAY_END, DEFAULT_DAY_START, Section, SectionGrid, SlotGrid, TimetableDocument, Year,
    default_breaks,
};
use tracing::{debug, info};

/// Options for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Wall-clock day start, e.g. `"9:00 am"`. Defaults to the standard
    /// grid start.
    pub day_start: Option<String>,
    /// Wall-clock day end, e.g. `"4:45 pm"`. Defaults to the standard grid
    /// end.
    pub day_end: Option<String>,
    /// Solver limits.
    pub config: ConstraintConfig,
}

/// Generates the full timetable document for one department.
///
/// Years are scheduled in fixed order; within a year, the `Main` section
/// solves first and each batch then solves against the `Main` grid and the
/// shared occupancy ledger. Years with no subjects are skipped. Identical
/// snapshots and options always produce an identical document.
///
/// # Errors
///
/// * `EngineError::Domain` for invalid grid bounds
/// * `EngineError::NoSubjects` when no year has any subject
/// * `EngineError::InfeasibleSchedule` when a section cannot be completed
/// * `EngineError::StepBudgetExhausted` when the search budget runs out
/// * `EngineError::AssemblyInvariant` if the merged document is
///   inconsistent, which indicates an engine bug
pub fn generate(
    snapshot: &DepartmentSnapshot,
    options: &GenerateOptions,
) -> Result<TimetableDocument, EngineError> {
    let day_start: &str = options.day_start.as_deref().unwrap_or(DEFAULT_DAY_START);
    let day_end: &str = options.day_end.as_deref().unwrap_or(DEFAULT_DAY_END);
    let grid: SlotGrid = SlotGrid::build(day_start, day_end, &default_breaks())?;

    let department_id: i64 =
        snapshot
            .department()
            .id
            .ok_or_else(|| EngineError::MissingEntityId {
                entity: "department",
                detail: snapshot.department().name.clone(),
            })?;

    info!(
        department = %snapshot.department().name,
        subjects = snapshot.subjects().len(),
        teachers = snapshot.teachers().len(),
        rooms = snapshot.rooms().len(),
        "starting timetable generation"
    );

    let mut ledger: OccupancyLedger = OccupancyLedger::new();
    let mut document: TimetableDocument =
        TimetableDocument::new(department_id, snapshot.department().academic_year.clone());
    let mut steps: u64 = options.config.step_budget;

    for year in Year::ALL {
        if snapshot.subjects_for_year(year).next().is_none() {
            debug!(year = %year, "no subjects, skipping year");
            continue;
        }

        let main_demands: Vec<Demand<'_>> = build_demands(snapshot, year, Section::Main);
        let main: SectionSolution = solve_section(
            snapshot,
            &grid,
            year,
            Section::Main,
            &main_demands,
            None,
            &ledger,
            &options.config,
            &mut steps,
        )?;
        ledger.commit(main.placements);

        let mut batch_grids: Vec<(Section, SectionGrid)> = Vec::new();
        for n in 1..=snapshot.department().num_branches {
            let section: Section = Section::Batch(n);
            let demands: Vec<Demand<'_>> = build_demands(snapshot, year, section);
            let solution: SectionSolution = solve_section(
                snapshot,
                &grid,
                year,
                section,
                &demands,
                Some(&main.state),
                &ledger,
                &options.config,
                &mut steps,
            )?;
            ledger.commit(solution.placements);
            batch_grids.push((section, solution.state.into_section_grid(&grid, section)?));
        }

        document.timetable.insert(
            format!("{year}_{}", Section::Main.key()),
            main.state.into_section_grid(&grid, Section::Main)?,
        );
        for (section, section_grid) in batch_grids {
            document
                .timetable
                .insert(format!("{year}_{}", section.key()), section_grid);
        }
    }

    if document.timetable.is_empty() {
        return Err(EngineError::NoSubjects);
    }

    info!(
        sections = document.timetable.len(),
        placements = ledger.placements().len(),
        steps_used = options.config.step_budget - steps,
        "timetable generation complete"
    );

    assemble(document)
}
