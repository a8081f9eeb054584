// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tabula_domain::{Department, Section, Subject, Teacher};

/// Default cap on how often one subject may appear per day in a section.
pub const DEFAULT_MAX_DAILY_REPEATS: u8 = 1;

/// Default number of candidate attempts before generation gives up.
pub const DEFAULT_STEP_BUDGET: u64 = 200_000;

/// Tunable solver limits.
///
/// The hard constraints themselves are fixed; this only bounds the search
/// and the per-day repetition rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintConfig {
    /// Maximum placements of the same subject per day in one section.
    pub max_daily_repeats: u8,
    /// Candidate attempts allowed before `StepBudgetExhausted`.
    pub step_budget: u64,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            max_daily_repeats: DEFAULT_MAX_DAILY_REPEATS,
            step_budget: DEFAULT_STEP_BUDGET,
        }
    }
}

/// Headcount a room must seat for the given section.
///
/// The whole class for `Main`, one batch's share (rounded up) for a batch
/// section.
#[must_use]
pub(crate) const fn required_headcount(department: &Department, section: Section) -> u32 {
    match section {
        Section::Main => department.class_size,
        Section::Batch(_) => department.batch_size(),
    }
}

/// Whether a teacher's specialization names the subject.
///
/// Case-insensitive containment against the subject's name or code. Used
/// only for soft scoring, never as a hard filter.
#[must_use]
pub(crate) fn specialization_matches(teacher: &Teacher, subject: &Subject) -> bool {
    teacher.specialization.as_deref().is_some_and(|spec| {
        let spec: String = spec.to_lowercase();
        spec.contains(&subject.name.to_lowercase()) || spec.contains(&subject.code.to_lowercase())
    })
}
