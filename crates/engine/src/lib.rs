// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod assembler;
mod constraints;
mod error;
mod generate;
mod ledger;
mod snapshot;
mod solver;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use assembler::assemble;
pub use constraints::ConstraintConfig;
pub use error::EngineError;
pub use generate::{GenerateOptions, generate};
pub use ledger::{OccupancyLedger, Placement};
pub use snapshot::DepartmentSnapshot;
