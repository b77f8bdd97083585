//! Domain models for the staffing ledger.
//!
//! # Live Entities
//!
//! - [`Employee`]: A staff member. May manage projects and be staffed on them.
//! - [`Project`]: A budgeted piece of work with exactly one manager at creation.
//! - [`AssignmentLink`]: Many-to-many staffing link, at most one per
//!   `(project, employee)` pair.
//!
//! ## Audit Trail
//!
//! Deleting a live entity archives it first:
//!
//! - [`EmployeeHistory`]: Snapshot of a deleted employee.
//! - [`ProjectHistory`]: Snapshot of a deleted project.
//!
//! History rows are append-only and never change after they are written.

mod assignment;
mod employee;
mod history;
mod project;
mod validate;

pub use assignment::*;
pub use employee::*;
pub use history::*;
pub use project::*;
