use serde::{Deserialize, Serialize};

/// Staffing link between a project and an employee.
///
/// Identified by the `(project_id, employee_id)` pair; a pair is linked at
/// most once. Links are created and removed, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentLink {
    pub project_id: i64,
    pub employee_id: i64,
    pub role: Option<String>,
}
