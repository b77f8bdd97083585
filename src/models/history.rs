use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmployeeStatus, ProjectStatus};

/// Snapshot of an employee taken at the moment it was deleted.
///
/// History rows are the permanent audit trail: written once by
/// `delete_employee` and never altered or removed afterwards. Only scalar
/// fields are captured; staffing links are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeHistory {
    pub id: i64,
    /// Id the employee had while live.
    pub employee_id: i64,
    pub name: String,
    pub specialty: String,
    pub salary: f64,
    pub status: EmployeeStatus,
    pub deleted_at: DateTime<Utc>,
}

/// Snapshot of a project taken at the moment it was deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHistory {
    pub id: i64,
    /// Id the project had while live.
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub budget: f64,
    pub status: ProjectStatus,
    pub manager_id: Option<i64>,
    pub deleted_at: DateTime<Utc>,
}
