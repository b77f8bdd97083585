use serde::{Deserialize, Serialize};

use super::validate;
use crate::error::LedgerResult;

pub const EMPLOYEE_NAME_MAX: usize = 100;
pub const EMPLOYEE_SPECIALTY_MAX: usize = 100;

/// A staff member who can manage projects and be assigned to them.
///
/// Employees are linked to projects in two independent ways: as the manager
/// referenced by [`Project::manager_id`](super::Project::manager_id), and as
/// staff through [`AssignmentLink`](super::AssignmentLink) rows. Being a
/// project's manager does not stop the same employee from being staffed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub salary: f64,
    pub status: EmployeeStatus,
}

/// Employment status. Caller-supplied data, not a lifecycle state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Input for creating a new employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeInput {
    pub name: String,
    pub specialty: String,
    pub salary: f64,
    /// Initial status. Defaults to `Active` if not specified.
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
}

impl CreateEmployeeInput {
    pub fn validate(&self) -> LedgerResult<()> {
        validate::required_text("name", &self.name, EMPLOYEE_NAME_MAX)?;
        validate::required_text("specialty", &self.specialty, EMPLOYEE_SPECIALTY_MAX)?;
        validate::positive("salary", self.salary)
    }
}

/// Input for updating an existing employee. All fields are optional for partial updates.
///
/// Supplied fields go through the same checks as [`CreateEmployeeInput`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployeeInput {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub salary: Option<f64>,
    pub status: Option<EmployeeStatus>,
}

impl UpdateEmployeeInput {
    pub fn validate(&self) -> LedgerResult<()> {
        if let Some(name) = &self.name {
            validate::required_text("name", name, EMPLOYEE_NAME_MAX)?;
        }
        if let Some(specialty) = &self.specialty {
            validate::required_text("specialty", specialty, EMPLOYEE_SPECIALTY_MAX)?;
        }
        if let Some(salary) = self.salary {
            validate::positive("salary", salary)?;
        }
        Ok(())
    }

    /// Overwrite the supplied fields of `employee`, leaving the rest untouched.
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(specialty) = self.specialty {
            employee.specialty = specialty;
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(status) = self.status {
            employee.status = status;
        }
    }
}

/// Equality filters for listing employees. Both are optional and combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeFilter {
    pub specialty: Option<String>,
    pub status: Option<EmployeeStatus>,
}
