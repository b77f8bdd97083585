use serde::{Deserialize, Serialize};

use super::validate;
use crate::error::LedgerResult;

pub const PROJECT_NAME_MAX: usize = 150;
pub const PROJECT_DESCRIPTION_MAX: usize = 1000;

/// A project with a budget, a manager and a set of staffed employees.
///
/// Project names are unique among live projects. The manager reference is
/// checked only when the project is created; storage keeps it nullable.
/// Projects have no update path: they are created, read and deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub budget: f64,
    pub status: ProjectStatus,
    pub manager_id: Option<i64>,
}

/// The status of a project.
///
/// - `Planned`: not started yet (default)
/// - `InProgress`: work underway
/// - `Completed` / `Cancelled`: terminal, though nothing prevents staffing changes
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(Self::Planned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Input for creating a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub budget: f64,
    /// Initial status. Defaults to `Planned` if not specified.
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    /// Employee managing the project. Must exist at creation time.
    #[serde(alias = "gerente_id")]
    pub manager_id: i64,
}

impl CreateProjectInput {
    pub fn validate(&self) -> LedgerResult<()> {
        validate::required_text("name", &self.name, PROJECT_NAME_MAX)?;
        validate::optional_text(
            "description",
            self.description.as_deref(),
            PROJECT_DESCRIPTION_MAX,
        )?;
        validate::positive("budget", self.budget)
    }
}

/// Filters for listing projects: equality on status, lower bound on budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    /// Only projects whose budget is at least this value.
    pub budget_min: Option<f64>,
}

impl ProjectFilter {
    /// `budget_min`, when given, must be a finite number.
    pub fn validate(&self) -> LedgerResult<()> {
        match self.budget_min {
            Some(budget_min) => validate::finite("budget_min", budget_min),
            None => Ok(()),
        }
    }
}
