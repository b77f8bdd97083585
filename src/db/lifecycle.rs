//! Composite, rule-gated operations over the ledger.
//!
//! Each public method is one unit of work: rule checks and every write it
//! performs share a transaction, so a failure at any step leaves the store
//! as it was. Deletions archive the entity before removing it.

use chrono::Utc;

use super::rules;
use super::store::{ALREADY_ASSIGNED, PROJECT_NAME_TAKEN};
use super::Database;
use crate::error::{LedgerError, LedgerResult};
use crate::models::*;

const EMPLOYEE_NOT_FOUND: &str = "employee not found";
const PROJECT_NOT_FOUND: &str = "project not found";
const MANAGER_NOT_FOUND: &str = "manager not found";
const ASSIGNMENT_NOT_FOUND: &str = "assignment not found";
const EMPLOYEE_MANAGES_PROJECTS: &str = "employee manages projects";
const PROJECT_HAS_ASSIGNMENTS: &str = "project has employees assigned, use cascade";

impl Database {
    // ============================================================
    // Employees
    // ============================================================

    pub fn create_employee(&self, input: CreateEmployeeInput) -> LedgerResult<Employee> {
        input.validate()?;
        let employee = self.unit_of_work(|store| store.insert_employee(input))?;
        tracing::debug!(employee_id = employee.id, "Created employee");
        Ok(employee)
    }

    pub fn list_employees(&self, filter: &EmployeeFilter) -> LedgerResult<Vec<Employee>> {
        self.read(|store| store.scan_employees(filter))
    }

    pub fn get_employee(&self, id: i64) -> LedgerResult<Employee> {
        self.read(|store| store.employee(id))?
            .ok_or(LedgerError::NotFound(EMPLOYEE_NOT_FOUND))
    }

    /// Apply a partial update. Supplied fields are validated exactly as on
    /// creation; an invalid field rejects the whole update.
    pub fn update_employee(&self, id: i64, input: UpdateEmployeeInput) -> LedgerResult<Employee> {
        self.unit_of_work(|store| {
            let mut employee = store
                .employee(id)?
                .ok_or(LedgerError::NotFound(EMPLOYEE_NOT_FOUND))?;
            input.validate()?;
            input.apply_to(&mut employee);
            store.save_employee(&employee)?;
            Ok(employee)
        })
    }

    /// Archive and remove an employee together with its staffing links.
    ///
    /// Refused while the employee manages any project.
    pub fn delete_employee(&self, id: i64) -> LedgerResult<EmployeeHistory> {
        self.unit_of_work(|store| {
            let employee = store
                .employee(id)?
                .ok_or(LedgerError::NotFound(EMPLOYEE_NOT_FOUND))?;

            if !rules::employee_has_no_managed_projects(store, id)? {
                tracing::warn!(employee_id = id, "Refusing to delete project manager");
                return Err(LedgerError::Conflict(EMPLOYEE_MANAGES_PROJECTS));
            }

            let history = store.archive_employee(&employee, Utc::now())?;
            let links = store.delete_links_for_employee(id)?;
            store.delete_employee(id)?;

            tracing::info!(
                employee_id = id,
                history_id = history.id,
                links_removed = links,
                "Archived and deleted employee"
            );
            Ok(history)
        })
    }

    pub fn list_projects_for_employee(&self, employee_id: i64) -> LedgerResult<Vec<Project>> {
        self.read(|store| {
            if !rules::employee_exists(store, employee_id)? {
                return Err(LedgerError::NotFound(EMPLOYEE_NOT_FOUND));
            }
            store.projects_linked_to(employee_id)
        })
    }

    // ============================================================
    // Projects
    // ============================================================

    pub fn create_project(&self, input: CreateProjectInput) -> LedgerResult<Project> {
        input.validate()?;
        let project = self.unit_of_work(|store| {
            if !rules::project_name_is_unique(store, &input.name)? {
                return Err(LedgerError::Conflict(PROJECT_NAME_TAKEN));
            }
            if !rules::employee_exists(store, input.manager_id)? {
                return Err(LedgerError::NotFound(MANAGER_NOT_FOUND));
            }
            store.insert_project(input)
        })?;
        tracing::debug!(
            project_id = project.id,
            manager_id = ?project.manager_id,
            "Created project"
        );
        Ok(project)
    }

    pub fn list_projects(&self, filter: &ProjectFilter) -> LedgerResult<Vec<Project>> {
        filter.validate()?;
        self.read(|store| store.scan_projects(filter))
    }

    pub fn get_project(&self, id: i64) -> LedgerResult<Project> {
        self.read(|store| store.project(id))?
            .ok_or(LedgerError::NotFound(PROJECT_NOT_FOUND))
    }

    /// Archive and remove a project.
    ///
    /// A project with staffing links is only removed when `cascade` is set,
    /// in which case the links go with it.
    pub fn delete_project(&self, id: i64, cascade: bool) -> LedgerResult<ProjectHistory> {
        self.unit_of_work(|store| {
            let project = store
                .project(id)?
                .ok_or(LedgerError::NotFound(PROJECT_NOT_FOUND))?;

            if !cascade && !rules::project_has_no_links(store, id)? {
                tracing::warn!(project_id = id, "Refusing to delete staffed project");
                return Err(LedgerError::Conflict(PROJECT_HAS_ASSIGNMENTS));
            }

            let history = store.archive_project(&project, Utc::now())?;
            let links = store.delete_links_for_project(id)?;
            store.delete_project(id)?;

            tracing::info!(
                project_id = id,
                history_id = history.id,
                links_removed = links,
                cascade,
                "Archived and deleted project"
            );
            Ok(history)
        })
    }

    pub fn list_employees_for_project(&self, project_id: i64) -> LedgerResult<Vec<Employee>> {
        self.read(|store| {
            if !rules::project_exists(store, project_id)? {
                return Err(LedgerError::NotFound(PROJECT_NOT_FOUND));
            }
            store.employees_linked_to(project_id)
        })
    }

    // ============================================================
    // Assignments
    // ============================================================

    /// Staff an employee on a project. Project status is not consulted, so
    /// completed and cancelled projects accept assignments too.
    pub fn assign_employee(&self, project_id: i64, employee_id: i64) -> LedgerResult<AssignmentLink> {
        self.unit_of_work(|store| {
            if !rules::project_exists(store, project_id)? {
                return Err(LedgerError::NotFound(PROJECT_NOT_FOUND));
            }
            if !rules::employee_exists(store, employee_id)? {
                return Err(LedgerError::NotFound(EMPLOYEE_NOT_FOUND));
            }
            if rules::link_exists(store, project_id, employee_id)? {
                return Err(LedgerError::Conflict(ALREADY_ASSIGNED));
            }
            store.insert_link(project_id, employee_id)
        })
    }

    pub fn unassign_employee(&self, project_id: i64, employee_id: i64) -> LedgerResult<()> {
        self.unit_of_work(|store| {
            if !rules::link_exists(store, project_id, employee_id)? {
                return Err(LedgerError::NotFound(ASSIGNMENT_NOT_FOUND));
            }
            store.delete_link(project_id, employee_id)?;
            Ok(())
        })
    }

    // ============================================================
    // History
    // ============================================================

    /// Deleted employees, newest first.
    pub fn list_employee_history(&self) -> LedgerResult<Vec<EmployeeHistory>> {
        self.read(|store| store.employee_history())
    }

    /// Deleted projects, newest first.
    pub fn list_project_history(&self) -> LedgerResult<Vec<ProjectHistory>> {
        self.read(|store| store.project_history())
    }
}
