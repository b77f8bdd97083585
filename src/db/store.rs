//! Row-level access to the five ledger tables.
//!
//! A [`Store`] borrows a connection (normally the open transaction of the
//! current unit of work), so every read observes the writes made earlier in
//! the same operation. It performs no integrity checks of its own beyond the
//! constraints SQLite enforces; see [`super::rules`] for those.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::{LedgerError, LedgerResult};
use crate::models::*;

pub(crate) const PROJECT_NAME_TAKEN: &str = "project name already exists";
pub(crate) const ALREADY_ASSIGNED: &str = "employee already assigned to project";

const EMPLOYEE_COLUMNS: &str = "id, name, specialty, salary, status";
const PROJECT_COLUMNS: &str = "id, name, description, budget, status, manager_id";

pub struct Store<'c> {
    conn: &'c Connection,
}

impl<'c> Store<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ============================================================
    // Employees
    // ============================================================

    pub fn insert_employee(&self, input: CreateEmployeeInput) -> LedgerResult<Employee> {
        let status = input.status.unwrap_or_default();
        self.conn.execute(
            "INSERT INTO employees (name, specialty, salary, status) VALUES (?, ?, ?, ?)",
            (&input.name, &input.specialty, input.salary, status.as_str()),
        )?;

        Ok(Employee {
            id: self.conn.last_insert_rowid(),
            name: input.name,
            specialty: input.specialty,
            salary: input.salary,
            status,
        })
    }

    pub fn employee(&self, id: i64) -> LedgerResult<Option<Employee>> {
        let employee = self
            .conn
            .query_row(
                &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"),
                [id],
                employee_from_row,
            )
            .optional()?;
        Ok(employee)
    }

    pub fn scan_employees(&self, filter: &EmployeeFilter) -> LedgerResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees
             WHERE (?1 IS NULL OR specialty = ?1) AND (?2 IS NULL OR status = ?2)
             ORDER BY id"
        ))?;

        // An empty specialty means no filter, not "specialty is empty"
        let specialty = filter.specialty.as_deref().filter(|s| !s.is_empty());

        let employees = stmt
            .query_map(
                (specialty, filter.status.map(|s| s.as_str())),
                employee_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(employees)
    }

    pub fn save_employee(&self, employee: &Employee) -> LedgerResult<()> {
        self.conn.execute(
            "UPDATE employees SET name = ?, specialty = ?, salary = ?, status = ? WHERE id = ?",
            (
                &employee.name,
                &employee.specialty,
                employee.salary,
                employee.status.as_str(),
                employee.id,
            ),
        )?;
        Ok(())
    }

    pub fn delete_employee(&self, id: i64) -> LedgerResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    /// Number of projects whose manager is `employee_id`.
    pub fn count_projects_managed_by(&self, employee_id: i64) -> LedgerResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE manager_id = ?",
            [employee_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ============================================================
    // Projects
    // ============================================================

    /// Insert a project. A name collision caught by the unique index is
    /// reported as a conflict, not a storage failure.
    pub fn insert_project(&self, input: CreateProjectInput) -> LedgerResult<Project> {
        let status = input.status.unwrap_or_default();
        self.conn
            .execute(
                "INSERT INTO projects (name, description, budget, status, manager_id)
                 VALUES (?, ?, ?, ?, ?)",
                (
                    &input.name,
                    &input.description,
                    input.budget,
                    status.as_str(),
                    input.manager_id,
                ),
            )
            .map_err(|e| LedgerError::on_unique_violation(e, PROJECT_NAME_TAKEN))?;

        Ok(Project {
            id: self.conn.last_insert_rowid(),
            name: input.name,
            description: input.description,
            budget: input.budget,
            status,
            manager_id: Some(input.manager_id),
        })
    }

    pub fn project(&self, id: i64) -> LedgerResult<Option<Project>> {
        let project = self
            .conn
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"),
                [id],
                project_from_row,
            )
            .optional()?;
        Ok(project)
    }

    pub fn scan_projects(&self, filter: &ProjectFilter) -> LedgerResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR budget >= ?2)
             ORDER BY id"
        ))?;

        let projects = stmt
            .query_map(
                (filter.status.map(|s| s.as_str()), filter.budget_min),
                project_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    pub fn count_projects_named(&self, name: &str) -> LedgerResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE name = ?",
            [name],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete_project(&self, id: i64) -> LedgerResult<bool> {
        let rows = self.conn.execute("DELETE FROM projects WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Assignment links
    // ============================================================

    /// Insert a link without a role. A duplicate pair caught by the primary
    /// key is reported as a conflict.
    pub fn insert_link(&self, project_id: i64, employee_id: i64) -> LedgerResult<AssignmentLink> {
        self.conn
            .execute(
                "INSERT INTO project_employees (project_id, employee_id) VALUES (?, ?)",
                (project_id, employee_id),
            )
            .map_err(|e| LedgerError::on_unique_violation(e, ALREADY_ASSIGNED))?;

        Ok(AssignmentLink {
            project_id,
            employee_id,
            role: None,
        })
    }

    pub fn link(&self, project_id: i64, employee_id: i64) -> LedgerResult<Option<AssignmentLink>> {
        let link = self
            .conn
            .query_row(
                "SELECT project_id, employee_id, role FROM project_employees
                 WHERE project_id = ? AND employee_id = ?",
                (project_id, employee_id),
                link_from_row,
            )
            .optional()?;
        Ok(link)
    }

    pub fn links_for_project(&self, project_id: i64) -> LedgerResult<Vec<AssignmentLink>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id, employee_id, role FROM project_employees
             WHERE project_id = ? ORDER BY employee_id",
        )?;
        let links = stmt
            .query_map([project_id], link_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    pub fn delete_link(&self, project_id: i64, employee_id: i64) -> LedgerResult<bool> {
        let rows = self.conn.execute(
            "DELETE FROM project_employees WHERE project_id = ? AND employee_id = ?",
            (project_id, employee_id),
        )?;
        Ok(rows > 0)
    }

    pub fn delete_links_for_project(&self, project_id: i64) -> LedgerResult<usize> {
        let rows = self.conn.execute(
            "DELETE FROM project_employees WHERE project_id = ?",
            [project_id],
        )?;
        Ok(rows)
    }

    pub fn delete_links_for_employee(&self, employee_id: i64) -> LedgerResult<usize> {
        let rows = self.conn.execute(
            "DELETE FROM project_employees WHERE employee_id = ?",
            [employee_id],
        )?;
        Ok(rows)
    }

    /// Projects the employee is staffed on.
    pub fn projects_linked_to(&self, employee_id: i64) -> LedgerResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.name, p.description, p.budget, p.status, p.manager_id
             FROM projects p
             JOIN project_employees pe ON pe.project_id = p.id
             WHERE pe.employee_id = ?
             ORDER BY p.id",
        )?;
        let projects = stmt
            .query_map([employee_id], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    /// Employees staffed on the project.
    pub fn employees_linked_to(&self, project_id: i64) -> LedgerResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id, e.name, e.specialty, e.salary, e.status
             FROM employees e
             JOIN project_employees pe ON pe.employee_id = e.id
             WHERE pe.project_id = ?
             ORDER BY e.id",
        )?;
        let employees = stmt
            .query_map([project_id], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(employees)
    }

    // ============================================================
    // Deletion history
    // ============================================================

    pub fn archive_employee(
        &self,
        employee: &Employee,
        deleted_at: DateTime<Utc>,
    ) -> LedgerResult<EmployeeHistory> {
        self.conn.execute(
            "INSERT INTO employee_history (employee_id, name, specialty, salary, status, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                employee.id,
                &employee.name,
                &employee.specialty,
                employee.salary,
                employee.status.as_str(),
                deleted_at.to_rfc3339(),
            ),
        )?;

        Ok(EmployeeHistory {
            id: self.conn.last_insert_rowid(),
            employee_id: employee.id,
            name: employee.name.clone(),
            specialty: employee.specialty.clone(),
            salary: employee.salary,
            status: employee.status,
            deleted_at,
        })
    }

    pub fn archive_project(
        &self,
        project: &Project,
        deleted_at: DateTime<Utc>,
    ) -> LedgerResult<ProjectHistory> {
        self.conn.execute(
            "INSERT INTO project_history (project_id, name, description, budget, status, manager_id, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                project.id,
                &project.name,
                &project.description,
                project.budget,
                project.status.as_str(),
                project.manager_id,
                deleted_at.to_rfc3339(),
            ),
        )?;

        Ok(ProjectHistory {
            id: self.conn.last_insert_rowid(),
            project_id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            budget: project.budget,
            status: project.status,
            manager_id: project.manager_id,
            deleted_at,
        })
    }

    pub fn employee_history(&self) -> LedgerResult<Vec<EmployeeHistory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, employee_id, name, specialty, salary, status, deleted_at
             FROM employee_history ORDER BY id DESC",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(EmployeeHistory {
                    id: row.get(0)?,
                    employee_id: row.get(1)?,
                    name: row.get(2)?,
                    specialty: row.get(3)?,
                    salary: row.get(4)?,
                    status: parse_column(row, 5, EmployeeStatus::from_str)?,
                    deleted_at: datetime_column(row, 6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn project_history(&self) -> LedgerResult<Vec<ProjectHistory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, name, description, budget, status, manager_id, deleted_at
             FROM project_history ORDER BY id DESC",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(ProjectHistory {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    name: row.get(2)?,
                    description: row.get(3)?,
                    budget: row.get(4)?,
                    status: parse_column(row, 5, ProjectStatus::from_str)?,
                    manager_id: row.get(6)?,
                    deleted_at: datetime_column(row, 7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
        salary: row.get(3)?,
        status: parse_column(row, 4, EmployeeStatus::from_str)?,
    })
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        budget: row.get(3)?,
        status: parse_column(row, 4, ProjectStatus::from_str)?,
        manager_id: row.get(5)?,
    })
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<AssignmentLink> {
    Ok(AssignmentLink {
        project_id: row.get(0)?,
        employee_id: row.get(1)?,
        role: row.get(2)?,
    })
}

/// Read a text column that must name a known enum variant. Unknown values
/// fail the read instead of being replaced with a default.
fn parse_column<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unrecognized value {raw:?}").into(),
        )
    })
}

fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn employee(store: &Store<'_>, name: &str) -> Employee {
        store
            .insert_employee(CreateEmployeeInput {
                name: name.to_string(),
                specialty: "backend".to_string(),
                salary: 1000.0,
                status: None,
            })
            .unwrap()
    }

    fn project_input(name: &str, manager_id: i64) -> CreateProjectInput {
        CreateProjectInput {
            name: name.to_string(),
            description: None,
            budget: 500.0,
            status: None,
            manager_id,
        }
    }

    #[test]
    fn duplicate_project_name_is_a_conflict_even_without_precheck() {
        let conn = conn();
        let store = Store::new(&conn);
        let manager = employee(&store, "Ada");

        store.insert_project(project_input("Apollo", manager.id)).unwrap();
        let err = store
            .insert_project(project_input("Apollo", manager.id))
            .unwrap_err();

        assert!(matches!(err, LedgerError::Conflict(PROJECT_NAME_TAKEN)));
    }

    #[test]
    fn duplicate_link_is_a_conflict_even_without_precheck() {
        let conn = conn();
        let store = Store::new(&conn);
        let manager = employee(&store, "Ada");
        let project = store.insert_project(project_input("Apollo", manager.id)).unwrap();

        store.insert_link(project.id, manager.id).unwrap();
        let err = store.insert_link(project.id, manager.id).unwrap_err();

        assert!(matches!(err, LedgerError::Conflict(ALREADY_ASSIGNED)));
    }

    #[test]
    fn link_to_missing_rows_is_a_storage_failure() {
        let conn = conn();
        let store = Store::new(&conn);

        let err = store.insert_link(7, 9).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[test]
    fn scans_combine_filters() {
        let conn = conn();
        let store = Store::new(&conn);
        let manager = employee(&store, "Ada");

        for (name, budget) in [("Small", 100.0), ("Medium", 1000.0), ("Large", 10000.0)] {
            store
                .insert_project(CreateProjectInput {
                    budget,
                    ..project_input(name, manager.id)
                })
                .unwrap();
        }

        let filter = ProjectFilter {
            status: Some(ProjectStatus::Planned),
            budget_min: Some(1000.0),
        };
        let names: Vec<_> = store
            .scan_projects(&filter)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Medium", "Large"]);

        let filter = ProjectFilter {
            status: Some(ProjectStatus::Completed),
            budget_min: None,
        };
        assert!(store.scan_projects(&filter).unwrap().is_empty());
    }

    #[test]
    fn deleted_ids_are_not_reissued() {
        let conn = conn();
        let store = Store::new(&conn);

        let first = employee(&store, "Ada");
        store.delete_employee(first.id).unwrap();
        let second = employee(&store, "Grace");

        assert!(second.id > first.id);
    }

    #[test]
    fn empty_specialty_does_not_filter() {
        let conn = conn();
        let store = Store::new(&conn);
        employee(&store, "Ada");

        let filter = EmployeeFilter {
            specialty: Some(String::new()),
            status: None,
        };
        assert_eq!(store.scan_employees(&filter).unwrap().len(), 1);
    }

    #[test]
    fn unknown_history_status_fails_the_read() {
        let conn = conn();
        conn.execute(
            "INSERT INTO employee_history (employee_id, name, specialty, salary, status, deleted_at)
             VALUES (1, 'Ada', 'math', 10, 'retired', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let err = Store::new(&conn).employee_history().unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Storage(rusqlite::Error::FromSqlConversionFailure(5, _, _))
        ));
    }

    #[test]
    fn corrupted_deletion_timestamp_fails_the_read() {
        let conn = conn();
        conn.execute(
            "INSERT INTO project_history (project_id, name, budget, status, deleted_at)
             VALUES (1, 'Engine', 5, 'planned', 'yesterday')",
            [],
        )
        .unwrap();

        let err = Store::new(&conn).project_history().unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Storage(rusqlite::Error::FromSqlConversionFailure(7, _, _))
        ));
    }

    #[test]
    fn history_timestamps_round_trip() {
        let conn = conn();
        let store = Store::new(&conn);
        let ada = employee(&store, "Ada");
        let deleted_at = Utc::now();

        let written = store.archive_employee(&ada, deleted_at).unwrap();
        assert_eq!(store.employee_history().unwrap(), vec![written]);
    }
}
