use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::db::Database;
use crate::error::LedgerError;
use crate::models::*;

type ApiResult<T> = Result<T, LedgerError>;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Employees
// ============================================================

pub async fn list_employees(
    State(db): State<Database>,
    Query(filter): Query<EmployeeFilter>,
) -> ApiResult<Json<Vec<Employee>>> {
    db.list_employees(&filter).map(Json)
}

pub async fn get_employee(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Employee>> {
    db.get_employee(id).map(Json)
}

pub async fn create_employee(
    State(db): State<Database>,
    Json(input): Json<CreateEmployeeInput>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    db.create_employee(input)
        .map(|e| (StatusCode::CREATED, Json(e)))
}

pub async fn update_employee(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateEmployeeInput>,
) -> ApiResult<Json<Employee>> {
    db.update_employee(id, input).map(Json)
}

/// Returns the history row that now stands in for the employee.
pub async fn delete_employee(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EmployeeHistory>> {
    db.delete_employee(id).map(Json)
}

pub async fn list_projects_for_employee(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Project>>> {
    db.list_projects_for_employee(id).map(Json)
}

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(
    State(db): State<Database>,
    Query(filter): Query<ProjectFilter>,
) -> ApiResult<Json<Vec<Project>>> {
    db.list_projects(&filter).map(Json)
}

pub async fn get_project(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Project>> {
    db.get_project(id).map(Json)
}

pub async fn create_project(
    State(db): State<Database>,
    Json(input): Json<CreateProjectInput>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    db.create_project(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
}

/// Query parameters for deleting a project.
#[derive(Debug, Deserialize)]
pub struct DeleteProjectQuery {
    /// Also remove the project's staffing links instead of refusing.
    #[serde(default)]
    pub cascade: bool,
}

pub async fn delete_project(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteProjectQuery>,
) -> ApiResult<Json<ProjectHistory>> {
    db.delete_project(id, query.cascade).map(Json)
}

pub async fn list_employees_for_project(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Employee>>> {
    db.list_employees_for_project(id).map(Json)
}

// ============================================================
// Assignments
// ============================================================

pub async fn assign_employee(
    State(db): State<Database>,
    Path((project_id, employee_id)): Path<(i64, i64)>,
) -> ApiResult<(StatusCode, Json<AssignmentLink>)> {
    db.assign_employee(project_id, employee_id)
        .map(|link| (StatusCode::CREATED, Json(link)))
}

pub async fn unassign_employee(
    State(db): State<Database>,
    Path((project_id, employee_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    db.unassign_employee(project_id, employee_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Deletion history
// ============================================================

pub async fn list_employee_history(
    State(db): State<Database>,
) -> ApiResult<Json<Vec<EmployeeHistory>>> {
    db.list_employee_history().map(Json)
}

pub async fn list_project_history(
    State(db): State<Database>,
) -> ApiResult<Json<Vec<ProjectHistory>>> {
    db.list_project_history().map(Json)
}
