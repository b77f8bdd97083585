mod error;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    let api = Router::new()
        // Employees
        .route(
            "/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employees/{id}",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route(
            "/employees/{id}/projects",
            get(handlers::list_projects_for_employee),
        )
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::get_project).delete(handlers::delete_project),
        )
        .route(
            "/projects/{id}/employees",
            get(handlers::list_employees_for_project),
        )
        // Assignments
        .route(
            "/projects/{id}/employees/{employee_id}",
            post(handlers::assign_employee).delete(handlers::unassign_employee),
        )
        // Deletion history
        .route("/history/employees", get(handlers::list_employee_history))
        .route("/history/projects", get(handlers::list_project_history))
        // Health
        .route("/health", get(handlers::health));

    Router::new().nest("/api/v1", api).with_state(db).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
