//! Read-only integrity predicates.
//!
//! Each predicate issues one read against the [`Store`] and reports a plain
//! boolean. Deciding which error a `false` turns into is left to the lifecycle
//! operations; an `Err` here always means the storage read itself failed.

use super::store::Store;
use crate::error::LedgerResult;

pub fn employee_exists(store: &Store<'_>, id: i64) -> LedgerResult<bool> {
    Ok(store.employee(id)?.is_some())
}

pub fn project_exists(store: &Store<'_>, id: i64) -> LedgerResult<bool> {
    Ok(store.project(id)?.is_some())
}

/// Case-sensitive exact match against every live project name.
pub fn project_name_is_unique(store: &Store<'_>, name: &str) -> LedgerResult<bool> {
    Ok(store.count_projects_named(name)? == 0)
}

pub fn employee_has_no_managed_projects(store: &Store<'_>, id: i64) -> LedgerResult<bool> {
    Ok(store.count_projects_managed_by(id)? == 0)
}

pub fn project_has_no_links(store: &Store<'_>, id: i64) -> LedgerResult<bool> {
    Ok(store.links_for_project(id)?.is_empty())
}

pub fn link_exists(store: &Store<'_>, project_id: i64, employee_id: i64) -> LedgerResult<bool> {
    Ok(store.link(project_id, employee_id)?.is_some())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;
    use crate::db::schema::run_migrations;
    use crate::models::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn predicates_track_store_contents() {
        let conn = conn();
        let store = Store::new(&conn);

        assert!(!employee_exists(&store, 1).unwrap());

        let ada = store
            .insert_employee(CreateEmployeeInput {
                name: "Ada".to_string(),
                specialty: "math".to_string(),
                salary: 10.0,
                status: None,
            })
            .unwrap();
        assert!(employee_exists(&store, ada.id).unwrap());
        assert!(employee_has_no_managed_projects(&store, ada.id).unwrap());
        assert!(project_name_is_unique(&store, "Engine").unwrap());

        let engine = store
            .insert_project(CreateProjectInput {
                name: "Engine".to_string(),
                description: None,
                budget: 5.0,
                status: None,
                manager_id: ada.id,
            })
            .unwrap();
        assert!(project_exists(&store, engine.id).unwrap());
        assert!(!project_name_is_unique(&store, "Engine").unwrap());
        assert!(project_name_is_unique(&store, "engine").unwrap());
        assert!(!employee_has_no_managed_projects(&store, ada.id).unwrap());
        assert!(project_has_no_links(&store, engine.id).unwrap());
        assert!(!link_exists(&store, engine.id, ada.id).unwrap());

        store.insert_link(engine.id, ada.id).unwrap();
        assert!(!project_has_no_links(&store, engine.id).unwrap());
        assert!(link_exists(&store, engine.id, ada.id).unwrap());
    }
}
