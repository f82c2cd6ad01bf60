use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;

use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::infra::sqlite::queries::{
    delete_records, get_record, insert_record, query_records, toggle_active, update_record,
};
use crate::infra::sqlite::schema::init_db;
use crate::infra::sqlite::seed::seed_demo_data;
use crate::usecase::ports::api::{AdminApi, ApiError, ListPage, ListRequest};

/// Local backend: every resource lives as JSON documents in one SQLite file.
pub struct SqliteApi {
    pub db_path: PathBuf,
}

fn storage(err: anyhow::Error) -> ApiError {
    ApiError::Storage(format!("{err:#}"))
}

impl SqliteApi {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        init_db(&db_path)?;
        Ok(Self { db_path })
    }

    pub fn open_seeded(db_path: PathBuf) -> Result<Self> {
        let api = Self::open(db_path)?;
        seed_demo_data(&api.db_path)?;
        Ok(api)
    }
}

impl AdminApi for SqliteApi {
    fn list(&self, resource: Resource, request: &ListRequest) -> Result<ListPage, ApiError> {
        let (rows, total_count) =
            query_records(&self.db_path, resource, request).map_err(storage)?;
        Ok(ListPage { rows, total_count })
    }

    fn get(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError> {
        get_record(&self.db_path, resource, id)
            .map_err(storage)?
            .ok_or(ApiError::NotFound { resource, id })
    }

    fn create(&self, resource: Resource, payload: Value) -> Result<RowData, ApiError> {
        insert_record(&self.db_path, resource, payload).map_err(storage)
    }

    fn update(&self, resource: Resource, id: RecordId, payload: Value) -> Result<RowData, ApiError> {
        update_record(&self.db_path, resource, id, payload)
            .map_err(storage)?
            .ok_or(ApiError::NotFound { resource, id })
    }

    fn delete(&self, resource: Resource, id: RecordId) -> Result<(), ApiError> {
        self.bulk_delete(resource, &[id])
    }

    fn bulk_delete(&self, resource: Resource, ids: &[RecordId]) -> Result<(), ApiError> {
        match delete_records(&self.db_path, resource, ids).map_err(storage)? {
            Some(id) => Err(ApiError::NotFound { resource, id }),
            None => Ok(()),
        }
    }

    fn toggle_status(&self, resource: Resource, id: RecordId) -> Result<RowData, ApiError> {
        toggle_active(&self.db_path, resource, id)
            .map_err(storage)?
            .ok_or(ApiError::NotFound { resource, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::listing::SortDirection;
    use rstest::rstest;
    use serde_json::json;

    fn api() -> (tempfile::TempDir, SqliteApi) {
        let dir = tempfile::tempdir().expect("tempdir");
        let api = SqliteApi::open(dir.path().join("portal.db")).expect("open");
        (dir, api)
    }

    fn request(limit: u32) -> ListRequest {
        ListRequest {
            page: 0,
            limit,
            sort_by: None,
            sort_order: None,
            filters: Vec::new(),
        }
    }

    #[test]
    fn create_then_get_round_trips_document() {
        let (_dir, api) = api();
        let created = api
            .create(Resource::Roles, json!({"name": "ADMIN", "permissions": ["USER_VIEW"]}))
            .expect("create");

        let loaded = api.get(Resource::Roles, created.id).expect("get");
        assert_eq!(loaded.text("name"), "ADMIN");
        assert_eq!(loaded.fields.get("permissions"), Some(&json!(["USER_VIEW"])));
        assert!(!loaded.text("createdAt").is_empty());
        // other resources never see the row
        assert!(api.get(Resource::Users, created.id).is_err());
    }

    #[test]
    fn filters_are_case_insensitive_contains() {
        let (_dir, api) = api();
        for name in ["Tag-VIEW", "tag-edit", "Role-VIEW"] {
            api.create(Resource::Permissions, json!({"code": name})).expect("create");
        }
        let mut req = request(10);
        req.filters = vec![("code".to_string(), "TAG".to_string())];

        let page = api.list(Resource::Permissions, &req).expect("list");
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn multi_value_filter_matches_any() {
        let (_dir, api) = api();
        api.create(Resource::Users, json!({"username": "a", "roles": ["ADMIN"]})).expect("create");
        api.create(Resource::Users, json!({"username": "b", "roles": ["TEACHER"]})).expect("create");
        api.create(Resource::Users, json!({"username": "c", "roles": ["STUDENT"]})).expect("create");
        let mut req = request(10);
        req.filters = vec![("roles".to_string(), "ADMIN,TEACHER".to_string())];

        let page = api.list(Resource::Users, &req).expect("list");
        let names: Vec<String> = page.rows.iter().map(|row| row.text("username")).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[rstest]
    #[case("true", 1)]
    #[case("false", 1)]
    fn boolean_fields_filter_by_text(#[case] term: &str, #[case] expected: u64) {
        let (_dir, api) = api();
        api.create(Resource::Roles, json!({"name": "A", "active": true})).expect("create");
        api.create(Resource::Roles, json!({"name": "B", "active": false})).expect("create");
        let mut req = request(10);
        req.filters = vec![("active".to_string(), term.to_string())];

        assert_eq!(api.list(Resource::Roles, &req).expect("list").total_count, expected);
    }

    #[test]
    fn like_wildcards_in_terms_are_literal() {
        let (_dir, api) = api();
        api.create(Resource::Permissions, json!({"code": "USER_VIEW"})).expect("create");
        api.create(Resource::Permissions, json!({"code": "USERXVIEW"})).expect("create");
        let mut req = request(10);
        req.filters = vec![("code".to_string(), "R_V".to_string())];

        assert_eq!(api.list(Resource::Permissions, &req).expect("list").total_count, 1);
    }

    #[test]
    fn sorting_and_paging() {
        let (_dir, api) = api();
        for name in ["b", "d", "a", "c", "e"] {
            api.create(Resource::Roles, json!({"name": name})).expect("create");
        }
        let mut req = request(2);
        req.page = 1;
        req.sort_by = Some("name".to_string());
        req.sort_order = Some(SortDirection::Desc);

        let page = api.list(Resource::Roles, &req).expect("list");
        let names: Vec<String> = page.rows.iter().map(|row| row.text("name")).collect();
        assert_eq!(names, vec!["c", "b"]);
        assert_eq!(page.total_count, 5);
    }

    #[rstest]
    #[case(SortDirection::Desc, vec![3, 2, 1])]
    #[case(SortDirection::Asc, vec![1, 2, 3])]
    fn sorting_by_id_uses_the_row_id(#[case] direction: SortDirection, #[case] expected: Vec<i64>) {
        let (_dir, api) = api();
        for content in ["first", "second", "third"] {
            api.create(Resource::Questions, json!({"content": content})).expect("create");
        }
        let mut req = request(10);
        req.sort_by = Some("id".to_string());
        req.sort_order = Some(direction);

        let page = api.list(Resource::Questions, &req).expect("list");
        let ids: Vec<i64> = page.rows.iter().map(|row| row.id.0).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn numeric_terms_match_integer_fields_exactly() {
        let (_dir, api) = api();
        for assignment in [1, 11, 21] {
            api.create(Resource::Submissions, json!({"assignmentId": assignment, "student": "mle"}))
                .expect("create");
        }
        let mut req = request(10);
        req.filters = vec![("assignmentId".to_string(), "1".to_string())];

        let page = api.list(Resource::Submissions, &req).expect("list");
        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0].text("assignmentId"), "1");
    }

    #[test]
    fn numeric_terms_still_search_inside_text() {
        let (_dir, api) = api();
        api.create(Resource::Users, json!({"username": "student12"})).expect("create");
        api.create(Resource::Users, json!({"username": "student3"})).expect("create");
        let mut req = request(10);
        req.filters = vec![("username".to_string(), "12".to_string())];

        let page = api.list(Resource::Users, &req).expect("list");
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn id_filter_matches_the_row_id() {
        let (_dir, api) = api();
        let ids: Vec<RecordId> = (0..12)
            .map(|n| api.create(Resource::Roles, json!({"name": format!("R{n}")})).expect("create").id)
            .collect();
        let mut req = request(20);
        req.filters = vec![("id".to_string(), ids[0].to_string())];

        let page = api.list(Resource::Roles, &req).expect("list");
        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0].id, ids[0]);
    }

    #[test]
    fn unsafe_sort_key_is_rejected() {
        let (_dir, api) = api();
        let mut req = request(10);
        req.sort_by = Some("name) DESC; DROP TABLE record; --".to_string());
        assert!(matches!(
            api.list(Resource::Roles, &req),
            Err(ApiError::Storage(_))
        ));
    }

    #[test]
    fn update_merges_and_keeps_omitted_fields() {
        let (_dir, api) = api();
        let user = api
            .create(Resource::Users, json!({"username": "mle", "password": "secret"}))
            .expect("create");
        let updated = api
            .update(Resource::Users, user.id, json!({"fullName": "Minh Le"}))
            .expect("update");
        assert_eq!(updated.text("password"), "secret");
        assert_eq!(updated.text("fullName"), "Minh Le");
    }

    #[test]
    fn toggle_flips_active_flag() {
        let (_dir, api) = api();
        let role = api.create(Resource::Roles, json!({"name": "A", "active": true})).expect("create");
        assert!(!api.toggle_status(Resource::Roles, role.id).expect("toggle").is_active());
        assert!(api.toggle_status(Resource::Roles, role.id).expect("toggle").is_active());
    }

    #[test]
    fn deleting_missing_ids_changes_nothing() {
        let (_dir, api) = api();
        let role = api.create(Resource::Roles, json!({"name": "A"})).expect("create");

        let err = api
            .bulk_delete(Resource::Roles, &[role.id, RecordId(999)])
            .expect_err("missing id");
        assert_eq!(
            err,
            ApiError::NotFound {
                resource: Resource::Roles,
                id: RecordId(999)
            }
        );
        assert!(api.get(Resource::Roles, role.id).is_ok());

        api.delete(Resource::Roles, role.id).expect("delete");
        assert!(api.get(Resource::Roles, role.id).is_err());
    }

    #[test]
    fn seeding_happens_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("portal.db");
        let api = SqliteApi::open_seeded(path.clone()).expect("open");
        let roles = api.list(Resource::Roles, &request(10)).expect("list").total_count;
        assert_eq!(roles, 3);

        let reopened = SqliteApi::open_seeded(path).expect("reopen");
        assert_eq!(
            reopened.list(Resource::Roles, &request(10)).expect("list").total_count,
            3
        );
    }
}
