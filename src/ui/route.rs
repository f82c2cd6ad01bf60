use crate::domain::entities::record::RecordId;
use crate::domain::entities::resource::Resource;

/// Screens of the dashboard, addressed by path the way the row actions
/// template them (`/roles/:id/edit`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List { resource: Resource, query: String },
    Create(Resource),
    Edit(Resource, RecordId),
    Submit { assignment: RecordId },
    Grade { submission: RecordId },
}

impl Route {
    pub fn list(resource: Resource) -> Self {
        Route::List {
            resource,
            query: String::new(),
        }
    }

    pub fn resource(&self) -> Resource {
        match self {
            Route::List { resource, .. } | Route::Create(resource) | Route::Edit(resource, _) => {
                *resource
            }
            Route::Submit { .. } => Resource::Assignments,
            Route::Grade { .. } => Resource::Submissions,
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let id = |raw: &str| raw.parse::<i64>().ok().map(RecordId);
        match segments.as_slice() {
            [resource] => Some(Route::List {
                resource: Resource::from_path(resource)?,
                query: query.to_string(),
            }),
            [resource, "new"] => Some(Route::Create(Resource::from_path(resource)?)),
            [resource, raw, "edit"] => Some(Route::Edit(Resource::from_path(resource)?, id(raw)?)),
            ["assignments", raw, "submit"] => Some(Route::Submit { assignment: id(raw)? }),
            ["submissions", raw, "grade"] => Some(Route::Grade { submission: id(raw)? }),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List { resource, query } if query.is_empty() => format!("/{resource}"),
            Route::List { resource, query } => format!("/{resource}?{query}"),
            Route::Create(resource) => format!("/{resource}/new"),
            Route::Edit(resource, id) => format!("/{resource}/{id}/edit"),
            Route::Submit { assignment } => format!("/assignments/{assignment}/submit"),
            Route::Grade { submission } => format!("/submissions/{submission}/grade"),
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::list(Resource::Users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/roles", Route::list(Resource::Roles))]
    #[case("/roles/new", Route::Create(Resource::Roles))]
    #[case("/question-groups/4/edit", Route::Edit(Resource::QuestionGroups, RecordId(4)))]
    #[case("/assignments/2/submit", Route::Submit { assignment: RecordId(2) })]
    #[case("/submissions/9/grade", Route::Grade { submission: RecordId(9) })]
    #[case(
        "/submissions?assignmentId=3",
        Route::List { resource: Resource::Submissions, query: "assignmentId=3".to_string() }
    )]
    fn paths_round_trip(#[case] path: &str, #[case] route: Route) {
        assert_eq!(Route::parse(path), Some(route.clone()));
        assert_eq!(route.path(), path);
    }

    #[rstest]
    #[case("/")]
    #[case("/widgets")]
    #[case("/roles/abc/edit")]
    #[case("/roles/1/submit")]
    fn unknown_paths_are_rejected(#[case] path: &str) {
        assert_eq!(Route::parse(path), None);
    }
}
