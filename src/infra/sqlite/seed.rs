use std::path::Path;

use anyhow::Result;
use serde_json::json;

use crate::domain::entities::resource::Resource;
use crate::infra::sqlite::queries::{insert_many, is_empty};

const PERMISSIONS: [(&str, &str); 8] = [
    ("USER_VIEW", "View users"),
    ("USER_EDIT", "Edit users"),
    ("ROLE_VIEW", "View roles"),
    ("ROLE_EDIT", "Edit roles"),
    ("QUESTION_VIEW", "View questions"),
    ("QUESTION_EDIT", "Edit questions"),
    ("ASSIGNMENT_EDIT", "Edit assignments"),
    ("SUBMISSION_GRADE", "Grade submissions"),
];

/// Fills an empty database with a small demo dataset. Returns whether
/// anything was written.
pub fn seed_demo_data(db_path: &Path) -> Result<bool> {
    if !is_empty(db_path)? {
        return Ok(false);
    }

    insert_many(
        db_path,
        Resource::Permissions,
        PERMISSIONS
            .iter()
            .map(|(code, name)| json!({ "code": code, "name": name, "description": "", "active": true }))
            .collect(),
    )?;

    insert_many(
        db_path,
        Resource::Roles,
        vec![
            json!({
                "name": "ADMIN",
                "description": "Full access",
                "permissions": PERMISSIONS.iter().map(|(code, _)| code).collect::<Vec<_>>(),
                "active": true,
            }),
            json!({
                "name": "TEACHER",
                "description": "Manages questions and grades work",
                "permissions": ["QUESTION_VIEW", "QUESTION_EDIT", "ASSIGNMENT_EDIT", "SUBMISSION_GRADE"],
                "active": true,
            }),
            json!({ "name": "STUDENT", "description": "Submits assignments", "permissions": [], "active": true }),
        ],
    )?;

    insert_many(
        db_path,
        Resource::Users,
        vec![
            json!({ "username": "admin", "fullName": "Administrator", "email": "admin@example.com", "roles": ["ADMIN"], "active": true }),
            json!({ "username": "tnguyen", "fullName": "Thu Nguyen", "email": "thu@example.com", "roles": ["TEACHER"], "active": true }),
            json!({ "username": "mle", "fullName": "Minh Le", "email": "minh@example.com", "roles": ["STUDENT"], "active": false }),
        ],
    )?;

    let groups = insert_many(
        db_path,
        Resource::QuestionGroups,
        vec![
            json!({ "name": "UML basics", "description": "Notation and terminology", "active": true }),
            json!({ "name": "Class diagrams", "description": "", "active": true }),
        ],
    )?;

    let questions = insert_many(
        db_path,
        Resource::Questions,
        vec![
            json!({
                "content": "<p>What does UML stand for?</p>",
                "type": "SINGLE_CHOICE",
                "options": [{ "text": "Unified Modeling Language" }, { "text": "Universal Markup Language" }],
                "answer": "Unified Modeling Language",
                "groupId": groups[0].0,
                "active": true,
            }),
            json!({
                "content": "<p>Which relationships are shown with a diamond?</p>",
                "type": "MULTIPLE_CHOICE",
                "options": [{ "text": "Aggregation" }, { "text": "Composition" }, { "text": "Dependency" }],
                "answer": "Aggregation|Composition",
                "groupId": groups[1].0,
                "active": true,
            }),
            json!({
                "content": "<p>Explain the difference between an interface and an abstract class.</p>",
                "type": "ESSAY",
                "options": [],
                "answer": "",
                "groupId": groups[1].0,
                "active": true,
            }),
        ],
    )?;

    insert_many(
        db_path,
        Resource::TestSets,
        vec![json!({
            "title": "UML warm-up",
            "description": "Short quiz before the first lab",
            "questions": questions.iter().map(|id| id.0).collect::<Vec<_>>(),
            "active": true,
        })],
    )?;

    let assignments = insert_many(
        db_path,
        Resource::Assignments,
        vec![json!({
            "title": "Library system",
            "description": "<p>Model a small lending library.</p>",
            "dueDate": "2026-12-01",
            "maxScore": 10,
            "modules": [
                {
                    "name": "Domain model",
                    "diagramType": "CLASS",
                    "solutions": [{ "source": "@startuml\nclass Book\nclass Member\nMember \"1\" -- \"*\" Book\n@enduml" }],
                },
                { "name": "Borrowing", "diagramType": "SEQUENCE", "solutions": [] },
            ],
            "active": true,
        })],
    )?;

    insert_many(
        db_path,
        Resource::Submissions,
        vec![json!({
            "assignmentId": assignments[0].0,
            "moduleId": 0,
            "student": "mle",
            "umlSource": "@startuml\nclass Book\nclass Member\n@enduml",
            "status": "SUBMITTED",
            "submittedAt": "2026-10-01T09:30:00",
        })],
    )?;

    tracing::info!(db = %db_path.display(), "seeded demo data");
    Ok(true)
}
